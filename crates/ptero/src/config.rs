//! Flag-aware client construction on top of `ptero-config`.
//!
//! Precedence for every setting is flag/env > profile > config defaults.

use ptero_api::{ClientOptions, Credentials, PteroClient, TlsMode};
use ptero_config::{Config, Profile};
use secrecy::{ExposeSecret, SecretString};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build a `PteroClient` from the config file, the active profile, and flag overrides.
pub fn build_client(global: &GlobalOpts) -> Result<PteroClient, CliError> {
    let cfg = ptero_config::load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    let (credentials, options) = match cfg.profiles.get(&profile_name) {
        Some(profile) => resolve_profile(profile, &profile_name, global, &cfg)?,
        None => resolve_flags_only(&profile_name, global, &cfg)?,
    };

    tracing::debug!(
        profile = %profile_name,
        host = %credentials.host(),
        timeout = ?options.timeout,
        "resolved panel connection"
    );
    Ok(PteroClient::from_credentials(credentials, &options)?)
}

/// Translate a profile + global flags into credentials and transport options.
fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    global: &GlobalOpts,
    cfg: &Config,
) -> Result<(Credentials, ClientOptions), CliError> {
    let host = global.host.as_deref().unwrap_or(&profile.panel);

    let api_key = match global.api_key {
        Some(ref key) => SecretString::from(key.clone()),
        None => ptero_config::resolve_api_key(profile, profile_name)?,
    };
    let application_key = global
        .application_key
        .clone()
        .map(SecretString::from)
        .or_else(|| ptero_config::resolve_application_key(profile, profile_name));

    let credentials = credentials(host, &api_key, application_key.as_ref())?;
    let options = apply_overrides(ptero_config::profile_to_options(profile, &cfg.defaults), global);
    Ok((credentials, options))
}

/// No matching profile: everything must come from flags / env vars.
fn resolve_flags_only(
    profile_name: &str,
    global: &GlobalOpts,
    cfg: &Config,
) -> Result<(Credentials, ClientOptions), CliError> {
    let Some(host) = global.host.as_deref() else {
        if global.profile.is_some() {
            return Err(CliError::ProfileNotFound {
                name: profile_name.into(),
                available: available_profiles(cfg),
            });
        }
        return Err(CliError::NoConfig {
            path: ptero_config::config_path().display().to_string(),
        });
    };

    let api_key = global
        .api_key
        .clone()
        .map(SecretString::from)
        .ok_or_else(|| CliError::NoCredentials {
            profile: profile_name.into(),
        })?;
    let application_key = global.application_key.clone().map(SecretString::from);

    let credentials = credentials(host, &api_key, application_key.as_ref())?;
    let options = ClientOptions {
        timeout: std::time::Duration::from_secs(cfg.defaults.timeout),
        tls: if cfg.defaults.insecure {
            TlsMode::DangerAcceptInvalid
        } else {
            TlsMode::System
        },
        ..ClientOptions::default()
    };
    Ok((credentials, apply_overrides(options, global)))
}

fn credentials(
    host: &str,
    api_key: &SecretString,
    application_key: Option<&SecretString>,
) -> Result<Credentials, CliError> {
    let mut credentials = Credentials::new(host, api_key.expose_secret())?;
    if let Some(key) = application_key {
        credentials = credentials.with_application_key(key.expose_secret())?;
    }
    Ok(credentials)
}

fn apply_overrides(mut options: ClientOptions, global: &GlobalOpts) -> ClientOptions {
    if global.insecure {
        options.tls = TlsMode::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        options.timeout = std::time::Duration::from_secs(secs);
    }
    options
}

pub fn available_profiles(cfg: &Config) -> String {
    if cfg.profiles.is_empty() {
        "(none)".into()
    } else {
        cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}
