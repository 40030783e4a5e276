//! `ptero config` handlers. None of these talk to the panel.

use std::io::{self, BufRead, IsTerminal};

use secrecy::SecretString;

use ptero_config::{Config, Profile};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{active_profile_name, available_profiles};
use crate::error::CliError;
use crate::output;

const REDACTED: &str = "********";

fn redact(mut cfg: Config) -> Config {
    for profile in cfg.profiles.values_mut() {
        if profile.api_key.is_some() {
            profile.api_key = Some(REDACTED.into());
        }
        if profile.application_key.is_some() {
            profile.application_key = Some(REDACTED.into());
        }
    }
    cfg
}

fn detail(cfg: &Config, active: &str) -> String {
    let mut lines = vec![
        format!("Config:   {}", ptero_config::config_path().display()),
        format!("Active:   {active}"),
        format!("Profiles: {}", available_profiles(cfg)),
        format!("Output:   {}", cfg.defaults.output),
        format!("Timeout:  {}s", cfg.defaults.timeout),
    ];
    for (name, profile) in &cfg.profiles {
        lines.push(String::new());
        lines.push(format!("[{name}]"));
        lines.push(format!("  panel: {}", profile.panel));
        if let Some(ref env) = profile.api_key_env {
            lines.push(format!("  api_key_env: {env}"));
        }
        if profile.api_key.is_some() {
            lines.push(format!("  api_key: {REDACTED}"));
        }
        if profile.insecure == Some(true) {
            lines.push("  insecure: true".into());
        }
    }
    lines.join("\n")
}

/// Prompt without echo on a terminal; otherwise take one line from stdin.
fn read_key(interactive: bool) -> Result<SecretString, CliError> {
    let raw = if interactive {
        rpassword::prompt_password("API key: ")?
    } else {
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        line
    };
    let key = raw.trim();
    if key.is_empty() {
        return Err(CliError::Validation {
            field: "key".into(),
            reason: "expected a key on stdin or at the prompt".into(),
        });
    }
    Ok(SecretString::from(key.to_owned()))
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let cfg = redact(ptero_config::load_config_or_default());
            let active = active_profile_name(global, &cfg);
            let out = output::render_single(
                global.output,
                &cfg,
                |c| detail(c, &active),
                |_| active.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(
                &ptero_config::config_path().display().to_string(),
                global.quiet,
            );
            Ok(())
        }

        ConfigCommand::SetProfile {
            name,
            panel,
            api_key_env,
            default,
        } => {
            let mut cfg = ptero_config::load_config_or_default();
            cfg.profiles.insert(
                name.clone(),
                Profile {
                    panel,
                    api_key_env,
                    ..Profile::default()
                },
            );
            if default || cfg.profiles.len() == 1 {
                cfg.default_profile = Some(name.clone());
            }
            let path = ptero_config::save_config(&cfg)?;
            output::notice(
                &format!("Saved profile '{name}' to {}", path.display()),
                global.quiet,
            );
            Ok(())
        }

        ConfigCommand::SetKey { name, application } => {
            let key = read_key(io::stdin().is_terminal())?;
            ptero_config::store_key(&name, application, &key)?;
            output::notice(
                &format!("Stored key for profile '{name}' in the OS keyring"),
                global.quiet,
            );
            Ok(())
        }
    }
}
