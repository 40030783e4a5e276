//! CLI error types with miette diagnostics.
//!
//! Maps `ptero_api::Error` and `ptero_config::ConfigError` into user-facing
//! errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use ptero_api::ErrorKind;
use ptero_config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Panel responses ──────────────────────────────────────────────

    #[error("{detail}")]
    #[diagnostic(
        code(ptero::upstream),
        help("The panel answered {status} ({code}).")
    )]
    Upstream {
        status: String,
        code: String,
        detail: String,
    },

    #[error("The panel rejected the API key: {detail}")]
    #[diagnostic(
        code(ptero::auth_failed),
        help(
            "Client keys start with ptlc_ and application keys with ptla_.\n\
             Application commands need an application key: --application-key or PTERO_APPLICATION_KEY."
        )
    )]
    AuthFailed { detail: String },

    #[error(transparent)]
    #[diagnostic(code(ptero::api))]
    Api(ptero_api::Error),

    // ── Configuration ────────────────────────────────────────────────

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(ptero::no_credentials),
        help(
            "Pass --api-key, set PTERO_API_KEY, or store one with:\n\
             echo $KEY | ptero config set-key {profile}"
        )
    )]
    NoCredentials { profile: String },

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(ptero::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: ptero config set-profile {name} --panel <URL>"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No panel configured")]
    #[diagnostic(
        code(ptero::no_config),
        help(
            "Pass --host and --api-key, or create a profile with: ptero config set-profile\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(ptero::config))]
    Config(Box<ConfigError>),

    // ── Console ──────────────────────────────────────────────────────

    #[error("Console closed: {reason}")]
    #[diagnostic(code(ptero::console_closed))]
    ConsoleClosed { reason: String },

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(ptero::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(ptero::validation))]
    Validation { field: String, reason: String },

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(ptero::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    #[diagnostic(code(ptero::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Upstream { status, .. } => match status.as_str() {
                "401" | "403" => exit_code::AUTH,
                "404" => exit_code::NOT_FOUND,
                "409" => exit_code::CONFLICT,
                _ => exit_code::GENERAL,
            },
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::Api(err) => match err.kind() {
                ErrorKind::Usage => exit_code::USAGE,
                ErrorKind::Generic if err.is_not_found() => exit_code::NOT_FOUND,
                ErrorKind::Generic if err.is_transient() => exit_code::CONNECTION,
                ErrorKind::Generic | ErrorKind::Validation | ErrorKind::Upstream => {
                    exit_code::GENERAL
                }
            },
            Self::ConsoleClosed { .. } => exit_code::CONNECTION,
            Self::ProfileNotFound { .. }
            | Self::NoConfig { .. }
            | Self::Validation { .. }
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── Library errors → CliError ────────────────────────────────────────

impl From<ptero_api::Error> for CliError {
    fn from(err: ptero_api::Error) -> Self {
        match err {
            ptero_api::Error::Api(api) if api.status == "401" || api.status == "403" => {
                Self::AuthFailed { detail: api.detail }
            }
            ptero_api::Error::Api(api) => Self::Upstream {
                status: api.status,
                code: api.code,
                detail: api.detail,
            },
            other => Self::Api(other),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            ConfigError::Credentials(inner) => inner.into(),
            other => Self::Config(Box::new(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(status: &str) -> ptero_api::Error {
        ptero_api::Error::Api(ptero_api::ApiError {
            code: "SomeException".into(),
            status: status.into(),
            detail: "nope".into(),
        })
    }

    #[test]
    fn upstream_statuses_map_to_exit_codes() {
        assert_eq!(CliError::from(api("404")).exit_code(), exit_code::NOT_FOUND);
        assert_eq!(CliError::from(api("409")).exit_code(), exit_code::CONFLICT);
        assert_eq!(CliError::from(api("500")).exit_code(), exit_code::GENERAL);
    }

    #[test]
    fn rejected_key_is_an_auth_failure() {
        let err = CliError::from(api("403"));
        assert!(matches!(err, CliError::AuthFailed { .. }));
        assert_eq!(err.exit_code(), exit_code::AUTH);
    }

    #[test]
    fn invalid_credentials_are_usage_errors() {
        let err = CliError::from(ptero_api::Error::InvalidCredentials);
        assert_eq!(err.exit_code(), exit_code::USAGE);
        assert_eq!(err.to_string(), ptero_api::error::INVALID_CREDENTIALS_MESSAGE);
    }

    #[test]
    fn config_credentials_errors_unwrap_to_api_errors() {
        let err = CliError::from(ConfigError::Credentials(ptero_api::Error::InvalidCredentials));
        assert_eq!(err.exit_code(), exit_code::USAGE);
    }
}
