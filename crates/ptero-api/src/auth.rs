use reqwest::header::HeaderValue;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::error::Error;

/// Panel host plus the keys used against it.
///
/// The client key drives `/api/client`; the application key drives
/// `/api/application` and falls back to the client key when unset.
#[derive(Debug, Clone)]
pub struct Credentials {
    host: Url,
    api_key: SecretString,
    application_key: Option<SecretString>,
}

impl Credentials {
    /// Validate and build credentials.
    ///
    /// Empty or whitespace-only values, and keys that cannot travel in an
    /// `Authorization` header, fail with [`Error::InvalidCredentials`] before
    /// any request is made.
    pub fn new(host: &str, api_key: &str) -> Result<Self, Error> {
        let host = host.trim();
        if host.is_empty() {
            return Err(Error::InvalidCredentials);
        }
        let api_key = checked_key(api_key)?;

        Ok(Self {
            host: Url::parse(host)?,
            api_key,
            application_key: None,
        })
    }

    /// Use a separate key for the application API.
    pub fn with_application_key(mut self, key: &str) -> Result<Self, Error> {
        self.application_key = Some(checked_key(key)?);
        Ok(self)
    }

    pub fn host(&self) -> &Url {
        &self.host
    }

    pub fn api_key(&self) -> &SecretString {
        &self.api_key
    }

    pub fn application_key(&self) -> &SecretString {
        self.application_key.as_ref().unwrap_or(&self.api_key)
    }

    /// Value for the `Origin` header of console socket upgrades.
    pub(crate) fn origin(&self) -> String {
        self.host.origin().ascii_serialization()
    }

    pub(crate) fn has_separate_application_key(&self) -> bool {
        self.application_key
            .as_ref()
            .is_some_and(|key| key.expose_secret() != self.api_key.expose_secret())
    }
}

fn checked_key(key: &str) -> Result<SecretString, Error> {
    let key = SecretString::from(key.trim().to_owned());
    if key.expose_secret().is_empty() {
        return Err(Error::InvalidCredentials);
    }
    bearer(&key)?;
    Ok(key)
}

/// `Authorization: Bearer <key>`, marked sensitive so it stays out of logs.
pub(crate) fn bearer(key: &SecretString) -> Result<HeaderValue, Error> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", key.expose_secret()))
        .map_err(|_| Error::InvalidCredentials)?;
    value.set_sensitive(true);
    Ok(value)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::error::{ErrorKind, INVALID_CREDENTIALS_MESSAGE};

    #[test]
    fn empty_host_is_rejected() {
        let err = Credentials::new("", "ptlc_key").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Usage);
        assert_eq!(err.to_string(), INVALID_CREDENTIALS_MESSAGE);
    }

    #[test]
    fn whitespace_key_is_rejected() {
        let err = Credentials::new("https://panel.example.com", "   ").unwrap_err();
        assert!(matches!(err, Error::InvalidCredentials));
    }

    #[test]
    fn key_with_control_characters_is_rejected() {
        let err = Credentials::new("https://panel.example.com", "ptlc\r\nX-Injected: 1").unwrap_err();
        assert!(matches!(err, Error::InvalidCredentials));
        assert_eq!(err.kind(), ErrorKind::Usage);

        let creds = Credentials::new("https://panel.example.com", "ptlc_key").unwrap();
        let err = creds.with_application_key("ptla\u{7f}admin").unwrap_err();
        assert!(matches!(err, Error::InvalidCredentials));
    }

    #[test]
    fn bearer_header_is_sensitive() {
        let value = bearer(&SecretString::from("ptlc_key")).unwrap();
        assert_eq!(value.to_str().unwrap(), "Bearer ptlc_key");
        assert!(value.is_sensitive());
    }

    #[test]
    fn relative_host_is_an_invalid_url() {
        let err = Credentials::new("panel.example.com", "ptlc_key").unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    #[test]
    fn application_key_falls_back_to_client_key() {
        let creds = Credentials::new(" https://panel.example.com ", "ptlc_key").unwrap();
        assert_eq!(creds.application_key().expose_secret(), "ptlc_key");
        assert!(!creds.has_separate_application_key());

        let creds = creds.with_application_key("ptla_admin").unwrap();
        assert_eq!(creds.application_key().expose_secret(), "ptla_admin");
        assert!(creds.has_separate_application_key());
    }

    #[test]
    fn origin_drops_the_path() {
        let creds = Credentials::new("https://panel.example.com:8443/sub/", "k").unwrap();
        assert_eq!(creds.origin(), "https://panel.example.com:8443");
    }

    #[test]
    fn debug_redacts_keys() {
        let creds = Credentials::new("https://panel.example.com", "ptlc_secret").unwrap();
        assert!(!format!("{creds:?}").contains("ptlc_secret"));
    }
}
