// Endpoint templates and path-parameter substitution.
//
// Templates are host-relative paths with `:name` segments. Values are
// substituted verbatim; any placeholder left over after substitution is a
// usage error rather than a request to a literal `:name` path.

use crate::error::Error;

/// Named path parameters, e.g. `&[("server_id", "fe564c9a")]`.
pub type PathParams<'a> = &'a [(&'a str, &'a str)];

/// A host-relative endpoint path with `:name` placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Endpoint(&'static str);

impl Endpoint {
    pub const fn new(template: &'static str) -> Self {
        Self(template)
    }

    pub const fn template(self) -> &'static str {
        self.0
    }

    /// Substitute every `:name` segment with its value from `params`.
    ///
    /// Parameters with no matching placeholder are ignored. A blank value
    /// counts as missing.
    pub fn resolve(self, params: PathParams<'_>) -> Result<String, Error> {
        let mut resolved = String::with_capacity(self.0.len() + 32);
        for (i, segment) in self.0.split('/').enumerate() {
            if i > 0 {
                resolved.push('/');
            }
            match segment.strip_prefix(':') {
                Some(name) => {
                    let value = params
                        .iter()
                        .find_map(|(key, value)| (*key == name).then_some(*value))
                        .filter(|value| !value.trim().is_empty())
                        .ok_or_else(|| Error::MissingPathParameter {
                            template: self.0,
                            placeholder: name.to_owned(),
                        })?;
                    resolved.push_str(value);
                }
                None => resolved.push_str(segment),
            }
        }
        Ok(resolved)
    }
}

/// Client API (`/api/client`), authenticated with a client key.
pub mod client {
    use super::Endpoint;

    pub const ACCOUNT: Endpoint = Endpoint::new("/api/client/account");
    pub const SERVERS: Endpoint = Endpoint::new("/api/client");
    pub const SERVER: Endpoint = Endpoint::new("/api/client/servers/:server_id");
    pub const RESOURCES: Endpoint = Endpoint::new("/api/client/servers/:server_id/resources");
    pub const COMMAND: Endpoint = Endpoint::new("/api/client/servers/:server_id/command");
    pub const POWER: Endpoint = Endpoint::new("/api/client/servers/:server_id/power");
    pub const WEBSOCKET: Endpoint = Endpoint::new("/api/client/servers/:server_id/websocket");

    pub const BACKUPS: Endpoint = Endpoint::new("/api/client/servers/:server_id/backups");
    pub const BACKUP: Endpoint = Endpoint::new("/api/client/servers/:server_id/backups/:backup_id");
    pub const BACKUP_DOWNLOAD: Endpoint =
        Endpoint::new("/api/client/servers/:server_id/backups/:backup_id/download");

    pub const FILES_LIST: Endpoint = Endpoint::new("/api/client/servers/:server_id/files/list");
    pub const FILES_CONTENTS: Endpoint =
        Endpoint::new("/api/client/servers/:server_id/files/contents");
    pub const FILES_DOWNLOAD: Endpoint =
        Endpoint::new("/api/client/servers/:server_id/files/download");
    pub const FILES_RENAME: Endpoint = Endpoint::new("/api/client/servers/:server_id/files/rename");
    pub const FILES_COPY: Endpoint = Endpoint::new("/api/client/servers/:server_id/files/copy");
    pub const FILES_WRITE: Endpoint = Endpoint::new("/api/client/servers/:server_id/files/write");
    pub const FILES_COMPRESS: Endpoint =
        Endpoint::new("/api/client/servers/:server_id/files/compress");
    pub const FILES_DECOMPRESS: Endpoint =
        Endpoint::new("/api/client/servers/:server_id/files/decompress");
    pub const FILES_DELETE: Endpoint = Endpoint::new("/api/client/servers/:server_id/files/delete");
    pub const FILES_CREATE_FOLDER: Endpoint =
        Endpoint::new("/api/client/servers/:server_id/files/create-folder");
}

/// Application API (`/api/application`), authenticated with an application key.
pub mod application {
    use super::Endpoint;

    pub const USERS: Endpoint = Endpoint::new("/api/application/users");
    pub const USER: Endpoint = Endpoint::new("/api/application/users/:user_id");

    pub const NODES: Endpoint = Endpoint::new("/api/application/nodes");
    pub const NODE: Endpoint = Endpoint::new("/api/application/nodes/:node_id");
    pub const NODE_CONFIGURATION: Endpoint =
        Endpoint::new("/api/application/nodes/:node_id/configuration");

    pub const ALLOCATIONS: Endpoint = Endpoint::new("/api/application/nodes/:node_id/allocations");
    pub const ALLOCATION: Endpoint =
        Endpoint::new("/api/application/nodes/:node_id/allocations/:allocation_id");

    pub const LOCATIONS: Endpoint = Endpoint::new("/api/application/locations");
    pub const LOCATION: Endpoint = Endpoint::new("/api/application/locations/:location_id");

    pub const NESTS: Endpoint = Endpoint::new("/api/application/nests");
    pub const NEST: Endpoint = Endpoint::new("/api/application/nests/:nest_id");
    pub const EGGS: Endpoint = Endpoint::new("/api/application/nests/:nest_id/eggs");
    pub const EGG: Endpoint = Endpoint::new("/api/application/nests/:nest_id/eggs/:egg_id");

    pub const DATABASES: Endpoint = Endpoint::new("/api/application/servers/:server_id/databases");
    pub const DATABASE: Endpoint =
        Endpoint::new("/api/application/servers/:server_id/databases/:database_id");
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn substitutes_every_placeholder() {
        let path = client::BACKUP
            .resolve(&[("server_id", "fe564c9a"), ("backup_id", "904df120")])
            .unwrap();
        assert_eq!(path, "/api/client/servers/fe564c9a/backups/904df120");
    }

    #[test]
    fn template_without_placeholders_is_unchanged() {
        assert_eq!(client::ACCOUNT.resolve(&[]).unwrap(), "/api/client/account");
    }

    #[test]
    fn extra_parameters_are_ignored() {
        let path = client::SERVER
            .resolve(&[("backup_id", "x"), ("server_id", "abc")])
            .unwrap();
        assert_eq!(path, "/api/client/servers/abc");
    }

    #[test]
    fn values_are_substituted_verbatim() {
        let path = client::SERVER.resolve(&[("server_id", "a b")]).unwrap();
        assert_eq!(path, "/api/client/servers/a b");
    }

    #[test]
    fn missing_parameter_is_a_usage_error() {
        let err = client::BACKUP
            .resolve(&[("server_id", "fe564c9a")])
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Usage);
        assert!(matches!(
            err,
            Error::MissingPathParameter { ref placeholder, .. } if placeholder == "backup_id"
        ));
    }

    #[test]
    fn blank_parameter_counts_as_missing() {
        for blank in ["", "  "] {
            let err = client::BACKUP
                .resolve(&[("server_id", "fe564c9a"), ("backup_id", blank)])
                .unwrap_err();
            assert!(matches!(
                err,
                Error::MissingPathParameter { ref placeholder, .. } if placeholder == "backup_id"
            ));
        }
    }
}
