//! Client configuration.
//!
//! Read once at startup from the environment:
//!
//! - `EVENTHUB_CREDENTIAL_PATH`: where the credential file lives
//!   (default `{data_dir}/eventhub/credential.json`)
//! - `EVENTHUB_ROUTES_FILE`: optional JSON route rules replacing the
//!   built-in table, shaped as `{"routes": {"/path": ["USER", "ADMIN"]}}`

use std::path::{Path, PathBuf};

use thiserror::Error;

use eventhub_auth::{Role, RouteTable};

use crate::routes::default_routes;

pub const CREDENTIAL_PATH_ENV: &str = "EVENTHUB_CREDENTIAL_PATH";
pub const ROUTES_FILE_ENV: &str = "EVENTHUB_ROUTES_FILE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid route rules in {}: {source}", .path.display())]
    Routes {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("route rules in {} do not let {role} reach {}", .path.display(), .role.home_route())]
    UnreachableHome { path: PathBuf, role: Role },
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub credential_path: PathBuf,
    pub routes: RouteTable,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let credential_path = std::env::var_os(CREDENTIAL_PATH_ENV).map(PathBuf::from);
        let routes_file = std::env::var_os(ROUTES_FILE_ENV).map(PathBuf::from);
        Self::load(credential_path, routes_file.as_deref())
    }

    /// Build a config from explicit sources; `None` selects the default.
    pub fn load(credential_path: Option<PathBuf>, routes_file: Option<&Path>) -> Result<Self, ConfigError> {
        let credential_path = credential_path.unwrap_or_else(default_credential_path);
        let routes = match routes_file {
            Some(path) => load_routes(path)?,
            None => default_routes(),
        };

        Ok(Self {
            credential_path,
            routes,
        })
    }
}

/// Parse route rules from a JSON file.
///
/// Role names are strict here (`"USER"`, `"ORGANIZER"`, `"ADMIN"`): a typo
/// in configuration is an error, not a silently unreachable route. Every
/// role's home route must be listed and must permit that role, because the
/// guard redirects there on a role mismatch.
pub fn load_routes(path: &Path) -> Result<RouteTable, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let routes: RouteTable = serde_json::from_str(&raw).map_err(|source| ConfigError::Routes {
        path: path.to_path_buf(),
        source,
    })?;

    if let Some(role) = Role::ALL
        .into_iter()
        .find(|role| !routes.permitted(role.home_route()).is_some_and(|p| p.contains(role)))
    {
        return Err(ConfigError::UnreachableHome {
            path: path.to_path_buf(),
            role,
        });
    }
    Ok(routes)
}

/// `{app_data_dir}/eventhub/credential.json`, falling back to the working
/// directory when the platform has no data directory.
pub fn default_credential_path() -> PathBuf {
    let base = dirs::data_dir().or_else(|| {
        dirs::home_dir().map(|mut h| {
            h.push(".local");
            h.push("share");
            h
        })
    });

    match base {
        Some(mut dir) => {
            dir.push("eventhub");
            dir.push("credential.json");
            dir
        }
        None => {
            tracing::warn!("no data directory available; storing credential under ./.eventhub");
            PathBuf::from(".eventhub").join("credential.json")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOMES: &str = r#""/user/dashboard": ["USER"], "/organizer/dashboard": ["ORGANIZER"], "/admin/dashboard": ["ADMIN"]"#;

    #[test]
    fn defaults_use_built_in_routes() {
        let config = ClientConfig::load(Some(PathBuf::from("/tmp/cred.json")), None).unwrap();
        assert_eq!(config.credential_path, PathBuf::from("/tmp/cred.json"));
        assert_eq!(config.routes, default_routes());
    }

    #[test]
    fn default_credential_path_ends_with_eventhub_file() {
        let path = default_credential_path();
        assert!(path.ends_with("eventhub/credential.json") || path.ends_with(".eventhub/credential.json"));
    }

    #[test]
    fn routes_file_replaces_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routes.json");
        std::fs::write(&path, format!(r#"{{"routes": {{{HOMES}, "/reports": ["ADMIN", "ORGANIZER"]}}}}"#)).unwrap();

        let config = ClientConfig::load(None, Some(&path)).unwrap();
        assert_eq!(config.routes.len(), 4);
        assert!(config.routes.permitted("/events").is_none());
        let permitted = config.routes.permitted("/reports").unwrap();
        assert!(permitted.contains(&Role::Admin));
        assert!(permitted.contains(&Role::Organizer));
        assert!(!permitted.contains(&Role::User));
    }

    #[test]
    fn unknown_role_in_routes_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routes.json");
        std::fs::write(&path, r#"{"routes": {"/reports": ["SUPERVISOR"]}}"#).unwrap();

        let err = ClientConfig::load(None, Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Routes { .. }));
    }

    #[test]
    fn routes_file_must_keep_every_home_reachable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routes.json");

        std::fs::write(&path, r#"{"routes": {"/reports": ["ADMIN"]}}"#).unwrap();
        let err = load_routes(&path).unwrap_err();
        assert!(matches!(err, ConfigError::UnreachableHome { role: Role::User, .. }));

        let wrong_role = r#"{"routes": {"/user/dashboard": ["USER"], "/organizer/dashboard": ["ORGANIZER"], "/admin/dashboard": ["ORGANIZER"]}}"#;
        std::fs::write(&path, wrong_role).unwrap();
        let err = load_routes(&path).unwrap_err();
        assert!(matches!(err, ConfigError::UnreachableHome { role: Role::Admin, .. }));

        std::fs::write(&path, r#"{"routes": {}}"#).unwrap();
        assert!(matches!(
            load_routes(&path).unwrap_err(),
            ConfigError::UnreachableHome { .. }
        ));
    }

    #[test]
    fn missing_routes_file_is_a_read_error() {
        let err = load_routes(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
