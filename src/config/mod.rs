//! Credential resolution: explicit → cached file path → file → env → prompt.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ColloquyError, Result};

const ENV_CLIENT_ID: &str = "COLLOQUY_CLIENT_ID";
const ENV_CLIENT_SECRET: &str = "COLLOQUY_CLIENT_SECRET";
const ENV_AUTH_URL: &str = "COLLOQUY_AUTH_URL";
const ENV_API_URL: &str = "COLLOQUY_API_URL";

/// Everything needed to reach the service: OAuth client credentials plus
/// the token and API endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub auth_url: String,
    pub api_url: String,
}

impl Credentials {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        auth_url: impl Into<String>,
        api_url: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            auth_url: auth_url.into(),
            api_url: api_url.into(),
        }
    }

    /// Load credentials from a JSON file.
    ///
    /// Accepts the flat form (`client_id`/`client_secret`/`auth_url`/
    /// `api_url`) or a service-binding document (`uaa` + `service_urls`),
    /// in which case the token endpoint is `<uaa.url>/oauth/token`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ColloquyError::Configuration(format!(
                "cannot read credentials file {}: {e}",
                path.display()
            ))
        })?;

        if let Ok(binding) = serde_json::from_str::<ServiceBinding>(&raw) {
            return Ok(Self {
                client_id: binding.uaa.clientid,
                client_secret: binding.uaa.clientsecret,
                auth_url: format!("{}/oauth/token", binding.uaa.url.trim_end_matches('/')),
                api_url: binding.service_urls.agent_api_url,
            });
        }

        serde_json::from_str(&raw).map_err(|e| {
            ColloquyError::Configuration(format!(
                "invalid credentials file {}: {e}",
                path.display()
            ))
        })
    }

    /// Load credentials from the environment (after loading `.env`).
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error

        let vars = [ENV_CLIENT_ID, ENV_CLIENT_SECRET, ENV_AUTH_URL, ENV_API_URL];
        let values: Vec<Option<String>> = vars
            .iter()
            .map(|name| std::env::var(name).ok().filter(|v| !v.is_empty()))
            .collect();

        if let [Some(id), Some(secret), Some(auth), Some(api)] = &values[..] {
            return Ok(Self::new(
                id.as_str(),
                secret.as_str(),
                auth.as_str(),
                api.as_str(),
            ));
        }

        let missing: Vec<&str> = vars
            .iter()
            .zip(&values)
            .filter(|(_, v)| v.is_none())
            .map(|(name, _)| *name)
            .collect();
        Err(ColloquyError::Configuration(format!(
            "missing environment variables: {}",
            missing.join(", ")
        )))
    }

    /// Resolve credentials through the full fallback chain.
    ///
    /// Order: explicit file path → previously cached path → environment →
    /// interactive prompt for a file path. A path that loads successfully
    /// is remembered in `store` for the next run.
    pub fn resolve(explicit_path: Option<&Path>, store: &CredentialStore) -> Result<Self> {
        if let Some(path) = explicit_path {
            let creds = Self::from_file(path)?;
            store.remember_path(path);
            return Ok(creds);
        }

        if let Some(cached) = store.cached_path() {
            if cached.exists() {
                tracing::debug!(path = %cached.display(), "using cached credentials path");
                return Self::from_file(&cached);
            }
        }

        if let Ok(creds) = Self::from_env() {
            tracing::info!("loaded credentials from environment");
            return Ok(creds);
        }

        let path = prompt_for_path()?;
        let creds = Self::from_file(&path)?;
        store.remember_path(&path);
        Ok(creds)
    }
}

#[derive(Deserialize)]
struct ServiceBinding {
    uaa: BindingUaa,
    service_urls: BindingUrls,
}

#[derive(Deserialize)]
struct BindingUaa {
    clientid: String,
    clientsecret: String,
    url: String,
}

#[derive(Deserialize)]
struct BindingUrls {
    agent_api_url: String,
}

/// The single piece of persisted local state: the path of the credentials
/// file last used, so later runs skip the prompt.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    cache_file: PathBuf,
}

#[derive(Serialize, Deserialize)]
struct CacheFile {
    credentials_path: PathBuf,
}

impl CredentialStore {
    /// Store under the platform cache directory.
    pub fn default_location() -> Self {
        let cache_file = directories::ProjectDirs::from("", "", "colloquy")
            .map(|dirs| dirs.cache_dir().join("credentials-path.json"))
            .unwrap_or_else(|| PathBuf::from(".colloquy-credentials-path.json"));
        Self { cache_file }
    }

    /// Store backed by a specific file (used by tests).
    pub fn at(cache_file: impl Into<PathBuf>) -> Self {
        Self {
            cache_file: cache_file.into(),
        }
    }

    /// The cached credentials path, if one was remembered.
    pub fn cached_path(&self) -> Option<PathBuf> {
        let raw = std::fs::read_to_string(&self.cache_file).ok()?;
        let cache: CacheFile = serde_json::from_str(&raw).ok()?;
        Some(cache.credentials_path)
    }

    /// Remember a credentials path for future runs. Failures to write the
    /// cache are logged, not fatal.
    pub fn remember_path(&self, path: &Path) {
        let cache = CacheFile {
            credentials_path: path.to_path_buf(),
        };
        let write = || -> std::io::Result<()> {
            if let Some(parent) = self.cache_file.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let raw = serde_json::to_string(&cache).map_err(std::io::Error::other)?;
            std::fs::write(&self.cache_file, raw)
        };
        if let Err(e) = write() {
            tracing::warn!(error = %e, "failed to cache credentials path");
        }
    }

    /// Forget the cached path.
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.cache_file) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

fn prompt_for_path() -> Result<PathBuf> {
    println!("No credentials found. Enter the path to your credentials JSON file");
    println!("(or 'cancel' to exit):");
    print!("> ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    let entered = line.trim().trim_matches(|c| c == '\'' || c == '"');

    if entered.is_empty() || entered.eq_ignore_ascii_case("cancel") {
        return Err(ColloquyError::Configuration(
            "no credentials provided: pass a file path, set COLLOQUY_* environment \
             variables, or answer the prompt"
                .to_string(),
        ));
    }

    let path = PathBuf::from(entered);
    if !path.exists() {
        return Err(ColloquyError::Configuration(format!(
            "credentials file not found: {}",
            path.display()
        )));
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_credentials_file_parses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("creds.json");
        std::fs::write(
            &path,
            r#"{
                "client_id": "id-1",
                "client_secret": "secret-1",
                "auth_url": "https://auth.example/oauth/token",
                "api_url": "https://api.example"
            }"#,
        )
        .unwrap();

        let creds = Credentials::from_file(&path).unwrap();
        assert_eq!(creds.client_id, "id-1");
        assert_eq!(creds.api_url, "https://api.example");
    }

    #[test]
    fn service_binding_file_parses_and_derives_token_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("binding.json");
        std::fs::write(
            &path,
            r#"{
                "uaa": {
                    "clientid": "bound-id",
                    "clientsecret": "bound-secret",
                    "url": "https://tenant.auth.example/"
                },
                "service_urls": {
                    "agent_api_url": "https://agents.example"
                }
            }"#,
        )
        .unwrap();

        let creds = Credentials::from_file(&path).unwrap();
        assert_eq!(creds.client_id, "bound-id");
        assert_eq!(creds.auth_url, "https://tenant.auth.example/oauth/token");
        assert_eq!(creds.api_url, "https://agents.example");
    }

    #[test]
    fn malformed_file_is_a_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("creds.json");
        std::fs::write(&path, "not json").unwrap();
        let err = Credentials::from_file(&path).unwrap_err();
        assert!(matches!(err, ColloquyError::Configuration(_)));
    }

    #[test]
    fn store_round_trips_and_clears() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::at(dir.path().join("cache.json"));
        assert!(store.cached_path().is_none());

        store.remember_path(Path::new("/tmp/creds.json"));
        assert_eq!(
            store.cached_path(),
            Some(PathBuf::from("/tmp/creds.json"))
        );

        store.clear().unwrap();
        assert!(store.cached_path().is_none());
        // Clearing twice is fine.
        store.clear().unwrap();
    }

    #[test]
    fn explicit_path_wins_and_is_remembered() {
        let dir = tempfile::tempdir().unwrap();
        let creds_path = dir.path().join("creds.json");
        std::fs::write(
            &creds_path,
            r#"{"client_id":"x","client_secret":"y","auth_url":"https://a","api_url":"https://b"}"#,
        )
        .unwrap();
        let store = CredentialStore::at(dir.path().join("cache.json"));

        let creds = Credentials::resolve(Some(&creds_path), &store).unwrap();
        assert_eq!(creds.client_id, "x");
        assert_eq!(store.cached_path(), Some(creds_path));
    }

    #[test]
    fn cached_path_is_used_when_no_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let creds_path = dir.path().join("creds.json");
        std::fs::write(
            &creds_path,
            r#"{"client_id":"cached","client_secret":"y","auth_url":"https://a","api_url":"https://b"}"#,
        )
        .unwrap();
        let store = CredentialStore::at(dir.path().join("cache.json"));
        store.remember_path(&creds_path);

        let creds = Credentials::resolve(None, &store).unwrap();
        assert_eq!(creds.client_id, "cached");
    }
}
