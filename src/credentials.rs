use anyhow::Result;
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

const ENV_TOKEN: &str = "MAILSENSE_TOKEN";
const ENV_APP_SECRET: &str = "MAILSENSE_APP_SECRET";
const KEYRING_SERVICE: &str = "mailsense";
const TOKEN_KEY: &str = "token";

/// Debug information about credential storage backends
#[derive(Debug, Clone)]
pub struct CredentialDebugInfo {
    pub keyring_available: bool,
    pub env_token_set: bool,
    pub file_path: PathBuf,
    pub file_exists: bool,
}

impl std::fmt::Display for CredentialDebugInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Credential Storage Status:")?;
        writeln!(
            f,
            "  Keyring: {}",
            if self.keyring_available {
                "available"
            } else {
                "unavailable"
            }
        )?;
        writeln!(
            f,
            "  Environment var ({}): {}",
            ENV_TOKEN,
            if self.env_token_set { "set" } else { "not set" }
        )?;
        writeln!(f, "  File fallback: {}", self.file_path.display())?;
        writeln!(f, "  File exists: {}", self.file_exists)?;
        Ok(())
    }
}

/// Storage for the API access token and application secret.
///
/// Lookup order: environment variable, system keyring, then a file in the
/// config directory readable only by the owner.
pub struct CredentialStore {
    dir: PathBuf,
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore {
    pub fn new() -> Self {
        let dir = crate::config::Config::config_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self { dir }
    }

    #[cfg(test)]
    fn in_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn token_file(&self) -> PathBuf {
        self.dir.join(".token")
    }

    fn app_secret_file(&self, app_id: &str) -> PathBuf {
        let safe_id = app_id.replace(['@', '.', '/', '\\', ':'], "_");
        self.dir.join(format!(".app_secret_{}", safe_id))
    }

    /// Get diagnostic info about credential storage backend
    pub fn debug_info(&self) -> CredentialDebugInfo {
        let keyring_available =
            if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, "test:mailsense") {
                // Try a dummy operation to see if keyring works
                entry.set_password("__test__").is_ok()
                    && entry.get_password().is_ok()
                    && entry.delete_credential().is_ok()
            } else {
                false
            };

        let file_path = self.token_file();
        let file_exists = file_path.exists();

        CredentialDebugInfo {
            keyring_available,
            env_token_set: env::var(ENV_TOKEN).is_ok(),
            file_path,
            file_exists,
        }
    }

    /// Try to get a secret from keyring
    fn keyring_get(&self, key: &str) -> Option<String> {
        let entry = keyring::Entry::new(KEYRING_SERVICE, key).ok()?;
        entry.get_password().ok()
    }

    /// Try to set a secret in keyring
    fn keyring_set(&self, key: &str, secret: &str) -> bool {
        if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, key) {
            entry.set_password(secret).is_ok() && self.keyring_get(key).is_some()
        } else {
            false
        }
    }

    fn file_get(path: &Path) -> Option<String> {
        fs::read_to_string(path)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    /// Write a secret to a file (with restricted permissions)
    fn file_set(path: &Path, secret: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Create file with restricted permissions atomically to avoid TOCTOU
        #[cfg(unix)]
        {
            let mut file = fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(path)?;
            file.write_all(secret.as_bytes())?;
        }

        #[cfg(not(unix))]
        {
            fs::write(path, secret)?;
        }

        Ok(())
    }

    /// Stored access token, if any
    pub fn get_token(&self) -> Option<String> {
        if let Ok(token) = env::var(ENV_TOKEN)
            && !token.trim().is_empty()
        {
            return Some(token.trim().to_string());
        }

        self.keyring_get(TOKEN_KEY)
            .or_else(|| Self::file_get(&self.token_file()))
    }

    pub fn set_token(&self, token: &str) -> Result<()> {
        if self.keyring_set(TOKEN_KEY, token) {
            return Ok(());
        }

        eprintln!("Note: Keyring unavailable, using file-based storage.");
        Self::file_set(&self.token_file(), token)
    }

    pub fn get_app_secret(&self, app_id: &str) -> Result<String> {
        if let Ok(secret) = env::var(ENV_APP_SECRET)
            && !secret.trim().is_empty()
        {
            return Ok(secret.trim().to_string());
        }

        let key = format!("app-secret:{}", app_id);
        if let Some(secret) = self.keyring_get(&key) {
            return Ok(secret);
        }

        if let Some(secret) = Self::file_get(&self.app_secret_file(app_id)) {
            return Ok(secret);
        }

        anyhow::bail!(
            "App secret not found for {}. Set {} or run 'mailsense setup'.",
            app_id,
            ENV_APP_SECRET
        )
    }

    pub fn set_app_secret(&self, app_id: &str, secret: &str) -> Result<()> {
        let key = format!("app-secret:{}", app_id);
        if self.keyring_set(&key, secret) {
            return Ok(());
        }

        eprintln!("Note: Keyring unavailable, using file-based storage.");
        Self::file_set(&self.app_secret_file(app_id), secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to prevent parallel test interference with env vars
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn temp_store(name: &str) -> CredentialStore {
        let dir = env::temp_dir().join(format!("mailsense_{}_{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        CredentialStore::in_dir(dir)
    }

    #[test]
    fn test_env_token_takes_priority() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let store = temp_store("env_priority");
        CredentialStore::file_set(&store.token_file(), "file_token").unwrap();

        unsafe { env::set_var(ENV_TOKEN, "env_token") };
        assert_eq!(store.get_token().as_deref(), Some("env_token"));
        unsafe { env::remove_var(ENV_TOKEN) };

        let _ = fs::remove_dir_all(&store.dir);
    }

    #[test]
    fn test_env_app_secret() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let store = temp_store("env_secret");

        unsafe { env::set_var(ENV_APP_SECRET, "s3cret") };
        assert_eq!(store.get_app_secret("app-1").unwrap(), "s3cret");
        unsafe { env::remove_var(ENV_APP_SECRET) };
    }

    #[test]
    fn test_file_fallback_round_trip() {
        let store = temp_store("file_roundtrip");
        let path = store.token_file();

        CredentialStore::file_set(&path, "  tok-from-file\n").unwrap();
        assert_eq!(
            CredentialStore::file_get(&path),
            Some("tok-from-file".to_string())
        );

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }

        let _ = fs::remove_dir_all(&store.dir);
    }

    #[test]
    fn test_app_secret_files_are_per_app() {
        let store = temp_store("per_app");
        let first = store.app_secret_file("app.one");
        let second = store.app_secret_file("app.two");

        assert_ne!(first, second);
        let filename = first.file_name().unwrap().to_string_lossy();
        assert!(filename.starts_with(".app_secret_"));
        assert!(filename.contains("app_one"), "unexpected filename: {}", filename);
    }

    #[test]
    fn test_empty_file_is_ignored() {
        let store = temp_store("empty_file");
        CredentialStore::file_set(&store.token_file(), "   ").unwrap();
        assert_eq!(CredentialStore::file_get(&store.token_file()), None);
        let _ = fs::remove_dir_all(&store.dir);
    }

    #[test]
    fn test_debug_info() {
        let store = temp_store("debug_info");
        let info = store.debug_info();

        assert!(info.file_path.to_string_lossy().contains(".token"));
        let display = format!("{}", info);
        assert!(display.contains("Credential Storage Status:"));
        assert!(display.contains("Keyring:"));
        assert!(display.contains("File fallback:"));
    }
}
