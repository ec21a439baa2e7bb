// Persisted session credential
//
// One opaque bearer token in one file under the config directory. Survives
// restarts the way browser local storage survives a reload; clearing the
// profile directory destroys it. Expiry decisions live in the root
// controller, never here.

use std::fs;
use std::path::PathBuf;

/// File name for the stored credential, inside the app config directory.
const TOKEN_FILE: &str = "session.token";

/// Wraps access to the single persisted credential.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store rooted at the platform config directory (e.g.
    /// `~/.config/fluxboard/session.token` on Linux).
    pub fn new(config_dir: PathBuf) -> Self {
        Self {
            path: config_dir.join(TOKEN_FILE),
        }
    }

    /// Read the stored credential. An unreadable or empty file counts as
    /// absent; a half-written token is worthless anyway and the first
    /// authenticated fetch would reject it.
    pub fn load(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() {
                    None
                } else {
                    Some(token.to_string())
                }
            }
            Err(_) => None,
        }
    }

    /// Persist the credential, creating the config directory if needed.
    pub fn save(&self, token: &str) {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                tracing::warn!("could not create config directory {:?}: {}", parent, e);
                return;
            }
        }
        if let Err(e) = fs::write(&self.path, token) {
            tracing::warn!("could not persist session token: {}", e);
        }
    }

    /// Remove the credential. Idempotent; a missing file is already the
    /// cleared state.
    pub fn clear(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("could not remove session token: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(name: &str) -> SessionStore {
        let dir = std::env::temp_dir().join(format!("fluxboard-session-test-{}", name));
        let _ = fs::remove_dir_all(&dir);
        SessionStore::new(dir)
    }

    #[test]
    fn test_load_absent_is_none() {
        let store = temp_store("absent");
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let store = temp_store("roundtrip");
        store.save("tok-abc123");
        assert_eq!(store.load(), Some("tok-abc123".to_string()));
    }

    #[test]
    fn test_clear_removes_token() {
        let store = temp_store("clear");
        store.save("tok-abc123");
        store.clear();
        assert_eq!(store.load(), None);
        // Clearing again must not error
        store.clear();
    }

    #[test]
    fn test_whitespace_only_file_counts_as_absent() {
        let store = temp_store("blank");
        store.save("   \n");
        assert_eq!(store.load(), None);
    }
}
