use std::{io, path::PathBuf};

use parking_lot::RwLock;

use crate::api::AuthToken;

/// Where the bearer token lives between runs
pub trait TokenStore: Send + Sync {
    /// `None` is not an error: requests then go out unauthenticated
    fn token(&self) -> Option<AuthToken>;
}

#[derive(Debug, Default)]
pub struct MemoryTokenStore(RwLock<Option<AuthToken>>);

impl MemoryTokenStore {
    pub fn new(token: Option<AuthToken>) -> MemoryTokenStore {
        MemoryTokenStore(RwLock::new(token))
    }

    pub fn set(&self, token: AuthToken) {
        *self.0.write() = Some(token);
    }

    pub fn clear(&self) {
        *self.0.write() = None;
    }
}

impl TokenStore for MemoryTokenStore {
    fn token(&self) -> Option<AuthToken> {
        self.0.read().clone()
    }
}

/// Keeps the token in a file, read again on every request so that logging in
/// from elsewhere is picked up
#[derive(Clone, Debug)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> FileTokenStore {
        FileTokenStore { path: path.into() }
    }

    pub fn save(&self, token: &AuthToken) -> io::Result<()> {
        std::fs::write(&self.path, &token.0)
    }

    pub fn clear(&self) -> io::Result<()> {
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            res => res,
        }
    }
}

impl TokenStore for FileTokenStore {
    fn token(&self) -> Option<AuthToken> {
        match std::fs::read_to_string(&self.path) {
            Ok(s) => AuthToken::from_stored(&s),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(err) => {
                tracing::warn!(?err, path = ?self.path, "failed reading token file");
                None
            }
        }
    }
}
