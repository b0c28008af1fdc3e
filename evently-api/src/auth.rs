/// Opaque bearer token, as handed out by the backend on login
#[derive(Clone, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct AuthToken(pub String);

impl AuthToken {
    pub fn stub() -> AuthToken {
        AuthToken(crate::STUB_UUID.to_string())
    }

    /// Parses a token from stored text, ignoring surrounding whitespace
    pub fn from_stored(s: &str) -> Option<AuthToken> {
        let s = s.trim();
        match s.is_empty() {
            true => None,
            false => Some(AuthToken(String::from(s))),
        }
    }
}
