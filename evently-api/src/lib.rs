use chrono::Utc;

pub use rust_decimal::Decimal;
pub use uuid::{uuid, Uuid};
pub type Time = chrono::DateTime<Utc>;

mod auth;
pub use auth::AuthToken;

mod comment;
pub use comment::{Comment, CommentId, Like, LikeState, NewContent, Reply, ReplyId};

mod error;
pub use error::{Error, FALLBACK_MESSAGE};

mod event;
pub use event::{Category, CategoryId, Event, EventCount, EventId, Favorite};

mod response;
pub use response::{Data, FavoriteToggled, LikeToggled, ReplyCreated};

mod user;
pub use user::{UserId, UserSummary};

pub const STUB_UUID: Uuid = uuid!("ffffffff-ffff-ffff-ffff-ffffffffffff");

// The functions below are what the client checks before anything goes on the
// wire. The backend is expected to enforce the same rules on its side.

pub fn validate_string(s: &str) -> Result<(), Error> {
    match s.contains('\0') {
        true => Err(Error::Validation(String::from(
            "text must not contain null bytes",
        ))),
        false => Ok(()),
    }
}

/// Returns the trimmed content, or a validation error if nothing is left
pub fn validate_content(s: &str) -> Result<&str, Error> {
    validate_string(s)?;
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation(String::from("content must not be empty")));
    }
    Ok(trimmed)
}

/// For collections and flags the backend sends as `null` when empty
pub(crate) fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + serde::Deserialize<'de>,
{
    Ok(<Option<T> as serde::Deserialize>::deserialize(d)?.unwrap_or_default())
}
