use uuid::Uuid;

use crate::{Error, EventId, Time, UserId, UserSummary, STUB_UUID};

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct CommentId(pub Uuid);

impl CommentId {
    pub fn stub() -> CommentId {
        CommentId(STUB_UUID)
    }
}

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct ReplyId(pub Uuid);

impl ReplyId {
    pub fn stub() -> ReplyId {
        ReplyId(STUB_UUID)
    }
}

/// The shapes a per-user record (like, favorite) can take on the wire.
///
/// Some endpoints send the join row (`{"userId": ...}`), some embed the user
/// (`{"user": {"id": ...}}`) and some only send the id. All of them end up as
/// a plain user id once deserialized.
#[derive(serde::Deserialize)]
#[serde(untagged)]
pub(crate) enum WireUserRecord {
    Row {
        #[serde(rename = "userId")]
        user_id: UserId,
    },
    Embedded {
        user: WireUserRef,
    },
    Bare(UserId),
}

#[derive(serde::Deserialize)]
pub(crate) struct WireUserRef {
    id: UserId,
}

impl WireUserRecord {
    pub(crate) fn user_id(self) -> UserId {
        match self {
            WireUserRecord::Row { user_id } => user_id,
            WireUserRecord::Embedded { user } => user.id,
            WireUserRecord::Bare(user_id) => user_id,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(from = "WireUserRecord", rename_all = "camelCase")]
pub struct Like {
    pub user_id: UserId,
}

impl From<WireUserRecord> for Like {
    fn from(r: WireUserRecord) -> Like {
        Like { user_id: r.user_id() }
    }
}

/// Like-related state shared by comments and replies
#[derive(Clone, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeState {
    #[serde(default, deserialize_with = "crate::null_as_default")]
    pub likes: Vec<Like>,

    /// Whether the current user likes this
    #[serde(default, deserialize_with = "crate::null_as_default")]
    pub is_liked: bool,

    #[serde(default, deserialize_with = "crate::null_as_default")]
    pub like_count: i64,
}

impl LikeState {
    pub fn liked_by(&self, user: &UserId) -> bool {
        self.likes.iter().any(|l| l.user_id == *user)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub content: String,
    pub created_at: Time,
    pub updated_at: Time,
    pub author: UserSummary,
    pub event_id: EventId,

    #[serde(flatten)]
    pub like_state: LikeState,

    /// Newest first
    #[serde(default, deserialize_with = "crate::null_as_default")]
    pub replies: Vec<Reply>,
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub id: ReplyId,
    pub content: String,
    pub created_at: Time,
    pub updated_at: Time,
    pub author: UserSummary,
    pub comment_id: CommentId,

    #[serde(flatten)]
    pub like_state: LikeState,
}

/// Request body for both comment and reply creation
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct NewContent {
    pub content: String,
}

impl NewContent {
    pub fn new(content: &str) -> Result<NewContent, Error> {
        Ok(NewContent {
            content: String::from(crate::validate_content(content)?),
        })
    }

    // See comments on `validate_string`
    pub fn validate(&self) -> Result<(), Error> {
        crate::validate_content(&self.content).map(|_| ())
    }
}
