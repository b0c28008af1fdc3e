use crate::{CommentId, Reply};

/// The `{"data": ...}` envelope most endpoints answer with
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Data<T> {
    pub data: T,
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyCreated {
    pub data: Reply,
    pub comment_id: CommentId,
}

/// The liked state after the toggle, not a mere acknowledgement
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct LikeToggled {
    pub liked: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct FavoriteToggled {
    pub favorited: bool,
}
