use async_trait::async_trait;

use crate::api::{
    Comment, CommentId, Error, Event, EventId, NewContent, ReplyCreated, ReplyId, UserId,
};

/// The remote side of the store.
///
/// Toggle calls answer with the resulting state (liked, favorited), not with
/// a mere acknowledgement.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn whoami(&self) -> Result<UserId, Error>;
    async fn fetch_event(&self, id: EventId) -> Result<Event, Error>;
    async fn fetch_comments(&self, event: EventId) -> Result<Vec<Comment>, Error>;
    async fn create_comment(&self, event: EventId, body: NewContent) -> Result<Comment, Error>;
    async fn create_reply(
        &self,
        comment: CommentId,
        body: NewContent,
    ) -> Result<ReplyCreated, Error>;
    async fn toggle_comment_like(&self, comment: CommentId) -> Result<bool, Error>;
    async fn toggle_reply_like(&self, reply: ReplyId) -> Result<bool, Error>;
    async fn toggle_favorite(&self, event: EventId) -> Result<bool, Error>;
}
