use std::future::Future;

use parking_lot::Mutex;

use crate::{
    api::{Comment, CommentId, Error, Event, EventId, NewContent, Reply, ReplyId, UserId},
    Action, Backend, Operation, Store, ToggleTarget,
};

/// Runs remote operations against a `Backend` and feeds their outcome into a
/// `Store`.
///
/// Several operations may be in flight at once. The store lock is only ever
/// taken to apply one action, never across a request.
pub struct Session<B> {
    backend: B,
    store: Mutex<Store>,
}

impl<B: Backend> Session<B> {
    pub fn new(backend: B, owner: UserId) -> Session<B> {
        Session {
            backend,
            store: Mutex::new(Store::new(owner)),
        }
    }

    /// Asks the backend who we are before building the session
    pub async fn connect(backend: B) -> Result<Session<B>, Error> {
        let owner = backend.whoami().await?;
        tracing::info!(?owner, "session established");
        Ok(Session::new(backend, owner))
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn snapshot(&self) -> Store {
        self.store.lock().clone()
    }

    pub fn read<R>(&self, f: impl FnOnce(&Store) -> R) -> R {
        f(&self.store.lock())
    }

    fn dispatch(&self, action: Action) {
        self.store.lock().apply(action)
    }

    async fn track<T, F>(&self, op: Operation, fut: F) -> Result<T, Error>
    where
        F: Future<Output = Result<T, Error>>,
    {
        self.dispatch(Action::Started(op));
        let res = fut.await;
        if let Err(err) = &res {
            tracing::debug!(?op, %err, "operation failed");
            self.dispatch(Action::Failed(op, err.to_string()));
        }
        res
    }

    pub async fn fetch_event_detail(&self, id: EventId) -> Result<Event, Error> {
        let event = self
            .track(Operation::FetchEvent, self.backend.fetch_event(id))
            .await?;
        self.dispatch(Action::EventFetched(event.clone()));
        Ok(event)
    }

    pub async fn fetch_comments_for_event(&self, id: EventId) -> Result<Vec<Comment>, Error> {
        let comments = self
            .track(Operation::FetchComments, self.backend.fetch_comments(id))
            .await?;
        self.dispatch(Action::CommentsFetched {
            event_id: id,
            comments: comments.clone(),
        });
        Ok(comments)
    }

    pub async fn submit_comment(&self, event_id: EventId, content: &str) -> Result<Comment, Error> {
        let comment = self
            .track(Operation::SubmitComment, async {
                let body = NewContent::new(content)?;
                self.backend.create_comment(event_id, body).await
            })
            .await?;
        self.dispatch(Action::CommentCreated {
            event_id,
            comment: comment.clone(),
        });
        Ok(comment)
    }

    pub async fn submit_reply(&self, comment_id: CommentId, content: &str) -> Result<Reply, Error> {
        let created = self
            .track(Operation::SubmitReply, async {
                let body = NewContent::new(content)?;
                self.backend.create_reply(comment_id, body).await
            })
            .await?;
        if created.comment_id != comment_id {
            tracing::warn!(
                asked = ?comment_id,
                answered = ?created.comment_id,
                "backend attached the reply to another comment"
            );
        }
        self.dispatch(Action::ReplyCreated {
            comment_id: created.comment_id,
            reply: created.data.clone(),
        });
        Ok(created.data)
    }

    /// Returns whether the comment is now liked
    pub async fn toggle_comment_like(&self, id: CommentId) -> Result<bool, Error> {
        self.toggle(ToggleTarget::CommentLike(id)).await
    }

    /// Returns whether the reply is now liked
    pub async fn toggle_reply_like(&self, id: ReplyId) -> Result<bool, Error> {
        self.toggle(ToggleTarget::ReplyLike(id)).await
    }

    /// Returns whether the event is now a favorite
    pub async fn toggle_event_favorite(&self, id: EventId) -> Result<bool, Error> {
        self.toggle(ToggleTarget::Favorite(id)).await
    }

    async fn toggle(&self, target: ToggleTarget) -> Result<bool, Error> {
        let ticket = self.store.lock().issue_ticket(target);
        let res = self
            .track(target.operation(), async {
                match target {
                    ToggleTarget::CommentLike(id) => self.backend.toggle_comment_like(id).await,
                    ToggleTarget::ReplyLike(id) => self.backend.toggle_reply_like(id).await,
                    ToggleTarget::Favorite(id) => self.backend.toggle_favorite(id).await,
                }
            })
            .await;
        match res {
            Ok(now_on) => {
                self.dispatch(Action::Toggled { ticket, now_on });
                Ok(now_on)
            }
            Err(err) => {
                self.dispatch(Action::ToggleAbandoned(ticket));
                Err(err)
            }
        }
    }

    pub fn reset(&self) {
        self.dispatch(Action::Reset)
    }
}
