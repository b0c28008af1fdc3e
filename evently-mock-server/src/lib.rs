use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    mem,
    sync::Arc,
};

use async_trait::async_trait;
use chrono::Utc;
use evently_client::{
    api::{
        AuthToken, Comment, CommentId, Error, Event, EventCount, EventId, Favorite, Like,
        LikeState, NewContent, Reply, ReplyCreated, ReplyId, UserId, UserSummary, Uuid,
    },
    Backend,
};
use tokio::sync::Mutex;

/// In-memory stand-in for the REST backend
#[derive(Debug, Default)]
pub struct MockServer {
    users: BTreeMap<UserId, UserSummary>,
    sessions: HashMap<AuthToken, UserId>,
    events: BTreeMap<EventId, StoredEvent>,
    comments: HashMap<CommentId, StoredComment>,
    replies: HashMap<ReplyId, StoredReply>,
    fail_next: Option<Error>,
}

#[derive(Debug)]
struct StoredEvent {
    // comments and favorites live in the fields below
    event: Event,
    comment_ids: Vec<CommentId>,
    favorites: BTreeSet<UserId>,
}

#[derive(Debug)]
struct StoredComment {
    // replies and likes live in the fields below
    comment: Comment,
    reply_ids: Vec<ReplyId>,
    likes: BTreeSet<UserId>,
}

#[derive(Debug)]
struct StoredReply {
    reply: Reply,
    likes: BTreeSet<UserId>,
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct SeedUser {
    pub user: UserSummary,
    pub token: AuthToken,
}

/// Initial contents for a `MockServer`, as produced by `generate-test-data`
#[derive(Clone, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Seed {
    pub users: Vec<SeedUser>,
    pub events: Vec<Event>,
}

fn render_likes(likes: &BTreeSet<UserId>, viewer: Option<UserId>) -> LikeState {
    LikeState {
        likes: likes.iter().map(|u| Like { user_id: *u }).collect(),
        is_liked: viewer.map_or(false, |v| likes.contains(&v)),
        like_count: likes.len() as i64,
    }
}

fn toggle(set: &mut BTreeSet<UserId>, user: UserId) -> bool {
    if set.remove(&user) {
        false
    } else {
        set.insert(user);
        true
    }
}

impl MockServer {
    pub fn new() -> MockServer {
        MockServer::default()
    }

    pub fn from_seed(seed: Seed) -> MockServer {
        let mut res = MockServer::new();
        for u in seed.users {
            res.sessions.insert(u.token, u.user.id);
            res.users.insert(u.user.id, u.user);
        }
        for e in seed.events {
            res.add_event(e);
        }
        res
    }

    /// Creates a user along with a logged-in session for it
    pub fn create_user(&mut self, name: &str) -> (UserId, AuthToken) {
        let id = UserId(Uuid::new_v4());
        let token = AuthToken(Uuid::new_v4().to_string());
        self.users.insert(
            id,
            UserSummary {
                id,
                name: String::from(name),
                profile_picture: None,
            },
        );
        self.sessions.insert(token.clone(), id);
        (id, token)
    }

    /// Stores `event`, including its nested comments, replies, likes and
    /// favorites. Counts are recomputed on every read.
    pub fn add_event(&mut self, mut event: Event) {
        let comments = mem::take(&mut event.comments);
        let favorites = mem::take(&mut event.favorites)
            .into_iter()
            .map(|f| f.user_id)
            .collect();
        let mut comment_ids = Vec::with_capacity(comments.len());
        for mut c in comments {
            let mut reply_ids = Vec::with_capacity(c.replies.len());
            for mut r in mem::take(&mut c.replies) {
                let likes = mem::take(&mut r.like_state.likes)
                    .into_iter()
                    .map(|l| l.user_id)
                    .collect();
                reply_ids.push(r.id);
                self.replies.insert(r.id, StoredReply { reply: r, likes });
            }
            let likes = mem::take(&mut c.like_state.likes)
                .into_iter()
                .map(|l| l.user_id)
                .collect();
            comment_ids.push(c.id);
            self.comments.insert(
                c.id,
                StoredComment {
                    comment: c,
                    reply_ids,
                    likes,
                },
            );
        }
        self.events.insert(
            event.id,
            StoredEvent {
                event,
                comment_ids,
                favorites,
            },
        );
    }

    /// Makes the next call fail with `err`, whatever it is
    pub fn fail_next(&mut self, err: Error) {
        self.fail_next = Some(err);
    }

    pub fn test_num_comments(&self) -> usize {
        self.comments.len()
    }

    fn check_failure(&mut self) -> Result<(), Error> {
        match self.fail_next.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn viewer(&self, tok: Option<&AuthToken>) -> Option<UserId> {
        tok.and_then(|t| self.sessions.get(t)).copied()
    }

    fn resolve(&self, tok: Option<&AuthToken>) -> Result<UserId, Error> {
        self.viewer(tok).ok_or(Error::PermissionDenied)
    }

    fn author(&self, user: UserId) -> UserSummary {
        self.users.get(&user).cloned().unwrap_or(UserSummary {
            id: user,
            name: String::new(),
            profile_picture: None,
        })
    }

    fn render_reply(&self, id: &ReplyId, viewer: Option<UserId>) -> Option<Reply> {
        let r = self.replies.get(id)?;
        let mut reply = r.reply.clone();
        reply.like_state = render_likes(&r.likes, viewer);
        Some(reply)
    }

    fn render_comment(&self, id: &CommentId, viewer: Option<UserId>) -> Option<Comment> {
        let c = self.comments.get(id)?;
        let mut comment = c.comment.clone();
        comment.like_state = render_likes(&c.likes, viewer);
        comment.replies = c
            .reply_ids
            .iter()
            .filter_map(|r| self.render_reply(r, viewer))
            .collect();
        Some(comment)
    }

    fn render_comments(&self, e: &StoredEvent, viewer: Option<UserId>) -> Vec<Comment> {
        e.comment_ids
            .iter()
            .filter_map(|c| self.render_comment(c, viewer))
            .collect()
    }

    pub fn whoami(&mut self, tok: Option<&AuthToken>) -> Result<UserId, Error> {
        self.check_failure()?;
        self.resolve(tok)
    }

    pub fn event(&mut self, tok: Option<&AuthToken>, id: EventId) -> Result<Event, Error> {
        self.check_failure()?;
        let viewer = self.viewer(tok);
        let e = self.events.get(&id).ok_or(Error::not_found("event"))?;
        let mut event = e.event.clone();
        event.comments = self.render_comments(e, viewer);
        event.favorites = e.favorites.iter().map(|u| Favorite { user_id: *u }).collect();
        event.count = Some(EventCount {
            comments: e.comment_ids.len() as u32,
            favorites: e.favorites.len() as u32,
            ticket_payments: e.event.count.map_or(0, |c| c.ticket_payments),
        });
        Ok(event)
    }

    pub fn comments(&mut self, tok: Option<&AuthToken>, id: EventId) -> Result<Vec<Comment>, Error> {
        self.check_failure()?;
        let viewer = self.viewer(tok);
        let e = self.events.get(&id).ok_or(Error::not_found("event"))?;
        Ok(self.render_comments(e, viewer))
    }

    pub fn create_comment(
        &mut self,
        tok: Option<&AuthToken>,
        event_id: EventId,
        body: NewContent,
    ) -> Result<Comment, Error> {
        self.check_failure()?;
        let user = self.resolve(tok)?;
        body.validate()?;
        let author = self.author(user);
        let e = self
            .events
            .get_mut(&event_id)
            .ok_or(Error::not_found("event"))?;
        let now = Utc::now();
        let comment = Comment {
            id: CommentId(Uuid::new_v4()),
            content: body.content,
            created_at: now,
            updated_at: now,
            author,
            event_id,
            like_state: LikeState::default(),
            replies: Vec::new(),
        };
        e.comment_ids.insert(0, comment.id);
        self.comments.insert(
            comment.id,
            StoredComment {
                comment: comment.clone(),
                reply_ids: Vec::new(),
                likes: BTreeSet::new(),
            },
        );
        tracing::debug!(?event_id, comment = ?comment.id, "comment created");
        Ok(comment)
    }

    pub fn create_reply(
        &mut self,
        tok: Option<&AuthToken>,
        comment_id: CommentId,
        body: NewContent,
    ) -> Result<ReplyCreated, Error> {
        self.check_failure()?;
        let user = self.resolve(tok)?;
        body.validate()?;
        let author = self.author(user);
        let c = self
            .comments
            .get_mut(&comment_id)
            .ok_or(Error::not_found("comment"))?;
        let now = Utc::now();
        let reply = Reply {
            id: ReplyId(Uuid::new_v4()),
            content: body.content,
            created_at: now,
            updated_at: now,
            author,
            comment_id,
            like_state: LikeState::default(),
        };
        c.reply_ids.insert(0, reply.id);
        self.replies.insert(
            reply.id,
            StoredReply {
                reply: reply.clone(),
                likes: BTreeSet::new(),
            },
        );
        Ok(ReplyCreated {
            data: reply,
            comment_id,
        })
    }

    pub fn toggle_comment_like(
        &mut self,
        tok: Option<&AuthToken>,
        id: CommentId,
    ) -> Result<bool, Error> {
        self.check_failure()?;
        let user = self.resolve(tok)?;
        let c = self
            .comments
            .get_mut(&id)
            .ok_or(Error::not_found("comment"))?;
        Ok(toggle(&mut c.likes, user))
    }

    pub fn toggle_reply_like(&mut self, tok: Option<&AuthToken>, id: ReplyId) -> Result<bool, Error> {
        self.check_failure()?;
        let user = self.resolve(tok)?;
        let r = self.replies.get_mut(&id).ok_or(Error::not_found("reply"))?;
        Ok(toggle(&mut r.likes, user))
    }

    pub fn toggle_favorite(&mut self, tok: Option<&AuthToken>, id: EventId) -> Result<bool, Error> {
        self.check_failure()?;
        let user = self.resolve(tok)?;
        let e = self.events.get_mut(&id).ok_or(Error::not_found("event"))?;
        Ok(toggle(&mut e.favorites, user))
    }
}

/// A `Backend` answering from a shared `MockServer` as the holder of `token`
#[derive(Clone)]
pub struct MockBackend {
    server: Arc<Mutex<MockServer>>,
    token: Option<AuthToken>,
}

impl MockBackend {
    pub fn new(server: Arc<Mutex<MockServer>>, token: Option<AuthToken>) -> MockBackend {
        MockBackend { server, token }
    }

    pub fn server(&self) -> &Arc<Mutex<MockServer>> {
        &self.server
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn whoami(&self) -> Result<UserId, Error> {
        self.server.lock().await.whoami(self.token.as_ref())
    }

    async fn fetch_event(&self, id: EventId) -> Result<Event, Error> {
        self.server.lock().await.event(self.token.as_ref(), id)
    }

    async fn fetch_comments(&self, event: EventId) -> Result<Vec<Comment>, Error> {
        self.server.lock().await.comments(self.token.as_ref(), event)
    }

    async fn create_comment(&self, event: EventId, body: NewContent) -> Result<Comment, Error> {
        self.server
            .lock()
            .await
            .create_comment(self.token.as_ref(), event, body)
    }

    async fn create_reply(
        &self,
        comment: CommentId,
        body: NewContent,
    ) -> Result<ReplyCreated, Error> {
        self.server
            .lock()
            .await
            .create_reply(self.token.as_ref(), comment, body)
    }

    async fn toggle_comment_like(&self, comment: CommentId) -> Result<bool, Error> {
        self.server
            .lock()
            .await
            .toggle_comment_like(self.token.as_ref(), comment)
    }

    async fn toggle_reply_like(&self, reply: ReplyId) -> Result<bool, Error> {
        self.server
            .lock()
            .await
            .toggle_reply_like(self.token.as_ref(), reply)
    }

    async fn toggle_favorite(&self, event: EventId) -> Result<bool, Error> {
        self.server
            .lock()
            .await
            .toggle_favorite(self.token.as_ref(), event)
    }
}
