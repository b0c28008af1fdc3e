use std::{collections::HashSet, mem};

use crate::{
    api::{Comment, CommentId, Event, EventCount, EventId, Reply, ReplyId, UserId},
    likes, Action, OpStatus, Operation, ToggleSequencer, ToggleTarget, ToggleTicket,
};

#[derive(Clone, Debug, Eq, PartialEq)]
struct CommentEntry {
    /// Always has empty `replies`, see `reply_ids`
    comment: Comment,

    /// Newest first
    reply_ids: Vec<ReplyId>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
struct SelectedEvent {
    /// Always has empty `comments`, see `comment_ids`
    event: Event,
    comment_ids: Vec<CommentId>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
struct CommentList {
    event_id: EventId,
    comment_ids: Vec<CommentId>,
}

/// Client-side state for an event and its comments.
///
/// Each comment and reply is stored exactly once, keyed by id. The selected
/// event and the flat comment list are only ordered lists of ids over these
/// entities, so any change to a comment shows up identically through both.
///
/// Clones are cheap, which makes them fit for handing snapshots to a UI.
#[derive(Clone, Debug)]
pub struct Store {
    owner: UserId,
    comments: im::HashMap<CommentId, CommentEntry>,
    replies: im::HashMap<ReplyId, Reply>,
    reply_parents: im::HashMap<ReplyId, CommentId>,
    selected_event: Option<SelectedEvent>,
    event_comments: Option<CommentList>,
    statuses: im::HashMap<Operation, OpStatus>,
    toggles: ToggleSequencer,
}

fn prepend_unique<T: PartialEq>(ids: &mut Vec<T>, id: T) -> bool {
    if ids.contains(&id) {
        return false;
    }
    ids.insert(0, id);
    true
}

impl Store {
    /// `owner` is the current user, whose like records toggles add and remove
    pub fn new(owner: UserId) -> Store {
        Store {
            owner,
            comments: im::HashMap::new(),
            replies: im::HashMap::new(),
            reply_parents: im::HashMap::new(),
            selected_event: None,
            event_comments: None,
            statuses: im::HashMap::new(),
            toggles: ToggleSequencer::default(),
        }
    }

    pub fn owner(&self) -> UserId {
        self.owner
    }

    pub fn selected_event(&self) -> Option<Event> {
        self.selected_event.as_ref().map(|s| {
            let mut event = s.event.clone();
            event.comments = s
                .comment_ids
                .iter()
                .filter_map(|id| self.comment(id))
                .collect();
            event
        })
    }

    pub fn selected_event_id(&self) -> Option<EventId> {
        self.selected_event.as_ref().map(|s| s.event.id)
    }

    /// The flat comment list, along with the event it was loaded for
    pub fn event_comments(&self) -> Option<(EventId, Vec<Comment>)> {
        self.event_comments.as_ref().map(|l| {
            let comments = l
                .comment_ids
                .iter()
                .filter_map(|id| self.comment(id))
                .collect();
            (l.event_id, comments)
        })
    }

    pub fn comment(&self, id: &CommentId) -> Option<Comment> {
        let entry = self.comments.get(id)?;
        let mut comment = entry.comment.clone();
        comment.replies = entry
            .reply_ids
            .iter()
            .filter_map(|r| self.replies.get(r).cloned())
            .collect();
        Some(comment)
    }

    pub fn reply(&self, id: &ReplyId) -> Option<Reply> {
        self.replies.get(id).cloned()
    }

    pub fn reply_parent(&self, id: &ReplyId) -> Option<CommentId> {
        self.reply_parents.get(id).copied()
    }

    pub fn status(&self, op: Operation) -> OpStatus {
        self.statuses.get(&op).cloned().unwrap_or_default()
    }

    pub fn is_loading(&self, op: Operation) -> bool {
        self.statuses.get(&op).map_or(false, OpStatus::is_loading)
    }

    pub fn error(&self, op: Operation) -> Option<&str> {
        self.statuses.get(&op).and_then(OpStatus::error)
    }

    pub fn selected_event_error(&self) -> Option<&str> {
        self.error(Operation::FetchEvent)
    }

    pub fn issue_ticket(&mut self, target: ToggleTarget) -> ToggleTicket {
        self.toggles.issue(target)
    }

    pub fn apply(&mut self, action: Action) {
        let completes = action.completes();
        match action {
            Action::Started(op) => {
                self.statuses.insert(op, OpStatus::Pending);
            }
            Action::Failed(op, msg) => {
                self.statuses.insert(op, OpStatus::Rejected(msg));
            }
            Action::Reset => {
                // keep the sequencer, so responses to requests sent before the
                // reset still compare against later ones
                let toggles = mem::take(&mut self.toggles);
                *self = Store::new(self.owner);
                self.toggles = toggles;
            }
            Action::EventFetched(event) => self.replace_selected_event(event),
            Action::CommentsFetched { event_id, comments } => {
                self.replace_event_comments(event_id, comments)
            }
            Action::CommentCreated { event_id, comment } => self.insert_comment(event_id, comment),
            Action::ReplyCreated { comment_id, reply } => self.insert_reply(comment_id, reply),
            Action::Toggled { ticket, now_on } => self.apply_toggle(ticket, now_on),
            Action::ToggleAbandoned(ticket) => self.toggles.release(&ticket),
        }
        if let Some(op) = completes {
            self.statuses.insert(op, OpStatus::Fulfilled);
        }
    }

    fn ingest_comment(&mut self, mut comment: Comment) -> CommentId {
        let id = comment.id;
        let replies = mem::take(&mut comment.replies);
        let mut reply_ids = Vec::with_capacity(replies.len());
        for r in replies {
            reply_ids.push(self.ingest_reply(id, r));
        }
        self.comments.insert(id, CommentEntry { comment, reply_ids });
        id
    }

    fn ingest_reply(&mut self, parent: CommentId, mut reply: Reply) -> ReplyId {
        if reply.comment_id != parent {
            tracing::warn!(
                reply = ?reply.id,
                claimed = ?reply.comment_id,
                ?parent,
                "reply disagrees about its parent comment"
            );
            reply.comment_id = parent;
        }
        let id = reply.id;
        self.reply_parents.insert(id, parent);
        self.replies.insert(id, reply);
        id
    }

    fn replace_selected_event(&mut self, mut event: Event) {
        let comments = mem::take(&mut event.comments);
        let comment_ids = comments
            .into_iter()
            .map(|c| self.ingest_comment(c))
            .collect();
        self.selected_event = Some(SelectedEvent { event, comment_ids });
        self.collect_garbage();
    }

    fn replace_event_comments(&mut self, event_id: EventId, comments: Vec<Comment>) {
        let comment_ids = comments
            .into_iter()
            .map(|c| self.ingest_comment(c))
            .collect();
        self.event_comments = Some(CommentList {
            event_id,
            comment_ids,
        });
        self.collect_garbage();
    }

    fn insert_comment(&mut self, event_id: EventId, comment: Comment) {
        let id = self.ingest_comment(comment);

        let list = self.event_comments.get_or_insert_with(|| CommentList {
            event_id,
            comment_ids: Vec::new(),
        });
        if list.event_id == event_id {
            prepend_unique(&mut list.comment_ids, id);
        } else {
            tracing::debug!(
                listed = ?list.event_id,
                ?event_id,
                "new comment is for another event than the listed one"
            );
        }

        if let Some(sel) = self
            .selected_event
            .as_mut()
            .filter(|s| s.event.id == event_id)
        {
            if prepend_unique(&mut sel.comment_ids, id) {
                sel.event
                    .count
                    .get_or_insert_with(EventCount::default)
                    .comments += 1;
            }
        }

        self.collect_garbage();
    }

    fn insert_reply(&mut self, comment_id: CommentId, reply: Reply) {
        let reply_id = reply.id;
        match self.comments.get_mut(&comment_id) {
            None => {
                tracing::debug!(?comment_id, "reply for a comment that is not loaded");
                return;
            }
            Some(entry) => {
                prepend_unique(&mut entry.reply_ids, reply_id);
            }
        }
        self.ingest_reply(comment_id, reply);
    }

    fn apply_toggle(&mut self, ticket: ToggleTicket, now_on: bool) {
        if !self.toggles.accept(&ticket) {
            tracing::debug!(?ticket, "discarding stale toggle response");
            return;
        }
        let owner = self.owner;
        let applied = match ticket.target {
            ToggleTarget::CommentLike(id) => self
                .comments
                .get_mut(&id)
                .map(|e| likes::apply_like_toggle(&mut e.comment.like_state, owner, now_on)),
            ToggleTarget::ReplyLike(id) => self
                .replies
                .get_mut(&id)
                .map(|r| likes::apply_like_toggle(&mut r.like_state, owner, now_on)),
            ToggleTarget::Favorite(id) => self
                .selected_event
                .as_mut()
                .filter(|s| s.event.id == id)
                .map(|s| likes::apply_favorite_toggle(&mut s.event, owner, now_on)),
        };
        if applied.is_none() {
            tracing::debug!(toggled = ?ticket.target, "toggled entity is not loaded");
        }
    }

    /// Drops the entities no view refers to anymore
    fn collect_garbage(&mut self) {
        let live: HashSet<CommentId> = self
            .selected_event
            .iter()
            .flat_map(|s| s.comment_ids.iter())
            .chain(self.event_comments.iter().flat_map(|l| l.comment_ids.iter()))
            .copied()
            .collect();
        self.comments.retain(|id, _| live.contains(id));
        let live_replies: HashSet<ReplyId> = self
            .comments
            .values()
            .flat_map(|e| e.reply_ids.iter().copied())
            .collect();
        self.replies.retain(|id, _| live_replies.contains(id));
        self.reply_parents.retain(|id, _| live_replies.contains(id));
    }
}
