use crate::{
    api::{Comment, CommentId, Event, EventId, Reply},
    ToggleTicket,
};

/// Categories of remote operations, each with its own status
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Operation {
    FetchEvent,
    FetchComments,
    SubmitComment,
    SubmitReply,
    ToggleCommentLike,
    ToggleReplyLike,
    ToggleFavorite,
}

/// Everything that can happen to a `Store`
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Action {
    Started(Operation),
    Failed(Operation, String),

    EventFetched(Event),
    CommentsFetched {
        event_id: EventId,
        comments: Vec<Comment>,
    },
    CommentCreated {
        event_id: EventId,
        comment: Comment,
    },
    ReplyCreated {
        comment_id: CommentId,
        reply: Reply,
    },
    /// `now_on` is the backend's answer: liked, or favorited
    Toggled {
        ticket: ToggleTicket,
        now_on: bool,
    },
    /// The toggle request failed, no answer will come for `ticket`
    ToggleAbandoned(ToggleTicket),

    Reset,
}

impl Action {
    /// The operation this action completes successfully, if any
    pub fn completes(&self) -> Option<Operation> {
        match self {
            Action::Started(_)
            | Action::Failed(_, _)
            | Action::ToggleAbandoned(_)
            | Action::Reset => None,
            Action::EventFetched(_) => Some(Operation::FetchEvent),
            Action::CommentsFetched { .. } => Some(Operation::FetchComments),
            Action::CommentCreated { .. } => Some(Operation::SubmitComment),
            Action::ReplyCreated { .. } => Some(Operation::SubmitReply),
            Action::Toggled { ticket, .. } => Some(ticket.target.operation()),
        }
    }
}
