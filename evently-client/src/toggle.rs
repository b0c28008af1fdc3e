use crate::{
    api::{CommentId, EventId, ReplyId},
    Operation,
};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ToggleTarget {
    CommentLike(CommentId),
    ReplyLike(ReplyId),
    Favorite(EventId),
}

impl ToggleTarget {
    pub fn operation(&self) -> Operation {
        match self {
            ToggleTarget::CommentLike(_) => Operation::ToggleCommentLike,
            ToggleTarget::ReplyLike(_) => Operation::ToggleReplyLike,
            ToggleTarget::Favorite(_) => Operation::ToggleFavorite,
        }
    }
}

/// Taken before a toggle request is sent, handed back with its response
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ToggleTicket {
    pub target: ToggleTarget,
    pub seq: u64,
}

/// Orders toggle responses per target.
///
/// Requests may complete in any order. A response is only worth applying if no
/// response to a later request on the same target has been applied already.
/// A target is forgotten once none of its requests is in flight anymore, as
/// any later ticket is newer than everything seen so far.
#[derive(Clone, Debug, Default)]
pub struct ToggleSequencer {
    next_seq: u64,
    in_flight: im::HashMap<ToggleTarget, im::OrdSet<u64>>,
    last_applied: im::HashMap<ToggleTarget, u64>,
}

impl ToggleSequencer {
    pub fn issue(&mut self, target: ToggleTarget) -> ToggleTicket {
        self.next_seq += 1;
        self.in_flight
            .entry(target)
            .or_default()
            .insert(self.next_seq);
        ToggleTicket {
            target,
            seq: self.next_seq,
        }
    }

    /// Returns whether the response to `ticket` should be applied, and if so
    /// records it as the latest one for its target.
    ///
    /// A ticket is only ever accepted once.
    pub fn accept(&mut self, ticket: &ToggleTicket) -> bool {
        if !self.settle(ticket) {
            return false;
        }
        let fresh = self
            .last_applied
            .get(&ticket.target)
            .map_or(true, |last| *last < ticket.seq);
        if fresh {
            self.last_applied.insert(ticket.target, ticket.seq);
        }
        self.forget_if_idle(ticket.target);
        fresh
    }

    /// For requests that failed and will never be answered
    pub fn release(&mut self, ticket: &ToggleTicket) {
        self.settle(ticket);
        self.forget_if_idle(ticket.target);
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.in_flight.len().max(self.last_applied.len())
    }

    fn settle(&mut self, ticket: &ToggleTicket) -> bool {
        self.in_flight
            .get_mut(&ticket.target)
            .map_or(false, |seqs| seqs.remove(&ticket.seq).is_some())
    }

    fn forget_if_idle(&mut self, target: ToggleTarget) {
        if self.in_flight.get(&target).map_or(true, |s| s.is_empty()) {
            self.in_flight.remove(&target);
            self.last_applied.remove(&target);
        }
    }
}
