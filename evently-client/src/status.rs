/// Where a category of remote operation currently stands.
///
/// `Idle -> Pending -> Fulfilled | Rejected`, and back to `Pending` on the
/// next attempt. Categories never block one another.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum OpStatus {
    #[default]
    Idle,
    Pending,
    Fulfilled,
    Rejected(String),
}

impl OpStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, OpStatus::Pending)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            OpStatus::Rejected(msg) => Some(msg),
            _ => None,
        }
    }
}
