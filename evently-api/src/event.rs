use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{comment::WireUserRecord, Comment, Time, UserId, UserSummary, STUB_UUID};

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct EventId(pub Uuid);

impl EventId {
    pub fn stub() -> EventId {
        EventId(STUB_UUID)
    }
}

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct CategoryId(pub Uuid);

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(from = "WireUserRecord", rename_all = "camelCase")]
pub struct Favorite {
    pub user_id: UserId,
}

impl From<WireUserRecord> for Favorite {
    fn from(r: WireUserRecord) -> Favorite {
        Favorite {
            user_id: r.user_id(),
        }
    }
}

/// Aggregates computed by the backend, cached alongside the event
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventCount {
    #[serde(default, deserialize_with = "crate::null_as_default")]
    pub comments: u32,
    #[serde(default, deserialize_with = "crate::null_as_default")]
    pub favorites: u32,
    #[serde(default, deserialize_with = "crate::null_as_default")]
    pub ticket_payments: u32,
}

/// An event as the backend describes it.
///
/// Everything beyond the id, title and date may be missing or `null` on the
/// wire.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,

    /// Image URL
    #[serde(default)]
    pub attachment: Option<String>,

    pub date: Time,
    #[serde(default)]
    pub start_time: Option<Time>,
    #[serde(default)]
    pub end_time: Option<Time>,

    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub location: Option<String>,

    /// Sent as a JSON number, possibly fractional
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub age_limit: Option<u32>,
    #[serde(default, deserialize_with = "crate::null_as_default")]
    pub highlights: Vec<String>,

    #[serde(default)]
    pub organizer: Option<UserSummary>,
    #[serde(default, deserialize_with = "crate::null_as_default")]
    pub is_approved: bool,
    #[serde(default)]
    pub category: Option<Category>,

    /// Newest first
    #[serde(default, deserialize_with = "crate::null_as_default")]
    pub comments: Vec<Comment>,
    #[serde(default, deserialize_with = "crate::null_as_default")]
    pub favorites: Vec<Favorite>,

    #[serde(default, rename = "_count")]
    pub count: Option<EventCount>,
}

impl Event {
    /// A bare event with only the required fields filled in
    pub fn new(id: EventId, title: String, date: Time) -> Event {
        Event {
            id,
            title,
            description: None,
            attachment: None,
            date,
            start_time: None,
            end_time: None,
            capacity: None,
            location: None,
            price: None,
            age_limit: None,
            highlights: Vec::new(),
            organizer: None,
            is_approved: false,
            category: None,
            comments: Vec::new(),
            favorites: Vec::new(),
            count: None,
        }
    }

    pub fn is_favorited_by(&self, user: &UserId) -> bool {
        self.favorites.iter().any(|f| f.user_id == *user)
    }
}
