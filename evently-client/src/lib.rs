mod action;
pub use action::{Action, Operation};

mod backend;
pub use backend::Backend;

mod http;
pub use http::HttpBackend;

pub mod likes;

mod session;
pub use session::Session;

mod status;
pub use status::OpStatus;

mod store;
pub use store::Store;

mod toggle;
pub use toggle::{ToggleSequencer, ToggleTarget, ToggleTicket};

mod token;
pub use token::{FileTokenStore, MemoryTokenStore, TokenStore};

pub mod api {
    pub use evently_api::*;
}
