pub mod bus;
pub mod contact;
pub mod entry;
pub mod error;
pub mod history;
pub mod location;
pub mod route;
pub mod store;

pub use bus::{NavigationBus, NavigationEvent, Signal};
pub use contact::Contact;
pub use entry::{NavigationEntry, Patch};
pub use error::NavigationError;
pub use location::Location;
pub use route::{Page, Route};
pub use store::HistoryStore;
