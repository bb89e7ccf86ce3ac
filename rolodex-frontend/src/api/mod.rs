use std::collections::BTreeMap;

use async_trait::async_trait;
use rolodex_navigation::Contact;
use thiserror::Error;

mod http;
mod memory;

pub use http::HttpContactApi;
pub use memory::MemoryContactApi;

/// Form fields submitted by the edit view, keyed by contact property.
pub type Fields = BTreeMap<String, String>;

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ApiError {
    #[error("contact api returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("contact api not reachable: {0}")]
    Transport(String),
    #[error("contact api response invalid: {0}")]
    Decode(String),
    #[error("contact api url can not be a base: {0}")]
    InvalidBase(String),
}

/// The rest resource `/contacts` the frontend consumes.
#[async_trait]
pub trait ContactApi: Send + Sync {
    async fn list(&self, query: Option<&str>) -> Result<Vec<Contact>, ApiError>;
    async fn read(&self, id: &str) -> Result<Contact, ApiError>;
    async fn create(&self) -> Result<Contact, ApiError>;
    async fn update(&self, id: &str, fields: &Fields) -> Result<Contact, ApiError>;
    async fn favorite(&self, id: &str, favorite: bool) -> Result<Contact, ApiError>;
    /// The removed record, `None` if the server answered without one.
    async fn delete(&self, id: &str) -> Result<Option<Contact>, ApiError>;
}
