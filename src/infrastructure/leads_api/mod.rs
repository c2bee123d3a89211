pub mod http_backend;
pub mod payload;

use crate::domain::error::Result;
use crate::domain::search::{BackendStatus, SearchPage, SearchRequest, ValidationAnswer};
use async_trait::async_trait;

pub use http_backend::HttpLeadsBackend;

/// Remote lead search and WhatsApp validation service.
#[async_trait]
pub trait LeadsBackend {
    async fn search(&self, request: &SearchRequest) -> Result<SearchPage>;
    async fn validate(&self, numbers: &[String]) -> Result<Vec<ValidationAnswer>>;
    async fn status(&self) -> Result<BackendStatus>;
}
