use async_trait::async_trait;

use crate::models::catalog::Page;
use crate::models::errors::FetchError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub query: Option<String>,
    pub offset: u32,
    pub limit: u32,
}

#[async_trait]
pub trait BookSource: Send + Sync {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Page, FetchError>;
}
