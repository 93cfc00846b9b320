use crate::error::AppError;
use crate::photo::SearchResponse;
use async_trait::async_trait;

#[async_trait]
pub trait PhotoSearcher: Send + Sync {
    async fn search_photos(&self, query: &str, page: u32) -> Result<SearchResponse, AppError>;
}
