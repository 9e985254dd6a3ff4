use async_trait::async_trait;

use super::{ApiClient, CATEGORIES_PATH};
use crate::error::ClientResult;
use crate::model::{Category, CategoryDraft};

/// Remote category collection
#[async_trait]
pub trait CategoryApi: Send + Sync {
    /// GET /categories/
    async fn list(&self) -> ClientResult<Vec<Category>>;

    /// POST /categories/ - returns the stored record with its server id
    async fn create(&self, draft: &CategoryDraft) -> ClientResult<Category>;

    /// PUT /categories/{id} - the response body is not used
    async fn update(&self, id: i64, draft: &CategoryDraft) -> ClientResult<()>;

    /// DELETE /categories/{id}
    async fn delete(&self, id: i64) -> ClientResult<()>;
}

fn record_path(id: i64) -> String {
    format!("{}{}", CATEGORIES_PATH, id)
}

#[async_trait]
impl CategoryApi for ApiClient {
    async fn list(&self) -> ClientResult<Vec<Category>> {
        self.get_json(CATEGORIES_PATH).await
    }

    async fn create(&self, draft: &CategoryDraft) -> ClientResult<Category> {
        self.post_json(CATEGORIES_PATH, draft).await
    }

    async fn update(&self, id: i64, draft: &CategoryDraft) -> ClientResult<()> {
        self.put(&record_path(id), draft).await
    }

    async fn delete(&self, id: i64) -> ClientResult<()> {
        ApiClient::delete(self, &record_path(id)).await
    }
}
