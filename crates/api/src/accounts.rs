//! Connected upload accounts.

use vidflow_core::DbId;

use crate::error::ApiError;
use crate::http::HttpClient;
use crate::models::{AccountCreate, AccountRecord, Message};

#[derive(Debug, Clone, Copy)]
pub struct AccountsApi<'a> {
    http: &'a HttpClient,
}

impl<'a> AccountsApi<'a> {
    pub(crate) fn new(http: &'a HttpClient) -> Self {
        Self { http }
    }

    pub async fn list(&self) -> Result<Vec<AccountRecord>, ApiError> {
        self.http.get("/api/accounts").await
    }

    pub async fn create(&self, account: &AccountCreate) -> Result<AccountRecord, ApiError> {
        self.http.post("/api/accounts", account).await
    }

    pub async fn delete(&self, account_id: DbId) -> Result<Message, ApiError> {
        self.http.delete(&format!("/api/accounts/{account_id}")).await
    }

    /// Refreshes profile data (avatar, subscriber count) from the platform.
    pub async fn sync(&self, account_id: DbId) -> Result<AccountRecord, ApiError> {
        self.http
            .post_empty(&format!("/api/accounts/{account_id}/sync"))
            .await
    }
}
