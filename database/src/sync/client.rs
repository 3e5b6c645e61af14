use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::options::SyncOptions;

/// One user as returned by the users endpoint, extra fields (`id`, ...) are ignored
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct UserRecord {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct UsersPage {
    #[serde(default)]
    pub page: u32,
    pub total_pages: u32,
    pub data: Vec<UserRecord>,
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Page {page} returned HTTP status {status}")]
    Status { page: u32, status: u16 },

    #[error("Page {page} has a malformed body: {source}")]
    Malformed {
        page: u32,
        #[source]
        source: serde_json::Error,
    },
}

/// Source of paginated user records
#[async_trait]
pub trait UserSource: Send + Sync {
    async fn fetch_page(&self, page: u32) -> Result<UsersPage, FetchError>;
}

/// Client for the reqres.in users API, no retries
pub struct ReqresClient {
    client: reqwest::Client,
    endpoint: String,
}

impl ReqresClient {
    pub fn new(options: &SyncOptions) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().timeout(options.timeout).build()?;

        Ok(Self {
            client,
            endpoint: options.endpoint.clone(),
        })
    }
}

#[async_trait]
impl UserSource for ReqresClient {
    #[tracing::instrument(skip(self))]
    async fn fetch_page(&self, page: u32) -> Result<UsersPage, FetchError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("page", page)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                page,
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;

        serde_json::from_slice(&body).map_err(|source| FetchError::Malformed { page, source })
    }
}
