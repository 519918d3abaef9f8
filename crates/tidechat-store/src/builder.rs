use crate::StoreClient;
use crate::error::{Result, StoreError};

pub struct StoreClientBuilder {
    mongodb_uri: Option<String>,
    database: Option<String>,
}

impl StoreClientBuilder {
    pub fn new() -> Self {
        Self {
            mongodb_uri: None,
            database: None,
        }
    }

    pub fn mongodb_uri(mut self, uri: impl Into<String>) -> Self {
        self.mongodb_uri = Some(uri.into());
        self
    }

    pub fn database(mut self, db: impl Into<String>) -> Self {
        self.database = Some(db.into());
        self
    }

    pub async fn build(self) -> Result<StoreClient> {
        let mongodb_uri = self.mongodb_uri
            .ok_or_else(|| StoreError::Connection("mongodb_uri is required".to_string()))?;
        let database = self.database
            .ok_or_else(|| StoreError::Connection("database is required".to_string()))?;

        StoreClient::new(&mongodb_uri, &database).await
    }
}

impl Default for StoreClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
