use mongodb::{Client, Collection, bson::doc};

use crate::models::User;
use crate::error::Result;

#[derive(Clone)]
pub struct UserRepository {
    collection: Collection<User>,
}

impl UserRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("users");
        Self { collection }
    }

    /// Resolve an authenticated subject (email) to an account
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let filter = doc! { "email": email };
        Ok(self.collection.find_one(filter).await?)
    }
}
