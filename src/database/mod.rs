use anyhow::Result;
use mongodb::{options::ClientOptions, Client, Collection, Database};
use std::env;
use std::time::Duration;

/// MongoDB connection manager shared by every pipeline step.
#[derive(Clone)]
pub struct MongoDb {
    client: Client,
    db: Database,
}

impl MongoDb {
    /// Connect using MONGODB_URI / MONGODB_DATABASE from the environment,
    /// falling back to a local instance.
    pub async fn connect() -> Result<Self> {
        let uri =
            env::var("MONGODB_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let database_name =
            env::var("MONGODB_DATABASE").unwrap_or_else(|_| "task_pipeline".to_string());

        log::info!("Connecting to MongoDB at {}", uri);

        let mut client_options = ClientOptions::parse(&uri).await?;
        client_options.max_pool_size = Some(10);
        client_options.min_pool_size = Some(1);
        client_options.connect_timeout = Some(Duration::from_secs(5));
        client_options.server_selection_timeout = Some(Duration::from_secs(5));

        let client = Client::with_options(client_options)?;
        let db = client.database(&database_name);

        // Test the connection
        db.list_collection_names().await?;
        log::info!(
            "✅ Successfully connected to MongoDB database: {}",
            database_name
        );

        Ok(Self { client, db })
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Close the client once the pipeline has finished.
    pub async fn shutdown(self) {
        self.client.shutdown().await;
        log::info!("MongoDB connection closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_mongodb_connection() {
        dotenv::dotenv().ok();

        let db = MongoDb::connect().await;
        assert!(db.is_ok());
    }
}
