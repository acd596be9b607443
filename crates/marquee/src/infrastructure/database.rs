use std::ops::Deref;

use bson::doc;
use mongodb::{options::ClientOptions, Client};

/// Database used when the connection string does not name one.
pub const DEFAULT_DATABASE: &str = "test";

#[derive(Clone)]
pub struct Database(mongodb::Database);

impl Deref for Database {
    type Target = mongodb::Database;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Database {
    /// Close every pooled connection. Clones of this handle stop working.
    pub async fn close(self) {
        self.0.client().clone().shutdown().await;
    }
}

fn database_name(options: &ClientOptions) -> String {
    options
        .default_database
        .clone()
        .unwrap_or_else(|| DEFAULT_DATABASE.to_string())
}

/// Connect and ping, so a bad url or unreachable server fails at startup
/// instead of on the first request.
pub async fn establish_connection(database_url: &str) -> Result<Database, anyhow::Error> {
    let mut options = ClientOptions::parse(database_url).await?;
    options.app_name = Some(env!("CARGO_PKG_NAME").to_string());

    let name = database_name(&options);
    let client = Client::with_options(options)?;
    let db = client.database(&name);

    db.run_command(doc! { "ping": 1 }).await?;
    info!("connected to database {name}");

    Ok(Database(db))
}
