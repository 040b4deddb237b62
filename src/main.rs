use anyhow::Result;
use rent_ledger::config::AppConfig;
use rent_ledger::core::store::RentStore;
use rent_ledger::server::ServerBuilder;
use rent_ledger::storage::InMemoryStore;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let store = build_store(&config).await?;
    let addr = config.bind_addr();

    ServerBuilder::new()
        .with_shared_store(store)
        .with_config(config)
        .serve(&addr)
        .await
}

async fn build_store(config: &AppConfig) -> Result<Arc<dyn RentStore>> {
    match config.storage.uri.as_deref() {
        #[cfg(feature = "mongodb_backend")]
        Some(uri) => {
            use rent_ledger::storage::MongoStore;

            let store = MongoStore::connect(uri, &config.storage.database)
                .await?
                .with_transactions(config.storage.transactions);
            store.ensure_indexes().await?;
            tracing::info!(
                database = %config.storage.database,
                transactions = config.storage.transactions,
                "using MongoDB store"
            );
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "mongodb_backend"))]
        Some(_) => anyhow::bail!(
            "MONGODB_URI is set but this binary was built without the mongodb_backend feature"
        ),
        None => {
            tracing::warn!("no MONGODB_URI configured, using the in-memory store");
            Ok(Arc::new(InMemoryStore::new()))
        }
    }
}
