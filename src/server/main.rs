use prk_todo::adapters::{router, AppState, HttpServer};
use prk_todo::config::AppConfig;
use prk_todo::storage::sqlite::SqliteStorage;
use prk_todo::views::TodoListView;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    #[cfg(feature = "tracing")]
    {
        tracing_subscriber::fmt()
            .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
            .init();
    }

    let config = AppConfig::from_env()?;
    let storage = SqliteStorage::new(&config.database_url, config.max_connections).await?;
    let view = TodoListView::new()?;
    let app = router(AppState::new(storage, view));

    let server = HttpServer::new(app, config.bind_addr).await?;
    server.run().await?;
    Ok(())
}
