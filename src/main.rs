use anyhow::Context;
use clap::Parser;
use route_roster::config::{Args, Backend};
use route_roster::connection::manager::ConnectionManager;
use route_roster::lookup::handlers::routes;
use route_roster::lookup::service::LookupService;
use route_roster::lookup::types::StudentRecord;
use route_roster::store::StoreConnector;
use route_roster::store::memory::MemoryStore;
use route_roster::store::mongo::MongoConnector;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("route_roster=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();
    let config = Arc::new(args.connection_config()?);

    tracing::info!(
        backend = ?args.backend,
        database = %config.database,
        collection = %config.collection,
        "Starting route roster"
    );

    // 1. Store backend:
    let connector: Arc<dyn StoreConnector> = match args.backend {
        Backend::Mongo => Arc::new(MongoConnector::new(config.clone())),
        Backend::Memory => {
            let store = MemoryStore::new();
            if let Some(path) = &args.seed_file {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("reading seed file {}", path.display()))?;
                let records: Vec<StudentRecord> = serde_json::from_str(&raw)
                    .with_context(|| format!("parsing seed file {}", path.display()))?;
                store.extend(&config.collection, records);
            }
            tracing::info!(
                "Memory store holds {} record(s)",
                store.len(&config.collection)
            );
            Arc::new(store)
        }
    };

    // 2. Connection manager + lookup service:
    let connections = ConnectionManager::new(connector, config.connect_timeout);
    let service = LookupService::new(connections, config.collection.clone(), config.query_timeout);

    // 3. HTTP Router:
    let app = routes(service).layer(TraceLayer::new_for_http());

    // 4. Start HTTP server:
    let listener = tokio::net::TcpListener::bind(args.listen).await?;
    tracing::info!("Server is running on http://{}", args.listen);

    axum::serve(listener, app).await?;

    Ok(())
}
