use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use kk360_api::config::{LoggingSettings, Settings, StoreBackend};
use kk360_api::routes::{self, AppState, StoreInfo};
use kk360_api::services::{AppwriteStore, CachedStore, DocumentStore, MemoryStore, PostgresStore};
use kk360_api::LiveLinks;
use std::io;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let loaded = Settings::load().and_then(|settings| settings.validate().map(|_| settings));

    let logging = loaded
        .as_ref()
        .map(|settings| settings.logging.clone())
        .unwrap_or_default();
    init_logging(&logging);

    info!("Starting KK360 API...");

    let settings = loaded.map_err(|e| {
        error!("Failed to load configuration: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e.to_string())
    })?;

    info!("Configuration loaded successfully");

    let store_info = StoreInfo {
        database_url_configured: settings.database.is_some(),
        database_name: settings.appwrite.as_ref().map(|a| a.database_id.clone()),
    };

    match settings.store.backend {
        StoreBackend::Memory => {
            info!("Using in-memory document store; data is lost on restart");
            launch(settings, store_info, MemoryStore::new()).await
        }
        StoreBackend::Postgres => {
            let Some(database) = settings.database.as_ref() else {
                return Err(missing_section("database"));
            };
            let store = PostgresStore::from_settings(database).await.map_err(|e| {
                error!("Failed to connect to PostgreSQL: {}", e);
                io::Error::new(io::ErrorKind::Other, e.to_string())
            })?;
            info!("PostgreSQL document store initialized");
            launch(settings, store_info, store).await
        }
        StoreBackend::Appwrite => {
            let Some(appwrite) = settings.appwrite.as_ref() else {
                return Err(missing_section("appwrite"));
            };
            let store = AppwriteStore::from_settings(appwrite).map_err(|e| {
                error!("Failed to create Appwrite client: {}", e);
                io::Error::new(io::ErrorKind::Other, e.to_string())
            })?;
            info!("Appwrite document store initialized ({})", appwrite.endpoint);
            launch(settings, store_info, store).await
        }
    }
}

fn init_logging(settings: &LoggingSettings) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    match settings.format.as_str() {
        "pretty" => subscriber.pretty().init(),
        "json" => subscriber.json().init(),
        _ => subscriber.init(),
    }
}

fn missing_section(section: &str) -> io::Error {
    error!("Missing [{}] configuration section", section);
    io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("missing [{}] configuration section", section),
    )
}

/// Optionally wrap the store with the query cache, then serve
async fn launch<S: DocumentStore>(
    settings: Settings,
    store_info: StoreInfo,
    store: S,
) -> io::Result<()> {
    let cache = settings.cache.clone();

    if cache.enabled {
        info!(
            "Query cache enabled (L1: {} entries, TTL: {}s)",
            cache.l1_cache_size, cache.ttl_secs
        );
        let cached = CachedStore::new(store, cache.l1_cache_size, cache.ttl_secs);
        serve(settings, store_info, cached).await
    } else {
        serve(settings, store_info, store).await
    }
}

async fn serve<S: DocumentStore>(
    settings: Settings,
    store_info: StoreInfo,
    store: S,
) -> io::Result<()> {
    let state = AppState::new(store, LiveLinks::from(&settings.live_session), store_info);

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!(
        "Starting HTTP server on {}:{} ({} store, {} workers)",
        host,
        port,
        state.store.backend_name(),
        workers
    );

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(routes::json_config())
            .app_data(routes::query_config())
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes::<S>)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
