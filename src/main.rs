use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use psw_match::config::{LoggingSettings, Settings, StoreBackend};
use psw_match::core::Matcher;
use psw_match::models::ScoringWeights;
use psw_match::routes::{self, handle_json_payload_error, handle_query_payload_error, AppState};
use psw_match::services::{
    sample_workers, AppwriteClient, AppwriteCollections, Backend, CacheManager, InMemoryStore, Store,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_logging(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    match logging.format.as_str() {
        "pretty" => subscriber.pretty().init(),
        "compact" => subscriber.compact().init(),
        _ => subscriber.json().init(),
    }
}

fn build_backend(settings: &Settings) -> std::io::Result<Backend> {
    match settings.store.backend {
        StoreBackend::Memory => Ok(Backend::Memory(InMemoryStore::new())),
        StoreBackend::Appwrite => {
            let appwrite = &settings.appwrite;
            let collections = AppwriteCollections {
                psws: appwrite.psws_collection.clone(),
                bookings: appwrite.bookings_collection.clone(),
                conversations: appwrite.conversations_collection.clone(),
            };

            let client = AppwriteClient::new(
                appwrite.endpoint.clone(),
                appwrite.api_key.clone(),
                appwrite.project_id.clone(),
                appwrite.database_id.clone(),
                collections,
            )
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

            info!("Appwrite client initialized for {}", appwrite.endpoint);
            Ok(Backend::Appwrite(client))
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e));
        }
    };

    init_logging(&settings.logging);

    info!("Starting PSW matching service...");

    let cache = CacheManager::new(settings.cache.capacity, settings.cache.ttl_secs);
    info!(
        "Cache manager initialized ({} entries, TTL: {}s)",
        settings.cache.capacity, settings.cache.ttl_secs
    );

    let store = Store::new(build_backend(&settings)?, cache);
    info!("Using {} store", store.backend_name());

    if settings.store.seed_on_start {
        match store.seed(sample_workers()).await {
            Ok(added) => info!("Startup seed added {} workers", added),
            Err(e) => error!("Failed to seed workers: {}", e),
        }
    }

    let weights = ScoringWeights::from(&settings.scoring);
    let matcher = Matcher::new(weights).with_default_limit(settings.matching.default_limit);

    info!("Matcher initialized with weights: {:?}", weights);

    let app_state = AppState::new(store, matcher, settings.matching.clone());

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
