use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use stable_match::config::Settings;
use stable_match::routes::{self, AppState};
use tracing::{error, info};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    settings.logging.init();

    info!("Starting stable matching service...");

    let limits = settings.matching.limits();
    if limits.max_enumerated == 0 {
        error!("matching.max_enumerated must be at least 1");
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "matching.max_enumerated must be at least 1",
        ));
    }

    info!(
        "Accepting markets up to {} agents per side, at most {} enumerated matchings",
        limits.max_agents_per_side, limits.max_enumerated
    );

    let app_state = AppState { limits };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);
    let payload_limit = settings.server.payload_limit_bytes;

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(routes::json_config(payload_limit))
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
