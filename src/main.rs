use vocab::app::build_service;
use vocab::config::AppConfig;
use vocab::routes::configure_routes;
use warp::Filter;

#[tokio::main]
async fn main() {
    // Load .env first so RUST_LOG from it applies
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("configuration error: {}", e);
            std::process::exit(2);
        }
    };

    let service = match build_service(&config).await {
        Ok(service) => service,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    let routes = configure_routes(service).with(warp::log("vocab::http"));

    log::info!("Starting server on http://{}", config.bind_addr);
    warp::serve(routes).run(config.bind_addr).await;
}
