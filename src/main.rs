use std::time::Duration;

use actix_web::{App, HttpServer, middleware, web};

use pushkind_receipts::models::config::ServerConfig;
use pushkind_receipts::recognition::{ItemRecognizer, build_recognizer};
use pushkind_receipts::routes::configure;
use pushkind_receipts::store::{ReceiptStore, StoreMode};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let server_config = ServerConfig::load().map_err(|e| {
        log::error!("Failed to load configuration: {e}");
        std::io::Error::other(e)
    })?;

    let store = web::Data::new(ReceiptStore::connect(&server_config.store_settings()));
    if let Some(banner) = store.banner() {
        log::warn!("{banner}");
    }

    // Remote changes made by other clients are observed by polling.
    if store.mode() == StoreMode::Remote {
        let store = store.clone();
        let period = Duration::from_secs(server_config.poll_interval_secs.max(1));
        actix_web::rt::spawn(async move {
            let mut interval = actix_web::rt::time::interval(period);
            loop {
                interval.tick().await;
                if let Err(e) = store.refresh() {
                    log::warn!("Failed to refresh receipts: {e}");
                }
            }
        });
    }

    let recognizer: web::Data<dyn ItemRecognizer> =
        web::Data::from(build_recognizer(&server_config.recognition));

    let address = server_config.address.clone();
    let port = server_config.port;
    log::info!("Listening on {address}:{port}");

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(store.clone())
            .app_data(recognizer.clone())
            .configure(configure)
    })
    .bind((address, port))?
    .run()
    .await
}
