// storefront/src/main.rs

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use storefront::config::AppConfig;
use storefront::state::AppState;
use storefront::{db, seed, telemetry};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  let app_config = AppConfig::from_env().context("Failed to load application configuration")?;
  telemetry::init_tracing(app_config.log_format);

  tracing::info!("Starting storefront server...");

  let store = db::connect(&app_config.database)
    .await
    .context("Failed to initialise the store")?;
  tracing::info!(backend = store.backend_name(), "Store ready.");

  if app_config.seed_db {
    seed::seed_catalog(store.as_ref())
      .await
      .context("Failed to seed the catalog")?;
  }

  let app_state = AppState::new(store.clone());

  let server_address = app_config.bind_address();
  tracing::info!("Attempting to bind server to {}...", server_address);

  let server_result = HttpServer::new(move || {
    App::new()
      .app_data(web::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(storefront::web::configure_app_routes)
  })
  .bind(&server_address)
  .with_context(|| format!("Failed to bind {}", server_address))?
  .run()
  .await;

  tracing::info!("Server stopped; closing the store.");
  store.close().await;
  server_result.context("HTTP server error")
}
