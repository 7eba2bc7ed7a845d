//! Admin server: loads entity definitions from `SCHEMA_PATH`, binds them to the REST API at
//! `API_BASE_URL`, and serves their loaders and actions.
//!
//! Run from repo root: `cargo run -p admin-server`

use records_admin::{common_routes, entity_routes, load_from_dir, resolve, AppState, Settings};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("records_admin=info,admin_server=info")),
        )
        .init();

    let settings = Settings::from_env()?;
    let configs = load_from_dir(&settings.schema_path).await?;
    let model = resolve(&configs, &settings.api_base_url)?;
    tracing::info!(
        entities = model.entities.len(),
        api = %settings.api_base_url,
        "entity model resolved"
    );
    let state = AppState::new(model, reqwest::Client::new())?;

    let app = common_routes().merge(entity_routes(state, settings.body_limit_bytes));
    let listener = TcpListener::bind(&settings.bind_addr).await?;
    tracing::info!("records admin listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
