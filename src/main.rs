use recipes::{app, AppConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    recipes::telemetry::init("recipes=debug,axum=info,tower_http=info");

    let config = AppConfig::from_env()?;
    let app_state = AppState::init(config).await?;
    tracing::info!(
        project = %app_state.config.project_name,
        version = %app_state.config.version,
        api_prefix = %app_state.config.api_prefix,
        "starting"
    );

    let config = app_state.config.clone();
    let app = app::build_app(app_state);
    app::serve(app, &config).await
}
