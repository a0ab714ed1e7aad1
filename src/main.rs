// src/main.rs

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use crm_backend::{
    build_router,
    config::{AppState, Settings},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info,sqlx=warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let settings = Settings::from_env()?;
    let port = settings.port;

    let app_state = AppState::new(settings).await?;

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!().run(&app_state.db_pool).await?;
    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let app = build_router(app_state);

    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
