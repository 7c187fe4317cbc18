mod config;
mod relay;
mod routes;
mod state;

use std::process::ExitCode;

use config::RelayConfig;

#[derive(Debug, thiserror::Error)]
enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("server failed: {0}")]
    Serve(#[source] std::io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let config = match RelayConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "relay configuration rejected");
            return ExitCode::FAILURE;
        }
    };

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "relay stopped");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: RelayConfig) -> Result<(), ServerError> {
    let state = state::AppState::new(config.client_buffer);
    let app = routes::app(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind { addr: addr.clone(), source })?;

    tracing::info!(%addr, client_buffer = config.client_buffer, "mapboard relay listening");
    axum::serve(listener, app).await.map_err(ServerError::Serve)
}
