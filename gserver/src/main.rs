use anyhow::Context;
use gossip::{build_chat_service, connect};
use gserver::{
    AppState, ServerConfig, build_router, init_logging, load_dotenv, serve_with_shutdown,
    shutdown_signal,
};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv_path = load_dotenv().context("failed to load .env file")?;
    let config = ServerConfig::from_env().context("invalid configuration")?;
    init_logging(&config.log_level, config.log_format);

    if let Some(path) = dotenv_path {
        tracing::info!(path = %path.display(), "loaded environment file");
    }

    let provider = connect(
        config.endpoint(),
        config.request_timeout,
        config.retry_policy(),
    )
    .context("failed to build generation provider")?;
    let chat =
        build_chat_service(provider, config.chat_policy()).context("failed to build chat service")?;

    let app = build_router(AppState::new(chat));
    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(
        addr = %config.bind_addr,
        provider = %config.provider,
        model = %config.model(),
        "chat server listening"
    );

    serve_with_shutdown(listener, app, shutdown_signal(), config.shutdown_grace)
        .await
        .context("server terminated with an error")?;

    tracing::info!("server exited");
    Ok(())
}
