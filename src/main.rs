//! Webhook server for the call intake dialog.

use std::sync::Arc;

use call_intake::adapters::ai::{OpenAIConfig, OpenAIProvider};
use call_intake::adapters::files::FileRecordingLog;
use call_intake::adapters::http::middleware::SignatureState;
use call_intake::adapters::http::{voice_router, VoiceAppState};
use call_intake::adapters::postgres::PostgresCallRecordRepository;
use call_intake::application::IntakeFlow;
use call_intake::config::AppConfig;
use call_intake::domain::telephony::TelephonySignatureVerifier;
use call_intake::telemetry::init_tracing;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    tracing::info!(
        environment = ?config.server.environment,
        base_url = %config.telephony.base_url,
        "Starting call intake server"
    );

    let pool = config
        .database
        .pool_options()
        .connect(&config.database.url)
        .await?;
    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    let api_key = config.ai.api_key().unwrap_or_default();
    let ai_provider = OpenAIProvider::new(
        OpenAIConfig::new(api_key)
            .with_model(&config.ai.model)
            .with_base_url(&config.ai.base_url)
            .with_timeout(config.ai.timeout())
            .with_max_retries(config.ai.max_retries)
            .with_retry_base_delay(config.ai.retry_base_delay()),
    )?;

    let flow = IntakeFlow::new(&config.telephony.base_url, &config.telephony.voice)
        .with_gather_timeout(config.telephony.gather_timeout_secs)
        .with_max_reprompts(config.telephony.max_reprompts);

    let state = VoiceAppState {
        call_records: Arc::new(PostgresCallRecordRepository::new(pool)),
        recording_log: Arc::new(FileRecordingLog::new(&config.recording.log_path)),
        ai_provider: Arc::new(ai_provider),
        flow: Arc::new(flow),
        assistant: config.ai.assistant_settings(),
    };

    let signatures = match config.telephony.auth_token() {
        Some(token) if config.telephony.validate_signatures => Some(SignatureState::new(
            TelephonySignatureVerifier::new(token),
            &config.telephony.base_url,
        )),
        _ => {
            tracing::warn!("Webhook signature validation is disabled");
            None
        }
    };

    let app = voice_router(
        state,
        signatures,
        std::time::Duration::from_secs(config.server.request_timeout_secs),
    );

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Listening for telephony callbacks");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
