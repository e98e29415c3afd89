//! One-shot sweep that transcribes stored call recordings.
//!
//! Picks up recordings with no transcript from the database and from the
//! recording log, transcribes each, writes the transcript file and stores
//! the text against its call.

use std::sync::Arc;

use call_intake::adapters::files::{FileRecordingLog, FileTranscriptArchive};
use call_intake::adapters::postgres::PostgresCallRecordRepository;
use call_intake::adapters::transcription::{HttpTranscriber, HttpTranscriberConfig};
use call_intake::application::{TranscribeRecordingsCommand, TranscribeRecordingsHandler};
use call_intake::config::AppConfig;
use call_intake::telemetry::init_tracing;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate_for_transcription()?;

    let pool = config
        .database
        .pool_options()
        .connect(&config.database.url)
        .await?;
    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
    }

    let stt = &config.transcription;
    let mut transcriber_config =
        HttpTranscriberConfig::new(config.transcription_api_key().unwrap_or_default())
            .with_model(&stt.model)
            .with_base_url(&stt.base_url)
            .with_timeout(stt.timeout());
    if let Some(language) = &stt.language {
        transcriber_config = transcriber_config.with_language(language);
    }
    if let Some((account_sid, auth_token)) = config.telephony.recording_credentials() {
        transcriber_config = transcriber_config.with_recording_auth(account_sid, auth_token);
    }

    let handler = TranscribeRecordingsHandler::new(
        Arc::new(PostgresCallRecordRepository::new(pool)),
        Arc::new(FileRecordingLog::new(&config.recording.log_path)),
        Arc::new(HttpTranscriber::new(transcriber_config)?),
        Arc::new(FileTranscriptArchive::new(&config.recording.transcript_dir)),
    );

    let summary = handler
        .handle(TranscribeRecordingsCommand {
            limit: stt.batch_limit,
        })
        .await;

    tracing::info!(
        attempted = summary.attempted,
        transcribed = summary.transcribed,
        empty = summary.empty,
        failed = summary.failed,
        "Transcription sweep finished"
    );
    Ok(())
}
