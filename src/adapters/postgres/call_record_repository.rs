//! PostgreSQL implementation of CallRecordRepository.
//!
//! One row per call in `call_records`, keyed by the provider call identifier.
//! Every write is one scoped transaction that touches a single column, so
//! concurrent callbacks for the same call never lose each other's fields.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{CallSid, DomainError, ErrorCode, Timestamp};
use crate::domain::intake::{CallRecord, IntakeField, SpeechAnswer};
use crate::ports::CallRecordRepository;

const RECORD_COLUMNS: &str = "call_sid, first_name, last_name, age, residency, \
                              recording_url, transcription, created_at, updated_at";

/// PostgreSQL implementation of CallRecordRepository.
#[derive(Clone)]
pub struct PostgresCallRecordRepository {
    pool: PgPool,
}

impl PostgresCallRecordRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Writes one column inside its own transaction, creating the row if
    /// needed. Any error drops `tx`, which rolls the write back.
    async fn upsert_column(
        &self,
        call_sid: &CallSid,
        column: &'static str,
        value: &str,
    ) -> Result<CallRecord, DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            DomainError::database(format!("Failed to begin transaction: {}", e))
        })?;

        // Serializes concurrent writers for an existing call.
        sqlx::query("SELECT call_sid FROM call_records WHERE call_sid = $1 FOR UPDATE")
            .bind(call_sid.as_str())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| DomainError::database(format!("Failed to lock call record: {}", e)))?;

        // `column` always comes from a fixed set of identifiers, never input.
        let sql = format!(
            r#"
            INSERT INTO call_records (call_sid, {column}, created_at, updated_at)
            VALUES ($1, $2, $3, $3)
            ON CONFLICT (call_sid) DO UPDATE SET
                {column} = EXCLUDED.{column},
                updated_at = EXCLUDED.updated_at
            RETURNING {RECORD_COLUMNS}
            "#
        );

        let row = sqlx::query(&sql)
            .bind(call_sid.as_str())
            .bind(value)
            .bind(*Timestamp::now().as_datetime())
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::database(format!("Failed to write {} for call: {}", column, e))
                    .with_detail("call_sid", call_sid.as_str())
            })?;
        let record = row_to_call_record(row)?;

        tx.commit().await.map_err(|e| {
            DomainError::database(format!("Failed to commit transaction: {}", e))
        })?;

        Ok(record)
    }
}

#[async_trait]
impl CallRecordRepository for PostgresCallRecordRepository {
    async fn find_by_call_sid(&self, call_sid: &CallSid) -> Result<Option<CallRecord>, DomainError> {
        let sql = format!("SELECT {RECORD_COLUMNS} FROM call_records WHERE call_sid = $1");
        let row = sqlx::query(&sql)
            .bind(call_sid.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to fetch call record: {}", e)))?;

        row.map(row_to_call_record).transpose()
    }

    async fn record_answer(
        &self,
        call_sid: &CallSid,
        field: IntakeField,
        answer: &SpeechAnswer,
    ) -> Result<CallRecord, DomainError> {
        self.upsert_column(call_sid, field.column(), answer.as_str())
            .await
    }

    async fn record_recording_url(
        &self,
        call_sid: &CallSid,
        recording_url: &str,
    ) -> Result<CallRecord, DomainError> {
        self.upsert_column(call_sid, "recording_url", recording_url)
            .await
    }

    async fn record_transcription(
        &self,
        call_sid: &CallSid,
        transcription: &str,
    ) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE call_records SET
                transcription = $2,
                updated_at = $3
            WHERE call_sid = $1
            "#,
        )
        .bind(call_sid.as_str())
        .bind(transcription)
        .bind(*Timestamp::now().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to store transcription: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::CallRecordNotFound,
                format!("Call record not found: {}", call_sid),
            ));
        }

        Ok(())
    }

    async fn find_untranscribed(&self, limit: u32) -> Result<Vec<CallRecord>, DomainError> {
        let sql = format!(
            r#"
            SELECT {RECORD_COLUMNS} FROM call_records
            WHERE recording_url IS NOT NULL AND transcription IS NULL
            ORDER BY created_at ASC
            LIMIT $1
            "#
        );
        let rows = sqlx::query(&sql)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                DomainError::database(format!("Failed to fetch untranscribed records: {}", e))
            })?;

        rows.into_iter().map(row_to_call_record).collect()
    }

    async fn find_by_recording_url(&self, url: &str) -> Result<Option<CallRecord>, DomainError> {
        let sql = format!("SELECT {RECORD_COLUMNS} FROM call_records WHERE recording_url = $1");
        let row = sqlx::query(&sql)
            .bind(url)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                DomainError::database(format!("Failed to fetch record by recording: {}", e))
            })?;

        row.map(row_to_call_record).transpose()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

fn column<T>(row: &sqlx::postgres::PgRow, name: &str) -> Result<T, DomainError>
where
    T: for<'r> sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(name)
        .map_err(|e| DomainError::database(format!("Failed to get {}: {}", name, e)))
}

fn row_to_call_record(row: sqlx::postgres::PgRow) -> Result<CallRecord, DomainError> {
    let call_sid: String = column(&row, "call_sid")?;
    let created_at: chrono::DateTime<chrono::Utc> = column(&row, "created_at")?;
    let updated_at: chrono::DateTime<chrono::Utc> = column(&row, "updated_at")?;

    Ok(CallRecord {
        call_sid: CallSid::new(call_sid)
            .map_err(|e| DomainError::database(format!("Invalid call_sid: {}", e)))?,
        first_name: column(&row, "first_name")?,
        last_name: column(&row, "last_name")?,
        age: column(&row, "age")?,
        residency: column(&row, "residency")?,
        recording_url: column(&row, "recording_url")?,
        transcription: column(&row, "transcription")?,
        created_at: Timestamp::from_datetime(created_at),
        updated_at: Timestamp::from_datetime(updated_at),
    })
}
