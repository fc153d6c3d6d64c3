//! Hot tier: time-series store
//!
//! Raw readings land in `sensor_data_raw`, a one-hour-chunked hypertable
//! with 30-day retention. Writes are upserts keyed by
//! `(time, equipment_id, tenant_id)`; the stored content hash turns a
//! replayed reading into a no-op. In shared deployment mode the insert runs
//! on a session-scoped connection so row-level security fences tenants.

use chrono::{DateTime, Utc};
use foundry_dataplane::PoolHandle;
use foundry_detect::SensorReading;
use serde::Serialize;
use sqlx::{Executor, PgPool, Row};

use crate::error::{Result, StorageError};
use crate::hash::content_hash;

/// Row cap on recent-readings queries
pub const RECENT_READINGS_CAP: i64 = 1000;

/// Initialize the hot-tier schema, partitioning, and retention
///
/// Idempotent; runs once per process at startup. Hypertable conversion and
/// the retention policy require the timescaledb extension - on a plain
/// Postgres they log a warning and the table works unpartitioned.
pub async fn init_schema(pool: &PgPool) -> Result<()> {
    pool.execute(
        r#"
        CREATE TABLE IF NOT EXISTS sensor_data_raw (
            time               TIMESTAMPTZ      NOT NULL,
            equipment_id       TEXT             NOT NULL,
            tenant_id          TEXT             NOT NULL DEFAULT '',
            temperature        DOUBLE PRECISION,
            vibration          DOUBLE PRECISION,
            pressure           DOUBLE PRECISION,
            power_consumption  DOUBLE PRECISION,
            custom_metrics     JSONB,
            facility_id        TEXT,
            line_id            TEXT,
            ingestion_timestamp TIMESTAMPTZ,
            source             TEXT,
            has_anomalies      BOOLEAN          NOT NULL DEFAULT FALSE,
            data_hash          TEXT             NOT NULL,
            PRIMARY KEY (time, equipment_id, tenant_id)
        );
        "#,
    )
    .await
    .map_err(|e| StorageError::init(format!("sensor_data_raw: {e}")))?;

    if let Err(e) = pool
        .execute(
            "SELECT create_hypertable('sensor_data_raw', 'time', \
             chunk_time_interval => INTERVAL '1 hour', if_not_exists => TRUE)",
        )
        .await
    {
        tracing::warn!(error = %e, "hypertable conversion unavailable, table stays flat");
    }

    if let Err(e) = pool
        .execute(
            "SELECT add_retention_policy('sensor_data_raw', INTERVAL '30 days', \
             if_not_exists => TRUE)",
        )
        .await
    {
        tracing::warn!(error = %e, "retention policy unavailable");
    }

    pool.execute(
        r#"
        ALTER TABLE sensor_data_raw ENABLE ROW LEVEL SECURITY;
        DO $$ BEGIN
            CREATE POLICY tenant_isolation ON sensor_data_raw
                USING (tenant_id = current_setting('app.current_tenant_id', true));
        EXCEPTION WHEN duplicate_object THEN NULL;
        END $$;
        "#,
    )
    .await
    .map_err(|e| StorageError::init(format!("row-level security: {e}")))?;

    tracing::info!("hot tier schema ready");
    Ok(())
}

/// Upsert one reading
///
/// The update arm is skipped when the stored content hash already matches,
/// making duplicate deliveries true no-ops.
pub async fn write(handle: &PoolHandle, reading: &SensorReading, tenant_id: &str) -> Result<()> {
    let mut conn = handle.acquire().await?;

    let custom_metrics = reading
        .custom_metrics
        .as_ref()
        .map(|m| serde_json::Value::Object(m.clone()));

    sqlx::query(
        r#"
        INSERT INTO sensor_data_raw (
            time, equipment_id, tenant_id, temperature, vibration, pressure,
            power_consumption, custom_metrics, facility_id, line_id,
            ingestion_timestamp, source, has_anomalies, data_hash
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
        ON CONFLICT (time, equipment_id, tenant_id) DO UPDATE SET
            temperature = EXCLUDED.temperature,
            vibration = EXCLUDED.vibration,
            pressure = EXCLUDED.pressure,
            power_consumption = EXCLUDED.power_consumption,
            custom_metrics = EXCLUDED.custom_metrics,
            facility_id = EXCLUDED.facility_id,
            line_id = EXCLUDED.line_id,
            ingestion_timestamp = EXCLUDED.ingestion_timestamp,
            source = EXCLUDED.source,
            has_anomalies = EXCLUDED.has_anomalies,
            data_hash = EXCLUDED.data_hash
        WHERE sensor_data_raw.data_hash IS DISTINCT FROM EXCLUDED.data_hash
        "#,
    )
    .bind(reading.timestamp)
    .bind(&reading.equipment_id)
    .bind(tenant_id)
    .bind(reading.temperature)
    .bind(reading.vibration)
    .bind(reading.pressure)
    .bind(reading.power_consumption)
    .bind(custom_metrics)
    .bind(&reading.facility_id)
    .bind(&reading.line_id)
    .bind(reading.ingestion_timestamp)
    .bind(&reading.source)
    .bind(reading.has_anomalies)
    .bind(content_hash(reading))
    .execute(&mut *conn)
    .await
    .map_err(StorageError::Hot)?;

    Ok(())
}

/// One hot-tier row as served by the query surface
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct HotReading {
    pub time: DateTime<Utc>,
    pub equipment_id: String,
    pub temperature: Option<f64>,
    pub vibration: Option<f64>,
    pub pressure: Option<f64>,
    pub power_consumption: Option<f64>,
    pub facility_id: Option<String>,
    pub line_id: Option<String>,
    pub has_anomalies: bool,
}

/// Recent readings for one equipment, newest first, capped at 1000 rows
pub async fn recent_readings(
    handle: &PoolHandle,
    equipment_id: &str,
    since: DateTime<Utc>,
) -> Result<Vec<HotReading>> {
    let mut conn = handle.acquire().await?;

    let rows = sqlx::query_as::<_, HotReading>(
        r#"
        SELECT time, equipment_id, temperature, vibration, pressure,
               power_consumption, facility_id, line_id, has_anomalies
        FROM sensor_data_raw
        WHERE equipment_id = $1 AND time >= $2
        ORDER BY time DESC
        LIMIT $3
        "#,
    )
    .bind(equipment_id)
    .bind(since)
    .bind(RECENT_READINGS_CAP)
    .fetch_all(&mut *conn)
    .await
    .map_err(StorageError::Hot)?;

    Ok(rows)
}

/// Count rows for one equipment (diagnostics)
pub async fn reading_count(handle: &PoolHandle, equipment_id: &str) -> Result<i64> {
    let mut conn = handle.acquire().await?;

    let row = sqlx::query("SELECT COUNT(*) AS n FROM sensor_data_raw WHERE equipment_id = $1")
        .bind(equipment_id)
        .fetch_one(&mut *conn)
        .await
        .map_err(StorageError::Hot)?;

    row.try_get("n").map_err(StorageError::Hot)
}
