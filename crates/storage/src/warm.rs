//! Warm tier: per-equipment status snapshots
//!
//! One row per equipment in `equipment_status`, updated on every reading.
//! Conflict on the primary key refreshes the snapshot, so concurrent writes
//! for the same equipment resolve to last-writer-wins without coordination.

use chrono::{DateTime, Utc};
use foundry_dataplane::PoolHandle;
use foundry_detect::SensorReading;
use serde::Serialize;
use sqlx::{Executor, PgPool};

use crate::error::{Result, StorageError};

/// Initialize the warm-tier schema
pub async fn init_schema(pool: &PgPool) -> Result<()> {
    pool.execute(
        r#"
        CREATE TABLE IF NOT EXISTS equipment_status (
            equipment_id        TEXT             PRIMARY KEY,
            tenant_id           TEXT             NOT NULL DEFAULT '',
            last_seen           TIMESTAMPTZ      NOT NULL,
            current_temperature DOUBLE PRECISION,
            current_vibration   DOUBLE PRECISION,
            current_pressure    DOUBLE PRECISION,
            status              TEXT             NOT NULL,
            facility_id         TEXT,
            line_id             TEXT,
            updated_at          TIMESTAMPTZ      NOT NULL
        );
        "#,
    )
    .await
    .map_err(|e| StorageError::init(format!("equipment_status: {e}")))?;

    pool.execute(
        r#"
        ALTER TABLE equipment_status ENABLE ROW LEVEL SECURITY;
        DO $$ BEGIN
            CREATE POLICY tenant_isolation ON equipment_status
                USING (tenant_id = current_setting('app.current_tenant_id', true));
        EXCEPTION WHEN duplicate_object THEN NULL;
        END $$;
        "#,
    )
    .await
    .map_err(|e| StorageError::init(format!("row-level security: {e}")))?;

    tracing::info!("warm tier schema ready");
    Ok(())
}

/// Upsert the status snapshot for a reading's equipment
pub async fn upsert_status(
    handle: &PoolHandle,
    reading: &SensorReading,
    tenant_id: &str,
) -> Result<()> {
    let mut conn = handle.acquire().await?;

    let status = if reading.has_anomalies {
        "anomalous"
    } else {
        "online"
    };

    sqlx::query(
        r#"
        INSERT INTO equipment_status (
            equipment_id, tenant_id, last_seen, current_temperature,
            current_vibration, current_pressure, status, facility_id,
            line_id, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NOW())
        ON CONFLICT (equipment_id) DO UPDATE SET
            tenant_id = EXCLUDED.tenant_id,
            last_seen = EXCLUDED.last_seen,
            current_temperature = EXCLUDED.current_temperature,
            current_vibration = EXCLUDED.current_vibration,
            current_pressure = EXCLUDED.current_pressure,
            status = EXCLUDED.status,
            facility_id = EXCLUDED.facility_id,
            line_id = EXCLUDED.line_id,
            updated_at = NOW()
        "#,
    )
    .bind(&reading.equipment_id)
    .bind(tenant_id)
    .bind(reading.timestamp)
    .bind(reading.temperature)
    .bind(reading.vibration)
    .bind(reading.pressure)
    .bind(status)
    .bind(&reading.facility_id)
    .bind(&reading.line_id)
    .execute(&mut *conn)
    .await
    .map_err(StorageError::Warm)?;

    Ok(())
}

/// One equipment's current status
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct EquipmentStatus {
    pub equipment_id: String,
    pub last_seen: DateTime<Utc>,
    pub current_temperature: Option<f64>,
    pub current_vibration: Option<f64>,
    pub current_pressure: Option<f64>,
    pub status: String,
    pub facility_id: Option<String>,
    pub line_id: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Fetch one equipment's status
pub async fn get_status(handle: &PoolHandle, equipment_id: &str) -> Result<Option<EquipmentStatus>> {
    let mut conn = handle.acquire().await?;

    sqlx::query_as::<_, EquipmentStatus>(
        r#"
        SELECT equipment_id, last_seen, current_temperature, current_vibration,
               current_pressure, status, facility_id, line_id, updated_at
        FROM equipment_status
        WHERE equipment_id = $1
        "#,
    )
    .bind(equipment_id)
    .fetch_optional(&mut *conn)
    .await
    .map_err(StorageError::Warm)
}

/// List every equipment's status, most recently seen first
pub async fn list_status(handle: &PoolHandle) -> Result<Vec<EquipmentStatus>> {
    let mut conn = handle.acquire().await?;

    sqlx::query_as::<_, EquipmentStatus>(
        r#"
        SELECT equipment_id, last_seen, current_temperature, current_vibration,
               current_pressure, status, facility_id, line_id, updated_at
        FROM equipment_status
        ORDER BY last_seen DESC
        "#,
    )
    .fetch_all(&mut *conn)
    .await
    .map_err(StorageError::Warm)
}
