//! Cold tier: object archive
//!
//! Every reading is serialized to JSON and put at a date-partitioned key
//! (see [`crate::keys`]). Objects carry identifying metadata headers so
//! downstream lifecycle tooling never has to read bodies. Failed readings
//! go to the same layout rooted at `errors/` with a failure marker.

use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;
use chrono::{DateTime, SecondsFormat, Utc};
use foundry_dataplane::ObjectTarget;
use foundry_detect::SensorReading;
use serde::Serialize;

use crate::error::{Result, StorageError};
use crate::keys;

/// Sensor-type metadata tag on every archived object
pub const SENSOR_TYPE_TAG: &str = "industrial-telemetry";

/// Archive document: the reading plus archival metadata
#[derive(Debug, Serialize)]
struct ArchiveDocument<'a> {
    #[serde(flatten)]
    reading: &'a SensorReading,
    tenant_id: &'a str,
    archived_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    processing_failed: bool,
}

/// Cold-tier client wrapper
#[derive(Clone)]
pub struct ColdStore {
    client: Client,
}

impl ColdStore {
    /// Create a store using ambient credentials
    pub async fn new(region: &str) -> Self {
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(region.to_string()))
            .load()
            .await;
        Self {
            client: Client::new(&config),
        }
    }

    /// Create a store against a custom endpoint (MinIO and friends)
    pub async fn with_endpoint(region: &str, endpoint: &str) -> Self {
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(region.to_string()))
            .load()
            .await;

        let s3_config = aws_sdk_s3::config::Builder::from(&config)
            .endpoint_url(endpoint)
            .force_path_style(true)
            .build();

        Self {
            client: Client::from_conf(s3_config),
        }
    }

    /// Create from an existing client (tests)
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Archive a reading at its date-partitioned key
    ///
    /// Returns the full object key. Rewrites of the same key overwrite,
    /// which is the documented duplicate behavior for this tier.
    pub async fn archive(
        &self,
        target: &ObjectTarget,
        reading: &SensorReading,
        tenant_id: &str,
    ) -> Result<String> {
        let key = target.key(&keys::archive_key(
            reading.facility_id.as_deref(),
            &reading.equipment_id,
            reading.timestamp,
        ));

        self.put_document(target, &key, reading, tenant_id, false)
            .await?;

        tracing::debug!(bucket = %target.bucket, key = %key, "reading archived");
        Ok(key)
    }

    /// Archive a reading that failed another tier, under `errors/`
    pub async fn archive_error(
        &self,
        target: &ObjectTarget,
        reading: &SensorReading,
        tenant_id: &str,
    ) -> Result<String> {
        let key = target.key(&keys::error_key(
            reading.facility_id.as_deref(),
            &reading.equipment_id,
            reading.timestamp,
            Utc::now().timestamp_millis(),
        ));

        self.put_document(target, &key, reading, tenant_id, true)
            .await?;

        tracing::warn!(bucket = %target.bucket, key = %key, "reading archived to error location");
        Ok(key)
    }

    async fn put_document(
        &self,
        target: &ObjectTarget,
        key: &str,
        reading: &SensorReading,
        tenant_id: &str,
        processing_failed: bool,
    ) -> Result<()> {
        let archived_at = Utc::now();
        let document = ArchiveDocument {
            reading,
            tenant_id,
            archived_at,
            processing_failed,
        };
        let body = serde_json::to_vec(&document)?;

        self.client
            .put_object()
            .bucket(&target.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type("application/json")
            .metadata("equipment-id", &reading.equipment_id)
            .metadata("tenant-id", tenant_id)
            .metadata("sensor-type", SENSOR_TYPE_TAG)
            .metadata(
                "archived-at",
                archived_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            )
            .send()
            .await
            .map_err(|e| StorageError::cold(e.to_string()))?;

        Ok(())
    }

    /// List archive keys for one equipment inside a date range
    ///
    /// Returns keys only, never bodies. Capped at `max_keys`; error objects
    /// and other equipments' keys are filtered out.
    pub async fn list_keys(
        &self,
        target: &ObjectTarget,
        equipment_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        max_keys: usize,
    ) -> Result<Vec<String>> {
        let mut found = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let mut request = self
                .client
                .list_objects_v2()
                .bucket(&target.bucket)
                .prefix(&target.prefix);

            if let Some(token) = &continuation {
                request = request.continuation_token(token);
            }

            let response = request
                .send()
                .await
                .map_err(|e| StorageError::cold(e.to_string()))?;

            for object in response.contents() {
                let Some(key) = object.key() else { continue };
                let Some(relative) = key.strip_prefix(target.prefix.as_str()) else {
                    continue;
                };
                let Some((equipment, hour)) = keys::parse_archive_key(relative) else {
                    continue;
                };

                if equipment == equipment_id && hour >= start && hour <= end {
                    found.push(key.to_string());
                    if found.len() >= max_keys {
                        return Ok(found);
                    }
                }
            }

            continuation = response.next_continuation_token().map(str::to_string);
            if continuation.is_none() {
                break;
            }
        }

        Ok(found)
    }
}
