//! Cold-tier key layout
//!
//! Objects land at date-partitioned keys under the tenant's target prefix:
//!
//! ```text
//! [tenants/<tenant>/]<facility>/<equipment>/<YYYY>/<MM>/<DD>/<HH>/<timestamp>.json
//! [tenants/<tenant>/]errors/<facility>/<equipment>/<YYYY>/<MM>/<DD>/<HH>/<equipment>-<epoch_ms>.json
//! ```
//!
//! A missing facility tag uses the literal `unknown` segment so the layout
//! stays parseable.

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};

/// Facility segment used when the reading carries no facility tag
pub const UNKNOWN_FACILITY: &str = "unknown";

/// Key for an archived reading, relative to the target prefix
pub fn archive_key(facility: Option<&str>, equipment_id: &str, ts: DateTime<Utc>) -> String {
    format!(
        "{}/{}.json",
        date_path(facility, equipment_id, ts),
        ts.to_rfc3339_opts(SecondsFormat::Millis, true)
    )
}

/// Key for a failed reading, relative to the target prefix
pub fn error_key(
    facility: Option<&str>,
    equipment_id: &str,
    ts: DateTime<Utc>,
    failed_at_epoch_ms: i64,
) -> String {
    format!(
        "errors/{}/{equipment_id}-{failed_at_epoch_ms}.json",
        date_path(facility, equipment_id, ts)
    )
}

fn date_path(facility: Option<&str>, equipment_id: &str, ts: DateTime<Utc>) -> String {
    format!(
        "{}/{}/{}",
        facility.unwrap_or(UNKNOWN_FACILITY),
        equipment_id,
        ts.format("%Y/%m/%d/%H")
    )
}

/// Parse `(equipment_id, hour)` out of an archive key
///
/// Used to filter listings by equipment and date range. Returns `None` for
/// keys that do not follow the archive layout (error objects included).
pub fn parse_archive_key(relative_key: &str) -> Option<(&str, DateTime<Utc>)> {
    let segments: Vec<&str> = relative_key.split('/').collect();
    // facility / equipment / YYYY / MM / DD / HH / file
    if segments.len() != 7 || segments[0] == "errors" {
        return None;
    }

    let year: i32 = segments[2].parse().ok()?;
    let month: u32 = segments[3].parse().ok()?;
    let day: u32 = segments[4].parse().ok()?;
    let hour: u32 = segments[5].parse().ok()?;

    let ts = Utc
        .with_ymd_and_hms(year, month, day, hour, 0, 0)
        .single()?;

    Some((segments[1], ts))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts() -> DateTime<Utc> {
        "2025-11-23T10:30:00Z".parse().unwrap()
    }

    #[test]
    fn test_archive_key_layout() {
        let key = archive_key(Some("FAC_CHICAGO_01"), "PUMP_001", ts());
        assert!(key.starts_with("FAC_CHICAGO_01/PUMP_001/2025/11/23/10/"));
        assert!(key.ends_with(".json"));
    }

    #[test]
    fn test_archive_key_without_facility() {
        let key = archive_key(None, "PUMP_001", ts());
        assert!(key.starts_with("unknown/PUMP_001/2025/11/23/10/"));
    }

    #[test]
    fn test_error_key_layout() {
        let key = error_key(Some("FAC_CHICAGO_01"), "PUMP_001", ts(), 1_763_893_800_123);
        assert_eq!(
            key,
            "errors/FAC_CHICAGO_01/PUMP_001/2025/11/23/10/PUMP_001-1763893800123.json"
        );
    }

    #[test]
    fn test_parse_round_trip() {
        let key = archive_key(Some("FAC_CHICAGO_01"), "PUMP_001", ts());
        let (equipment, hour) = parse_archive_key(&key).unwrap();
        assert_eq!(equipment, "PUMP_001");
        assert_eq!(hour, "2025-11-23T10:00:00Z".parse::<DateTime<Utc>>().unwrap());
    }

    #[test]
    fn test_parse_rejects_error_objects() {
        let key = error_key(Some("FAC_CHICAGO_01"), "PUMP_001", ts(), 1);
        assert!(parse_archive_key(&key).is_none());
    }
}
