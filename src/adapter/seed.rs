//! Loading order documents from a JSON seed file.
//!
//! The file is an array of objects. Each object may carry an `id`; the
//! rest are the document fields exactly as the store holds them. For
//! demos, `placedMinutesAgo` may stand in for `timestamp` and is resolved
//! against the supplied clock instant.

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;

use crate::domain::OrderId;
use crate::error::{ConfigError, Error, Result};
use crate::port::OrderDocument;

/// Read and parse a seed file.
pub fn load_seed_file(path: impl AsRef<Path>, now: DateTime<Utc>) -> Result<Vec<OrderDocument>> {
    let content = std::fs::read_to_string(path.as_ref())?;
    parse_seed(&content, now)
}

/// Parse seed JSON into documents.
pub fn parse_seed(content: &str, now: DateTime<Utc>) -> Result<Vec<OrderDocument>> {
    let value: Value = serde_json::from_str(content)?;
    let Value::Array(entries) = value else {
        return Err(ConfigError::InvalidValue {
            field: "seed_file",
            reason: "expected a JSON array of order documents".into(),
        }
        .into());
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| to_document(i, entry, now))
        .collect()
}

fn to_document(index: usize, entry: Value, now: DateTime<Utc>) -> Result<OrderDocument> {
    let Value::Object(mut fields) = entry else {
        return Err(Error::Config(ConfigError::InvalidValue {
            field: "seed_file",
            reason: format!("entry {index} is not an object"),
        }));
    };

    let id = match fields.remove("id") {
        Some(Value::String(id)) => OrderId::new(id),
        Some(other) => OrderId::new(other.to_string()),
        None => OrderId::generate(),
    };

    if let Some(minutes) = fields.remove("placedMinutesAgo") {
        let minutes = minutes.as_i64().ok_or_else(|| ConfigError::InvalidValue {
            field: "placedMinutesAgo",
            reason: format!("entry {index}: expected whole minutes"),
        })?;
        let placed = Duration::try_minutes(minutes)
            .and_then(|ago| now.checked_sub_signed(ago))
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "placedMinutesAgo",
                reason: format!("entry {index}: {minutes} minutes is out of range"),
            })?;
        fields
            .entry("timestamp")
            .or_insert_with(|| Value::String(placed.to_rfc3339()));
    }

    Ok(OrderDocument::new(id, fields))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::domain::placed_at;

    #[test]
    fn resolves_relative_timestamps() {
        let now = placed_at(30);
        let docs = parse_seed(
            r#"[{"id": "o1", "status": "pending", "type": "food", "placedMinutesAgo": 20}]"#,
            now,
        )
        .unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id.as_str(), "o1");
        assert_eq!(
            docs[0].fields["timestamp"],
            Value::String(placed_at(10).to_rfc3339())
        );
        assert!(!docs[0].fields.contains_key("placedMinutesAgo"));
    }

    #[test]
    fn out_of_range_minutes_are_rejected() {
        let err = parse_seed(
            r#"[{"id": "a", "type": "food", "status": "pending", "placedMinutesAgo": 9223372036854775807}]"#,
            placed_at(0),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue {
                field: "placedMinutesAgo",
                ..
            })
        ));
    }

    #[test]
    fn explicit_timestamp_wins() {
        let docs = parse_seed(
            r#"[{"status": "pending", "timestamp": "2026-01-05T18:00:00Z", "placedMinutesAgo": 5}]"#,
            placed_at(0),
        )
        .unwrap();
        assert_eq!(docs[0].fields["timestamp"], "2026-01-05T18:00:00Z");
        assert!(!docs[0].id.as_str().is_empty());
    }

    #[test]
    fn rejects_non_array() {
        assert!(matches!(
            parse_seed(r#"{"status": "pending"}"#, placed_at(0)),
            Err(Error::Config(ConfigError::InvalidValue { .. }))
        ));
    }
}
