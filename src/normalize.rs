//! Turns raw upstream JSON log entries into typed records.
//!
//! Per-record problems never abort a batch: an entry that cannot be read is
//! logged and dropped, a missing optional field falls back to its default.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{Result, UnwrappedError};
use crate::models::{ActivationRecord, ChaserContact};

/// Upstream activator-log field → activator band label.
const BAND_FIELDS: [(&str, &str); 15] = [
    ("QSO160", "160m"),
    ("QSO80", "80m"),
    ("QSO60", "60m"),
    ("QSO40", "40m"),
    ("QSO30", "30m"),
    ("QSO20", "20m"),
    ("QSO17", "17m"),
    ("QSO15", "15m"),
    ("QSO12", "12m"),
    ("QSO10", "10m"),
    ("QSO6", "6m"),
    ("QSO4", "4m"),
    ("QSO2", "2m"),
    ("QSO70c", "70cm"),
    ("QSO23c", "23cm"),
];

const MODE_FIELDS: [(&str, &str); 3] = [("QSOssb", "SSB"), ("QSOcw", "CW"), ("QSOfm", "FM")];

#[derive(Deserialize)]
struct RawActivation {
    #[serde(rename = "SummitCode", default)]
    summit_code: Option<Value>,
    #[serde(rename = "Summit", default)]
    summit: Option<Value>,
    #[serde(rename = "ActivationDate", default)]
    activation_date: Option<Value>,
    #[serde(rename = "Total", default)]
    total: Option<Value>,
    #[serde(rename = "QSOs", default)]
    qsos: Option<Value>,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

#[derive(Deserialize)]
struct RawContact {
    #[serde(rename = "Band", default)]
    band: Option<Value>,
    #[serde(rename = "Mode", default)]
    mode: Option<Value>,
    #[serde(rename = "SummitCode", default)]
    summit_code: Option<Value>,
    #[serde(rename = "Points", default)]
    points: Option<Value>,
}

pub fn normalize_activations(raw: &[Value]) -> Vec<ActivationRecord> {
    let mut records = Vec::with_capacity(raw.len());

    for (index, value) in raw.iter().enumerate() {
        let entry = match RawActivation::deserialize(value) {
            Ok(entry) => entry,
            Err(err) => {
                warn!(index, error = %err, "skipping unreadable activation entry");
                continue;
            }
        };

        records.push(ActivationRecord {
            summit_code: text(entry.summit_code),
            summit_name: text(entry.summit),
            activation_date: text(entry.activation_date),
            total: entry.total.as_ref().and_then(whole_number).unwrap_or(0),
            qsos: entry.qsos.as_ref().and_then(whole_number).map(clamp_count),
            band_qsos: counts_from(&entry.rest, &BAND_FIELDS),
            mode_qsos: counts_from(&entry.rest, &MODE_FIELDS),
        });
    }

    debug!(kept = records.len(), seen = raw.len(), "normalized activations");
    records
}

pub fn normalize_contacts(raw: &[Value]) -> Vec<ChaserContact> {
    let mut contacts = Vec::with_capacity(raw.len());

    for (index, value) in raw.iter().enumerate() {
        let entry = match RawContact::deserialize(value) {
            Ok(entry) => entry,
            Err(err) => {
                warn!(index, error = %err, "skipping unreadable chaser contact");
                continue;
            }
        };

        contacts.push(ChaserContact {
            band: text(entry.band),
            mode: text(entry.mode),
            summit_code: text(entry.summit_code),
            points: entry
                .points
                .as_ref()
                .and_then(whole_number)
                .unwrap_or(0)
                .max(0),
        });
    }

    debug!(kept = contacts.len(), seen = raw.len(), "normalized chaser contacts");
    contacts
}

pub fn parse_activation_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| UnwrappedError::MalformedDate(raw.to_string()))
}

fn counts_from(
    fields: &Map<String, Value>,
    mapping: &[(&str, &'static str)],
) -> BTreeMap<&'static str, u64> {
    mapping
        .iter()
        .map(|(field, label)| {
            let count = fields
                .get(*field)
                .and_then(whole_number)
                .map(clamp_count)
                .unwrap_or(0);
            (*label, count)
        })
        .collect()
}

/// Integer value of a JSON number, accepting integral floats such as `50.0`.
/// Anything else reads as absent.
fn whole_number(value: &Value) -> Option<i64> {
    if let Some(number) = value.as_i64() {
        return Some(number);
    }
    value
        .as_f64()
        .filter(|number| number.is_finite() && number.fract() == 0.0)
        .map(|number| number as i64)
}

fn clamp_count(value: i64) -> u64 {
    value.max(0) as u64
}

/// Non-blank JSON string; other types read as absent.
fn text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(text) if !text.trim().is_empty() => Some(text),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_upstream_activation_fields() {
        let raw = vec![json!({
            "SummitCode": "G/LD-001",
            "Summit": "Scafell Pike",
            "ActivationDate": "2025-06-14",
            "Total": 120,
            "QSOs": 14,
            "QSO40": 9,
            "QSO2": 5,
            "QSO70c": 0,
            "QSOssb": 6,
            "QSOcw": 8
        })];

        let records = normalize_activations(&raw);
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.summit_code.as_deref(), Some("G/LD-001"));
        assert_eq!(record.summit_name.as_deref(), Some("Scafell Pike"));
        assert_eq!(record.total, 120);
        assert_eq!(record.qsos, Some(14));
        assert_eq!(record.band_qsos["40m"], 9);
        assert_eq!(record.band_qsos["2m"], 5);
        assert_eq!(record.band_qsos["160m"], 0);
        assert_eq!(record.band_qsos.len(), 15);
        assert_eq!(record.mode_qsos["CW"], 8);
        assert_eq!(record.mode_qsos["FM"], 0);
    }

    #[test]
    fn tolerates_missing_and_null_fields() {
        let raw = vec![json!({ "SummitCode": "", "QSOs": null, "Total": null })];

        let records = normalize_activations(&raw);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].summit_code, None);
        assert_eq!(records[0].qsos, None);
        assert_eq!(records[0].total, 0);
        assert_eq!(records[0].activation_date, None);
    }

    #[test]
    fn skips_entries_that_cannot_be_read() {
        let raw = vec![
            json!("not an object"),
            json!(17),
            json!({ "Total": 10, "QSOs": -3 }),
        ];

        let records = normalize_activations(&raw);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].qsos, Some(0));
    }

    #[test]
    fn mistyped_numbers_only_blank_their_own_field() {
        let raw = vec![
            json!({
                "SummitCode": "G/LD-001",
                "ActivationDate": "2025-06-01",
                "Total": 50,
                "QSOs": "12"
            }),
            json!({ "SummitCode": "G/LD-002", "Total": 50.0, "QSOs": 7.0, "QSO20": 7.0 }),
            json!({ "SummitCode": "G/LD-003", "Total": "lots", "QSOs": 4.5 }),
            json!({ "SummitCode": 1234, "ActivationDate": 20250601, "Total": 9 }),
        ];

        let records = normalize_activations(&raw);
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].total, 50);
        assert_eq!(records[0].qsos, None);
        assert_eq!(records[0].activation_date.as_deref(), Some("2025-06-01"));
        assert_eq!(records[1].total, 50);
        assert_eq!(records[1].qsos, Some(7));
        assert_eq!(records[1].band_qsos["20m"], 7);
        assert_eq!(records[2].total, 0);
        assert_eq!(records[2].qsos, None);
        assert_eq!(records[3].summit_code, None);
        assert_eq!(records[3].activation_date, None);
        assert_eq!(records[3].total, 9);
    }

    #[test]
    fn reads_chaser_contacts() {
        let raw = vec![
            json!({ "Band": "14MHz", "Mode": "CW", "SummitCode": "W7A/AW-001", "Points": 8 }),
            json!({ "Band": "144MHz", "Mode": "FM" }),
            json!({ "Band": "7MHz", "Mode": "SSB", "Points": "two" }),
            json!({ "Band": "7MHz", "Mode": "SSB", "Points": 4.0 }),
            json!(42),
        ];

        let contacts = normalize_contacts(&raw);
        assert_eq!(contacts.len(), 4);
        assert_eq!(contacts[0].points, 8);
        assert_eq!(contacts[1].summit_code, None);
        assert_eq!(contacts[1].points, 0);
        assert_eq!(contacts[2].points, 0);
        assert_eq!(contacts[3].points, 4);
    }

    #[test]
    fn parses_iso_dates_and_rejects_others() {
        let date = parse_activation_date("2025-06-01").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());

        let err = parse_activation_date("01/06/2025").unwrap_err();
        assert!(matches!(err, UnwrappedError::MalformedDate(_)));
    }
}
