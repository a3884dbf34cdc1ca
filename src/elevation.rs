//! Summit elevation lookup backed by the local summit list.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::Result;

/// Anything that can answer "how high is this summit".
///
/// Unknown summits resolve to 0; implementations never fail the caller.
pub trait SummitElevations {
    fn elevation_m(&self, summit_code: &str) -> i64;
}

#[derive(Debug, Clone, Default)]
pub struct ElevationTable {
    by_code: HashMap<String, i64>,
}

#[derive(Deserialize)]
struct SummitRow {
    #[serde(rename = "SummitCode")]
    summit_code: String,
    #[serde(rename = "AltM", default)]
    alt_m: Option<String>,
}

impl ElevationTable {
    pub fn load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let table = Self::from_reader(file)?;
        info!(path = %path.display(), summits = table.len(), "loaded summit elevations");
        Ok(table)
    }

    /// Reads a summit list with a header row. Only `SummitCode` and `AltM`
    /// are used; any other columns are ignored.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let mut by_code = HashMap::new();

        for row in reader.deserialize::<SummitRow>() {
            let row = match row {
                Ok(row) => row,
                Err(err) => {
                    debug!(error = %err, "skipping unreadable summit row");
                    continue;
                }
            };
            let elevation = row
                .alt_m
                .as_deref()
                .and_then(|alt| alt.trim().parse::<i64>().ok())
                .unwrap_or(0);
            // First row wins, matching a top-down scan of the list.
            by_code.entry(normalize_code(&row.summit_code)).or_insert(elevation);
        }

        Ok(Self { by_code })
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

impl SummitElevations for ElevationTable {
    fn elevation_m(&self, summit_code: &str) -> i64 {
        self.by_code
            .get(&normalize_code(summit_code))
            .copied()
            .unwrap_or(0)
    }
}

fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}
