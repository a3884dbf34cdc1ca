//! Percentile ranking against an honor-roll snapshot.

use std::io::Read;
use std::path::Path;

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::{Result, UnwrappedError};
use crate::models::{round_to, PercentileBucket, PercentileResult, Role};

/// Score column of an honor roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreField {
    /// Activator roll.
    TotalPoints,
    /// Chaser roll.
    Points,
}

impl ScoreField {
    pub fn key(self) -> &'static str {
        match self {
            ScoreField::TotalPoints => "totalPoints",
            ScoreField::Points => "Points",
        }
    }

    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Activator => ScoreField::TotalPoints,
            Role::Chaser => ScoreField::Points,
        }
    }
}

/// One honor-roll row, kept as the object it was read from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PopulationEntry {
    fields: Map<String, Value>,
}

impl PopulationEntry {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Score as stored; fractional values are kept so comparisons match
    /// the roll exactly.
    pub fn score(&self, field: ScoreField) -> Option<f64> {
        self.fields.get(field.key()).and_then(Value::as_f64)
    }

    pub fn callsign(&self) -> Option<&str> {
        self.fields.get("Callsign").and_then(Value::as_str)
    }

    /// `UserID` is a number on some rolls and a string on others.
    pub fn user_id(&self) -> Option<String> {
        match self.fields.get("UserID")? {
            Value::String(id) => Some(id.clone()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        }
    }
}

/// Read-only honor-roll snapshot for one session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Population {
    entries: Vec<PopulationEntry>,
}

impl Population {
    pub fn new(entries: Vec<PopulationEntry>) -> Self {
        Self { entries }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let population = Self::from_reader(std::io::BufReader::new(file))?;
        info!(path = %path.display(), entries = population.len(), "loaded honor roll");
        Ok(population)
    }

    /// Parses a JSON array of objects; non-object elements are ignored.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let rows: Vec<Value> = serde_json::from_reader(reader)?;
        let entries = rows
            .into_iter()
            .filter_map(|row| match row {
                Value::Object(fields) => Some(PopulationEntry::new(fields)),
                _ => None,
            })
            .collect();
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[PopulationEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Share of the population strictly above `score`, and its bucket.
///
/// Entries without a numeric `field` are not part of the population. A user
/// tied with the leader has nobody above and ranks at 0.0.
pub fn percentile_bucket(
    score: i64,
    population: &Population,
    field: ScoreField,
) -> Result<PercentileResult> {
    let scores: Vec<f64> = population
        .entries()
        .iter()
        .filter_map(|entry| entry.score(field))
        .collect();

    if scores.is_empty() {
        return Err(UnwrappedError::EmptyPopulation);
    }

    let score = score as f64;
    let users_above = scores.iter().filter(|&&other| other > score).count();
    let percentile = users_above as f64 / scores.len() as f64 * 100.0;
    debug!(
        field = field.key(),
        users_above,
        population = scores.len(),
        "ranked score"
    );

    Ok(PercentileResult {
        percentile: round_to(percentile, 1),
        bucket: PercentileBucket::from_percentile(percentile),
    })
}
