//! Assembles the per-role summaries handed to presentation.

use serde::Serialize;
use tracing::{info, warn};

use crate::aggregate;
use crate::config::DataPaths;
use crate::elevation::ElevationTable;
use crate::error::{Result, UnwrappedError};
use crate::models::{
    ActivationRecord, BusiestMonth, ChaserContact, Distribution, PercentileResult, Role,
};
use crate::ranking::{self, Population, ScoreField};

/// Reference datasets, loaded once per session and never written.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub activator_roll: Population,
    pub chaser_roll: Population,
    pub elevations: ElevationTable,
}

impl ReferenceData {
    pub fn load(paths: &DataPaths) -> Result<Self> {
        Ok(Self {
            elevations: ElevationTable::load(&paths.summits_list)?,
            ..Self::load_rolls(paths)?
        })
    }

    /// Honor rolls only, with an empty elevation table. Enough for callsign
    /// lookups, which never touch the summit list.
    pub fn load_rolls(paths: &DataPaths) -> Result<Self> {
        Ok(Self {
            activator_roll: Population::load(&paths.honor_roll)?,
            chaser_roll: Population::load(&paths.chaser_honor_roll)?,
            elevations: ElevationTable::default(),
        })
    }

    pub fn roll(&self, role: Role) -> &Population {
        match role {
            Role::Activator => &self.activator_roll,
            Role::Chaser => &self.chaser_roll,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BusiestActivation {
    pub summit: String,
    pub qsos: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivatorSummary {
    pub callsign: String,
    pub total_points: i64,
    pub activation_count: usize,
    pub busiest_activation: BusiestActivation,
    pub busiest_month: Option<BusiestMonth>,
    pub qso_total: u64,
    /// `None` when no activation reports a contact count.
    pub average_qsos: Option<f64>,
    pub bands: Distribution,
    pub modes: Distribution,
    /// `None` when the honor roll has no usable entries.
    pub percentile: Option<PercentileResult>,
    pub vertical_gain_m: i64,
    pub s2s_qsos: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChaserSummary {
    pub callsign: String,
    pub qso_count: usize,
    pub total_points: i64,
    pub unique_summits: usize,
    pub bands: Distribution,
    pub modes: Distribution,
    pub percentile: Option<PercentileResult>,
}

/// Builds the activator summary. Fails with `EmptyInput` when there are no
/// activations, so callers can show "no data" rather than zeros.
pub fn activator_summary(
    callsign: &str,
    activations: &[ActivationRecord],
    s2s: &[ChaserContact],
    reference: &ReferenceData,
) -> Result<ActivatorSummary> {
    let total_points = aggregate::total_score(activations)?;
    let best = aggregate::best_activation(activations)?;
    let busiest_activation = BusiestActivation {
        summit: best
            .summit_name
            .clone()
            .or_else(|| best.summit_code.clone())
            .unwrap_or_default(),
        qsos: best.qsos.unwrap_or(0),
    };

    let (qso_total, average_qsos) = match aggregate::qso_stats(activations) {
        Ok(stats) => (stats.qso_total, Some(stats.average)),
        Err(UnwrappedError::DivisionUndefined) => (0, None),
        Err(err) => return Err(err),
    };

    let summary = ActivatorSummary {
        callsign: callsign.to_string(),
        total_points,
        activation_count: aggregate::record_count(activations),
        busiest_activation,
        busiest_month: aggregate::busiest_month(activations),
        qso_total,
        average_qsos,
        bands: aggregate::per_band_distribution(activations, Role::Activator),
        modes: aggregate::per_mode_distribution(activations, Role::Activator),
        percentile: rank(total_points, reference, Role::Activator)?,
        vertical_gain_m: aggregate::total_elevation_gain(activations, &reference.elevations),
        s2s_qsos: aggregate::record_count(s2s),
    };

    info!(
        callsign,
        activations = summary.activation_count,
        total_points,
        "assembled activator summary"
    );
    Ok(summary)
}

/// Builds the chaser summary. An empty contact list is valid and yields
/// zero counts.
pub fn chaser_summary(
    callsign: &str,
    contacts: &[ChaserContact],
    reference: &ReferenceData,
) -> Result<ChaserSummary> {
    let total_points = aggregate::total_points(contacts);
    let summary = ChaserSummary {
        callsign: callsign.to_string(),
        qso_count: aggregate::record_count(contacts),
        total_points,
        unique_summits: aggregate::unique_summit_count(contacts),
        bands: aggregate::per_band_distribution(contacts, Role::Chaser),
        modes: aggregate::per_mode_distribution(contacts, Role::Chaser),
        percentile: rank(total_points, reference, Role::Chaser)?,
    };

    info!(
        callsign,
        contacts = summary.qso_count,
        total_points,
        "assembled chaser summary"
    );
    Ok(summary)
}

fn rank(score: i64, reference: &ReferenceData, role: Role) -> Result<Option<PercentileResult>> {
    match ranking::percentile_bucket(score, reference.roll(role), ScoreField::for_role(role)) {
        Ok(result) => Ok(Some(result)),
        Err(UnwrappedError::EmptyPopulation) => {
            warn!(?role, "honor roll has no usable entries; skipping percentile");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PercentileBucket, Season};
    use crate::normalize::{normalize_activations, normalize_contacts};
    use serde_json::json;

    fn reference() -> ReferenceData {
        let activators = r#"[
            {"Callsign": "G5JFJ", "UserID": 1, "totalPoints": 400},
            {"Callsign": "M0AAA", "UserID": 2, "totalPoints": 120},
            {"Callsign": "M0BBB", "UserID": 3, "totalPoints": 80},
            {"Callsign": "M0CCC", "UserID": 4, "totalPoints": 20}
        ]"#;
        let chasers = r#"[
            {"Callsign": "M0CHS", "UserID": 5, "Points": 10},
            {"Callsign": "M0DDD", "UserID": 6, "Points": 1000}
        ]"#;
        let summits = "SummitCode,AltM\nG/LD-001,978\nG/LD-003,931\n";

        ReferenceData {
            activator_roll: Population::from_reader(activators.as_bytes()).unwrap(),
            chaser_roll: Population::from_reader(chasers.as_bytes()).unwrap(),
            elevations: ElevationTable::from_reader(summits.as_bytes()).unwrap(),
        }
    }

    fn activations() -> Vec<ActivationRecord> {
        normalize_activations(&[
            json!({
                "SummitCode": "G/LD-001", "Summit": "Scafell Pike",
                "ActivationDate": "2025-06-01", "Total": 40, "QSOs": 12,
                "QSO40": 7, "QSO2": 5, "QSOssb": 5, "QSOcw": 7
            }),
            json!({
                "SummitCode": "G/LD-003", "Summit": "Skiddaw",
                "ActivationDate": "2025-06-20", "Total": 100, "QSOs": 30,
                "QSO20": 30, "QSOcw": 30
            }),
            json!({
                "SummitCode": "G/LD-001",
                "ActivationDate": "2025-09-02", "Total": 120
            }),
        ])
    }

    #[test]
    fn assembles_activator_metrics() {
        let s2s = normalize_contacts(&[json!({ "Band": "7MHz", "Mode": "CW" })]);
        let summary = activator_summary("G4XYZ", &activations(), &s2s, &reference()).unwrap();

        assert_eq!(summary.total_points, 120);
        assert_eq!(summary.activation_count, 3);
        assert_eq!(
            summary.busiest_activation,
            BusiestActivation { summit: "Skiddaw".to_string(), qsos: 30 }
        );
        let month = summary.busiest_month.as_ref().unwrap();
        assert_eq!(month.label, "June 2025");
        assert_eq!(month.season, Season::Summer);
        assert_eq!(summary.qso_total, 42);
        assert_eq!(summary.average_qsos, Some(21.0));
        assert_eq!(summary.bands.top_label(), Some("20m"));
        assert_eq!(summary.modes.top_label(), Some("CW"));
        assert_eq!(summary.modes.top_count(), 37);
        assert_eq!(summary.vertical_gain_m, 978 * 2 + 931);
        assert_eq!(summary.s2s_qsos, 1);

        let percentile = summary.percentile.unwrap();
        assert_eq!(percentile.percentile, 25.0);
        assert_eq!(percentile.bucket, PercentileBucket::Top30);
    }

    #[test]
    fn no_activations_is_no_data() {
        let err = activator_summary("G4XYZ", &[], &[], &reference()).unwrap_err();
        assert!(matches!(err, UnwrappedError::EmptyInput));
    }

    #[test]
    fn missing_counts_and_roll_become_none() {
        let records = normalize_activations(&[json!({ "SummitCode": "G/LD-001", "Total": 5 })]);
        let summary = activator_summary("G4XYZ", &records, &[], &ReferenceData::default()).unwrap();

        assert_eq!(summary.qso_total, 0);
        assert_eq!(summary.average_qsos, None);
        assert_eq!(summary.percentile, None);
        assert_eq!(summary.busiest_month, None);
        assert_eq!(summary.busiest_activation.summit, "G/LD-001");
        assert_eq!(summary.vertical_gain_m, 0);
    }

    #[test]
    fn assembles_chaser_metrics() {
        let contacts = normalize_contacts(&[
            json!({ "Band": "144MHz", "Mode": "FM", "SummitCode": "G/LD-001", "Points": 10 }),
            json!({ "Band": "7MHz", "Mode": "CW", "SummitCode": "G/LD-003", "Points": 4 }),
            json!({ "Band": "144MHz", "Mode": "FM", "SummitCode": "G/LD-001", "Points": 10 }),
        ]);
        let summary = chaser_summary("M0CHS", &contacts, &reference()).unwrap();

        assert_eq!(summary.qso_count, 3);
        assert_eq!(summary.total_points, 24);
        assert_eq!(summary.unique_summits, 2);
        assert_eq!(summary.bands.top_label(), Some("144MHz"));
        assert_eq!(summary.modes.rows.len(), 2);

        let percentile = summary.percentile.unwrap();
        assert_eq!(percentile.percentile, 50.0);
        assert_eq!(percentile.bucket, PercentileBucket::Top50);
    }

    #[test]
    fn rolls_load_without_summit_list() {
        let dir = std::env::temp_dir().join(format!("sota-unwrapped-rolls-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("honor_roll_2025.json"),
            r#"[{"Callsign": "G5JFJ", "UserID": 1, "totalPoints": 400}]"#,
        )
        .unwrap();
        std::fs::write(dir.join("chaser_honor_roll_2025.json"), "[]").unwrap();
        let paths = DataPaths::from_data_dir(&dir);

        let rolls = ReferenceData::load_rolls(&paths).unwrap();
        assert_eq!(rolls.activator_roll.len(), 1);
        assert!(rolls.chaser_roll.is_empty());
        assert!(rolls.elevations.is_empty());

        let err = ReferenceData::load(&paths).unwrap_err();
        assert!(matches!(err, UnwrappedError::Io(_)));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn summary_serializes_flat() {
        let summary = activator_summary("G4XYZ", &activations(), &[], &reference()).unwrap();
        let value = serde_json::to_value(&summary).unwrap();

        assert_eq!(value["total_points"], 120);
        assert_eq!(value["percentile"]["bucket"], "Top 30%");
        assert_eq!(value["busiest_month"]["season"], "Summer");
        assert_eq!(value["bands"]["rows"][0]["label"], "40m");
    }
}
