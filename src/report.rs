use std::fmt::Write;

use crate::models::{Distribution, PercentileResult};
use crate::summary::{ActivatorSummary, ChaserSummary};

pub fn build_activator_report(summary: &ActivatorSummary) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# {}'s 2025 SOTA Unwrapped", summary.callsign);
    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "- Total points: {} across {} activations",
        summary.total_points, summary.activation_count
    );
    let _ = writeln!(
        output,
        "- Highest QSO activation: {} with {} QSOs",
        summary.busiest_activation.summit, summary.busiest_activation.qsos
    );

    match summary.average_qsos {
        Some(average) => {
            let _ = writeln!(
                output,
                "- Total QSOs: {} (average {:.2} per activation)",
                summary.qso_total, average
            );
        }
        None => {
            let _ = writeln!(output, "- Total QSOs: no activations reported a QSO count");
        }
    }

    match &summary.busiest_month {
        Some(month) => {
            let _ = writeln!(
                output,
                "- Busiest month: {} with {} activations ({} vibes)",
                month.label, month.count, month.season
            );
        }
        None => {
            let _ = writeln!(output, "- Busiest month: no dated activations");
        }
    }

    write_percentile(&mut output, summary.percentile.as_ref(), "activators");
    let _ = writeln!(output, "- Vertical gain: {}m", summary.vertical_gain_m);
    let _ = writeln!(output, "- Summit-to-summit QSOs: {}", summary.s2s_qsos);

    write_distribution(&mut output, "QSOs per Band", "band", &summary.bands);
    write_distribution(&mut output, "QSOs per Mode", "mode", &summary.modes);

    output
}

pub fn build_chaser_report(summary: &ChaserSummary) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# {}'s 2025 SOTA Unwrapped (Chaser)", summary.callsign);
    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "- Total points: {} from {} QSOs",
        summary.total_points, summary.qso_count
    );
    let _ = writeln!(output, "- Unique summits chased: {}", summary.unique_summits);
    write_percentile(&mut output, summary.percentile.as_ref(), "chasers");

    write_distribution(&mut output, "QSOs per Band", "band", &summary.bands);
    write_distribution(&mut output, "QSOs per Mode", "mode", &summary.modes);

    output
}

fn write_percentile(output: &mut String, percentile: Option<&PercentileResult>, peers: &str) {
    match percentile {
        Some(result) => {
            let _ = writeln!(
                output,
                "- Rank: {} percentile ({:.1}%) compared to all {}",
                result.bucket, result.percentile, peers
            );
        }
        None => {
            let _ = writeln!(output, "- Rank: no honor roll data available");
        }
    }
}

fn write_distribution(output: &mut String, title: &str, noun: &str, distribution: &Distribution) {
    let _ = writeln!(output);
    let _ = writeln!(output, "## {}", title);

    if distribution.rows.is_empty() {
        let _ = writeln!(output, "No QSOs recorded.");
        return;
    }

    for row in &distribution.rows {
        let _ = writeln!(output, "- {}: {}", row.label, row.count);
    }
    if let Some(top) = &distribution.top {
        let _ = writeln!(
            output,
            "Favourite {}: {} with {} QSOs",
            noun, top.label, top.count
        );
    }
}
