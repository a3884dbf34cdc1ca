use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Which side of a contact the user was on. Selects the band/mode schemes
/// and the honor roll used for ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Activator,
    Chaser,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Band,
    Mode,
}

/// A fixed, ordered set of category labels along one axis.
#[derive(Debug, Clone, Copy)]
pub struct CategoryScheme {
    pub axis: Axis,
    pub labels: &'static [&'static str],
}

pub const ACTIVATOR_BANDS: CategoryScheme = CategoryScheme {
    axis: Axis::Band,
    labels: &[
        "160m", "80m", "60m", "40m", "30m", "20m", "17m", "15m", "12m", "10m", "6m", "4m", "2m",
        "70cm", "23cm",
    ],
};

pub const CHASER_BANDS: CategoryScheme = CategoryScheme {
    axis: Axis::Band,
    labels: &[
        "VLF", "1.8MHz", "3.5MHz", "5MHz", "7MHz", "10MHz", "14MHz", "18MHz", "21MHz", "24MHz",
        "28MHz", "40MHz", "50MHz", "60MHz", "70MHz", "144MHz", "220MHz", "433MHz", "900MHz",
        "1240MHz", "2.3GHz", "3.4GHz", "5.6GHz", "10GHz", "24GHz", "Microwave",
    ],
};

pub const ACTIVATOR_MODES: CategoryScheme = CategoryScheme {
    axis: Axis::Mode,
    labels: &["SSB", "CW", "FM"],
};

pub const CHASER_MODES: CategoryScheme = CategoryScheme {
    axis: Axis::Mode,
    labels: &["AM", "CW", "DATA", "DV", "FM", "OTHER", "SSB"],
};

impl Role {
    pub fn band_scheme(self) -> &'static CategoryScheme {
        match self {
            Role::Activator => &ACTIVATOR_BANDS,
            Role::Chaser => &CHASER_BANDS,
        }
    }

    pub fn mode_scheme(self) -> &'static CategoryScheme {
        match self {
            Role::Activator => &ACTIVATOR_MODES,
            Role::Chaser => &CHASER_MODES,
        }
    }
}

/// One completed activation as reported by the activator log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivationRecord {
    pub summit_code: Option<String>,
    pub summit_name: Option<String>,
    /// Raw "YYYY-MM-DD" string; parsed on demand.
    pub activation_date: Option<String>,
    /// Season running total at the time of this activation.
    pub total: i64,
    pub qsos: Option<u64>,
    pub band_qsos: BTreeMap<&'static str, u64>,
    pub mode_qsos: BTreeMap<&'static str, u64>,
}

/// One contact logged in the chaser role.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChaserContact {
    pub band: Option<String>,
    pub mode: Option<String>,
    pub summit_code: Option<String>,
    pub points: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: u64,
}

/// Non-zero categories in canonical scheme order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Distribution {
    pub rows: Vec<CategoryCount>,
    /// First row holding the maximum count; `None` when `rows` is empty.
    pub top: Option<CategoryCount>,
}

impl Distribution {
    pub fn top_label(&self) -> Option<&str> {
        self.top.as_ref().map(|top| top.label.as_str())
    }

    pub fn top_count(&self) -> u64 {
        self.top.as_ref().map_or(0, |top| top.count)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Season {
    Summer,
    Winter,
    Awesome,
}

impl Season {
    pub fn from_month(month: u32) -> Self {
        match month {
            5..=8 => Season::Summer,
            12 | 1 | 2 => Season::Winter,
            _ => Season::Awesome,
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Season::Summer => "Summer",
            Season::Winter => "Winter",
            Season::Awesome => "Awesome",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BusiestMonth {
    /// e.g. "June 2025".
    pub label: String,
    pub season: Season,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QsoStats {
    pub qso_total: u64,
    pub activation_count: usize,
    pub average: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PercentileBucket {
    #[serde(rename = "Top 10%")]
    Top10,
    #[serde(rename = "Top 20%")]
    Top20,
    #[serde(rename = "Top 30%")]
    Top30,
    #[serde(rename = "Top 50%")]
    Top50,
    #[serde(rename = "Below Top 50%")]
    BelowTop50,
}

impl PercentileBucket {
    pub fn from_percentile(percentile: f64) -> Self {
        if percentile <= 10.0 {
            PercentileBucket::Top10
        } else if percentile <= 20.0 {
            PercentileBucket::Top20
        } else if percentile <= 30.0 {
            PercentileBucket::Top30
        } else if percentile <= 50.0 {
            PercentileBucket::Top50
        } else {
            PercentileBucket::BelowTop50
        }
    }
}

impl fmt::Display for PercentileBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PercentileBucket::Top10 => "Top 10%",
            PercentileBucket::Top20 => "Top 20%",
            PercentileBucket::Top30 => "Top 30%",
            PercentileBucket::Top50 => "Top 50%",
            PercentileBucket::BelowTop50 => "Below Top 50%",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PercentileResult {
    pub percentile: f64,
    pub bucket: PercentileBucket,
}

/// Rounds to `places` decimals, exact halves going to the even digit.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round_ties_even() / factor
}
