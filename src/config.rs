//! Locations of the on-disk reference data.

use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DATA_DIR_ENV: &str = "UNWRAPPED_DATA_DIR";

const HONOR_ROLL_FILE: &str = "honor_roll_2025.json";
const CHASER_HONOR_ROLL_FILE: &str = "chaser_honor_roll_2025.json";
const SUMMITS_LIST_FILE: &str = "summitslist.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub honor_roll: PathBuf,
    pub chaser_honor_roll: PathBuf,
    pub summits_list: PathBuf,
}

impl DataPaths {
    pub fn from_data_dir(dir: &Path) -> Self {
        Self {
            honor_roll: dir.join(HONOR_ROLL_FILE),
            chaser_honor_roll: dir.join(CHASER_HONOR_ROLL_FILE),
            summits_list: dir.join(SUMMITS_LIST_FILE),
        }
    }
}

impl Default for DataPaths {
    fn default() -> Self {
        Self::from_data_dir(Path::new(DEFAULT_DATA_DIR))
    }
}
