//! Lending policy and file locations.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::models::Fine;

pub const DEFAULT_LOAN_PERIOD_DAYS: u32 = 14;
pub const DEFAULT_FINE_CENTS_PER_DAY: u64 = 50;
pub const DATA_FILE_NAME: &str = "library_books.csv";
pub const REPORT_DIR_NAME: &str = "reports";

/// Loan length and late fee. Changing policy never touches lending logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LendingPolicy {
    pub loan_period_days: u32,
    pub fine_per_day: Fine,
}

impl Default for LendingPolicy {
    fn default() -> Self {
        Self {
            loan_period_days: DEFAULT_LOAN_PERIOD_DAYS,
            fine_per_day: Fine::from_cents(DEFAULT_FINE_CENTS_PER_DAY),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryConfig {
    pub data_file: PathBuf,
    pub report_dir: PathBuf,
    pub policy: LendingPolicy,
}

impl LibraryConfig {
    /// Keep the data file and reports together under `root`.
    pub fn in_dir(root: &Path) -> Self {
        Self {
            data_file: root.join(DATA_FILE_NAME),
            report_dir: root.join(REPORT_DIR_NAME),
            policy: LendingPolicy::default(),
        }
    }

    /// Platform data directory (e.g. `~/.local/share/shelfmark`), falling
    /// back to the working directory when no home directory is known.
    pub fn from_default_dirs() -> Self {
        match default_data_dir() {
            Some(dir) => Self::in_dir(&dir),
            None => Self::in_dir(Path::new(".")),
        }
    }
}

fn default_data_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "shelfmark").map(|dirs| dirs.data_dir().to_path_buf())
}
