use serde::Serialize;

use super::{BookRecord, Fine};

/// A checked-out book that is past due, with the fine owed so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverdueEntry {
    pub record: BookRecord,
    pub days_overdue: u64,
    pub fine: Fine,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OverdueReport {
    pub entries: Vec<OverdueEntry>,
    pub total_fine: Fine,
}

impl OverdueReport {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
