use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use crate::error::AppResult;
use crate::models::{CsvInteraction, Interaction};

/// Immutable in-memory interaction log
///
/// View events are grouped by profile into sets of distinct product ids, so
/// repeated (profile, product) rows in the source file are idempotent.
pub struct InteractionLog {
    records: Vec<Interaction>,
    by_profile: HashMap<u32, BTreeSet<u32>>,
}

impl InteractionLog {
    /// Loads the interaction log from a CSV file
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let reader = csv::Reader::from_path(path)?;
        Self::from_csv(reader)
    }

    fn from_csv<R: std::io::Read>(mut reader: csv::Reader<R>) -> AppResult<Self> {
        let mut records = Vec::new();
        for row in reader.deserialize() {
            let row: CsvInteraction = row?;
            records.push(Interaction::from(row));
        }
        Ok(Self::from_records(records))
    }

    /// Builds a log from already-constructed view events
    pub fn from_records(records: Vec<Interaction>) -> Self {
        let mut by_profile: HashMap<u32, BTreeSet<u32>> = HashMap::new();
        for record in &records {
            by_profile
                .entry(record.profile_id)
                .or_default()
                .insert(record.product_id);
        }

        Self {
            records,
            by_profile,
        }
    }

    /// Distinct product ids viewed by the given profile, if it has any
    pub fn history(&self, profile_id: u32) -> Option<&BTreeSet<u32>> {
        self.by_profile.get(&profile_id)
    }

    /// All profiles with at least one view event, with their histories
    pub fn profiles(&self) -> impl Iterator<Item = (u32, &BTreeSet<u32>)> {
        self.by_profile.iter().map(|(id, history)| (*id, history))
    }

    /// All raw view events in file order
    pub fn records(&self) -> &[Interaction] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
