use super::table::ResultTable;
use std::path::PathBuf;

/// A docking root that was left out because its water-refinement directory is missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRun {
    pub root: PathBuf,
    pub water_dir: PathBuf,
}

/// Result of an extraction: sanitized run key to table, in insertion order.
///
/// A `None` value means the run was read but no cluster passed the population filter;
/// runs without a water-refinement directory have no entry at all and are listed in
/// [`skipped`](Self::skipped) instead.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClusterStats {
    entries: Vec<(String, Option<ResultTable>)>,
    skipped: Vec<SkippedRun>,
}

impl ClusterStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `table` under `key`.
    ///
    /// An existing key keeps its position and has its value replaced; the previous value
    /// is returned.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        table: Option<ResultTable>,
    ) -> Option<Option<ResultTable>> {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, table)),
            None => {
                self.entries.push((key, table));
                None
            }
        }
    }

    pub(crate) fn record_skip(&mut self, skipped: SkippedRun) {
        self.skipped.push(skipped);
    }

    /// Returns `None` if the key is absent, `Some(None)` if the run had no retained cluster.
    pub fn get(&self, key: &str) -> Option<Option<&ResultTable>> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, table)| table.as_ref())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&ResultTable>)> {
        self.entries.iter().map(|(k, t)| (k.as_str(), t.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn skipped(&self) -> &[SkippedRun] {
        &self.skipped
    }
}

impl IntoIterator for ClusterStats {
    type Item = (String, Option<ResultTable>);
    type IntoIter = std::vec::IntoIter<(String, Option<ResultTable>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
