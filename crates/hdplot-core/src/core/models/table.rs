use super::record::StructureRecord;
use crate::core::columns;

/// The extracted statistics of one docking run.
///
/// Column layout: `cluster`, `#Structure`, the term columns in order, `HADDOCK_score`.
/// Records keep the order of their clusters in the membership list and, within a
/// cluster, the row order of its `.stat` file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultTable {
    term_columns: Vec<String>,
    records: Vec<StructureRecord>,
}

impl ResultTable {
    pub fn new(term_columns: Vec<String>) -> Self {
        Self {
            term_columns,
            records: Vec::new(),
        }
    }

    pub fn with_records(term_columns: Vec<String>, records: Vec<StructureRecord>) -> Self {
        Self {
            term_columns,
            records,
        }
    }

    pub fn columns(&self) -> Vec<&str> {
        let mut cols = Vec::with_capacity(self.term_columns.len() + 3);
        cols.push(columns::CLUSTER);
        cols.push(columns::STRUCTURE);
        cols.extend(self.term_columns.iter().map(String::as_str));
        cols.push(columns::HADDOCK_SCORE);
        cols
    }

    pub fn term_columns(&self) -> &[String] {
        &self.term_columns
    }

    pub fn records(&self) -> &[StructureRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns().contains(&column)
    }

    pub fn push(&mut self, record: StructureRecord) {
        debug_assert_eq!(record.terms.len(), self.term_columns.len());
        self.records.push(record);
    }

    /// Reads a numeric column value (a term column or `HADDOCK_score`) of `record`.
    pub fn value(&self, record: &StructureRecord, column: &str) -> Option<f64> {
        if column == columns::HADDOCK_SCORE {
            return Some(record.haddock_score);
        }
        let idx = self.term_columns.iter().position(|c| c == column)?;
        record.terms.get(idx).copied()
    }

    pub fn numeric_column(&self, column: &str) -> Option<Vec<f64>> {
        if !self.has_column(column) || column == columns::CLUSTER || column == columns::STRUCTURE {
            return None;
        }
        self.records
            .iter()
            .map(|r| self.value(r, column))
            .collect()
    }

    /// Cluster identifiers in order of first appearance.
    pub fn clusters(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for record in &self.records {
            if !seen.contains(&record.cluster.as_str()) {
                seen.push(record.cluster.as_str());
            }
        }
        seen
    }

    /// Number of records per cluster, in order of first appearance.
    pub fn cluster_sizes(&self) -> Vec<(&str, usize)> {
        let mut sizes: Vec<(&str, usize)> = Vec::new();
        for record in &self.records {
            match sizes.iter_mut().find(|(id, _)| *id == record.cluster) {
                Some((_, n)) => *n += 1,
                None => sizes.push((record.cluster.as_str(), 1)),
            }
        }
        sizes
    }

    pub fn records_of<'a>(&'a self, cluster: &'a str) -> impl Iterator<Item = &'a StructureRecord> {
        self.records.iter().filter(move |r| r.cluster == cluster)
    }

    /// Formats every column of `record` as text, in [`columns`](Self::columns) order.
    pub fn record_fields(&self, record: &StructureRecord) -> Vec<String> {
        let mut fields = Vec::with_capacity(record.terms.len() + 3);
        fields.push(record.cluster.clone());
        fields.push(record.structure.clone());
        fields.extend(record.terms.iter().map(|v| v.to_string()));
        fields.push(record.haddock_score.to_string());
        fields
    }

    /// Appends the records of `other`.
    ///
    /// Term columns missing on either side are added to the union (new ones after the
    /// existing ones) and filled with `NaN`.
    pub fn append(&mut self, other: ResultTable) {
        if other.term_columns == self.term_columns {
            self.records.extend(other.records);
            return;
        }

        let mut union = self.term_columns.clone();
        for column in &other.term_columns {
            if !union.contains(column) {
                union.push(column.clone());
            }
        }

        let remap = |columns: &[String], record: StructureRecord| -> StructureRecord {
            let terms = union
                .iter()
                .map(|name| {
                    columns
                        .iter()
                        .position(|c| c == name)
                        .map(|i| record.terms[i])
                        .unwrap_or(f64::NAN)
                })
                .collect();
            StructureRecord { terms, ..record }
        };

        let own = std::mem::take(&mut self.records);
        let mut records: Vec<StructureRecord> = own
            .into_iter()
            .map(|r| remap(&self.term_columns, r))
            .collect();
        records.extend(other.records.into_iter().map(|r| remap(&other.term_columns, r)));

        self.term_columns = union;
        self.records = records;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(cluster: &str, structure: &str, terms: &[f64], score: f64) -> StructureRecord {
        StructureRecord {
            cluster: cluster.into(),
            structure: structure.into(),
            terms: terms.to_vec(),
            haddock_score: score,
        }
    }

    fn terms(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn columns_start_with_cluster_and_end_with_score() {
        let table = ResultTable::new(terms(&["Evdw", "Eelec", "Edesolv"]));
        assert_eq!(
            table.columns(),
            vec!["cluster", "#Structure", "Evdw", "Eelec", "Edesolv", "HADDOCK_score"]
        );
        assert!(table.is_empty());
    }

    #[test]
    fn value_reads_terms_and_score() {
        let mut table = ResultTable::new(terms(&["Evdw", "BSA"]));
        table.push(record("c1", "m1.pdb", &[-10.0, 900.0], -42.0));
        let r = &table.records()[0];

        assert_eq!(table.value(r, "Evdw"), Some(-10.0));
        assert_eq!(table.value(r, "BSA"), Some(900.0));
        assert_eq!(table.value(r, "HADDOCK_score"), Some(-42.0));
        assert_eq!(table.value(r, "Eair"), None);
    }

    #[test]
    fn numeric_column_rejects_identifier_columns() {
        let mut table = ResultTable::new(terms(&["Evdw"]));
        table.push(record("c1", "m1.pdb", &[-1.0], -1.0));
        table.push(record("c1", "m2.pdb", &[-2.0], -2.0));

        assert_eq!(table.numeric_column("Evdw"), Some(vec![-1.0, -2.0]));
        assert_eq!(table.numeric_column("cluster"), None);
        assert_eq!(table.numeric_column("#Structure"), None);
        assert_eq!(table.numeric_column("missing"), None);
    }

    #[test]
    fn cluster_sizes_follow_first_appearance() {
        let mut table = ResultTable::new(terms(&["Evdw"]));
        for (c, s) in [("c2", "a"), ("c1", "b"), ("c2", "c"), ("c1", "d"), ("c2", "e")] {
            table.push(record(c, s, &[0.0], 0.0));
        }

        assert_eq!(table.clusters(), vec!["c2", "c1"]);
        assert_eq!(table.cluster_sizes(), vec![("c2", 3), ("c1", 2)]);
        assert_eq!(table.records_of("c1").count(), 2);
    }

    #[test]
    fn record_fields_follow_column_order() {
        let table = ResultTable::new(terms(&["Evdw", "Eelec"]));
        let r = record("c1", "m1.pdb", &[-1.5, 2.0], -1.1);
        assert_eq!(
            table.record_fields(&r),
            vec!["c1", "m1.pdb", "-1.5", "2", "-1.1"]
        );
    }

    #[test]
    fn append_with_identical_columns_concatenates() {
        let mut a = ResultTable::new(terms(&["Evdw"]));
        a.push(record("c1", "m1", &[1.0], 1.0));
        let mut b = ResultTable::new(terms(&["Evdw"]));
        b.push(record("c2", "m2", &[2.0], 2.0));

        a.append(b);
        assert_eq!(a.len(), 2);
        assert_eq!(a.records()[1].cluster, "c2");
    }

    #[test]
    fn append_with_different_columns_builds_union() {
        let mut a = ResultTable::new(terms(&["Evdw", "BSA"]));
        a.push(record("c1", "m1", &[1.0, 10.0], 1.0));
        let mut b = ResultTable::new(terms(&["Evdw", "dH"]));
        b.push(record("c2", "m2", &[2.0, 5.0], 2.0));

        a.append(b);
        assert_eq!(a.term_columns(), &["Evdw", "BSA", "dH"]);
        assert_eq!(a.records()[0].terms[..2], [1.0, 10.0]);
        assert!(a.records()[0].terms[2].is_nan());
        assert_eq!(a.records()[1].terms[0], 2.0);
        assert!(a.records()[1].terms[1].is_nan());
        assert_eq!(a.records()[1].terms[2], 5.0);
    }
}
