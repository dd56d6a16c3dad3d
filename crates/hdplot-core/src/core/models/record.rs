/// One pose of a retained cluster with its energy terms and HADDOCK score.
///
/// `terms` is aligned with the term columns of the owning
/// [`ResultTable`](super::table::ResultTable).
#[derive(Debug, Clone, PartialEq)]
pub struct StructureRecord {
    pub cluster: String,
    pub structure: String,
    pub terms: Vec<f64>,
    pub haddock_score: f64,
}
