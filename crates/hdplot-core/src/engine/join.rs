use super::error::EngineError;
use crate::core::columns;
use crate::core::io::table::{WhitespaceTable, parse_number};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Desolvation energies of one cluster, keyed by structure identifier.
///
/// Every identifier maps to all values found for it so that a lookup can tell a missing
/// structure apart from a duplicated one.
#[derive(Debug, Clone)]
pub struct DesolvationIndex {
    source: PathBuf,
    values: HashMap<String, Vec<f64>>,
}

impl DesolvationIndex {
    /// Indexes the `#struc` and `Edesolv` columns of a `<cluster>_Edesolv` table.
    pub fn from_table(table: &WhitespaceTable, source: &Path) -> Result<Self, EngineError> {
        let key_idx = table
            .column_index(columns::DESOLV_STRUCTURE)
            .map_err(|e| EngineError::table(source, e))?;
        let value_idx = table
            .column_index(columns::EDESOLV)
            .map_err(|e| EngineError::table(source, e))?;

        let mut values: HashMap<String, Vec<f64>> = HashMap::with_capacity(table.len());
        for row in table.rows() {
            let value = parse_number(row, value_idx, columns::EDESOLV)
                .map_err(|e| EngineError::table(source, e))?;
            values
                .entry(row.fields[key_idx].clone())
                .or_default()
                .push(value);
        }

        Ok(Self {
            source: source.to_path_buf(),
            values,
        })
    }

    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let table = WhitespaceTable::read_from_path(path).map_err(|e| EngineError::table(path, e))?;
        Self::from_table(&table, path)
    }

    /// Returns the single desolvation energy of `structure`.
    ///
    /// # Errors
    ///
    /// [`EngineError::AmbiguousJoin`] when the structure has no entry or more than one.
    pub fn lookup(&self, structure: &str) -> Result<f64, EngineError> {
        match self.values.get(structure).map(Vec::as_slice) {
            Some([value]) => Ok(*value),
            other => Err(EngineError::AmbiguousJoin {
                path: self.source.clone(),
                structure: structure.to_string(),
                matches: other.map_or(0, <[f64]>::len),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
