use super::error::EngineError;
use super::join::DesolvationIndex;
use crate::core::columns;
use crate::core::io::table::{TableError, WhitespaceTable, parse_number};
use crate::core::models::cluster::Cluster;
use crate::core::models::record::StructureRecord;
use crate::core::models::run::DockingRun;
use crate::core::models::table::ResultTable;
use crate::core::scoring;
use std::path::Path;
use tracing::debug;

/// Where each term column of the output takes its values from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TermSource {
    Stat(usize),
    Desolvation,
}

/// Output term columns of a `.stat` header with their sources.
#[derive(Debug)]
struct TermLayout {
    names: Vec<String>,
    sources: Vec<TermSource>,
    structure_idx: usize,
    evdw: usize,
    eelec: usize,
    edesolv: usize,
    eair: usize,
}

impl TermLayout {
    fn from_header(header: &[String]) -> Result<Self, TableError> {
        let position = |name: &str| {
            header
                .iter()
                .position(|c| c == name)
                .ok_or_else(|| TableError::MissingColumn(name.to_string()))
        };

        for required in columns::REQUIRED_STAT_COLUMNS {
            position(required)?;
        }
        for dropped in columns::DROPPED_COLUMNS {
            position(dropped)?;
        }
        let structure_idx = position(columns::STRUCTURE)?;

        let mut names = Vec::with_capacity(header.len());
        let mut sources = Vec::with_capacity(header.len());
        for (idx, name) in header.iter().enumerate() {
            if idx == structure_idx || columns::is_dropped(name) {
                continue;
            }
            names.push(name.clone());
            sources.push(if name == columns::EDESOLV {
                TermSource::Desolvation
            } else {
                TermSource::Stat(idx)
            });
        }
        if !sources.contains(&TermSource::Desolvation) {
            names.push(columns::EDESOLV.to_string());
            sources.push(TermSource::Desolvation);
        }

        let term = |name: &str| {
            names
                .iter()
                .position(|c| c == name)
                .ok_or_else(|| TableError::MissingColumn(name.to_string()))
        };
        let evdw = term(columns::EVDW)?;
        let eelec = term(columns::EELEC)?;
        let edesolv = term(columns::EDESOLV)?;
        let eair = term(columns::EAIR)?;

        Ok(Self {
            names,
            sources,
            structure_idx,
            evdw,
            eelec,
            edesolv,
            eair,
        })
    }
}

/// Builds the rows of one retained cluster from its `.stat` and `_Edesolv` tables.
pub fn assemble_cluster(run: &DockingRun, cluster: &Cluster) -> Result<ResultTable, EngineError> {
    let stat_path = run.stat_path(&cluster.id);
    let stat = WhitespaceTable::read_from_path(&stat_path)
        .map_err(|e| EngineError::table(&stat_path, e))?;
    let desolvation = DesolvationIndex::load(&run.desolvation_path(&cluster.id))?;

    let table = assemble_from_tables(&cluster.id, &stat, &stat_path, &desolvation)?;
    debug!(
        cluster = %cluster.id,
        structures = table.len(),
        "Assembled cluster statistics."
    );
    Ok(table)
}

/// Joins a parsed `.stat` table with its desolvation index.
pub fn assemble_from_tables(
    cluster_id: &str,
    stat: &WhitespaceTable,
    stat_path: &Path,
    desolvation: &DesolvationIndex,
) -> Result<ResultTable, EngineError> {
    let layout =
        TermLayout::from_header(stat.header()).map_err(|e| EngineError::table(stat_path, e))?;

    let mut table = ResultTable::new(layout.names.clone());
    for row in stat.rows() {
        let structure = &row.fields[layout.structure_idx];
        let edesolv = desolvation.lookup(structure)?;

        let terms = layout
            .sources
            .iter()
            .zip(&layout.names)
            .map(|(source, name)| match *source {
                TermSource::Stat(idx) => parse_number(row, idx, name),
                TermSource::Desolvation => Ok(edesolv),
            })
            .collect::<Result<Vec<f64>, TableError>>()
            .map_err(|e| EngineError::table(stat_path, e))?;

        let haddock_score = scoring::haddock_score(
            terms[layout.evdw],
            terms[layout.eelec],
            terms[layout.edesolv],
            terms[layout.eair],
        );

        table.push(StructureRecord {
            cluster: cluster_id.to_string(),
            structure: structure.clone(),
            terms,
            haddock_score,
        });
    }

    Ok(table)
}
