//! Provides readers for the plain-text files found in a HADDOCK water-refinement
//! directory.
//!
//! HADDOCK writes two kinds of files that matter here: whitespace-delimited tables with
//! a header line (`<cluster>.stat`, `<cluster>_Edesolv`) and line-oriented membership
//! lists (`cluster_rmsd.txt` and one member list per cluster).

pub mod membership;
pub mod table;
