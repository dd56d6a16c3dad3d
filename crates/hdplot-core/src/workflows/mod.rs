//! # Workflows Module
//!
//! The public entry points of the library.
//!
//! - **Extraction** ([`extract`]) - Scans HADDOCK docking roots, filters clusters by
//!   population and assembles one statistics table per run.
//! - **Plotting** ([`plot`]) - Melts the extracted tables into long form, plans the
//!   box-and-strip figures and hands them to a chart renderer.

pub mod extract;
pub mod plot;
