//! # Core Module
//!
//! Fundamental building blocks for reading HADDOCK docking results and describing
//! them as tables and figures.
//!
//! ## Architecture
//!
//! - **Data Models** ([`models`]) - Docking runs, clusters, structure records and the
//!   per-run result tables
//! - **File I/O** ([`io`]) - Whitespace-delimited statistics tables and cluster
//!   membership lists
//! - **Column Vocabulary** ([`columns`]) - Names of the HADDOCK statistics columns the
//!   pipeline relies on or discards
//! - **Scoring** ([`scoring`]) - The water-refinement HADDOCK score
//! - **Statistics** ([`stats`]) - Box-plot summaries of value distributions
//! - **Rendering** ([`render`]) - Figure description, style configuration and the
//!   `plotters` chart backend

pub mod columns;
pub mod io;
pub mod models;
pub mod render;
pub mod scoring;
pub mod stats;
