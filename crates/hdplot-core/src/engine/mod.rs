//! # Engine Module
//!
//! The logic that turns a docking run on disk into a [`ResultTable`](crate::core::models::table::ResultTable).
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Extraction parameters and their validating builder
//! - **Error Handling** ([`error`]) - The error taxonomy shared by all workflows
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events
//! - **Population Filter** ([`population`]) - Cluster membership and the population threshold
//! - **Desolvation Join** ([`join`]) - Per-structure lookup of desolvation energies
//! - **Assembly** ([`assembly`]) - Column selection, join and scoring of one cluster

pub mod assembly;
pub mod config;
pub mod error;
pub mod join;
pub mod population;
pub mod progress;
