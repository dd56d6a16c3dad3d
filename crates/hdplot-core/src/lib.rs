//! # hdplot Core Library
//!
//! A library for turning the water-refinement output of HADDOCK docking runs into
//! per-cluster statistics tables and comparative box-and-strip charts.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture to keep parsing, data assembly and
//! user-facing procedures apart.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`DockingRun`, `Cluster`,
//!   `ResultTable`), readers for the whitespace-delimited tables and membership lists
//!   written by HADDOCK, the HADDOCK scoring function, descriptive statistics and the
//!   chart-rendering seam.
//!
//! - **[`engine`]: The Logic Core.** Extraction configuration, the error taxonomy,
//!   progress reporting, the indexed desolvation join and the assembly of per-cluster
//!   tables.
//!
//! - **[`workflows`]: The Public API.** Complete procedures: [`workflows::extract`]
//!   scans docking roots and returns the per-run tables, [`workflows::plot`] turns those
//!   tables into figures and hands them to a [`core::render::ChartRenderer`].

pub mod core;
pub mod engine;
pub mod workflows;
