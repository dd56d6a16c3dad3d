//! Figure description and chart rendering.
//!
//! Planning code builds a [`Figure`](figure::Figure) and hands it, together with an
//! explicit [`StyleConfig`](style::StyleConfig), to a [`ChartRenderer`]. The
//! [`chart`] module provides the `plotters` implementation.

pub mod chart;
pub mod figure;
pub mod style;

use crate::engine::error::EngineError;
use figure::Figure;
use style::StyleConfig;

/// Draws a planned figure to its output file.
pub trait ChartRenderer: Sync {
    fn render(&self, figure: &Figure, style: &StyleConfig) -> Result<(), EngineError>;
}
