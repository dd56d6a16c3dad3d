//! Data models describing docking runs and the statistics extracted from them.

pub mod cluster;
pub mod collection;
pub mod record;
pub mod run;
pub mod table;
