use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::config::ConfigError;
use crate::core::io::table::TableError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("The directory {} does not exist.", path.display())]
    MissingRunDirectory { path: PathBuf },

    #[error("Failed to read '{}': {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed file '{}': {source}", path.display())]
    MalformedTable {
        path: PathBuf,
        #[source]
        source: TableError,
    },

    #[error(
        "Structure '{structure}' has {matches} desolvation entries in '{}' (expected exactly one)",
        path.display()
    )]
    AmbiguousJoin {
        path: PathBuf,
        structure: String,
        matches: usize,
    },

    #[error("Column '{column}' is not present in the result table")]
    MissingColumn { column: String },

    #[error("Unknown {kind} '{value}'. Allowed: {allowed}")]
    InvalidMode {
        kind: &'static str,
        value: String,
        allowed: &'static str,
    },

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to render figure '{}': {message}", path.display())]
    Render { path: PathBuf, message: String },
}

impl EngineError {
    pub(crate) fn file_access(path: &Path, source: io::Error) -> Self {
        Self::FileAccess {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Attributes a table error to `path`, keeping I/O failures apart from malformed content.
    pub(crate) fn table(path: &Path, source: TableError) -> Self {
        match source {
            TableError::Io(e) => Self::file_access(path, e),
            other => Self::MalformedTable {
                path: path.to_path_buf(),
                source: other,
            },
        }
    }

    /// Returns `true` for the only condition extraction absorbs instead of propagating.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::MissingRunDirectory { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_io_errors_become_file_access() {
        let err = EngineError::table(
            Path::new("w/c1.stat"),
            TableError::Io(io::Error::new(io::ErrorKind::NotFound, "gone")),
        );
        assert!(matches!(err, EngineError::FileAccess { ref path, .. } if path == Path::new("w/c1.stat")));
    }

    #[test]
    fn other_table_errors_become_malformed_table() {
        let err = EngineError::table(Path::new("w/c1.stat"), TableError::MissingHeader);
        assert!(matches!(
            err,
            EngineError::MalformedTable {
                source: TableError::MissingHeader,
                ..
            }
        ));
    }

    #[test]
    fn missing_run_directory_message_names_the_directory() {
        let err = EngineError::MissingRunDirectory {
            path: PathBuf::from("run1/structures/it1/water"),
        };
        assert_eq!(
            err.to_string(),
            "The directory run1/structures/it1/water does not exist."
        );
        assert!(err.is_recoverable());
    }

    #[test]
    fn join_errors_are_fatal() {
        let err = EngineError::AmbiguousJoin {
            path: PathBuf::from("c1_Edesolv"),
            structure: "m1.pdb".into(),
            matches: 0,
        };
        assert!(!err.is_recoverable());
        assert!(err.to_string().contains("m1.pdb"));
    }
}
