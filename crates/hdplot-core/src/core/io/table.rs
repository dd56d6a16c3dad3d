use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Table parsing error: {0}")]
    Csv(String),
    #[error("Table has no header line")]
    MissingHeader,
    #[error("Duplicate column '{0}' in header")]
    DuplicateColumn(String),
    #[error("Missing required column '{0}'")]
    MissingColumn(String),
    #[error("Line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        line: u64,
        expected: usize,
        found: usize,
    },
    #[error("Line {line}: invalid number '{value}' in column '{column}'")]
    InvalidNumber {
        line: u64,
        column: String,
        value: String,
    },
}

impl From<csv::Error> for TableError {
    fn from(err: csv::Error) -> Self {
        match err.into_kind() {
            csv::ErrorKind::Io(e) => TableError::Io(e),
            kind => TableError::Csv(format!("{:?}", kind)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub line: u64,
    pub fields: Vec<String>,
}

/// A whitespace-delimited table with a single header line.
///
/// Fields are separated by runs of spaces or tabs. Empty lines are skipped, and `#` has
/// no special meaning because HADDOCK headers start with it (`#Structure`, `#struc`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WhitespaceTable {
    header: Vec<String>,
    rows: Vec<TableRow>,
}

impl WhitespaceTable {
    pub fn read_from(reader: impl Read) -> Result<Self, TableError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(b' ')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut header: Option<Vec<String>> = None;
        let mut rows = Vec::new();

        for result in csv_reader.records() {
            let record = result?;
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            let fields: Vec<String> = record
                .iter()
                .flat_map(|field| field.split('\t'))
                .map(str::trim)
                .filter(|field| !field.is_empty())
                .map(String::from)
                .collect();

            if fields.is_empty() {
                continue;
            }

            match &header {
                None => {
                    let mut seen = HashSet::new();
                    for name in &fields {
                        if !seen.insert(name.as_str()) {
                            return Err(TableError::DuplicateColumn(name.clone()));
                        }
                    }
                    header = Some(fields);
                }
                Some(columns) => {
                    if fields.len() != columns.len() {
                        return Err(TableError::FieldCount {
                            line,
                            expected: columns.len(),
                            found: fields.len(),
                        });
                    }
                    rows.push(TableRow { line, fields });
                }
            }
        }

        let header = header.ok_or(TableError::MissingHeader)?;
        Ok(Self { header, rows })
    }

    pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self, TableError> {
        let file = File::open(path)?;
        Self::read_from(BufReader::new(file))
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.header.iter().any(|c| c == name)
    }

    pub fn column_index(&self, name: &str) -> Result<usize, TableError> {
        self.header
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| TableError::MissingColumn(name.to_string()))
    }

    pub fn text_column(&self, name: &str) -> Result<Vec<&str>, TableError> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(|r| r.fields[idx].as_str()).collect())
    }

    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>, TableError> {
        let idx = self.column_index(name)?;
        self.rows
            .iter()
            .map(|row| parse_number(row, idx, name))
            .collect()
    }
}

pub(crate) fn parse_number(row: &TableRow, idx: usize, column: &str) -> Result<f64, TableError> {
    let value = &row.fields[idx];
    value.parse::<f64>().map_err(|_| TableError::InvalidNumber {
        line: row.line,
        column: column.to_string(),
        value: value.clone(),
    })
}
