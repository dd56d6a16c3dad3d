use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

const COMMENT_PREFIX: char = '#';

/// Reads the cluster identifiers listed in a `cluster_rmsd.txt` file.
///
/// Every line that does not start with `#` names one cluster through its first
/// whitespace-separated token. Blank lines are ignored and a repeated identifier keeps
/// the position of its first occurrence.
pub fn read_cluster_ids(reader: impl BufRead) -> io::Result<Vec<String>> {
    let mut seen = HashSet::new();
    let mut ids = Vec::new();

    for line in reader.lines() {
        let line = line?;
        if line.starts_with(COMMENT_PREFIX) {
            continue;
        }
        let Some(id) = line.split_whitespace().next() else {
            continue;
        };
        if seen.insert(id.to_string()) {
            ids.push(id.to_string());
        }
    }

    Ok(ids)
}

pub fn read_cluster_ids_from_path<P: AsRef<Path>>(path: P) -> io::Result<Vec<String>> {
    let file = File::open(path)?;
    read_cluster_ids(BufReader::new(file))
}

/// Counts the lines of a per-cluster member list; the count is the cluster population.
pub fn count_members(reader: impl BufRead) -> io::Result<usize> {
    let mut count = 0;
    for line in reader.lines() {
        line?;
        count += 1;
    }
    Ok(count)
}

pub fn count_members_from_path<P: AsRef<Path>>(path: P) -> io::Result<usize> {
    let file = File::open(path)?;
    count_members(BufReader::new(file))
}
