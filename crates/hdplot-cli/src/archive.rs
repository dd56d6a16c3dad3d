use crate::error::{CliError, Result};
use flate2::read::GzDecoder;
use futures_util::StreamExt;
use std::fs::{self, File};
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const DEFAULT_ARCHIVE_SUFFIX: &str = ".tgz";
const ARCHIVE_SUFFIXES: [&str; 5] = [".tgz", ".tar.gz", ".tar.zst", ".tzst", ".tar"];

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const ZSTD_MAGIC: [u8; 4] = [0x28, 0xb5, 0x2f, 0xfd];

#[derive(Debug, Clone, Copy)]
pub enum FetchProgress {
    DownloadStarted { total_size: Option<u64> },
    Downloading { downloaded: u64 },
    Unpacking,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    Gzip,
    Zstd,
    Tar,
}

impl ArchiveKind {
    pub fn detect(header: &[u8]) -> Self {
        if header.starts_with(&GZIP_MAGIC) {
            ArchiveKind::Gzip
        } else if header.starts_with(&ZSTD_MAGIC) {
            ArchiveKind::Zstd
        } else {
            ArchiveKind::Tar
        }
    }
}

/// Appends the default archive suffix unless `url` already names an archive.
pub fn archive_url(url: &str) -> String {
    let trimmed = url.trim_end_matches('/');
    if ARCHIVE_SUFFIXES.iter().any(|s| trimmed.ends_with(s)) {
        trimmed.to_string()
    } else {
        format!("{}{}", trimmed, DEFAULT_ARCHIVE_SUFFIX)
    }
}

/// File name of the downloaded archive: the last path segment of `url`, query stripped.
pub fn archive_file_name(url: &str) -> Result<String> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    match path.rsplit('/').next() {
        Some(name) if !name.is_empty() && !path.ends_with("://") => Ok(name.to_string()),
        _ => Err(CliError::Argument(format!(
            "Cannot derive an archive name from '{}'",
            url
        ))),
    }
}

/// Rejects an HTTP error status before anything is written to disk.
pub fn check_status(url: &str, status: reqwest::StatusCode) -> Result<()> {
    if status.is_success() {
        Ok(())
    } else {
        Err(CliError::Fetch(format!("{} answered with status {}", url, status)))
    }
}

#[derive(Debug)]
pub struct ArchiveFetcher {
    dest: PathBuf,
    keep_archive: bool,
}

impl ArchiveFetcher {
    pub fn new(dest: impl Into<PathBuf>, keep_archive: bool) -> Self {
        Self {
            dest: dest.into(),
            keep_archive,
        }
    }

    pub fn dest(&self) -> &Path {
        &self.dest
    }

    /// Downloads the archive behind `url` into the destination and unpacks it there.
    ///
    /// Returns the archive path, which no longer exists unless the archive is kept.
    pub async fn fetch(
        &self,
        url: &str,
        mut progress_callback: impl FnMut(FetchProgress),
    ) -> Result<PathBuf> {
        let url = archive_url(url);
        let archive_path = self.dest.join(archive_file_name(&url)?);
        fs::create_dir_all(&self.dest)?;

        info!("Sending request to {}", url);
        let client = reqwest::Client::new();
        let response = client.get(&url).send().await?;
        check_status(&url, response.status())?;

        let total_size = response.content_length();
        progress_callback(FetchProgress::DownloadStarted { total_size });

        let mut file = File::create(&archive_path)?;
        let mut downloaded: u64 = 0;
        let mut stream = response.bytes_stream();
        while let Some(item) = stream.next().await {
            let chunk = item?;
            file.write_all(&chunk)?;
            downloaded += chunk.len() as u64;
            progress_callback(FetchProgress::Downloading { downloaded });
        }
        file.flush()?;
        drop(file);
        if downloaded == 0 {
            fs::remove_file(&archive_path)?;
            return Err(CliError::Fetch(format!("{} returned an empty archive", url)));
        }
        debug!(bytes = downloaded, path = %archive_path.display(), "Archive downloaded.");

        progress_callback(FetchProgress::Unpacking);
        info!("Download complete. Decompressing and unpacking archive...");
        let kind = unpack(&archive_path, &self.dest)?;
        info!(?kind, "Archive unpacked to {:?}", &self.dest);

        if !self.keep_archive {
            fs::remove_file(&archive_path)?;
            debug!("Removed archive {:?}", &archive_path);
        }
        Ok(archive_path)
    }
}

/// Unpacks a gzip, zstd or plain tar archive into `dest`.
pub fn unpack(archive: &Path, dest: &Path) -> Result<ArchiveKind> {
    let mut header = [0u8; 4];
    let read = File::open(archive)?.read(&mut header)?;
    let kind = ArchiveKind::detect(&header[..read]);

    let reader = BufReader::new(File::open(archive)?);
    let fail = |e: std::io::Error| CliError::FileParsing {
        path: archive.to_path_buf(),
        source: e.into(),
    };
    match kind {
        ArchiveKind::Gzip => tar::Archive::new(GzDecoder::new(reader))
            .unpack(dest)
            .map_err(fail)?,
        ArchiveKind::Zstd => tar::Archive::new(zstd::stream::read::Decoder::new(reader)?)
            .unpack(dest)
            .map_err(fail)?,
        ArchiveKind::Tar => tar::Archive::new(reader).unpack(dest).map_err(fail)?,
    }
    Ok(kind)
}
