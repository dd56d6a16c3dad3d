use crate::archive::{ArchiveFetcher, FetchProgress};
use crate::cli::FetchArgs;
use crate::error::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

pub async fn run(args: FetchArgs) -> Result<()> {
    let fetcher = ArchiveFetcher::new(&args.dest, args.keep_archive);

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-"),
    );
    pb.set_draw_target(indicatif::ProgressDrawTarget::stderr_with_hz(2));

    println!("Fetching {} into: {}", args.url, fetcher.dest().display());

    let progress_callback = |progress: FetchProgress| match progress {
        FetchProgress::DownloadStarted { total_size } => {
            if let Some(size) = total_size {
                pb.set_length(size);
            }
            pb.set_message("Downloading...");
        }
        FetchProgress::Downloading { downloaded } => {
            pb.set_position(downloaded);
        }
        FetchProgress::Unpacking => {
            pb.set_style(
                ProgressStyle::with_template("{spinner:.green} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb.set_message("Unpacking archive...");
        }
    };

    match fetcher.fetch(&args.url, progress_callback).await {
        Ok(archive) => {
            pb.finish_with_message("✓ Download and unpacking complete.");
            if args.keep_archive {
                info!("Keeping archive {:?}", &archive);
                println!("Archive kept at: {}", archive.display());
            }
            Ok(())
        }
        Err(e) => {
            pb.finish_with_message("✗ Fetch failed.");
            Err(e)
        }
    }
}
