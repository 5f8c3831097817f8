//! CLI for the PDD parallel directory downloader.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use pdd_core::checksum;
use pdd_core::config;
use pdd_core::job::{self, JobOptions};
use pdd_core::remote::{HdfsClient, RemoteClient};

/// Fetch every file under a remote directory, in parallel.
#[derive(Debug, Parser)]
#[command(name = "pdd")]
#[command(about = "PDD: parallel remote-directory fetcher with single-file merge", long_about = None)]
pub struct Cli {
    /// Remote directory to fetch (e.g. /data/logs/2024-01-01).
    pub input: String,

    /// Local output directory, or the output file with --merge.
    pub output: PathBuf,

    /// Number of concurrent fetch workers (config default: 10).
    #[arg(short = 'p', long = "parallel", value_name = "N", value_parser = parse_workers)]
    pub parallel: Option<usize>,

    /// Concatenate all fetched files into a single output file, in listing order.
    #[arg(short = 'm', long = "merge")]
    pub merge: bool,

    /// Stage merge scratch files under this directory instead of the platform
    /// temp location.
    #[arg(long = "scratch-dir", value_name = "DIR")]
    pub scratch_dir: Option<PathBuf>,

    /// Print the SHA-256 of the merged output when done.
    #[arg(long, requires = "merge")]
    pub checksum: bool,
}

fn parse_workers(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("invalid worker count: {s}"))?;
    if n == 0 {
        return Err("worker count must be at least 1".to_string());
    }
    Ok(n)
}

pub fn run_from_args() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_or_init()?;
    tracing::debug!("loaded config: {:?}", cfg);

    let opts = JobOptions {
        workers: cli.parallel.unwrap_or(cfg.workers),
        merge: cli.merge,
        scratch_dir: cli.scratch_dir.clone().or_else(|| cfg.scratch_dir.clone()),
    };
    let client: Arc<dyn RemoteClient> = Arc::new(HdfsClient::with_bin(&cfg.hdfs_bin));

    tracing::info!(
        input = %cli.input,
        output = %cli.output.display(),
        workers = opts.workers,
        merge = opts.merge,
        "starting fetch"
    );
    let summary = job::run_job(client, &cli.input, &cli.output, &opts)?;

    match summary.merged_bytes {
        Some(bytes) => println!(
            "Merged {} file(s) ({} bytes) into {}",
            summary.files,
            bytes,
            cli.output.display()
        ),
        None => println!(
            "Fetched {} file(s) into {}",
            summary.files,
            cli.output.display()
        ),
    }
    if cli.checksum {
        let digest = checksum::sha256_file(&cli.output)?;
        println!("{}  {}", digest, cli.output.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_positionals_required() {
        assert!(Cli::try_parse_from(["pdd"]).is_err());
        assert!(Cli::try_parse_from(["pdd", "/in"]).is_err());
        assert!(Cli::try_parse_from(["pdd", "/in", "out"]).is_ok());
    }

    #[test]
    fn defaults_are_plain_mode_with_no_overrides() {
        let cli = Cli::try_parse_from(["pdd", "/in", "out"]).unwrap();
        assert_eq!(cli.input, "/in");
        assert_eq!(cli.output, PathBuf::from("out"));
        assert!(!cli.merge);
        assert_eq!(cli.parallel, None);
        assert!(!cli.checksum);
        assert!(cli.scratch_dir.is_none());
    }

    #[test]
    fn parallel_and_merge_flags() {
        let cli = Cli::try_parse_from(["pdd", "-m", "-p", "4", "/in", "out.bin"]).unwrap();
        assert!(cli.merge);
        assert_eq!(cli.parallel, Some(4));
    }

    #[test]
    fn zero_workers_rejected() {
        assert!(Cli::try_parse_from(["pdd", "-p", "0", "/in", "out"]).is_err());
    }

    #[test]
    fn checksum_requires_merge() {
        assert!(Cli::try_parse_from(["pdd", "--checksum", "/in", "out"]).is_err());
        assert!(Cli::try_parse_from(["pdd", "--checksum", "--merge", "/in", "out"]).is_ok());
    }

    #[test]
    fn scratch_dir_flag() {
        let cli =
            Cli::try_parse_from(["pdd", "-m", "--scratch-dir", "/mnt/spill", "/in", "out"])
                .unwrap();
        assert_eq!(cli.scratch_dir, Some(PathBuf::from("/mnt/spill")));
    }
}
