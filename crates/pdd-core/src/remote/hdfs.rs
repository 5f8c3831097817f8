//! Remote client that shells out to the Hadoop `hdfs dfs` CLI.

use std::path::Path;
use std::process::{Command, Output};

use super::{RemoteClient, RemoteError};

/// Wraps `hdfs dfs -ls` / `-get`. The binary name is configurable so
/// `hadoop` (with its `fs` alias for `dfs`) or a test shim can stand in.
pub struct HdfsClient {
    bin: String,
}

impl HdfsClient {
    pub fn new() -> Self {
        Self::with_bin("hdfs")
    }

    pub fn with_bin(bin: &str) -> Self {
        Self {
            bin: bin.to_string(),
        }
    }

    fn run(&self, args: &[&str]) -> Result<Output, RemoteError> {
        let command = format!("{} dfs {}", self.bin, args.join(" "));
        let output = Command::new(&self.bin)
            .arg("dfs")
            .args(args)
            .output()
            .map_err(|source| RemoteError::Spawn {
                command: command.clone(),
                source,
            })?;
        if !output.status.success() {
            return Err(RemoteError::CommandFailed {
                command,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output)
    }
}

impl Default for HdfsClient {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteClient for HdfsClient {
    fn list(&self, remote_path: &str) -> Result<Vec<String>, RemoteError> {
        let output = self.run(&["-ls", remote_path])?;
        parse_listing(&String::from_utf8_lossy(&output.stdout))
    }

    fn fetch(&self, remote_id: &str, local_dir: &Path) -> Result<(), RemoteError> {
        let dir = local_dir.to_string_lossy();
        self.run(&["-get", remote_id, dir.as_ref()])?;
        Ok(())
    }
}

/// Parses `hdfs dfs -ls` output: skips the `Found N items` banner and
/// directory rows, keeps file paths in printed order.
fn parse_listing(stdout: &str) -> Result<Vec<String>, RemoteError> {
    let mut files = Vec::new();
    for line in stdout.lines() {
        let line = line.trim_end();
        if line.is_empty() || line.starts_with("Found ") {
            continue;
        }
        // permissions, replication, owner, group, size, date, time, path
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 8 {
            return Err(RemoteError::Listing(line.to_string()));
        }
        if fields[0].starts_with('d') {
            continue;
        }
        files.push(fields[7..].join(" "));
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = "\
Found 4 items
-rw-r--r--   3 hdfs supergroup    1048576 2024-01-01 12:00 /data/logs/part-00000
-rw-r--r--   3 hdfs supergroup     524288 2024-01-01 12:00 /data/logs/part-00001
drwxr-xr-x   - hdfs supergroup          0 2024-01-01 12:00 /data/logs/_temporary
-rw-r--r--   3 hdfs supergroup          0 2024-01-01 12:01 /data/logs/_SUCCESS
";

    #[test]
    fn parse_listing_keeps_files_in_printed_order() {
        let files = parse_listing(LISTING).unwrap();
        assert_eq!(
            files,
            [
                "/data/logs/part-00000",
                "/data/logs/part-00001",
                "/data/logs/_SUCCESS"
            ]
        );
    }

    #[test]
    fn parse_listing_skips_directories_and_banner() {
        let files =
            parse_listing("Found 1 items\ndrwxr-xr-x   - u g 0 2024-01-01 12:00 /d\n").unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn parse_listing_empty_output() {
        assert!(parse_listing("").unwrap().is_empty());
    }

    #[test]
    fn parse_listing_rejects_malformed_rows() {
        assert!(matches!(
            parse_listing("not a listing row"),
            Err(RemoteError::Listing(_))
        ));
    }

    #[test]
    fn parse_listing_preserves_spaces_in_names() {
        let files =
            parse_listing("-rw-r--r--   1 u g 10 2024-01-01 12:00 /data/with space.txt\n").unwrap();
        assert_eq!(files, ["/data/with space.txt"]);
    }
}
