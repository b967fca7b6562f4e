//! FFmpeg toolchain discovery.
//!
//! The engine does not assume FFmpeg is installed. Candidates are
//! probed through an ordered list of strategies, each verified by
//! running `-version` under a timeout; the first verified pair wins.
//! When every strategy fails the toolchain is reported unavailable so
//! callers can fall back to server-side processing.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::{MediaError, MediaResult};

/// Environment variable naming a directory that holds the binaries.
pub const TOOLCHAIN_DIR_ENV: &str = "REELHIRE_FFMPEG_DIR";

/// Default per-candidate verification timeout.
pub const DEFAULT_VERIFY_TIMEOUT: Duration = Duration::from_secs(5);

/// Conventional install directories checked after `PATH`.
const WELL_KNOWN_DIRS: &[&str] = &["/usr/local/bin", "/opt/homebrew/bin", "/usr/bin"];

/// One way of locating the FFmpeg binaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocateStrategy {
    /// Directory named by [`TOOLCHAIN_DIR_ENV`], when set
    EnvOverride,
    /// `which` lookup on `PATH`
    PathLookup,
    /// A specific directory expected to hold both binaries
    ExplicitDir(PathBuf),
    /// The conventional install directories
    WellKnownDirs,
}

impl LocateStrategy {
    /// Default strategy order.
    pub fn default_order() -> Vec<LocateStrategy> {
        vec![
            LocateStrategy::EnvOverride,
            LocateStrategy::PathLookup,
            LocateStrategy::WellKnownDirs,
        ]
    }

    /// Candidate binary pairs for this strategy.
    fn candidates(&self) -> Vec<(PathBuf, PathBuf)> {
        match self {
            LocateStrategy::EnvOverride => match std::env::var(TOOLCHAIN_DIR_ENV) {
                Ok(dir) => vec![pair_in(Path::new(&dir))],
                Err(_) => Vec::new(),
            },
            LocateStrategy::PathLookup => {
                match (which::which("ffmpeg"), which::which("ffprobe")) {
                    (Ok(ffmpeg), Ok(ffprobe)) => vec![(ffmpeg, ffprobe)],
                    _ => Vec::new(),
                }
            }
            LocateStrategy::ExplicitDir(dir) => vec![pair_in(dir)],
            LocateStrategy::WellKnownDirs => WELL_KNOWN_DIRS
                .iter()
                .map(|dir| pair_in(Path::new(dir)))
                .collect(),
        }
    }
}

fn pair_in(dir: &Path) -> (PathBuf, PathBuf) {
    (dir.join("ffmpeg"), dir.join("ffprobe"))
}

/// A verified FFmpeg/FFprobe binary pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    /// Verified ffmpeg binary
    pub ffmpeg: PathBuf,
    /// Verified ffprobe binary
    pub ffprobe: PathBuf,
}

/// Locate a toolchain by trying strategies in order.
///
/// Each candidate pair is verified by running `ffmpeg -version` and
/// `ffprobe -version` under `verify_timeout`. Returns
/// [`MediaError::Unavailable`] when no candidate verifies.
pub async fn locate(
    strategies: &[LocateStrategy],
    verify_timeout: Duration,
) -> MediaResult<Toolchain> {
    let mut attempts: Vec<String> = Vec::new();

    for strategy in strategies {
        for (ffmpeg, ffprobe) in strategy.candidates() {
            match verify_pair(&ffmpeg, &ffprobe, verify_timeout).await {
                Ok(()) => {
                    debug!(ffmpeg = %ffmpeg.display(), "FFmpeg toolchain verified");
                    return Ok(Toolchain { ffmpeg, ffprobe });
                }
                Err(reason) => {
                    warn!(
                        candidate = %ffmpeg.display(),
                        %reason,
                        "toolchain candidate rejected"
                    );
                    attempts.push(format!("{}: {}", ffmpeg.display(), reason));
                }
            }
        }
    }

    if attempts.is_empty() {
        attempts.push("no candidate locations produced a binary".to_string());
    }
    Err(MediaError::unavailable(attempts.join("; ")))
}

/// Verify both binaries answer `-version` within the timeout.
async fn verify_pair(ffmpeg: &Path, ffprobe: &Path, timeout: Duration) -> Result<(), String> {
    verify_binary(ffmpeg, timeout).await?;
    verify_binary(ffprobe, timeout).await
}

async fn verify_binary(binary: &Path, timeout: Duration) -> Result<(), String> {
    let run = Command::new(binary)
        .arg("-version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match tokio::time::timeout(timeout, run).await {
        Ok(Ok(status)) if status.success() => Ok(()),
        Ok(Ok(status)) => Err(format!("exited with {}", status)),
        Ok(Err(e)) => Err(e.to_string()),
        Err(_) => Err(format!("version check exceeded {:?}", timeout)),
    }
}
