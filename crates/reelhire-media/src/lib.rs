#![deny(unreachable_patterns)]
//! FFmpeg CLI wrapper and local transform engine.
//!
//! This crate provides:
//! - Toolchain discovery with ordered fallback strategies
//! - Type-safe FFmpeg command building
//! - Progress parsing from `-progress pipe:2`
//! - Filter-graph construction from edit parameters
//! - The local transform engine with an explicit lifecycle

pub mod command;
pub mod engine;
pub mod error;
pub mod filters;
pub mod fs_utils;
pub mod probe;
pub mod progress;
pub mod thumbnail;
pub mod toolchain;

pub use command::{FfmpegCommand, FfmpegRunner};
pub use engine::{EngineConfig, LocalEngine, TransformOutput, DEFAULT_PROCESS_TIMEOUT_SECS};
pub use error::{MediaError, MediaResult};
pub use filters::{atempo_factors, build_filter_plan, cut_windows, FilterPlan, TransformWarning};
pub use probe::{probe_video, VideoInfo};
pub use progress::{FfmpegProgress, ProgressCallback};
pub use thumbnail::generate_thumbnail;
pub use toolchain::{locate, LocateStrategy, Toolchain, DEFAULT_VERIFY_TIMEOUT, TOOLCHAIN_DIR_ENV};
