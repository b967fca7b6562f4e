//! Local transform engine.
//!
//! Applies a declarative parameter set to an in-memory payload using
//! a locally discovered FFmpeg toolchain. The engine is explicitly
//! constructed and injected; its lifecycle is `init()` (toolchain
//! discovery), `is_ready()`, `dispose()`. A failed `init()` is
//! remembered: further processing attempts report unavailable without
//! re-probing, so callers dispatch server-side instead. `dispose()`
//! followed by `init()` is the explicit way to retry discovery.

use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use reelhire_models::{EditParams, EncodingConfig, MediaPayload, PlanTier};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::filters::{build_filter_plan, cut_windows, FilterPlan, TransformWarning};
use crate::fs_utils::move_file;
use crate::probe::probe_video;
use crate::progress::FfmpegProgress;
use crate::thumbnail::generate_thumbnail;
use crate::toolchain::{locate, LocateStrategy, Toolchain, DEFAULT_VERIFY_TIMEOUT};

/// Default ceiling for a single FFmpeg run.
pub const DEFAULT_PROCESS_TIMEOUT_SECS: u64 = 600;

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Toolchain discovery strategies, tried in order
    pub strategies: Vec<LocateStrategy>,
    /// Per-candidate verification timeout during discovery
    pub verify_timeout: Duration,
    /// Ceiling for each FFmpeg run, in seconds
    pub process_timeout_secs: u64,
    /// Directory preview files are moved into; outlives the private
    /// workspace
    pub preview_dir: PathBuf,
    /// Encoding settings for produced output
    pub encoding: EncodingConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            strategies: LocateStrategy::default_order(),
            verify_timeout: DEFAULT_VERIFY_TIMEOUT,
            process_timeout_secs: DEFAULT_PROCESS_TIMEOUT_SECS,
            preview_dir: std::env::temp_dir().join("reelhire-previews"),
            encoding: EncodingConfig::default(),
        }
    }
}

/// Engine lifecycle state.
#[derive(Debug, Clone)]
enum EngineState {
    Uninitialized,
    Ready(Toolchain),
    Unavailable(String),
}

/// Output of a successful local transform.
#[derive(Debug)]
pub struct TransformOutput {
    /// The transformed payload
    pub payload: MediaPayload,
    /// Locally dereferenceable preview file
    pub preview_path: PathBuf,
    /// Preview thumbnail, when rendering succeeded
    pub thumbnail_path: Option<PathBuf>,
    /// Output duration in seconds
    pub duration_secs: f64,
    /// Degradations applied while building the pipeline
    pub warnings: Vec<TransformWarning>,
}

/// The local transform engine.
pub struct LocalEngine {
    config: EngineConfig,
    state: EngineState,
}

impl LocalEngine {
    /// Create an engine; discovery does not run until `init()`.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            state: EngineState::Uninitialized,
        }
    }

    /// Create an engine with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(EngineConfig::default())
    }

    /// Discover and verify the FFmpeg toolchain.
    ///
    /// Idempotent once ready. After a failed attempt the engine stays
    /// unavailable and returns the remembered failure without probing
    /// again; call `dispose()` first to force a fresh attempt.
    pub async fn init(&mut self) -> MediaResult<()> {
        match &self.state {
            EngineState::Ready(_) => return Ok(()),
            EngineState::Unavailable(reason) => {
                return Err(MediaError::unavailable(reason.clone()));
            }
            EngineState::Uninitialized => {}
        }

        match locate(&self.config.strategies, self.config.verify_timeout).await {
            Ok(toolchain) => {
                info!(ffmpeg = %toolchain.ffmpeg.display(), "local transform engine ready");
                self.state = EngineState::Ready(toolchain);
                Ok(())
            }
            Err(e) => {
                warn!("local transform engine unavailable: {}", e);
                self.state = EngineState::Unavailable(e.to_string());
                Err(e)
            }
        }
    }

    /// Whether the engine holds a verified toolchain.
    pub fn is_ready(&self) -> bool {
        matches!(self.state, EngineState::Ready(_))
    }

    /// Drop the toolchain and return to the uninitialized state.
    pub fn dispose(&mut self) {
        self.state = EngineState::Uninitialized;
    }

    fn toolchain(&self) -> MediaResult<&Toolchain> {
        match &self.state {
            EngineState::Ready(toolchain) => Ok(toolchain),
            EngineState::Unavailable(reason) => Err(MediaError::unavailable(reason.clone())),
            EngineState::Uninitialized => Err(MediaError::NotInitialized),
        }
    }

    /// Apply `params` to `payload` and produce a new payload plus a
    /// preview file.
    ///
    /// All intermediate files live in a private workspace that is
    /// removed on success and failure alike; only the preview (and
    /// its thumbnail) are moved out before teardown. The input
    /// payload is never modified.
    pub async fn process<F>(
        &self,
        payload: &MediaPayload,
        params: &EditParams,
        tier: PlanTier,
        progress_callback: F,
    ) -> MediaResult<TransformOutput>
    where
        F: Fn(FfmpegProgress) + Clone + Send + 'static,
    {
        let toolchain = self.toolchain()?.clone();

        let workdir = tempfile::tempdir()?;
        let input_path = workdir.path().join("input.mp4");
        tokio::fs::write(&input_path, payload.bytes()).await?;

        let info = probe_video(&toolchain.ffprobe, &input_path).await?;
        params.validate(Some(info.duration))?;

        let (windows, window_warning) = cut_windows(params, tier);
        let mut plan = build_filter_plan(params);
        if let Some(w) = window_warning {
            plan.warnings.push(w);
        }
        for warning in &plan.warnings {
            warn!("degraded local pipeline: {}", warning);
        }

        let output_path = workdir.path().join("output.mp4");
        let runner =
            FfmpegRunner::new(&toolchain.ffmpeg).with_timeout(self.config.process_timeout_secs);

        if let [(start, end)] = windows[..] {
            let cmd = self.transform_command(&input_path, &output_path, start, end - start, &plan);
            runner
                .run_with_progress(&cmd, progress_callback.clone())
                .await?;
        } else {
            self.compose_segments(
                &runner,
                workdir.path(),
                &input_path,
                &output_path,
                &windows,
                &plan,
                progress_callback.clone(),
            )
            .await?;
        }

        let out_info = probe_video(&toolchain.ffprobe, &output_path).await?;
        let bytes = tokio::fs::read(&output_path).await?;

        let thumb_tmp = workdir.path().join("preview.jpg");
        let thumbnail_rendered =
            match generate_thumbnail(&toolchain.ffmpeg, &output_path, &thumb_tmp).await {
                Ok(()) => true,
                Err(e) => {
                    warn!("failed to render preview thumbnail: {}", e);
                    false
                }
            };

        tokio::fs::create_dir_all(&self.config.preview_dir).await?;
        let preview_path = self.reserve_preview_path()?;
        move_file(&output_path, &preview_path).await?;

        let thumbnail_path = if thumbnail_rendered {
            let thumb_path = preview_path.with_extension("jpg");
            match move_file(&thumb_tmp, &thumb_path).await {
                Ok(()) => Some(thumb_path),
                Err(e) => {
                    warn!("failed to publish thumbnail: {}", e);
                    None
                }
            }
        } else {
            None
        };

        debug!(
            duration = out_info.duration,
            size = bytes.len(),
            "local transform complete"
        );

        Ok(TransformOutput {
            payload: MediaPayload::mp4(bytes),
            preview_path,
            thumbnail_path,
            duration_secs: out_info.duration,
            warnings: plan.warnings,
        })
    }

    /// Cut each window with the full filter chain, then concatenate
    /// the parts without re-encoding.
    #[allow(clippy::too_many_arguments)]
    async fn compose_segments<F>(
        &self,
        runner: &FfmpegRunner,
        workdir: &Path,
        input_path: &Path,
        output_path: &Path,
        windows: &[(f64, f64)],
        plan: &FilterPlan,
        progress_callback: F,
    ) -> MediaResult<()>
    where
        F: Fn(FfmpegProgress) + Clone + Send + 'static,
    {
        let mut list = String::new();

        for (i, (start, end)) in windows.iter().enumerate() {
            let part = workdir.join(format!("part_{:02}.mp4", i));
            let cmd = self.transform_command(input_path, &part, *start, end - start, plan);
            runner
                .run_with_progress(&cmd, progress_callback.clone())
                .await?;
            list.push_str(&format!("file '{}'\n", part.display()));
        }

        let list_path = workdir.join("concat.txt");
        tokio::fs::write(&list_path, list).await?;

        let concat_cmd = FfmpegCommand::new(&list_path, output_path)
            .input_args(["-f", "concat", "-safe", "0"])
            .codec_copy();
        runner.run(&concat_cmd).await
    }

    /// Build the single-window transform command.
    fn transform_command(
        &self,
        input: &Path,
        output: &Path,
        start: f64,
        duration: f64,
        plan: &FilterPlan,
    ) -> FfmpegCommand {
        let mut cmd = FfmpegCommand::new(input, output)
            .seek(start)
            .duration(duration)
            .output_args(self.config.encoding.to_ffmpeg_args());

        if let Some(video) = &plan.video {
            cmd = cmd.video_filter(video);
        }
        if let Some(audio) = &plan.audio {
            cmd = cmd.audio_filter(audio);
        }

        cmd
    }

    /// Reserve a unique preview path in the preview directory.
    fn reserve_preview_path(&self) -> MediaResult<PathBuf> {
        let file = tempfile::Builder::new()
            .prefix("reel-")
            .suffix(".mp4")
            .tempfile_in(&self.config.preview_dir)?;
        file.into_temp_path()
            .keep()
            .map_err(|e| MediaError::Io(e.error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unavailable_config() -> EngineConfig {
        EngineConfig {
            strategies: vec![LocateStrategy::ExplicitDir(PathBuf::from(
                "/nonexistent/ffmpeg/dir",
            ))],
            verify_timeout: Duration::from_millis(200),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_process_before_init_is_an_error() {
        let engine = LocalEngine::with_defaults();
        let payload = MediaPayload::mp4(vec![0; 16]);
        let params = EditParams::trimmed(0.0, 1.0);

        let err = engine
            .process(&payload, &params, PlanTier::Standard, |_| {})
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::NotInitialized));
    }

    #[tokio::test]
    async fn test_failed_init_reports_unavailable_without_reprobing() {
        let mut engine = LocalEngine::new(unavailable_config());

        let err = engine.init().await.unwrap_err();
        assert!(err.is_unavailable());
        assert!(!engine.is_ready());

        // The failure is remembered; no fresh discovery happens
        let err = engine.init().await.unwrap_err();
        assert!(matches!(err, MediaError::Unavailable(_)));

        let payload = MediaPayload::mp4(vec![0; 16]);
        let params = EditParams::trimmed(0.0, 1.0);
        let err = engine
            .process(&payload, &params, PlanTier::Standard, |_| {})
            .await
            .unwrap_err();
        assert!(err.is_unavailable());
    }

    #[tokio::test]
    async fn test_dispose_resets_lifecycle() {
        let mut engine = LocalEngine::new(unavailable_config());
        let _ = engine.init().await;
        assert!(!engine.is_ready());

        engine.dispose();

        let payload = MediaPayload::mp4(vec![0; 16]);
        let params = EditParams::trimmed(0.0, 1.0);
        let err = engine
            .process(&payload, &params, PlanTier::Standard, |_| {})
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::NotInitialized));
    }

    #[test]
    fn test_transform_command_arguments() {
        let engine = LocalEngine::with_defaults();
        let mut params = EditParams::trimmed(5.0, 20.0);
        params.brightness = 10;
        params.speed = 2.0;
        let plan = build_filter_plan(&params);

        let cmd = engine.transform_command(
            Path::new("in.mp4"),
            Path::new("out.mp4"),
            5.0,
            15.0,
            &plan,
        );
        let args = cmd.build_args();

        assert!(args.contains(&"-ss".to_string()));
        assert!(args.contains(&"5.000".to_string()));
        assert!(args.contains(&"-t".to_string()));
        assert!(args.contains(&"15.000".to_string()));
        assert!(args.contains(&"-vf".to_string()));
        assert!(args.contains(&"-af".to_string()));
        assert!(args.contains(&"-c:v".to_string()));
        assert!(args.contains(&"libx264".to_string()));
    }

    #[test]
    fn test_identity_transform_command_has_no_filters() {
        let engine = LocalEngine::with_defaults();
        let params = EditParams::trimmed(5.0, 20.0);
        let plan = build_filter_plan(&params);

        let cmd = engine.transform_command(
            Path::new("in.mp4"),
            Path::new("out.mp4"),
            5.0,
            15.0,
            &plan,
        );
        let args = cmd.build_args();

        assert!(!args.contains(&"-vf".to_string()));
        assert!(!args.contains(&"-af".to_string()));
    }
}
