//! Filter-graph construction from edit parameters.
//!
//! Stages are assembled in a fixed order: color adjustment, blur,
//! rotation, crop, scale, speed. Identity-valued stages are omitted
//! entirely so an all-identity edit produces no filter arguments at
//! all. Temporal trimming is not a filter; it is expressed through
//! `-ss`/`-t` input arguments (see [`cut_windows`]).

use reelhire_models::{EditParams, PlanTier, Rotation};

/// Smallest atempo factor FFmpeg accepts per stage.
const ATEMPO_MIN: f64 = 0.5;
/// Largest atempo factor FFmpeg accepts per stage.
const ATEMPO_MAX: f64 = 2.0;

/// A degradation applied while translating parameters into a local
/// pipeline. Warnings are surfaced to the user; they never abort the
/// transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformWarning {
    /// Multi-segment composition needs Premium; only the first
    /// segment was honored.
    SegmentsTruncated { requested: usize },
    /// Image overlays are applied server-side only.
    OverlaySkipped,
    /// Audio mixing is applied server-side only.
    AudioMixSkipped,
}

impl std::fmt::Display for TransformWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransformWarning::SegmentsTruncated { requested } => write!(
                f,
                "multi-segment composition requires Premium; kept the first of {} segments",
                requested
            ),
            TransformWarning::OverlaySkipped => {
                write!(f, "image overlay is only applied during server-side processing")
            }
            TransformWarning::AudioMixSkipped => {
                write!(f, "audio mixing is only applied during server-side processing")
            }
        }
    }
}

/// The filter chains derived from one parameter set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterPlan {
    /// Video filter chain for `-vf`, when any stage applies
    pub video: Option<String>,
    /// Audio filter chain for `-af`, when the speed changes
    pub audio: Option<String>,
    /// Degradations recorded while planning
    pub warnings: Vec<TransformWarning>,
}

/// Build the filter plan for a parameter set.
pub fn build_filter_plan(params: &EditParams) -> FilterPlan {
    let mut stages: Vec<String> = Vec::new();
    let mut warnings = Vec::new();

    if params.has_color_adjust() {
        stages.push(eq_stage(params));
    }

    if params.has_blur() {
        stages.push(format!("boxblur={:.1}", params.blur));
    }

    match params.rotation {
        Rotation::None => {}
        Rotation::Cw90 => stages.push("transpose=1".to_string()),
        Rotation::Cw180 => {
            stages.push("transpose=1".to_string());
            stages.push("transpose=1".to_string());
        }
        Rotation::Cw270 => stages.push("transpose=2".to_string()),
    }

    if let Some(crop) = params.crop.filter(|c| c.is_effective()) {
        stages.push(format!(
            "crop={}:{}:{}:{}",
            crop.width, crop.height, crop.x, crop.y
        ));
    }

    if let Some(scale) = params.scale.filter(|s| s.is_effective()) {
        stages.push(format!("scale={}:{}", scale.width, scale.height));
    }

    let mut audio = None;
    if params.has_speed_change() {
        stages.push(format!("setpts=PTS/{}", format_speed(params.speed)));
        audio = Some(
            atempo_factors(params.speed)
                .into_iter()
                .map(|f| format!("atempo={}", format_speed(f)))
                .collect::<Vec<_>>()
                .join(","),
        );
    }

    if params.overlay.is_some() {
        warnings.push(TransformWarning::OverlaySkipped);
    }
    if params.audio_mix.is_some() {
        warnings.push(TransformWarning::AudioMixSkipped);
    }

    FilterPlan {
        video: if stages.is_empty() {
            None
        } else {
            Some(stages.join(","))
        },
        audio,
        warnings,
    }
}

/// The (start, end) windows to cut from the source, honoring the
/// tier's segment entitlement.
///
/// Zero segments means the trim bounds; one segment is always
/// honored; multiple segments compose only on Premium, otherwise the
/// first is kept and a warning recorded.
pub fn cut_windows(params: &EditParams, tier: PlanTier) -> (Vec<(f64, f64)>, Option<TransformWarning>) {
    if params.segments.is_empty() {
        return (vec![(params.trim_start, params.trim_end)], None);
    }

    if params.segments.len() == 1 || tier.can_compose_segments() {
        let windows = params.segments.iter().map(|s| (s.start, s.end)).collect();
        return (windows, None);
    }

    let first = params.segments[0];
    (
        vec![(first.start, first.end)],
        Some(TransformWarning::SegmentsTruncated {
            requested: params.segments.len(),
        }),
    )
}

/// Map the color parameters onto a single eq stage.
///
/// UI scales: brightness -100..=100 onto eq's -1.0..1.0, contrast and
/// saturation 100-as-identity onto eq's 1.0-as-identity.
fn eq_stage(params: &EditParams) -> String {
    format!(
        "eq=brightness={:.2}:contrast={:.2}:saturation={:.2}",
        f64::from(params.brightness) / 100.0,
        f64::from(params.contrast) / 100.0,
        f64::from(params.saturation) / 100.0,
    )
}

/// Decompose a speed multiplier into atempo factors, each within
/// FFmpeg's supported per-stage range.
pub fn atempo_factors(speed: f64) -> Vec<f64> {
    let mut factors = Vec::new();
    let mut remaining = speed;

    while remaining > ATEMPO_MAX {
        factors.push(ATEMPO_MAX);
        remaining /= ATEMPO_MAX;
    }
    while remaining < ATEMPO_MIN {
        factors.push(ATEMPO_MIN);
        remaining /= ATEMPO_MIN;
    }
    factors.push(remaining);

    factors
}

/// Format a speed factor without trailing float noise.
fn format_speed(speed: f64) -> String {
    let s = format!("{:.4}", speed);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}
