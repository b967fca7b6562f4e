//! Edit parameters for a video session.
//!
//! These are the declarative inputs to both the local transform
//! engine and the server-side transform endpoint. Identity values are
//! detected per stage so identity stages can be omitted from the
//! filter graph.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::segment::{Segment, SegmentError};

/// Identity brightness (UI scale -100..=100).
pub const IDENTITY_BRIGHTNESS: i16 = 0;
/// Identity contrast (UI scale 0..=200, 100 = unchanged).
pub const IDENTITY_CONTRAST: u16 = 100;
/// Identity saturation (UI scale 0..=300, 100 = unchanged).
pub const IDENTITY_SATURATION: u16 = 100;
/// Identity playback speed.
pub const IDENTITY_SPEED: f64 = 1.0;

/// Errors produced by edit parameter validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditParamsError {
    #[error("trim bounds invalid: {0}")]
    Trim(SegmentError),

    #[error("segment {index} invalid: {source}")]
    Segment { index: usize, source: SegmentError },

    #[error("rotation of {0} degrees is not supported (only 0, 90, 180, 270)")]
    UnsupportedRotation(u16),

    #[error("speed {0} must be positive")]
    NonPositiveSpeed(f64),

    #[error("brightness {0} outside -100..=100")]
    BrightnessOutOfRange(i16),

    #[error("contrast {0} outside 0..=200")]
    ContrastOutOfRange(u16),

    #[error("saturation {0} outside 0..=300")]
    SaturationOutOfRange(u16),

    #[error("overlay opacity {0} outside 0.0..=1.0")]
    OpacityOutOfRange(f32),
}

/// Discrete rotation, clockwise.
///
/// Only quarter turns are supported; arbitrary angles are rejected at
/// the boundary rather than silently rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum Rotation {
    #[default]
    None,
    Cw90,
    Cw180,
    Cw270,
}

impl Rotation {
    /// Map degrees to a rotation. Values other than 0/90/180/270 are errors.
    pub fn from_degrees(degrees: u16) -> Result<Self, EditParamsError> {
        match degrees {
            0 => Ok(Rotation::None),
            90 => Ok(Rotation::Cw90),
            180 => Ok(Rotation::Cw180),
            270 => Ok(Rotation::Cw270),
            other => Err(EditParamsError::UnsupportedRotation(other)),
        }
    }

    /// The rotation in degrees.
    pub fn degrees(&self) -> u16 {
        match self {
            Rotation::None => 0,
            Rotation::Cw90 => 90,
            Rotation::Cw180 => 180,
            Rotation::Cw270 => 270,
        }
    }
}

/// A crop rectangle in source pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CropRect {
    pub width: u32,
    pub height: u32,
    pub x: u32,
    pub y: u32,
}

impl CropRect {
    /// A crop only applies when both dimensions are positive.
    pub fn is_effective(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Target dimensions for scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ScaleDims {
    pub width: u32,
    pub height: u32,
}

impl ScaleDims {
    /// A scale only applies when both dimensions are positive.
    pub fn is_effective(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Corner anchor for an image overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum OverlayPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    #[default]
    BottomRight,
}

/// Image overlay (watermark) parameters. Premium only; server-side only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct OverlayParams {
    /// Path or catalog reference of the overlay image
    pub image: String,
    /// Corner the overlay is anchored to
    #[serde(default)]
    pub position: OverlayPosition,
    /// Opacity (0.0 = invisible, 1.0 = fully opaque)
    #[serde(default = "default_opacity")]
    pub opacity: f32,
}

fn default_opacity() -> f32 {
    0.7
}

impl OverlayParams {
    /// Set overlay opacity, clamped to the valid range.
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }
}

/// Audio-mix parameters. Premium only; server-side only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AudioMixParams {
    /// Path or catalog reference of the audio track to mix in
    pub track: String,
    /// Mix volume for the added track (0.0..=1.0)
    #[serde(default = "default_mix_volume")]
    pub volume: f32,
}

fn default_mix_volume() -> f32 {
    0.5
}

/// Declarative edit parameters for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EditParams {
    /// Trim start in seconds
    #[serde(default)]
    pub trim_start: f64,

    /// Trim end in seconds
    #[serde(default)]
    pub trim_end: f64,

    /// Brightness adjustment (-100..=100, 0 = unchanged)
    #[serde(default)]
    pub brightness: i16,

    /// Contrast (0..=200, 100 = unchanged)
    #[serde(default = "default_contrast")]
    pub contrast: u16,

    /// Saturation (0..=300, 100 = unchanged)
    #[serde(default = "default_saturation")]
    pub saturation: u16,

    /// Blur magnitude (0 = none)
    #[serde(default)]
    pub blur: f32,

    /// Clockwise rotation
    #[serde(default)]
    pub rotation: Rotation,

    /// Crop rectangle (applied when both dimensions positive)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop: Option<CropRect>,

    /// Scale target (applied when both dimensions positive)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<ScaleDims>,

    /// Playback speed multiplier (1.0 = unchanged); alters video pacing
    /// and audio tempo consistently
    #[serde(default = "default_speed")]
    pub speed: f64,

    /// Ordered segment list; empty means "use trim bounds only"
    #[serde(default)]
    pub segments: Vec<Segment>,

    /// Image overlay (Premium, server-side only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlay: Option<OverlayParams>,

    /// Audio mix (Premium, server-side only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_mix: Option<AudioMixParams>,
}

fn default_contrast() -> u16 {
    IDENTITY_CONTRAST
}
fn default_saturation() -> u16 {
    IDENTITY_SATURATION
}
fn default_speed() -> f64 {
    IDENTITY_SPEED
}

impl Default for EditParams {
    fn default() -> Self {
        Self {
            trim_start: 0.0,
            trim_end: 0.0,
            brightness: IDENTITY_BRIGHTNESS,
            contrast: IDENTITY_CONTRAST,
            saturation: IDENTITY_SATURATION,
            blur: 0.0,
            rotation: Rotation::None,
            crop: None,
            scale: None,
            speed: IDENTITY_SPEED,
            segments: Vec::new(),
            overlay: None,
            audio_mix: None,
        }
    }
}

impl EditParams {
    /// Identity parameters over a trim window.
    pub fn trimmed(trim_start: f64, trim_end: f64) -> Self {
        Self {
            trim_start,
            trim_end,
            ..Default::default()
        }
    }

    /// Whether any of brightness/contrast/saturation differs from identity.
    pub fn has_color_adjust(&self) -> bool {
        self.brightness != IDENTITY_BRIGHTNESS
            || self.contrast != IDENTITY_CONTRAST
            || self.saturation != IDENTITY_SATURATION
    }

    /// Whether the blur stage applies.
    pub fn has_blur(&self) -> bool {
        self.blur > 0.0
    }

    /// Whether the speed stage applies.
    pub fn has_speed_change(&self) -> bool {
        (self.speed - IDENTITY_SPEED).abs() > f64::EPSILON
    }

    /// Whether these parameters require a Premium entitlement to be
    /// honored in full.
    pub fn needs_premium(&self) -> bool {
        self.segments.len() > 1 || self.overlay.is_some() || self.audio_mix.is_some()
    }

    /// Whether any parameter can only be applied server-side.
    pub fn needs_remote(&self) -> bool {
        self.overlay.is_some() || self.audio_mix.is_some()
    }

    /// The effective trim window: the first segment when segments are
    /// present, the trim bounds otherwise.
    pub fn effective_window(&self) -> (f64, f64) {
        match self.segments.first() {
            Some(seg) => (seg.start, seg.end),
            None => (self.trim_start, self.trim_end),
        }
    }

    /// Validate parameters, optionally against a known source duration.
    pub fn validate(&self, duration: Option<f64>) -> Result<(), EditParamsError> {
        let trim = Segment::new(self.trim_start, self.trim_end).map_err(EditParamsError::Trim)?;
        if let Some(d) = duration {
            trim.validate_against(d).map_err(EditParamsError::Trim)?;
        }

        for (index, seg) in self.segments.iter().enumerate() {
            let check = match duration {
                Some(d) => seg.validate_against(d),
                None => Segment::new(seg.start, seg.end).map(|_| ()),
            };
            check.map_err(|source| EditParamsError::Segment { index, source })?;
        }

        if self.speed <= 0.0 {
            return Err(EditParamsError::NonPositiveSpeed(self.speed));
        }
        if !(-100..=100).contains(&self.brightness) {
            return Err(EditParamsError::BrightnessOutOfRange(self.brightness));
        }
        if self.contrast > 200 {
            return Err(EditParamsError::ContrastOutOfRange(self.contrast));
        }
        if self.saturation > 300 {
            return Err(EditParamsError::SaturationOutOfRange(self.saturation));
        }
        if let Some(overlay) = &self.overlay {
            if !(0.0..=1.0).contains(&overlay.opacity) {
                return Err(EditParamsError::OpacityOutOfRange(overlay.opacity));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_mapping() {
        assert_eq!(Rotation::from_degrees(0).unwrap(), Rotation::None);
        assert_eq!(Rotation::from_degrees(90).unwrap(), Rotation::Cw90);
        assert_eq!(Rotation::from_degrees(270).unwrap(), Rotation::Cw270);
        assert_eq!(
            Rotation::from_degrees(45),
            Err(EditParamsError::UnsupportedRotation(45))
        );
    }

    #[test]
    fn test_identity_detection() {
        let params = EditParams::trimmed(5.0, 20.0);
        assert!(!params.has_color_adjust());
        assert!(!params.has_blur());
        assert!(!params.has_speed_change());
        assert!(!params.needs_premium());
        assert!(!params.needs_remote());
    }

    #[test]
    fn test_color_adjust_detection() {
        let mut params = EditParams::trimmed(0.0, 10.0);
        params.brightness = 10;
        assert!(params.has_color_adjust());

        let mut params = EditParams::trimmed(0.0, 10.0);
        params.saturation = 120;
        assert!(params.has_color_adjust());
    }

    #[test]
    fn test_effective_window_prefers_first_segment() {
        let mut params = EditParams::trimmed(0.0, 30.0);
        params.segments = vec![
            Segment::new(2.0, 8.0).unwrap(),
            Segment::new(12.0, 18.0).unwrap(),
        ];
        assert_eq!(params.effective_window(), (2.0, 8.0));

        params.segments.clear();
        assert_eq!(params.effective_window(), (0.0, 30.0));
    }

    #[test]
    fn test_needs_premium() {
        let mut params = EditParams::trimmed(0.0, 30.0);
        params.segments = vec![Segment::new(2.0, 8.0).unwrap()];
        assert!(!params.needs_premium());

        params.segments.push(Segment::new(12.0, 18.0).unwrap());
        assert!(params.needs_premium());

        let mut params = EditParams::trimmed(0.0, 30.0);
        params.overlay = Some(OverlayParams {
            image: "logo.png".into(),
            position: OverlayPosition::BottomRight,
            opacity: 0.7,
        });
        assert!(params.needs_premium());
        assert!(params.needs_remote());
    }

    #[test]
    fn test_validate_trim_bounds() {
        let params = EditParams::trimmed(20.0, 5.0);
        assert!(matches!(
            params.validate(None),
            Err(EditParamsError::Trim(_))
        ));

        let params = EditParams::trimmed(5.0, 20.0);
        assert!(params.validate(Some(30.0)).is_ok());
        assert!(params.validate(Some(15.0)).is_err());
    }

    #[test]
    fn test_validate_ranges() {
        let mut params = EditParams::trimmed(0.0, 10.0);
        params.speed = 0.0;
        assert_eq!(
            params.validate(None),
            Err(EditParamsError::NonPositiveSpeed(0.0))
        );

        let mut params = EditParams::trimmed(0.0, 10.0);
        params.contrast = 250;
        assert_eq!(
            params.validate(None),
            Err(EditParamsError::ContrastOutOfRange(250))
        );
    }

    #[test]
    fn test_overlay_opacity_clamped() {
        let overlay = OverlayParams {
            image: "logo.png".into(),
            position: OverlayPosition::TopLeft,
            opacity: 0.0,
        }
        .with_opacity(1.5);
        assert!((overlay.opacity - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_params_deserialize_with_defaults() {
        let params: EditParams = serde_json::from_str(r#"{"trim_start": 1.0, "trim_end": 9.0}"#).unwrap();
        assert_eq!(params.contrast, IDENTITY_CONTRAST);
        assert_eq!(params.saturation, IDENTITY_SATURATION);
        assert!((params.speed - IDENTITY_SPEED).abs() < f64::EPSILON);
        assert!(params.segments.is_empty());
    }
}
