//! Time segments within a source video.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced by segment validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SegmentError {
    #[error("segment start {start:.3}s must be before end {end:.3}s")]
    Inverted { start: f64, end: f64 },

    #[error("segment start {0:.3}s must not be negative")]
    NegativeStart(f64),

    #[error("segment end {end:.3}s exceeds source duration {duration:.3}s")]
    PastEnd { end: f64, duration: f64 },
}

/// A (start, end) time pair within a source video, in seconds.
///
/// Invariant: `0 <= start < end`. A session holding zero segments
/// means "use trim bounds only".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Segment {
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
}

impl Segment {
    /// Create a segment, validating the ordering invariant.
    pub fn new(start: f64, end: f64) -> Result<Self, SegmentError> {
        if start < 0.0 {
            return Err(SegmentError::NegativeStart(start));
        }
        if start >= end {
            return Err(SegmentError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    /// Length of the segment in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Check the segment against a known source duration.
    pub fn validate_against(&self, duration: f64) -> Result<(), SegmentError> {
        if self.start < 0.0 {
            return Err(SegmentError::NegativeStart(self.start));
        }
        if self.start >= self.end {
            return Err(SegmentError::Inverted {
                start: self.start,
                end: self.end,
            });
        }
        if self.end > duration {
            return Err(SegmentError::PastEnd {
                end: self.end,
                duration,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_creation() {
        let seg = Segment::new(5.0, 20.0).unwrap();
        assert!((seg.duration() - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_segment_rejects_inverted_bounds() {
        assert_eq!(
            Segment::new(20.0, 5.0),
            Err(SegmentError::Inverted {
                start: 20.0,
                end: 5.0
            })
        );
        // Zero-length segments are inverted too
        assert!(Segment::new(5.0, 5.0).is_err());
    }

    #[test]
    fn test_segment_rejects_negative_start() {
        assert_eq!(
            Segment::new(-1.0, 5.0),
            Err(SegmentError::NegativeStart(-1.0))
        );
    }

    #[test]
    fn test_segment_validate_against_duration() {
        let seg = Segment::new(5.0, 20.0).unwrap();
        assert!(seg.validate_against(30.0).is_ok());
        assert_eq!(
            seg.validate_against(15.0),
            Err(SegmentError::PastEnd {
                end: 20.0,
                duration: 15.0
            })
        );
    }
}
