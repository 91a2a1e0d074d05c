//! Sun position along the daylight arc
//!
//! Maps the current time between sunrise and sunset onto a fraction in [0, 1]
//! and onto a point of a parabolic arc drawn on a 200 x 100 canvas.

use serde::Serialize;
use thiserror::Error;

/// Left edge of the arc on the canvas
const ARC_X_START: f64 = 10.0;
/// Horizontal span of the arc
const ARC_X_SPAN: f64 = 180.0;
/// Vertex (h, k) of the arc parabola
const ARC_VERTEX_X: f64 = 100.0;
const ARC_VERTEX_Y: f64 = 10.0;
/// Steepness of the arc parabola
const ARC_STEEPNESS: f64 = 0.01;

/// Errors from the sun position calculation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SunError {
    /// Sunset does not come after sunrise
    #[error("Sunset ({sunset}) must be after sunrise ({sunrise})")]
    InvalidRange { sunrise: i64, sunset: i64 },
}

/// Progress of the day between sunrise (0.0) and sunset (1.0).
///
/// All arguments are Unix seconds. Times before sunrise clamp to 0 and times
/// after sunset to 1.
pub fn sun_position_fraction(now: i64, sunrise: i64, sunset: i64) -> Result<f64, SunError> {
    if sunset <= sunrise {
        return Err(SunError::InvalidRange { sunrise, sunset });
    }

    if now < sunrise {
        Ok(0.0)
    } else if now > sunset {
        Ok(1.0)
    } else {
        Ok((now - sunrise) as f64 / (sunset - sunrise) as f64)
    }
}

/// A point on the canvas; y grows downwards
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ArcPoint {
    pub x: f64,
    pub y: f64,
}

/// Position of the sun on the arc for a day fraction
pub fn arc_point(fraction: f64) -> ArcPoint {
    let fraction = if fraction.is_nan() { 0.0 } else { fraction.clamp(0.0, 1.0) };
    let x = ARC_X_START + fraction * ARC_X_SPAN;
    let dx = x - ARC_VERTEX_X;
    ArcPoint {
        x,
        y: ARC_STEEPNESS * dx * dx + ARC_VERTEX_Y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 2024-07-15T06:00:00Z and 18:00:00Z
    const SUNRISE: i64 = 1_721_023_200;
    const SUNSET: i64 = 1_721_066_400;
    const NOON: i64 = 1_721_044_800;

    #[test]
    fn test_noon_is_halfway() {
        let fraction = sun_position_fraction(NOON, SUNRISE, SUNSET).unwrap();
        assert!((fraction - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_clamps_outside_daylight() {
        assert_eq!(sun_position_fraction(SUNRISE - 1, SUNRISE, SUNSET), Ok(0.0));
        assert_eq!(sun_position_fraction(SUNSET + 1, SUNRISE, SUNSET), Ok(1.0));
    }

    #[test]
    fn test_endpoints() {
        assert_eq!(sun_position_fraction(SUNRISE, SUNRISE, SUNSET), Ok(0.0));
        assert_eq!(sun_position_fraction(SUNSET, SUNRISE, SUNSET), Ok(1.0));
    }

    #[test]
    fn test_invalid_range() {
        assert_eq!(
            sun_position_fraction(NOON, SUNSET, SUNRISE),
            Err(SunError::InvalidRange {
                sunrise: SUNSET,
                sunset: SUNRISE
            })
        );
        assert!(sun_position_fraction(NOON, SUNRISE, SUNRISE).is_err());
    }

    #[test]
    fn test_arc_point_ends_and_vertex() {
        let start = arc_point(0.0);
        assert!((start.x - 10.0).abs() < 1e-9);
        assert!((start.y - 91.0).abs() < 1e-9);

        let top = arc_point(0.5);
        assert!((top.x - 100.0).abs() < 1e-9);
        assert!((top.y - 10.0).abs() < 1e-9);

        let end = arc_point(1.0);
        assert!((end.x - 190.0).abs() < 1e-9);
        assert!((end.y - 91.0).abs() < 1e-9);
    }

    #[test]
    fn test_arc_x_is_monotonic() {
        let mut previous = f64::NEG_INFINITY;
        for step in 0..=100 {
            let point = arc_point(step as f64 / 100.0);
            assert!(point.x > previous);
            previous = point.x;
        }
    }

    #[test]
    fn test_arc_point_clamps_fraction() {
        assert_eq!(arc_point(-1.0), arc_point(0.0));
        assert_eq!(arc_point(2.0), arc_point(1.0));
        assert_eq!(arc_point(f64::NAN), arc_point(0.0));
    }
}
