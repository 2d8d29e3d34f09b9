//! Survey points (tunnel chainage) and their conversion to a distance from
//! the tunnel entrance.
//!
//! A survey point is written `major+minor`, e.g. `254+19.4`. Its linear value
//! is `major * conversion_factor + minor`; the distance from the entrance is
//! the linear value of the reference point minus the linear value of the
//! survey point.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GeomError, Result};

/// A survey point in `major+minor` chainage notation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurveyPoint {
    /// Major station index. Integer-valued in practice.
    pub major: f64,
    /// Offset past the major station, in metres.
    pub minor: f64,
}

impl SurveyPoint {
    /// Create a survey point.
    pub fn new(major: f64, minor: f64) -> Self {
        Self { major, minor }
    }

    /// Parse `major+minor`.
    ///
    /// The text must contain exactly one `+` and both halves must be finite
    /// numbers. Surrounding whitespace is ignored. A fractional major such as
    /// `254.5+1` is accepted and enters the linear value as written.
    pub fn parse(text: &str) -> Result<Self> {
        let mut parts = text.split('+');
        let (major, minor) = match (parts.next(), parts.next(), parts.next()) {
            (Some(major), Some(minor), None) => (major, minor),
            (_, None, _) => return Err(GeomError::format(text, "missing '+'")),
            _ => return Err(GeomError::format(text, "more than one '+'")),
        };

        let major = parse_number(text, major)?;
        let minor = parse_number(text, minor)?;

        Ok(Self { major, minor })
    }
}

fn parse_number(text: &str, part: &str) -> Result<f64> {
    let part = part.trim();
    let value: f64 = part
        .parse()
        .map_err(|_| GeomError::format(text, format!("'{part}' is not a number")))?;
    if !value.is_finite() {
        return Err(GeomError::format(text, format!("'{part}' is not finite")));
    }
    Ok(value)
}

impl FromStr for SurveyPoint {
    type Err = GeomError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for SurveyPoint {
    /// `254+19` for an integral minor, `254+19.4` otherwise.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `+ 0.0` folds -0.0 into 0.0 so it never renders as "-0".
        write!(f, "{}+{}", self.major + 0.0, self.minor + 0.0)
    }
}

/// The fixed survey point that chainage distances are measured against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurveyReference {
    /// Major index of the reference point.
    pub major: f64,
    /// Minor offset of the reference point.
    pub minor: f64,
    /// Metres per major station.
    pub conversion_factor: f64,
}

impl Default for SurveyReference {
    fn default() -> Self {
        Self {
            major: 255.0,
            minor: 4.0,
            conversion_factor: 20.0,
        }
    }
}

impl SurveyReference {
    /// Linear value of a survey point: `major * factor + minor`.
    pub fn linear_value(&self, point: &SurveyPoint) -> f64 {
        point.major * self.conversion_factor + point.minor
    }

    /// Linear value of the reference point itself (5104 for the defaults).
    pub fn reference_value(&self) -> f64 {
        self.major * self.conversion_factor + self.minor
    }

    /// Distance from the tunnel entrance in metres.
    pub fn distance_from_entrance(&self, point: &SurveyPoint) -> f64 {
        self.reference_value() - self.linear_value(point)
    }

    /// Parse survey-point text and resolve it to a distance from the entrance.
    pub fn locate(&self, text: &str) -> Result<f64> {
        let point = SurveyPoint::parse(text)?;
        Ok(self.distance_from_entrance(&point))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_parse_integral_and_fractional() {
        assert_eq!(SurveyPoint::parse("254+19").unwrap(), SurveyPoint::new(254.0, 19.0));
        assert_eq!(SurveyPoint::parse("254+19.4").unwrap(), SurveyPoint::new(254.0, 19.4));
        assert_eq!(SurveyPoint::parse(" 254 + 0 ").unwrap(), SurveyPoint::new(254.0, 0.0));
        assert_eq!("12+3.5".parse::<SurveyPoint>().unwrap(), SurveyPoint::new(12.0, 3.5));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for text in ["25419", "254+19+1", "abc+1", "254+", "+19", "254+x", "inf+1", ""] {
            let err = SurveyPoint::parse(text).unwrap_err();
            assert!(matches!(err, GeomError::Format { .. }), "{text}: {err:?}");
        }
    }

    #[test]
    fn test_fractional_major_accepted() {
        let point = SurveyPoint::parse("254.5+1").unwrap();
        assert_eq!(point, SurveyPoint::new(254.5, 1.0));
        assert_abs_diff_eq!(SurveyReference::default().linear_value(&point), 5091.0);
        assert_eq!(point.to_string(), "254.5+1");
    }

    #[test]
    fn test_display() {
        assert_eq!(SurveyPoint::new(254.0, 19.0).to_string(), "254+19");
        assert_eq!(SurveyPoint::new(254.0, 19.4).to_string(), "254+19.4");
        assert_eq!(SurveyPoint::new(254.0, 0.0).to_string(), "254+0");
        assert_eq!(SurveyPoint::new(254.0, -0.0).to_string(), "254+0");
    }

    #[test]
    fn test_parse_format_round_trip() {
        let points = [
            SurveyPoint::new(254.0, 19.0),
            SurveyPoint::new(254.0, 19.4),
            SurveyPoint::new(0.0, 0.0),
            SurveyPoint::new(300.0, 7.125),
            SurveyPoint::new(1.0, 0.1),
        ];
        for p in points {
            assert_eq!(SurveyPoint::parse(&p.to_string()).unwrap(), p);
        }
    }

    #[test]
    fn test_reference_value_default() {
        assert_eq!(SurveyReference::default().reference_value(), 5104.0);
    }

    #[test]
    fn test_distance_from_entrance() {
        let reference = SurveyReference::default();
        let p = SurveyPoint::new(254.0, 19.4);
        assert_abs_diff_eq!(reference.linear_value(&p), 5099.4, epsilon = 1e-9);
        assert_abs_diff_eq!(reference.distance_from_entrance(&p), 4.6, epsilon = 1e-9);
        assert_eq!(
            reference.distance_from_entrance(&p),
            reference.reference_value() - reference.linear_value(&p)
        );
    }

    #[test]
    fn test_distance_custom_factor() {
        let reference = SurveyReference {
            major: 100.0,
            minor: 0.0,
            conversion_factor: 100.0,
        };
        assert_eq!(reference.locate("90+50").unwrap(), 950.0);
    }

    #[test]
    fn test_locate_propagates_format_error() {
        assert!(SurveyReference::default().locate("no plus").is_err());
    }
}
