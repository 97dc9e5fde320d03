// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::PlannerError;
use serde::{Deserialize, Serialize};

/// A form value as typed by the user: either already numeric or free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl RawValue {
    /// Returns the value only when it is a finite number. Text must parse in full
    /// after trimming; "12abc" is rejected rather than read as 12.
    pub fn as_finite(&self) -> Option<f64> {
        let value = match self {
            RawValue::Number(n) => *n,
            RawValue::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

fn finite(value: &Option<RawValue>) -> Option<f64> {
    value.as_ref().and_then(RawValue::as_finite)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFix {
    #[serde(default)]
    pub altitude: Option<RawValue>,
    #[serde(default)]
    pub distance: Option<RawValue>,
}

impl RawFix {
    pub fn new(altitude: impl Into<RawValue>, distance: impl Into<RawValue>) -> Self {
        Self {
            altitude: Some(altitude.into()),
            distance: Some(distance.into()),
        }
    }
}

/// Which scalar supplies the distance flown from the FAF to the MAPt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMode {
    /// FAF-to-MAPt ground distance entered directly (NM).
    #[default]
    FafToMapt,
    /// MAPt altitude entered; the distance is derived from the fitted path.
    MaptAltitude,
}

/// The approach form as collected, before any validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawApproach {
    #[serde(default)]
    pub runway: String,
    #[serde(default)]
    pub threshold_elevation: Option<RawValue>,
    #[serde(default)]
    pub dme_at_threshold: Option<RawValue>,
    #[serde(default)]
    pub start_altitude: Option<RawValue>,
    #[serde(default)]
    pub minimum_descent_altitude: Option<RawValue>,
    #[serde(default)]
    pub distance_mode: DistanceMode,
    #[serde(default)]
    pub faf_to_mapt_distance: Option<RawValue>,
    #[serde(default)]
    pub mapt_altitude: Option<RawValue>,
    #[serde(default)]
    pub fixes: Vec<RawFix>,
}

/// A step-down fix: altitude in ft MSL at a DME slant range in NM.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fix {
    pub altitude: f64,
    pub slant_distance: f64,
}

impl Fix {
    pub fn new(altitude: f64, slant_distance: f64) -> Self {
        Self {
            altitude,
            slant_distance,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.altitude.is_finite() && self.slant_distance.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "mode", content = "value", rename_all = "snake_case")]
pub enum DistanceToFly {
    FafToMapt(f64),
    MaptAltitude(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApproachParameters {
    pub runway: String,
    pub threshold_elevation: f64,
    pub dme_at_threshold: f64,
    /// Display only.
    pub start_altitude: Option<f64>,
    pub minimum_descent_altitude: f64,
    pub distance_to_fly: DistanceToFly,
}

impl ApproachParameters {
    /// Same checks, in the same order, as [`RawApproach::normalize`] applies to
    /// form input. Non-finite numbers count as missing.
    pub fn validate(&self) -> Result<(), PlannerError> {
        let required = [
            (self.threshold_elevation, "threshold elevation"),
            (self.dme_at_threshold, "DME at threshold"),
            (self.minimum_descent_altitude, "minimum descent altitude"),
        ];
        for (value, name) in required {
            if !value.is_finite() {
                return Err(PlannerError::MissingParameter(name));
            }
        }

        match self.distance_to_fly {
            DistanceToFly::FafToMapt(nm) if !nm.is_finite() => {
                Err(PlannerError::MissingParameter("FAF to MAPt distance"))
            }
            DistanceToFly::FafToMapt(nm) if nm < 0.0 => Err(PlannerError::InvalidParameter {
                name: "FAF to MAPt distance",
                reason: format!("{} NM is negative", nm),
            }),
            DistanceToFly::MaptAltitude(alt) if !alt.is_finite() => {
                Err(PlannerError::MissingParameter("MAPt altitude"))
            }
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatedApproach {
    pub parameters: ApproachParameters,
    pub fixes: Vec<Fix>,
}

impl RawApproach {
    /// Validates the scalar fields and keeps every fix row whose altitude and
    /// distance are both finite numbers. Incomplete rows are dropped silently.
    pub fn normalize(&self) -> Result<ValidatedApproach, PlannerError> {
        let threshold_elevation = finite(&self.threshold_elevation)
            .ok_or(PlannerError::MissingParameter("threshold elevation"))?;
        let dme_at_threshold = finite(&self.dme_at_threshold)
            .ok_or(PlannerError::MissingParameter("DME at threshold"))?;
        let minimum_descent_altitude = finite(&self.minimum_descent_altitude)
            .ok_or(PlannerError::MissingParameter("minimum descent altitude"))?;

        let distance_to_fly = match self.distance_mode {
            DistanceMode::FafToMapt => DistanceToFly::FafToMapt(
                finite(&self.faf_to_mapt_distance)
                    .ok_or(PlannerError::MissingParameter("FAF to MAPt distance"))?,
            ),
            DistanceMode::MaptAltitude => DistanceToFly::MaptAltitude(
                finite(&self.mapt_altitude)
                    .ok_or(PlannerError::MissingParameter("MAPt altitude"))?,
            ),
        };

        let parameters = ApproachParameters {
            runway: self.runway.trim().to_string(),
            threshold_elevation,
            dme_at_threshold,
            start_altitude: finite(&self.start_altitude),
            minimum_descent_altitude,
            distance_to_fly,
        };
        parameters.validate()?;

        let fixes: Vec<Fix> = self
            .fixes
            .iter()
            .enumerate()
            .filter_map(|(row, raw)| {
                match (finite(&raw.altitude), finite(&raw.distance)) {
                    (Some(altitude), Some(distance)) => Some(Fix::new(altitude, distance)),
                    _ => {
                        log::debug!("Dropping incomplete fix row {} — {:?}", row, raw);
                        None
                    }
                }
            })
            .collect();

        if fixes.len() < 2 {
            return Err(PlannerError::InsufficientFixes { found: fixes.len() });
        }

        Ok(ValidatedApproach { parameters, fixes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> RawApproach {
        RawApproach {
            runway: " RWY 09 ".to_string(),
            threshold_elevation: Some("1200".into()),
            dme_at_threshold: Some("1.0".into()),
            start_altitude: Some("".into()),
            minimum_descent_altitude: Some(1800.0.into()),
            distance_mode: DistanceMode::FafToMapt,
            faf_to_mapt_distance: Some("4.2".into()),
            mapt_altitude: None,
            fixes: vec![
                RawFix::new("5000", "12.0"),
                RawFix::new("", "8.3"),
                RawFix::new("3400", "abc"),
                RawFix::new(2360.0, 2.8),
            ],
        }
    }

    #[test]
    fn test_raw_value_parsing() {
        assert_eq!(RawValue::from(" 12.5 ").as_finite(), Some(12.5));
        assert_eq!(RawValue::from("-0.4").as_finite(), Some(-0.4));
        assert_eq!(RawValue::from("12abc").as_finite(), None);
        assert_eq!(RawValue::from("").as_finite(), None);
        assert_eq!(RawValue::from("NaN").as_finite(), None);
        assert_eq!(RawValue::from("inf").as_finite(), None);
        assert_eq!(RawValue::Number(f64::INFINITY).as_finite(), None);
    }

    #[test]
    fn test_normalize_drops_partial_rows() {
        let approach = form().normalize().unwrap();
        assert_eq!(
            approach.fixes,
            vec![Fix::new(5000.0, 12.0), Fix::new(2360.0, 2.8)]
        );
        assert_eq!(approach.parameters.runway, "RWY 09");
        assert_eq!(approach.parameters.start_altitude, None);
        assert_eq!(
            approach.parameters.distance_to_fly,
            DistanceToFly::FafToMapt(4.2)
        );
    }

    #[test]
    fn test_normalize_insufficient_fixes() {
        let mut raw = form();
        raw.fixes.pop();
        assert_eq!(
            raw.normalize().unwrap_err(),
            PlannerError::InsufficientFixes { found: 1 }
        );
    }

    #[test]
    fn test_normalize_missing_parameters() {
        let mut raw = form();
        raw.threshold_elevation = None;
        assert_eq!(
            raw.normalize().unwrap_err(),
            PlannerError::MissingParameter("threshold elevation")
        );

        let mut raw = form();
        raw.dme_at_threshold = Some("x".into());
        assert_eq!(
            raw.normalize().unwrap_err(),
            PlannerError::MissingParameter("DME at threshold")
        );

        let mut raw = form();
        raw.minimum_descent_altitude = Some(f64::NAN.into());
        assert_eq!(
            raw.normalize().unwrap_err(),
            PlannerError::MissingParameter("minimum descent altitude")
        );

        let mut raw = form();
        raw.faf_to_mapt_distance = None;
        assert_eq!(
            raw.normalize().unwrap_err(),
            PlannerError::MissingParameter("FAF to MAPt distance")
        );
    }

    #[test]
    fn test_normalize_mapt_altitude_mode() {
        let mut raw = form();
        raw.distance_mode = DistanceMode::MaptAltitude;
        raw.faf_to_mapt_distance = None;
        assert_eq!(
            raw.normalize().unwrap_err(),
            PlannerError::MissingParameter("MAPt altitude")
        );

        raw.mapt_altitude = Some("1250".into());
        let approach = raw.normalize().unwrap();
        assert_eq!(
            approach.parameters.distance_to_fly,
            DistanceToFly::MaptAltitude(1250.0)
        );
    }

    #[test]
    fn test_normalize_negative_distance_to_fly() {
        let mut raw = form();
        raw.faf_to_mapt_distance = Some("-1".into());
        assert!(matches!(
            raw.normalize(),
            Err(PlannerError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_parameters_validate() {
        let params = form().normalize().unwrap().parameters;
        assert_eq!(params.validate(), Ok(()));

        let mut bad = params.clone();
        bad.dme_at_threshold = f64::INFINITY;
        assert_eq!(
            bad.validate(),
            Err(PlannerError::MissingParameter("DME at threshold"))
        );

        let mut bad = params.clone();
        bad.distance_to_fly = DistanceToFly::MaptAltitude(f64::NAN);
        assert_eq!(
            bad.validate(),
            Err(PlannerError::MissingParameter("MAPt altitude"))
        );

        let mut bad = params;
        bad.distance_to_fly = DistanceToFly::FafToMapt(-0.5);
        assert!(matches!(
            bad.validate(),
            Err(PlannerError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_fix_is_finite() {
        assert!(Fix::new(3000.0, 6.0).is_finite());
        assert!(!Fix::new(f64::NAN, 6.0).is_finite());
        assert!(!Fix::new(3000.0, f64::NEG_INFINITY).is_finite());
    }

    #[test]
    fn test_raw_approach_from_json() {
        let json = r#"{
            "runway": "RWY 27",
            "threshold_elevation": 1200,
            "dme_at_threshold": "1.0",
            "minimum_descent_altitude": 1800,
            "faf_to_mapt_distance": 3.5,
            "fixes": [
                {"altitude": 5000, "distance": 12.0},
                {"altitude": "4000", "distance": "8.3"},
                {"distance": 6.1}
            ]
        }"#;
        let raw: RawApproach = serde_json::from_str(json).unwrap();
        assert_eq!(raw.distance_mode, DistanceMode::FafToMapt);
        let approach = raw.normalize().unwrap();
        assert_eq!(approach.fixes.len(), 2);
        assert_eq!(approach.parameters.dme_at_threshold, 1.0);
    }
}
