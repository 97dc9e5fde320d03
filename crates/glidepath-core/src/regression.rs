// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::input::Fix;
use crate::{PlannerError, NM_TO_FT};
use serde::Serialize;

/// Best-fit descent line through the step-down fixes, in the threshold frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FittedGlidePath {
    /// Rise over run, feet per foot.
    pub slope: f64,
    pub angle_degrees: f64,
    pub percent_grade: f64,
    /// Number of fixes that survived the threshold filter.
    pub points_used: usize,
}

impl FittedGlidePath {
    pub fn from_slope(slope: f64, points_used: usize) -> Self {
        Self {
            slope,
            angle_degrees: slope.atan().to_degrees(),
            percent_grade: slope * 100.0,
            points_used,
        }
    }

    pub fn angle_radians(&self) -> f64 {
        self.angle_degrees.to_radians()
    }
}

#[derive(Default)]
struct Sums {
    n: usize,
    x: f64,
    y: f64,
    xy: f64,
    x2: f64,
}

impl Sums {
    fn add(&mut self, x: f64, y: f64) {
        self.n += 1;
        self.x += x;
        self.y += y;
        self.xy += x * y;
        self.x2 += x * x;
    }
}

/// Ground distance from the threshold (ft) and height above it (ft) for a fix.
pub fn threshold_frame(fix: &Fix, threshold_elevation: f64, dme_at_threshold: f64) -> (f64, f64) {
    (
        (fix.slant_distance - dme_at_threshold) * NM_TO_FT,
        fix.altitude - threshold_elevation,
    )
}

/// Ordinary least-squares slope of height against ground distance.
///
/// Fixes at or behind the threshold, or at or below its elevation, take no part
/// in the fit. The result must describe a descent: a zero denominator, or a
/// slope that is not strictly positive, is reported as [`PlannerError::DegenerateFit`].
pub fn fit_glide_path(
    fixes: &[Fix],
    threshold_elevation: f64,
    dme_at_threshold: f64,
) -> Result<FittedGlidePath, PlannerError> {
    let mut sums = Sums::default();
    for fix in fixes {
        let (x, y) = threshold_frame(fix, threshold_elevation, dme_at_threshold);
        if x > 0.0 && y > 0.0 {
            sums.add(x, y);
        } else {
            log::debug!(
                "Fix excluded from fit — altitude={} distance={} ground_ft={:.1} height_ft={:.1}",
                fix.altitude,
                fix.slant_distance,
                x,
                y
            );
        }
    }

    if sums.n < 2 {
        return Err(PlannerError::InsufficientValidFixes { usable: sums.n });
    }

    let n = sums.n as f64;
    let denominator = n * sums.x2 - sums.x * sums.x;
    // Identical ground distances cancel to zero only up to rounding.
    if denominator.abs() <= 1e-9 * n * sums.x2 {
        return Err(PlannerError::DegenerateFit);
    }

    let slope = (n * sums.xy - sums.x * sums.y) / denominator;
    if !slope.is_finite() || slope <= 0.0 {
        log::debug!("Rejected non-descending fit — slope={}", slope);
        return Err(PlannerError::DegenerateFit);
    }

    Ok(FittedGlidePath::from_slope(slope, sums.n))
}
