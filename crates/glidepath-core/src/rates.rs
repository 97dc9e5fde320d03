// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::NM_TO_FT;
use serde::{Serialize, Serializer};
use std::fmt;

pub const DEFAULT_GROUNDSPEEDS_KT: [u32; 5] = [80, 100, 120, 140, 160];

/// Time to fly a leg, held in whole seconds and shown as `MM:SS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeToFly {
    seconds: u32,
}

impl TimeToFly {
    /// Rounds to the nearest second first, so 1:59.7 reads "02:00" rather than "01:60".
    pub fn from_minutes(minutes: f64) -> Self {
        let seconds = (minutes * 60.0).round();
        let seconds = if seconds.is_finite() && seconds > 0.0 {
            seconds.min(u32::MAX as f64) as u32
        } else {
            0
        };
        Self { seconds }
    }

    pub fn for_leg(distance_nm: f64, groundspeed_kt: u32) -> Self {
        Self::from_minutes(distance_nm / f64::from(groundspeed_kt) * 60.0)
    }

    pub fn total_seconds(&self) -> u32 {
        self.seconds
    }
}

impl fmt::Display for TimeToFly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.seconds / 60, self.seconds % 60)
    }
}

impl Serialize for TimeToFly {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedRow {
    pub groundspeed: u32,
    /// ft/min, rounded to the nearest 10.
    pub descent_rate: i32,
    pub time_to_fly: TimeToFly,
}

/// Vertical speed needed to hold `angle_degrees` at `groundspeed_kt`.
pub fn descent_rate_fpm(angle_degrees: f64, groundspeed_kt: u32) -> i32 {
    let fpm = f64::from(groundspeed_kt) / 60.0 * NM_TO_FT * angle_degrees.to_radians().tan();
    ((fpm / 10.0).round() * 10.0) as i32
}

/// Descent gradient in feet per nautical mile, independent of groundspeed.
pub fn feet_per_nm(slope: f64) -> i32 {
    (slope * NM_TO_FT).round() as i32
}

pub fn build_rate_table(
    angle_degrees: f64,
    distance_nm: f64,
    groundspeeds_kt: &[u32],
) -> Vec<DerivedRow> {
    groundspeeds_kt
        .iter()
        .filter(|gs| **gs > 0)
        .map(|&gs| DerivedRow {
            groundspeed: gs,
            descent_rate: descent_rate_fpm(angle_degrees, gs),
            time_to_fly: TimeToFly::for_leg(distance_nm, gs),
        })
        .collect()
}
