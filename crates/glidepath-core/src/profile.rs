// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::input::{ApproachParameters, Fix};
use crate::regression::FittedGlidePath;
use crate::{PlannerError, NM_TO_FT};
use serde::Serialize;

/// One row of the DME table: what the DME reads and the altitude to be at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Checkpoint {
    pub distance: f64,
    /// Rounded to the nearest 10 ft.
    pub altitude: i32,
}

/// Why checkpoint generation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    TableFull,
    PastThreshold,
    BelowMda,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckpointTable {
    pub checkpoints: Vec<Checkpoint>,
    pub stop_reason: StopReason,
}

pub fn round_to_ten(feet: f64) -> i32 {
    ((feet / 10.0).round() * 10.0) as i32
}

/// Straight-line DME reading for a ground distance and height, both in NM.
pub fn slant_range_nm(ground_nm: f64, height_nm: f64) -> f64 {
    ground_nm.hypot(height_nm)
}

/// Ground projection of a slant range lying on a line of the given slope.
pub fn slant_to_ground_nm(slant_nm: f64, slope: f64) -> f64 {
    slant_nm / (1.0 + slope * slope).sqrt()
}

/// The final approach fix is the outermost fix. Ties on distance go to the
/// higher altitude, then to the first one listed.
pub fn select_faf(fixes: &[Fix]) -> Option<Fix> {
    fixes.iter().copied().reduce(|best, fix| {
        if fix.slant_distance > best.slant_distance
            || (fix.slant_distance == best.slant_distance && fix.altitude > best.altitude)
        {
            fix
        } else {
            best
        }
    })
}

/// Walks inbound from the FAF one whole DME mile at a time, placing each
/// reading on the fitted path, until the table holds `max_checkpoints` rows,
/// the next reading lies past the threshold, or it would be under the MDA.
///
/// The FAF row is always first and carries the published altitude; it counts
/// toward `max_checkpoints` and is emitted even for a cap of 0. The
/// inbound walk starts at `floor(FAF distance)`, so a FAF on a whole mile is
/// followed by an ideal-path row at the same reading.
pub fn generate_checkpoints(
    faf: &Fix,
    fit: &FittedGlidePath,
    params: &ApproachParameters,
    max_checkpoints: usize,
) -> CheckpointTable {
    let mut checkpoints = vec![Checkpoint {
        distance: faf.slant_distance,
        altitude: round_to_ten(faf.altitude),
    }];
    let mut stop_reason = StopReason::TableFull;
    let mut dme = faf.slant_distance.floor();

    // Each pass emits or stops, so the range bounds the walk.
    for _ in 1..max_checkpoints {
        let ground_from_threshold_ft =
            (slant_to_ground_nm(dme, fit.slope) - params.dme_at_threshold) * NM_TO_FT;
        if ground_from_threshold_ft < 0.0 {
            stop_reason = StopReason::PastThreshold;
            break;
        }

        let ideal_altitude = params.threshold_elevation + ground_from_threshold_ft * fit.slope;
        let altitude = round_to_ten(ideal_altitude);
        if ideal_altitude < params.minimum_descent_altitude
            || f64::from(altitude) < params.minimum_descent_altitude
        {
            stop_reason = StopReason::BelowMda;
            break;
        }

        checkpoints.push(Checkpoint {
            distance: dme,
            altitude,
        });
        dme -= 1.0;
    }

    log::debug!(
        "Checkpoint walk finished — rows={} reason={:?} last_dme={}",
        checkpoints.len(),
        stop_reason,
        dme
    );

    CheckpointTable {
        checkpoints,
        stop_reason,
    }
}

/// Ground distance (NM) from the FAF to the point where the fitted path
/// reaches `mapt_altitude`. A MAPt 50 ft above the threshold models the usual
/// threshold crossing height.
pub fn derive_faf_to_mapt_distance(
    faf: &Fix,
    fit: &FittedGlidePath,
    threshold_elevation: f64,
    dme_at_threshold: f64,
    mapt_altitude: f64,
) -> Result<f64, PlannerError> {
    let mapt_height = mapt_altitude - threshold_elevation;
    if mapt_height <= 0.0 {
        return Err(PlannerError::InvalidParameter {
            name: "MAPt altitude",
            reason: format!(
                "{} ft is not above the threshold elevation of {} ft",
                mapt_altitude, threshold_elevation
            ),
        });
    }

    let mapt_ground_nm = mapt_height / fit.slope / NM_TO_FT;
    let faf_ground_nm = slant_to_ground_nm(faf.slant_distance, fit.slope) - dme_at_threshold;
    let distance = faf_ground_nm - mapt_ground_nm;
    if distance < 0.0 {
        return Err(PlannerError::InvalidParameter {
            name: "MAPt altitude",
            reason: format!("{} ft lies outside the final approach fix", mapt_altitude),
        });
    }
    Ok(distance)
}
