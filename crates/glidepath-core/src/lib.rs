// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

pub mod chart;
pub mod config;
pub mod export;
pub mod input;
pub mod profile;
pub mod rates;
pub mod regression;

use serde::Serialize;
use thiserror::Error;

pub use config::PlannerConfig;
pub use input::{
    ApproachParameters, DistanceMode, DistanceToFly, Fix, RawApproach, RawFix, RawValue,
    ValidatedApproach,
};
pub use profile::{Checkpoint, StopReason};
pub use rates::{DerivedRow, TimeToFly};
pub use regression::FittedGlidePath;

/// Feet in one nautical mile. All NM <-> ft conversions go through this value.
pub const NM_TO_FT: f64 = 6076.118;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlannerError {
    #[error("Missing or non-numeric parameter: {0}")]
    MissingParameter(&'static str),
    #[error("At least two valid step-down fixes are required (found {found})")]
    InsufficientFixes { found: usize },
    #[error(
        "Not enough step-down fixes beyond and above the threshold to fit a glide path (usable: {usable})"
    )]
    InsufficientValidFixes { usable: usize },
    #[error("Step-down fixes do not define a descending glide path")]
    DegenerateFit,
    #[error("Invalid {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Everything one "calculate" run produces. Rebuilt from scratch on every call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlidePathResult {
    pub runway: String,
    pub start_altitude: Option<f64>,
    pub fit: FittedGlidePath,
    pub faf: Fix,
    pub checkpoints: Vec<Checkpoint>,
    pub stop_reason: StopReason,
    pub distance_to_fly_nm: f64,
    pub feet_per_nm: i32,
    pub derived_rows: Vec<DerivedRow>,
}

pub struct GlidePathPlanner {
    config: PlannerConfig,
}

impl Default for GlidePathPlanner {
    fn default() -> Self {
        Self::new(PlannerConfig::default())
    }
}

impl GlidePathPlanner {
    /// The FAF row is always emitted, so a table cap below one row is raised
    /// to one.
    pub fn new(mut config: PlannerConfig) -> Self {
        if config.max_checkpoints == 0 {
            log::warn!("max_checkpoints of 0 raised to 1; the FAF row is always emitted");
            config.max_checkpoints = 1;
        }
        Self { config }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Normalizes raw form input and runs the full pipeline on it.
    pub fn calculate(
        &self,
        raw: &RawApproach,
    ) -> Result<(ValidatedApproach, GlidePathResult), PlannerError> {
        let approach = raw.normalize()?;
        let result = self.compute(&approach.fixes, &approach.parameters)?;
        Ok((approach, result))
    }

    pub fn compute(
        &self,
        fixes: &[Fix],
        params: &ApproachParameters,
    ) -> Result<GlidePathResult, PlannerError> {
        params.validate()?;

        let finite_fixes: Vec<Fix> = fixes.iter().copied().filter(Fix::is_finite).collect();
        if finite_fixes.len() < fixes.len() {
            log::debug!(
                "Ignoring {} non-finite fix(es)",
                fixes.len() - finite_fixes.len()
            );
        }
        let fixes = finite_fixes.as_slice();
        if fixes.len() < 2 {
            return Err(PlannerError::InsufficientFixes { found: fixes.len() });
        }

        let fit = regression::fit_glide_path(
            fixes,
            params.threshold_elevation,
            params.dme_at_threshold,
        )?;
        let faf = profile::select_faf(fixes).ok_or(PlannerError::InsufficientFixes {
            found: fixes.len(),
        })?;

        let table = profile::generate_checkpoints(&faf, &fit, params, self.config.max_checkpoints);

        let distance_to_fly_nm = match params.distance_to_fly {
            DistanceToFly::FafToMapt(nm) => nm,
            DistanceToFly::MaptAltitude(alt) => profile::derive_faf_to_mapt_distance(
                &faf,
                &fit,
                params.threshold_elevation,
                params.dme_at_threshold,
                alt,
            )?,
        };

        let derived_rows = rates::build_rate_table(
            fit.angle_degrees,
            distance_to_fly_nm,
            &self.config.groundspeeds_kt,
        );

        log::debug!(
            "Computed glide path — runway={} angle={:.2} checkpoints={} stop={:?}",
            params.runway,
            fit.angle_degrees,
            table.checkpoints.len(),
            table.stop_reason
        );

        Ok(GlidePathResult {
            runway: params.runway.clone(),
            start_altitude: params.start_altitude.filter(|alt| alt.is_finite()),
            feet_per_nm: rates::feet_per_nm(fit.slope),
            fit,
            faf,
            checkpoints: table.checkpoints,
            stop_reason: table.stop_reason,
            distance_to_fly_nm,
            derived_rows,
        })
    }
}

/// Runs the pipeline with the default table settings (8 checkpoints, 80-160 kt).
pub fn compute_glide_path(
    fixes: &[Fix],
    params: &ApproachParameters,
) -> Result<GlidePathResult, PlannerError> {
    GlidePathPlanner::default().compute(fixes, params)
}
