// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Plot-ready series for the descent profile chart. The renderer itself lives
//! outside this crate; it draws whatever [`ProfileChart`] currently holds.

use crate::config::PlannerConfig;
use crate::input::{ApproachParameters, Fix};
use crate::GlidePathResult;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlotPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesKind {
    Line,
    DashedLine,
    Scatter,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub label: String,
    pub kind: SeriesKind,
    pub points: Vec<PlotPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub title: String,
    pub reversed: bool,
}

/// Caller-owned chart state. Each [`ProfileChart::update`] discards the
/// previous series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileChart {
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub series: Vec<Series>,
}

impl Default for ProfileChart {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileChart {
    pub fn new() -> Self {
        Self {
            x_axis: Axis {
                title: "DME Distance (NM)".to_string(),
                reversed: true,
            },
            y_axis: Axis {
                title: "Altitude (ft)".to_string(),
                reversed: false,
            },
            series: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn clear(&mut self) {
        self.series.clear();
    }

    pub fn update(
        &mut self,
        params: &ApproachParameters,
        fixes: &[Fix],
        result: &GlidePathResult,
        config: &PlannerConfig,
    ) {
        let mda = params.minimum_descent_altitude;
        self.series = vec![
            Series {
                label: format!("Ideal Descent Path ({:.2}°)", result.fit.angle_degrees),
                kind: SeriesKind::Line,
                points: result
                    .checkpoints
                    .iter()
                    .map(|c| PlotPoint {
                        x: c.distance,
                        y: f64::from(c.altitude),
                    })
                    .collect(),
            },
            Series {
                label: "Step-Down Fixes (SDF)".to_string(),
                kind: SeriesKind::Scatter,
                points: fixes
                    .iter()
                    .map(|f| PlotPoint {
                        x: f.slant_distance,
                        y: f.altitude,
                    })
                    .collect(),
            },
            Series {
                label: "MDA".to_string(),
                kind: SeriesKind::DashedLine,
                points: vec![
                    PlotPoint {
                        x: config.mda_line_extent_nm,
                        y: mda,
                    },
                    PlotPoint { x: 0.0, y: mda },
                ],
            },
            Series {
                label: "Threshold".to_string(),
                kind: SeriesKind::Scatter,
                points: vec![PlotPoint {
                    x: params.dme_at_threshold,
                    y: params.threshold_elevation,
                }],
            },
        ];
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
