//! A-vs-E attribution: large-loss vs attritional claim movement
//!
//! Answers whether a cohort's movement since the prior evaluation comes from
//! a few big claims or from broad attritional drift.

use crate::dataset::{ClaimMovement, DatasetIndex};
use serde::{Deserialize, Serialize};

/// Movement split for one cohort
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribution {
    pub cohort: String,
    pub total_movement: f64,
    pub large_loss_movement: f64,
    pub attritional_movement: f64,
    /// Large-loss share of total movement in percent, 0 when total is 0
    pub large_pct: f64,
    pub large_loss_count: usize,
    pub attritional_count: usize,
    pub total_count: usize,
    /// Large-loss threshold of the class, `None` when not configured
    pub threshold: Option<f64>,
}

/// Split a cohort's claim movement at the class's large-loss threshold
///
/// Without a configured threshold every claim is attritional.
pub fn attribute(index: &DatasetIndex, class: &str, cohort: &str) -> Attribution {
    let threshold = index.large_loss_threshold(class);
    let claims = index.claims_for_cohort(class, cohort);

    let (large, attritional): (Vec<&ClaimMovement>, Vec<&ClaimMovement>) = claims
        .iter()
        .copied()
        .partition(|c| threshold.is_some_and(|t| c.is_large(t)));

    let large_loss_movement: f64 = large.iter().map(|c| c.movement()).sum();
    let attritional_movement: f64 = attritional.iter().map(|c| c.movement()).sum();
    let total_movement = large_loss_movement + attritional_movement;

    let large_pct = if total_movement == 0.0 {
        0.0
    } else {
        large_loss_movement / total_movement * 100.0
    };

    Attribution {
        cohort: cohort.to_string(),
        total_movement,
        large_loss_movement,
        attritional_movement,
        large_pct,
        large_loss_count: large.len(),
        attritional_count: attritional.len(),
        total_count: claims.len(),
        threshold,
    }
}

/// The `n` claims with the largest absolute movement, biggest first
pub fn largest_movements<'a>(index: &'a DatasetIndex, class: &str, cohort: &str, n: usize) -> Vec<&'a ClaimMovement> {
    let mut claims = index.claims_for_cohort(class, cohort);
    claims.sort_by(|a, b| b.movement().abs().total_cmp(&a.movement().abs()));
    claims.truncate(n);
    claims
}
