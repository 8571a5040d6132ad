use std::f64::consts::{PI, TAU};

use crate::{
    foundation::error::{FolioError, FolioResult},
    helix::rotation::RotationState,
};

/// One strand sample: side-projected position plus the `z` depth cue in `[-1, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StrandPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl StrandPoint {
    /// Facing the viewer (full emphasis).
    pub fn is_front(&self) -> bool {
        self.z > 0.0
    }

    pub fn to_point(self) -> kurbo::Point {
        kurbo::Point::new(self.x, self.y)
    }
}

/// Both strands at one index along the helix. Strand 2 is the antipode of strand 1.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HelixPoint {
    pub strand1: StrandPoint,
    pub strand2: StrandPoint,
}

/// Circular double helix viewed as an orthographic side projection.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct HelixGeometry {
    pub point_count: usize,
    pub radius: f64,
    pub span_height: f64,
    pub turns: f64,
    pub center_x: f64,
    pub vertical_offset: f64,
}

impl Default for HelixGeometry {
    fn default() -> Self {
        Self {
            point_count: 24,
            radius: 65.0,
            span_height: 320.0,
            turns: 2.0,
            center_x: 165.0,
            vertical_offset: 0.0,
        }
    }
}

impl HelixGeometry {
    pub fn validate(&self) -> FolioResult<()> {
        if self.point_count == 0 || self.point_count % 2 != 0 {
            return Err(FolioError::validation(format!(
                "helix point_count must be even and > 0 (got {})",
                self.point_count
            )));
        }
        for (name, v) in [
            ("radius", self.radius),
            ("span_height", self.span_height),
            ("turns", self.turns),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(FolioError::validation(format!(
                    "helix {name} must be finite and > 0 (got {v})"
                )));
            }
        }
        if !self.center_x.is_finite() || !self.vertical_offset.is_finite() {
            return Err(FolioError::validation("helix center must be finite"));
        }
        Ok(())
    }

    /// Recompute every point for the given rotation.
    pub fn project(&self, rotation: &RotationState) -> Vec<HelixPoint> {
        project(self, rotation.angle_degrees())
    }
}

/// Project the helix at `rotation_deg`.
///
/// For index `i`: `t = (i / n) * turns * 2π`, `angle = t + rotation`. Strand 1 sits at
/// `cos(angle) * radius` around `center_x` with `z = sin(angle)`; strand 2 uses `angle + π`.
/// Both share `y = (i / n) * span_height + vertical_offset`.
pub fn project(geometry: &HelixGeometry, rotation_deg: f64) -> Vec<HelixPoint> {
    let n = geometry.point_count;
    let rotation = rotation_deg.to_radians();
    (0..n)
        .map(|i| {
            let frac = i as f64 / n as f64;
            let angle = frac * geometry.turns * TAU + rotation;
            let y = frac * geometry.span_height + geometry.vertical_offset;
            let strand = |a: f64| StrandPoint {
                x: geometry.center_x + a.cos() * geometry.radius,
                y,
                z: a.sin(),
            };
            HelixPoint {
                strand1: strand(angle),
                strand2: strand(angle + PI),
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/helix/geometry.rs"]
mod tests;
