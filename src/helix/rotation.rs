use crate::foundation::{
    error::{FolioError, FolioResult},
    math::normalize_degrees,
};

/// Shared helix rotation, always in `[0, 360)`.
///
/// Only [`RotationTicker`] mutates it; every helix consumer receives it by reference each
/// frame so all of them stay in sync.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RotationState {
    angle_degrees: f64,
}

impl RotationState {
    pub fn new(angle_degrees: f64) -> Self {
        Self {
            angle_degrees: normalize_degrees(angle_degrees),
        }
    }

    pub fn angle_degrees(&self) -> f64 {
        self.angle_degrees
    }

    pub fn angle_radians(&self) -> f64 {
        self.angle_degrees.to_radians()
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// Fixed-step rotation driver.
///
/// The angle is derived from the tick count rather than accumulated, so long runs don't
/// drift: after `n` ticks the angle is exactly `normalize(n * step)`.
#[derive(Clone, Debug)]
pub struct RotationTicker {
    step_degrees: f64,
    ticks: u64,
    state: RotationState,
}

impl RotationTicker {
    pub fn new(step_degrees: f64) -> FolioResult<Self> {
        if !step_degrees.is_finite() {
            return Err(FolioError::validation(format!(
                "rotation step must be finite (got {step_degrees})"
            )));
        }
        Ok(Self {
            step_degrees,
            ticks: 0,
            state: RotationState::default(),
        })
    }

    pub fn step_degrees(&self) -> f64 {
        self.step_degrees
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn state(&self) -> &RotationState {
        &self.state
    }

    pub fn tick(&mut self) -> RotationState {
        self.advance_by(1)
    }

    pub fn advance_by(&mut self, n: u64) -> RotationState {
        self.ticks = self.ticks.wrapping_add(n);
        self.state = RotationState::new(self.ticks as f64 * self.step_degrees);
        self.state
    }
}

#[cfg(test)]
#[path = "../../tests/unit/helix/rotation.rs"]
mod tests;
