use crate::error::PhysicsError;
use crate::math::Vector2;
use crate::Result;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Configuration parameters for the reference simulation loop
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize), serde(default, deny_unknown_fields))]
pub struct SimulationConfig {
    /// The fixed time step for the simulation
    pub time_step: f32,

    /// The maximum number of substeps for variable time step simulation
    pub max_substeps: u32,

    /// Constant acceleration applied to particles flagged as affected by gravity
    pub gravity: Vector2,

    /// Global damping factor for linear velocity
    pub linear_damping: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            time_step: 1.0 / 60.0,
            max_substeps: 10,
            gravity: Vector2::zero(),
            linear_damping: 0.0,
        }
    }
}

impl SimulationConfig {
    /// Checks that the configuration describes a runnable simulation
    pub fn validate(&self) -> Result<()> {
        if !self.time_step.is_finite() || self.time_step <= 0.0 {
            return Err(PhysicsError::InvalidConfiguration(format!(
                "time step must be positive and finite, got {}",
                self.time_step
            )));
        }
        if self.max_substeps == 0 {
            return Err(PhysicsError::InvalidConfiguration(
                "max substeps must be at least 1".to_string(),
            ));
        }
        if !self.gravity.is_finite() {
            return Err(PhysicsError::InvalidConfiguration(format!(
                "gravity must be finite, got {}",
                self.gravity
            )));
        }
        if !self.linear_damping.is_finite() || self.linear_damping < 0.0 {
            return Err(PhysicsError::InvalidConfiguration(format!(
                "linear damping must be non-negative, got {}",
                self.linear_damping
            )));
        }
        Ok(())
    }
}
