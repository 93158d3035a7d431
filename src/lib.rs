//! Particle and spring-constraint force solver.
//!
//! Particles live in an index-based arena and are referenced by handle. Each
//! step, constraints read the particles they bind and add forces to their
//! accumulators; an integrator then consumes the accumulated force and clears
//! it. `ParticleWorld` wires those phases together for hosts that want a ready
//! step loop.

pub mod math;
pub mod core;
pub mod particles;
pub mod constraints;
pub mod integration;
pub mod render;

/// Re-export common types for easier usage
pub use crate::core::{ParticleWorld, SimulationConfig, ParticleHandle, ConstraintHandle, ParticleStorage};
pub use crate::particles::{Particle, ParticleFlags};
pub use crate::constraints::{Constraint, ConstraintForces, Spring, Bungee, SpringConfig, DegeneratePolicy};
pub use crate::math::Vector2;

/// Error types for the spring solver
pub mod error {
    use thiserror::Error;

    #[derive(Error, Debug, Clone, PartialEq)]
    pub enum PhysicsError {
        #[error("Invalid configuration: {0}")]
        InvalidConfiguration(String),

        #[error("Degenerate geometry: bound particles are {distance} apart")]
        DegenerateGeometry { distance: f32 },

        #[error("Dangling reference: {0}")]
        DanglingReference(String),

        #[error("Resource not found: {0}")]
        ResourceNotFound(String),
    }
}

/// Result type for solver operations
pub type Result<T> = std::result::Result<T, error::PhysicsError>;

/// Crate version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
