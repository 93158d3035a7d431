use crate::constraints::{Constraint, ConstraintForces, Spring, SpringConfig};
use crate::core::{ParticleHandle, ParticleStorage};
use crate::render::{Color, StrokeStyle, Surface};
use crate::Result;
use std::any::Any;

/// Visual style of a bungee: thinner than a spring
pub const BUNGEE_STYLE: StrokeStyle = StrokeStyle {
    line_width: 4.0,
    color: Color::WHITE,
    alpha_factor: 0.5,
};

/// A spring that only pulls: no force of any kind while slack (`distance <= resting_distance`)
#[derive(Debug, Clone)]
pub struct Bungee {
    /// The internal spring used for the bungee implementation
    spring: Spring,
}

impl Bungee {
    /// Creates a bungee between two distinct particles of `particles`
    pub fn new(
        p1: ParticleHandle,
        p2: ParticleHandle,
        config: SpringConfig,
        particles: &ParticleStorage,
    ) -> Result<Self> {
        Ok(Self {
            spring: Spring::new(p1, p2, config, particles)?,
        })
    }

    /// Returns the spring used while the bungee is taut
    pub fn spring(&self) -> &Spring {
        &self.spring
    }

    /// Returns whether the endpoints are farther apart than the resting distance
    pub fn is_taut(&self, particles: &ParticleStorage) -> Result<bool> {
        Ok(self.spring.extension(particles)? > 0.0)
    }
}

impl Constraint for Bungee {
    fn constraint_type(&self) -> &'static str {
        "Bungee"
    }

    fn get_particles(&self) -> &[ParticleHandle] {
        self.spring.get_particles()
    }

    fn compute_forces(&self, particles: &ParticleStorage) -> Result<ConstraintForces> {
        let (a, b) = self.spring.endpoints(particles)?;

        // Coincident endpoints are slack too, so they never reach the degenerate check
        if a.position().distance(&b.position()) <= self.spring.get_resting_distance() {
            return Ok(ConstraintForces::new());
        }

        let geometry = self.spring.geometry(a, b)?;
        Ok(self.spring.forces_from(a, b, &geometry))
    }

    fn draw(&self, particles: &ParticleStorage, surface: &mut dyn Surface) {
        if let Ok((a, b)) = self.spring.endpoints(particles) {
            BUNGEE_STYLE.draw_segment(surface, a.position(), b.position());
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn clone_constraint(&self) -> Box<dyn Constraint> {
        Box::new(self.clone())
    }
}
