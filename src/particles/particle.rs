use crate::error::PhysicsError;
use crate::math::Vector2;
use crate::particles::ParticleFlags;
use crate::Result;

/// A point mass with a force accumulator.
///
/// Constraints only ever call [`Particle::apply_force`]; position and velocity
/// belong to the host integrator, which also clears the accumulator once it
/// has consumed it.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// The particle's position
    position: Vector2,

    /// The particle's velocity
    velocity: Vector2,

    /// The particle's mass, fixed at construction
    mass: f32,

    /// Inverse of the particle's mass (for efficiency)
    inv_mass: f32,

    /// Sum of the forces applied since the accumulator was last cleared
    force: Vector2,

    /// The particle's flags
    flags: ParticleFlags,
}

impl Particle {
    /// Creates a particle at rest. Mass must be positive and finite.
    pub fn new(position: Vector2, mass: f32) -> Result<Self> {
        if !mass.is_finite() || mass <= 0.0 {
            return Err(PhysicsError::InvalidConfiguration(format!(
                "particle mass must be positive and finite, got {}",
                mass
            )));
        }

        Ok(Self {
            position,
            velocity: Vector2::zero(),
            mass,
            inv_mass: 1.0 / mass,
            force: Vector2::zero(),
            flags: ParticleFlags::default(),
        })
    }

    /// Creates a unit-mass particle that the integrator never moves
    pub fn pinned(position: Vector2) -> Self {
        Self {
            position,
            velocity: Vector2::zero(),
            mass: 1.0,
            inv_mass: 1.0,
            force: Vector2::zero(),
            flags: ParticleFlags::PINNED,
        }
    }

    /// Returns the particle with the given initial velocity
    pub fn with_velocity(mut self, velocity: Vector2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Adds a force to the accumulator.
    ///
    /// The force is not validated; NaN or infinite components propagate so that
    /// upstream numerical errors stay visible.
    pub fn apply_force(&mut self, force: Vector2) {
        self.force += force;
    }

    /// Returns the sum of the forces applied since the last clear
    pub fn accumulated_force(&self) -> Vector2 {
        self.force
    }

    /// Resets the force accumulator
    pub fn clear_forces(&mut self) {
        self.force = Vector2::zero();
    }

    /// Returns the particle's position
    pub fn position(&self) -> Vector2 {
        self.position
    }

    /// Sets the particle's position
    pub fn set_position(&mut self, position: Vector2) {
        self.position = position;
    }

    /// Returns the particle's velocity
    pub fn velocity(&self) -> Vector2 {
        self.velocity
    }

    /// Sets the particle's velocity
    pub fn set_velocity(&mut self, velocity: Vector2) {
        self.velocity = velocity;
    }

    /// Returns the particle's mass
    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Returns the particle's inverse mass
    pub fn inverse_mass(&self) -> f32 {
        self.inv_mass
    }

    /// Returns the particle's flags
    pub fn flags(&self) -> ParticleFlags {
        self.flags
    }

    /// Returns whether the particle is pinned in place
    pub fn is_pinned(&self) -> bool {
        self.flags.contains(ParticleFlags::PINNED)
    }

    /// Pins or releases the particle. Pinning also zeroes its velocity.
    pub fn set_pinned(&mut self, pinned: bool) {
        if pinned {
            self.flags.insert(ParticleFlags::PINNED);
            self.velocity = Vector2::zero();
        } else {
            self.flags.remove(ParticleFlags::PINNED);
        }
    }

    /// Returns whether the particle receives world gravity
    pub fn is_affected_by_gravity(&self) -> bool {
        self.flags.contains(ParticleFlags::AFFECTED_BY_GRAVITY)
    }

    /// Sets whether the particle receives world gravity
    pub fn set_affected_by_gravity(&mut self, affected: bool) {
        self.flags.set(ParticleFlags::AFFECTED_BY_GRAVITY, affected);
    }

    /// Scales the velocity down by a linear damping factor over `dt`
    pub fn apply_damping(&mut self, linear_damping: f32, dt: f32) {
        if linear_damping > 0.0 {
            let factor = (1.0 - linear_damping * dt).max(0.0);
            self.velocity = self.velocity.scale(factor);
        }
    }
}
