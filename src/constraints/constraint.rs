use crate::core::{ParticleHandle, ParticleStorage, Storage};
use crate::error::PhysicsError;
use crate::math::Vector2;
use crate::render::Surface;
use crate::Result;
use std::any::Any;

/// Base trait for force-generating constraints between particles.
///
/// A constraint never moves a particle. It reads the state of the particles it
/// binds and adds forces to their accumulators; integration belongs to the
/// host.
pub trait Constraint: Send + Sync + std::fmt::Debug + 'static {
    /// Returns the type name of the constraint
    fn constraint_type(&self) -> &'static str;

    /// Returns the particles bound by the constraint
    fn get_particles(&self) -> &[ParticleHandle];

    /// Checks if the constraint binds a specific particle
    fn involves_particle(&self, particle: ParticleHandle) -> bool {
        self.get_particles().contains(&particle)
    }

    /// Computes this step's forces from the current particle state without applying them
    fn compute_forces(&self, particles: &ParticleStorage) -> Result<ConstraintForces>;

    /// Computes this step's forces and adds them to the bound particles' accumulators
    fn update(&self, particles: &mut ParticleStorage) -> Result<()> {
        let forces = self.compute_forces(particles)?;
        forces.apply(particles)
    }

    /// Draws the constraint on a host surface. Non-visual constraints draw nothing.
    fn draw(&self, _particles: &ParticleStorage, _surface: &mut dyn Surface) {}

    /// Returns a dynamic reference to any for downcasting
    fn as_any(&self) -> &dyn Any;

    /// Returns a dynamic mutable reference to any for downcasting
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Clone the constraint to create a new box
    fn clone_constraint(&self) -> Box<dyn Constraint>;
}

impl Clone for Box<dyn Constraint> {
    fn clone(&self) -> Self {
        self.clone_constraint()
    }
}

/// Forces produced by one constraint in one step, merged per particle
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstraintForces {
    entries: Vec<(ParticleHandle, Vector2)>,
}

impl ConstraintForces {
    /// Creates an empty force set
    pub fn new() -> Self {
        Self {
            entries: Vec::with_capacity(2),
        }
    }

    /// Adds a force on a particle, merging with any earlier force on the same particle
    pub fn add(&mut self, particle: ParticleHandle, force: Vector2) {
        match self.entries.iter_mut().find(|(handle, _)| *handle == particle) {
            Some((_, total)) => *total += force,
            None => self.entries.push((particle, force)),
        }
    }

    /// Returns the total force on a particle, zero if it receives none
    pub fn force_on(&self, particle: ParticleHandle) -> Vector2 {
        self.entries
            .iter()
            .find(|(handle, _)| *handle == particle)
            .map(|(_, force)| *force)
            .unwrap_or_else(Vector2::zero)
    }

    /// Returns the sum of all forces in the set
    pub fn net_force(&self) -> Vector2 {
        self.entries
            .iter()
            .fold(Vector2::zero(), |sum, (_, force)| sum + *force)
    }

    /// Returns an iterator over the per-particle forces
    pub fn iter(&self) -> impl Iterator<Item = &(ParticleHandle, Vector2)> {
        self.entries.iter()
    }

    /// Returns whether the set holds no forces
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of particles receiving a force
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Adds every force to its particle's accumulator.
    ///
    /// All handles are checked first, so a dangling handle leaves every
    /// accumulator untouched.
    pub fn apply(&self, particles: &mut ParticleStorage) -> Result<()> {
        if let Some((missing, _)) = self.entries.iter().find(|(handle, _)| !particles.contains(*handle)) {
            return Err(PhysicsError::DanglingReference(format!(
                "Particle with handle {:?} not found",
                missing
            )));
        }

        for (handle, force) in &self.entries {
            particles.get_particle_mut(*handle)?.apply_force(*force);
        }
        Ok(())
    }
}
