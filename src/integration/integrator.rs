use crate::particles::Particle;

/// Trait for numerical integration algorithms.
///
/// An integrator consumes a particle's accumulated force, advances its velocity
/// and position, and clears the accumulator. Pinned particles only have their
/// accumulator cleared.
pub trait Integrator: Send + Sync {
    /// Integrates a particle over a time step
    fn integrate(&mut self, particle: &mut Particle, dt: f32);

    /// Returns the name of the integrator
    fn name(&self) -> &str;
}
