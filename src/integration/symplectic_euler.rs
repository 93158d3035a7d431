use crate::integration::Integrator;
use crate::particles::Particle;

/// Symplectic Euler integrator (semi-implicit Euler)
/// More stable than explicit Euler for spring systems
#[derive(Debug, Default, Clone, Copy)]
pub struct SymplecticEulerIntegrator;

impl SymplecticEulerIntegrator {
    /// Creates a new Symplectic Euler integrator
    pub fn new() -> Self {
        Self
    }
}

impl Integrator for SymplecticEulerIntegrator {
    fn integrate(&mut self, particle: &mut Particle, dt: f32) {
        if particle.is_pinned() {
            particle.clear_forces();
            return;
        }

        // First integrate the forces to update velocities: a = F/m
        let acceleration = particle.accumulated_force() * particle.inverse_mass();
        let vel = particle.velocity() + acceleration * dt;

        // Update position using the *new* velocity
        particle.set_velocity(vel);
        particle.set_position(particle.position() + vel * dt);
        particle.clear_forces();
    }

    fn name(&self) -> &str {
        "SymplecticEuler"
    }
}
