use crate::integration::Integrator;
use crate::particles::Particle;

/// Simple forward Euler integrator
#[derive(Debug, Default, Clone, Copy)]
pub struct EulerIntegrator;

impl EulerIntegrator {
    /// Creates a new Euler integrator
    pub fn new() -> Self {
        Self
    }
}

impl Integrator for EulerIntegrator {
    fn integrate(&mut self, particle: &mut Particle, dt: f32) {
        if particle.is_pinned() {
            particle.clear_forces();
            return;
        }

        let pos = particle.position();
        let vel = particle.velocity();
        let acceleration = particle.accumulated_force() * particle.inverse_mass();

        // Position advances with the velocity from the start of the step
        particle.set_position(pos + vel * dt);
        particle.set_velocity(vel + acceleration * dt);
        particle.clear_forces();
    }

    fn name(&self) -> &str {
        "Euler"
    }
}
