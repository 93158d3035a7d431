use crate::constraints::{Constraint, ConstraintForces};
use crate::core::{ParticleHandle, ParticleStorage};
use crate::error::PhysicsError;
use crate::math::{Vector2, EPSILON};
use crate::particles::Particle;
use crate::render::{Color, StrokeStyle, Surface};
use crate::Result;
use std::any::Any;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Visual style of a spring: a wide, half-transparent white line
pub const SPRING_STYLE: StrokeStyle = StrokeStyle {
    line_width: 8.0,
    color: Color::WHITE,
    alpha_factor: 0.5,
};

/// What a spring does when its endpoints (nearly) coincide and the axis is undefined
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum DegeneratePolicy {
    /// Contribute no force for the step and report
    /// [`PhysicsError::DegenerateGeometry`]
    Skip,

    /// Divide by `epsilon` instead of any shorter distance
    Clamp { epsilon: f32 },
}

impl Default for DegeneratePolicy {
    fn default() -> Self {
        Self::Skip
    }
}

/// Construction parameters for [`Spring`] and [`Bungee`](crate::constraints::Bungee)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize), serde(default, deny_unknown_fields))]
pub struct SpringConfig {
    /// Hooke's law stiffness k
    pub spring_constant: f32,

    /// Separation at which the spring exerts no force
    pub resting_distance: f32,

    /// Whether axial damping is applied
    pub damping: bool,

    /// Damping ratio ζ; 1 is critical, below 1 under-damped, above 1 over-damped
    pub damping_ratio: f32,

    /// Handling of coincident endpoints
    pub degenerate_policy: DegeneratePolicy,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            spring_constant: 0.1,
            resting_distance: 100.0,
            damping: true,
            damping_ratio: 1.0,
            degenerate_policy: DegeneratePolicy::Skip,
        }
    }
}

impl SpringConfig {
    /// Default configuration without damping
    pub fn undamped() -> Self {
        Self {
            damping: false,
            ..Self::default()
        }
    }

    /// Checks the configuration, rejecting values that would give wrong dynamics
    pub fn validate(&self) -> Result<()> {
        if !self.spring_constant.is_finite() || self.spring_constant < 0.0 {
            return Err(PhysicsError::InvalidConfiguration(format!(
                "spring constant must be non-negative and finite, got {}",
                self.spring_constant
            )));
        }
        if !self.resting_distance.is_finite() || self.resting_distance < 0.0 {
            return Err(PhysicsError::InvalidConfiguration(format!(
                "resting distance must be non-negative and finite, got {}",
                self.resting_distance
            )));
        }
        if self.damping && (!self.damping_ratio.is_finite() || self.damping_ratio < 0.0) {
            return Err(PhysicsError::InvalidConfiguration(format!(
                "damping ratio must be non-negative and finite, got {}",
                self.damping_ratio
            )));
        }
        if let DegeneratePolicy::Clamp { epsilon } = self.degenerate_policy {
            if !epsilon.is_finite() || epsilon <= 0.0 {
                return Err(PhysicsError::InvalidConfiguration(format!(
                    "clamp epsilon must be positive and finite, got {}",
                    epsilon
                )));
            }
        }
        Ok(())
    }
}

/// Per-endpoint damping coefficients, fixed at construction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DampingCoefficients {
    /// Coefficient for the first particle
    pub c1: f32,

    /// Coefficient for the second particle
    pub c2: f32,
}

impl DampingCoefficients {
    /// `ζ · 2 · sqrt(m · k)`: the critical coefficient of a mass `m` on a spring `k`, scaled by `ζ`
    #[inline]
    pub fn coefficient(damping_ratio: f32, mass: f32, spring_constant: f32) -> f32 {
        damping_ratio * 2.0 * (mass * spring_constant).sqrt()
    }

    /// Computes independent coefficients for two endpoint masses
    pub fn for_masses(damping_ratio: f32, spring_constant: f32, mass1: f32, mass2: f32) -> Self {
        Self {
            c1: Self::coefficient(damping_ratio, mass1, spring_constant),
            c2: Self::coefficient(damping_ratio, mass2, spring_constant),
        }
    }
}

/// Displacement between a spring's endpoints with the divisor already guarded
#[derive(Debug, Clone, Copy)]
pub(crate) struct SpringGeometry {
    /// `p1.position - p2.position`
    pub displacement: Vector2,

    /// The distance used as divisor; never below the policy's threshold
    pub distance: f32,
}

impl SpringGeometry {
    /// Unit vector along the axis from p2 to p1
    fn axis(&self) -> Vector2 {
        self.displacement.scale(1.0 / self.distance)
    }
}

/// A Hooke's-law spring between two particles with optional axial damping.
///
/// Damping uses each particle's own velocity projected on the spring axis,
/// not the relative velocity of the two ends. Masses are read once at
/// construction; a spring bound to a particle rebuilt with a different mass
/// must be rebuilt as well.
#[derive(Debug, Clone)]
pub struct Spring {
    /// The two bound particles, p1 then p2
    particles: [ParticleHandle; 2],

    /// The spring stiffness coefficient
    spring_constant: f32,

    /// The spring rest length
    resting_distance: f32,

    /// Damping coefficients, present iff damping is enabled
    damping: Option<DampingCoefficients>,

    /// The configuration the spring was built from
    config: SpringConfig,
}

impl Spring {
    /// Creates a spring between two distinct particles of `particles`
    pub fn new(
        p1: ParticleHandle,
        p2: ParticleHandle,
        config: SpringConfig,
        particles: &ParticleStorage,
    ) -> Result<Self> {
        config.validate()?;

        if p1 == p2 {
            return Err(PhysicsError::InvalidConfiguration(
                "a spring needs two distinct particles".to_string(),
            ));
        }

        let mass1 = particles.get_particle(p1)?.mass();
        let mass2 = particles.get_particle(p2)?.mass();

        let damping = if config.damping {
            Some(DampingCoefficients::for_masses(
                config.damping_ratio,
                config.spring_constant,
                mass1,
                mass2,
            ))
        } else {
            None
        };

        Ok(Self {
            particles: [p1, p2],
            spring_constant: config.spring_constant,
            resting_distance: config.resting_distance,
            damping,
            config,
        })
    }

    /// Returns the first particle
    pub fn p1(&self) -> ParticleHandle {
        self.particles[0]
    }

    /// Returns the second particle
    pub fn p2(&self) -> ParticleHandle {
        self.particles[1]
    }

    /// Gets the spring stiffness coefficient
    pub fn get_spring_constant(&self) -> f32 {
        self.spring_constant
    }

    /// Gets the spring rest length
    pub fn get_resting_distance(&self) -> f32 {
        self.resting_distance
    }

    /// Gets the damping coefficients, `None` for an undamped spring
    pub fn damping_coefficients(&self) -> Option<DampingCoefficients> {
        self.damping
    }

    /// Returns the configuration the spring was built from
    pub fn config(&self) -> &SpringConfig {
        &self.config
    }

    /// Current distance between the endpoints
    pub fn current_length(&self, particles: &ParticleStorage) -> Result<f32> {
        let (a, b) = self.endpoints(particles)?;
        Ok(a.position().distance(&b.position()))
    }

    /// Signed extension: positive when stretched, negative when compressed
    pub fn extension(&self, particles: &ParticleStorage) -> Result<f32> {
        Ok(self.current_length(particles)? - self.resting_distance)
    }

    /// The Hooke force on p1 alone (p2 receives its negation), without damping
    pub fn spring_force(&self, particles: &ParticleStorage) -> Result<Vector2> {
        let (a, b) = self.endpoints(particles)?;
        let geometry = self.geometry(a, b)?;
        Ok(self.hooke_force(&geometry))
    }

    pub(crate) fn endpoints<'a>(&self, particles: &'a ParticleStorage) -> Result<(&'a Particle, &'a Particle)> {
        Ok((
            particles.get_particle(self.particles[0])?,
            particles.get_particle(self.particles[1])?,
        ))
    }

    pub(crate) fn geometry(&self, a: &Particle, b: &Particle) -> Result<SpringGeometry> {
        let displacement = a.position() - b.position();
        let length = displacement.magnitude();

        let distance = match self.config.degenerate_policy {
            DegeneratePolicy::Skip => {
                if length < EPSILON {
                    return Err(PhysicsError::DegenerateGeometry { distance: length });
                }
                length
            }
            DegeneratePolicy::Clamp { epsilon } => {
                if length < epsilon {
                    log::trace!("clamping spring length {} to {}", length, epsilon);
                    epsilon
                } else {
                    length
                }
            }
        };

        Ok(SpringGeometry { displacement, distance })
    }

    /// `displacement · (−k · extension / distance)`, i.e. `−k · extension` along the axis
    fn hooke_force(&self, geometry: &SpringGeometry) -> Vector2 {
        let extension = geometry.distance - self.resting_distance;
        geometry
            .displacement
            .scale(-self.spring_constant * extension / geometry.distance)
    }

    pub(crate) fn forces_from(&self, a: &Particle, b: &Particle, geometry: &SpringGeometry) -> ConstraintForces {
        let [p1, p2] = self.particles;
        let mut forces = ConstraintForces::new();

        let spring_force = self.hooke_force(geometry);
        forces.add(p1, spring_force);
        forces.add(p2, -spring_force);

        if let Some(coefficients) = self.damping {
            let axis = geometry.axis();
            let v1 = axis.scale(a.velocity().dot(&axis));
            let v2 = axis.scale(b.velocity().dot(&axis));
            forces.add(p1, v1.scale(-coefficients.c1));
            forces.add(p2, v2.scale(-coefficients.c2));
        }

        forces
    }
}

impl Constraint for Spring {
    fn constraint_type(&self) -> &'static str {
        "Spring"
    }

    fn get_particles(&self) -> &[ParticleHandle] {
        &self.particles
    }

    fn compute_forces(&self, particles: &ParticleStorage) -> Result<ConstraintForces> {
        let (a, b) = self.endpoints(particles)?;
        let geometry = self.geometry(a, b)?;
        Ok(self.forces_from(a, b, &geometry))
    }

    fn draw(&self, particles: &ParticleStorage, surface: &mut dyn Surface) {
        if let Ok((a, b)) = self.endpoints(particles) {
            SPRING_STYLE.draw_segment(surface, a.position(), b.position());
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
