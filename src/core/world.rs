use crate::constraints::{Bungee, Constraint, Spring, SpringConfig};
use crate::core::{
    ConstraintEvent, ConstraintEventType, ConstraintHandle, ConstraintStorage, EventQueue,
    ForceScheduler, ParticleEvent, ParticleEventType, ParticleHandle, ParticleStorage,
    SimulationConfig, Storage,
};
use crate::error::PhysicsError;
use crate::integration::{Integrator, SymplecticEulerIntegrator};
use crate::math::Vector2;
use crate::particles::Particle;
use crate::render::Surface;
use crate::Result;

#[cfg(not(feature = "parallel"))]
use crate::core::SequentialScheduler;

#[cfg(feature = "parallel")]
use crate::core::scheduler::parallel::ParallelScheduler;

/// A reference host: owns the particles and constraints and drives the step loop.
///
/// Each step runs three phases in order: constraints add forces, gravity is
/// added, then the integrator advances every particle and clears its
/// accumulator.
pub struct ParticleWorld {
    /// All particles in the world
    particles: ParticleStorage,

    /// All constraints in the world
    constraints: ConstraintStorage<Box<dyn Constraint>>,

    /// Configuration for the simulation
    config: SimulationConfig,

    /// Queue of simulation events
    events: EventQueue,

    /// The total elapsed simulation time
    time: f32,

    /// Integrates accumulated forces into velocity and position
    integrator: Box<dyn Integrator>,

    /// Runs the force-accumulation phase
    scheduler: Box<dyn ForceScheduler>,
}

impl Default for ParticleWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl ParticleWorld {
    /// Creates a new world with default settings
    pub fn new() -> Self {
        Self::build(SimulationConfig::default())
    }

    /// Creates a new world with the given configuration
    pub fn with_config(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: SimulationConfig) -> Self {
        #[cfg(feature = "parallel")]
        let scheduler: Box<dyn ForceScheduler> = Box::new(ParallelScheduler::new());

        #[cfg(not(feature = "parallel"))]
        let scheduler: Box<dyn ForceScheduler> = Box::new(SequentialScheduler);

        Self {
            particles: ParticleStorage::new(),
            constraints: ConstraintStorage::new(),
            config,
            events: EventQueue::new(),
            time: 0.0,
            integrator: Box::new(SymplecticEulerIntegrator::new()),
            scheduler,
        }
    }

    /// Replaces the integrator
    pub fn with_integrator(mut self, integrator: Box<dyn Integrator>) -> Self {
        self.integrator = integrator;
        self
    }

    /// Replaces the force scheduler
    pub fn with_scheduler(mut self, scheduler: Box<dyn ForceScheduler>) -> Self {
        self.scheduler = scheduler;
        self
    }

    /// Returns the name of the active integrator
    pub fn integrator_name(&self) -> &str {
        self.integrator.name()
    }

    /// Returns the name of the active scheduler
    pub fn scheduler_name(&self) -> &str {
        self.scheduler.name()
    }

    /// Returns the current simulation time
    pub fn get_time(&self) -> f32 {
        self.time
    }

    /// Sets the gravity for the simulation
    pub fn set_gravity(&mut self, gravity: Vector2) {
        self.config.gravity = gravity;
    }

    /// Gets the current gravity
    pub fn get_gravity(&self) -> Vector2 {
        self.config.gravity
    }

    /// Returns a reference to the simulation configuration
    pub fn get_config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Replaces the simulation configuration after validating it
    pub fn set_config(&mut self, config: SimulationConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Adds a particle to the world and returns its handle
    pub fn add_particle(&mut self, particle: Particle) -> ParticleHandle {
        let handle = self.particles.add(particle);
        log::debug!("added particle {:?}", handle);

        self.events.add_particle_event(ParticleEvent {
            event_type: ParticleEventType::Added,
            particle: handle,
        });

        handle
    }

    /// Removes a particle that no constraint references.
    ///
    /// Fails with [`PhysicsError::DanglingReference`] while constraints still
    /// bind the particle; remove them first or use
    /// [`remove_particle_and_constraints`](Self::remove_particle_and_constraints).
    pub fn remove_particle(&mut self, handle: ParticleHandle) -> Result<Particle> {
        self.particles.get_particle(handle)?;

        let referencing = self.constraints_for_particle(handle);
        if !referencing.is_empty() {
            return Err(PhysicsError::DanglingReference(format!(
                "Particle with handle {:?} is still bound by {} constraint(s)",
                handle,
                referencing.len()
            )));
        }

        self.take_particle(handle)
    }

    /// Removes a particle together with every constraint that binds it
    pub fn remove_particle_and_constraints(&mut self, handle: ParticleHandle) -> Result<Particle> {
        self.particles.get_particle(handle)?;

        for c_handle in self.constraints_for_particle(handle) {
            self.remove_constraint(c_handle)?;
        }

        self.take_particle(handle)
    }

    fn take_particle(&mut self, handle: ParticleHandle) -> Result<Particle> {
        let particle = self.particles.remove(handle).ok_or_else(|| {
            PhysicsError::DanglingReference(format!("Particle with handle {:?} not found", handle))
        })?;
        log::debug!("removed particle {:?}", handle);

        self.events.add_particle_event(ParticleEvent {
            event_type: ParticleEventType::Removed,
            particle: handle,
        });

        Ok(particle)
    }

    /// Gets a reference to a particle by its handle
    pub fn get_particle(&self, handle: ParticleHandle) -> Result<&Particle> {
        self.particles.get_particle(handle)
    }

    /// Gets a mutable reference to a particle by its handle
    pub fn get_particle_mut(&mut self, handle: ParticleHandle) -> Result<&mut Particle> {
        self.particles.get_particle_mut(handle)
    }

    /// Returns the particle arena
    pub fn particles(&self) -> &ParticleStorage {
        &self.particles
    }

    /// Adds a constraint whose particles are all present and returns its handle
    pub fn add_constraint(&mut self, constraint: Box<dyn Constraint>) -> Result<ConstraintHandle> {
        for &particle in constraint.get_particles() {
            self.particles.get_particle(particle)?;
        }

        let kind = constraint.constraint_type();
        let handle = self.constraints.add(constraint);
        log::debug!("added {} constraint {:?}", kind, handle);

        self.events.add_constraint_event(ConstraintEvent {
            event_type: ConstraintEventType::Added,
            constraint: handle,
            reason: None,
        });

        Ok(handle)
    }

    /// Builds a spring between two particles of this world and adds it
    pub fn add_spring(&mut self, p1: ParticleHandle, p2: ParticleHandle, config: SpringConfig) -> Result<ConstraintHandle> {
        let spring = Spring::new(p1, p2, config, &self.particles)?;
        self.add_constraint(Box::new(spring))
    }

    /// Builds a bungee between two particles of this world and adds it
    pub fn add_bungee(&mut self, p1: ParticleHandle, p2: ParticleHandle, config: SpringConfig) -> Result<ConstraintHandle> {
        let bungee = Bungee::new(p1, p2, config, &self.particles)?;
        self.add_constraint(Box::new(bungee))
    }

    /// Removes a constraint from the world
    pub fn remove_constraint(&mut self, handle: ConstraintHandle) -> Result<Box<dyn Constraint>> {
        self.constraints.get_constraint(handle)?;

        let constraint = self.constraints.remove(handle).ok_or_else(|| {
            PhysicsError::ResourceNotFound(format!("Constraint with handle {:?} not found", handle))
        })?;
        log::debug!("removed {} constraint {:?}", constraint.constraint_type(), handle);

        self.events.add_constraint_event(ConstraintEvent {
            event_type: ConstraintEventType::Removed,
            constraint: handle,
            reason: None,
        });

        Ok(constraint)
    }

    /// Gets a reference to a constraint by its handle
    pub fn get_constraint(&self, handle: ConstraintHandle) -> Result<&dyn Constraint> {
        self.constraints.get_constraint(handle).map(|c| &**c)
    }

    /// Returns the handles of every constraint binding the particle
    pub fn constraints_for_particle(&self, particle: ParticleHandle) -> Vec<ConstraintHandle> {
        self.constraints
            .iter()
            .filter(|(_, constraint)| constraint.involves_particle(particle))
            .map(|(handle, _)| handle)
            .collect()
    }

    /// Runs the constraint phase only: every constraint adds its forces to the
    /// accumulators. Constraints that cannot contribute are logged and recorded
    /// as `Skipped` events.
    pub fn accumulate_forces(&mut self) {
        let failures = self.scheduler.accumulate(&self.constraints, &mut self.particles);

        for (handle, error) in failures {
            log::warn!("constraint {:?} skipped this step: {}", handle, error);
            self.events.add_skipped_constraint(handle, error);
        }
    }

    /// Runs the physics simulation for the given time step
    pub fn step(&mut self, time_step: f32) {
        // Clear events from previous step
        self.events.clear();

        let fixed_step = self.config.time_step;
        let max_steps = self.config.max_substeps;

        let mut remaining_time = time_step;
        let mut steps = 0;

        while remaining_time > 0.0 && steps < max_steps {
            let dt = fixed_step.min(remaining_time);

            self.step_simulation(dt);

            self.time += dt;
            remaining_time -= dt;
            steps += 1;
        }

        // The clock only advances by the time actually integrated
        if remaining_time > 0.0 {
            log::warn!(
                "step of {}s exceeds {} substeps of {}s; dropped {}s",
                time_step,
                max_steps,
                fixed_step,
                remaining_time
            );
        }
    }

    /// Performs a single step of the simulation
    fn step_simulation(&mut self, dt: f32) {
        self.accumulate_forces();

        let gravity = self.config.gravity;
        let linear_damping = self.config.linear_damping;

        for (_, particle) in self.particles.iter_mut() {
            if particle.is_affected_by_gravity() && !particle.is_pinned() {
                particle.apply_force(gravity * particle.mass());
            }

            particle.apply_damping(linear_damping, dt);

            // Consumes and clears the accumulator
            self.integrator.integrate(particle, dt);
        }
    }

    /// Draws every constraint on the host surface
    pub fn draw(&self, surface: &mut dyn Surface) {
        for (_, constraint) in self.constraints.iter() {
            constraint.draw(&self.particles, surface);
        }
    }

    /// Returns a reference to the event queue
    pub fn get_events(&self) -> &EventQueue {
        &self.events
    }

    /// Returns a mutable reference to the event queue
    pub fn get_events_mut(&mut self) -> &mut EventQueue {
        &mut self.events
    }

    /// Clears the world of all particles and constraints
    pub fn clear(&mut self) {
        self.particles.clear();
        self.constraints.clear();
        self.events.clear();
        self.time = 0.0;
    }

    /// Returns the number of particles in the world
    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    /// Returns the number of constraints in the world
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }
}
