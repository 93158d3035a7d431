use crate::constraints::Constraint;
use crate::core::{ConstraintHandle, ConstraintStorage, ParticleStorage, Storage};
use crate::error::PhysicsError;

/// Runs the force-accumulation phase of a step.
///
/// Every constraint adds its forces to the particle accumulators. A failing
/// constraint contributes nothing and is reported in the returned list; the
/// remaining constraints still run.
pub trait ForceScheduler: Send + Sync {
    /// Accumulates the forces of every constraint into `particles`
    fn accumulate(
        &self,
        constraints: &ConstraintStorage<Box<dyn Constraint>>,
        particles: &mut ParticleStorage,
    ) -> Vec<(ConstraintHandle, PhysicsError)>;

    /// Returns the name of the scheduler
    fn name(&self) -> &str;
}

/// A single-threaded scheduler updating constraints in storage order
#[derive(Debug, Default, Clone, Copy)]
pub struct SequentialScheduler;

impl ForceScheduler for SequentialScheduler {
    fn accumulate(
        &self,
        constraints: &ConstraintStorage<Box<dyn Constraint>>,
        particles: &mut ParticleStorage,
    ) -> Vec<(ConstraintHandle, PhysicsError)> {
        let mut failures = Vec::new();
        for (handle, constraint) in constraints.iter() {
            if let Err(error) = constraint.update(particles) {
                failures.push((handle, error));
            }
        }
        failures
    }

    fn name(&self) -> &str {
        "Sequential"
    }
}

#[cfg(feature = "parallel")]
pub mod parallel {
    use super::*;
    use crate::constraints::ConstraintForces;
    use crate::Result;
    use rayon::prelude::*;

    /// Computes constraint forces on a rayon pool.
    ///
    /// Each constraint writes into its own [`ConstraintForces`] buffer while the
    /// particles are only read; the buffers are then added to the accumulators
    /// one at a time in storage order, so the result matches
    /// [`SequentialScheduler`] and no accumulator is ever written concurrently.
    #[derive(Debug, Default)]
    pub struct ParallelScheduler {
        pool: Option<rayon::ThreadPool>,
    }

    impl ParallelScheduler {
        /// Creates a scheduler on rayon's global pool
        pub fn new() -> Self {
            Self { pool: None }
        }

        /// Creates a scheduler with a dedicated pool of `threads` workers
        pub fn with_threads(threads: usize) -> Result<Self> {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| PhysicsError::InvalidConfiguration(format!("cannot build thread pool: {}", e)))?;
            Ok(Self { pool: Some(pool) })
        }

        fn compute_all(
            constraints: &ConstraintStorage<Box<dyn Constraint>>,
            particles: &ParticleStorage,
        ) -> Vec<(ConstraintHandle, Result<ConstraintForces>)> {
            let entries: Vec<(ConstraintHandle, &Box<dyn Constraint>)> = constraints.iter().collect();
            entries
                .par_iter()
                .map(|(handle, constraint)| (*handle, constraint.compute_forces(particles)))
                .collect()
        }
    }

    impl ForceScheduler for ParallelScheduler {
        fn accumulate(
            &self,
            constraints: &ConstraintStorage<Box<dyn Constraint>>,
            particles: &mut ParticleStorage,
        ) -> Vec<(ConstraintHandle, PhysicsError)> {
            let shared: &ParticleStorage = particles;
            let computed = match &self.pool {
                Some(pool) => pool.install(|| Self::compute_all(constraints, shared)),
                None => Self::compute_all(constraints, shared),
            };

            let mut failures = Vec::new();
            for (handle, result) in computed {
                if let Err(error) = result.and_then(|forces| forces.apply(particles)) {
                    failures.push((handle, error));
                }
            }
            failures
        }

        fn name(&self) -> &str {
            "Parallel"
        }
    }
}
