use phys_springs::{
    constraints::{Spring, SpringConfig},
    core::{ConstraintEventType, ParticleEventType, SimulationConfig},
    error::PhysicsError,
    integration::{EulerIntegrator, Integrator, SymplecticEulerIntegrator},
    math::Vector2,
    render::{DrawCommand, RecordingSurface},
    Particle, ParticleWorld,
};
use approx::assert_relative_eq;

const DT: f32 = 1.0 / 60.0;

fn particle(x: f32, y: f32, mass: f32) -> Particle {
    Particle::new(Vector2::new(x, y), mass).unwrap()
}

#[test]
fn test_step_integrates_and_clears_accumulators() {
    let mut world = ParticleWorld::new();
    let p1 = world.add_particle(particle(0.0, 0.0, 1.0));
    let p2 = world.add_particle(particle(150.0, 0.0, 1.0));
    world.add_spring(p1, p2, SpringConfig::undamped()).unwrap();

    world.step(DT);

    // Semi-implicit Euler: v = F/m * dt, x = v * dt
    let a = world.get_particle(p1).unwrap();
    let b = world.get_particle(p2).unwrap();
    assert_relative_eq!(a.velocity(), Vector2::new(5.0 * DT, 0.0), epsilon = 1e-5);
    assert_relative_eq!(a.position(), Vector2::new(5.0 * DT * DT, 0.0), epsilon = 1e-6);
    assert_relative_eq!(b.velocity(), Vector2::new(-5.0 * DT, 0.0), epsilon = 1e-5);

    assert_eq!(a.accumulated_force(), Vector2::zero());
    assert_eq!(b.accumulated_force(), Vector2::zero());
    assert_relative_eq!(world.get_time(), DT);
}

#[test]
fn test_accumulate_forces_without_integrating() {
    let mut world = ParticleWorld::new();
    let p1 = world.add_particle(particle(0.0, 0.0, 1.0));
    let p2 = world.add_particle(particle(150.0, 0.0, 1.0));
    let p3 = world.add_particle(particle(150.0, 80.0, 1.0));
    world.add_spring(p1, p2, SpringConfig::undamped()).unwrap();
    world.add_spring(p2, p3, SpringConfig::undamped()).unwrap();

    world.accumulate_forces();

    // p2 is shared: stretched by p1 (x) and compressed by p3 (y)
    let f2 = world.get_particle(p2).unwrap().accumulated_force();
    assert_relative_eq!(f2, Vector2::new(-5.0, -2.0), epsilon = 1e-4);
    assert_eq!(world.get_particle(p1).unwrap().position(), Vector2::new(0.0, 0.0));
}

#[test]
fn test_damped_spring_settles_at_resting_distance() {
    let mut world = ParticleWorld::new();
    let anchor = world.add_particle(Particle::pinned(Vector2::new(0.0, 0.0)));
    let bob = world.add_particle(particle(150.0, 0.0, 1.0));
    let spring = world.add_spring(anchor, bob, SpringConfig::default()).unwrap();

    for _ in 0..3000 {
        world.step(DT);
    }

    let length = world
        .get_constraint(spring)
        .unwrap()
        .as_any()
        .downcast_ref::<Spring>()
        .unwrap()
        .current_length(world.particles())
        .unwrap();
    assert!((length - 100.0).abs() < 0.5, "length {}", length);
    assert_eq!(world.get_particle(anchor).unwrap().position(), Vector2::zero());
    assert!(world.get_particle(bob).unwrap().velocity().magnitude() < 0.1);
}

#[test]
fn test_undamped_spring_overshoots() {
    let mut world = ParticleWorld::new();
    let anchor = world.add_particle(Particle::pinned(Vector2::new(0.0, 0.0)));
    let bob = world.add_particle(particle(150.0, 0.0, 1.0));
    world.add_spring(anchor, bob, SpringConfig::undamped()).unwrap();

    let mut min_x = f32::MAX;
    for _ in 0..1200 {
        world.step(DT);
        min_x = min_x.min(world.get_particle(bob).unwrap().position().x);
    }

    // Released 50 past rest, an undamped oscillator swings about 50 short of it
    assert!(min_x < 60.0, "min_x {}", min_x);
}

#[test]
fn test_gravity_respects_flags() {
    let config = SimulationConfig { gravity: Vector2::new(0.0, 9.81), ..Default::default() };
    let mut world = ParticleWorld::with_config(config).unwrap();

    let falling = world.add_particle(particle(0.0, 0.0, 2.0));
    let pinned = world.add_particle(Particle::pinned(Vector2::new(10.0, 0.0)));
    let mut floating = particle(20.0, 0.0, 1.0);
    floating.set_affected_by_gravity(false);
    let floating = world.add_particle(floating);

    for _ in 0..60 {
        world.step(DT);
    }

    // Acceleration is independent of mass
    assert_relative_eq!(world.get_particle(falling).unwrap().velocity().y, 9.81, epsilon = 1e-3);
    assert_eq!(world.get_particle(pinned).unwrap().position(), Vector2::new(10.0, 0.0));
    assert_eq!(world.get_particle(floating).unwrap().position(), Vector2::new(20.0, 0.0));
}

#[test]
fn test_removing_bound_particle_requires_removing_constraints_first() {
    let mut world = ParticleWorld::new();
    let p1 = world.add_particle(particle(0.0, 0.0, 1.0));
    let p2 = world.add_particle(particle(150.0, 0.0, 1.0));
    let spring = world.add_spring(p1, p2, SpringConfig::default()).unwrap();

    assert!(matches!(world.remove_particle(p2), Err(PhysicsError::DanglingReference(_))));
    assert_eq!(world.particle_count(), 2);

    world.remove_constraint(spring).unwrap();
    assert!(world.remove_particle(p2).is_ok());
    assert_eq!(world.particle_count(), 1);
    assert!(world.get_particle(p2).is_err());
    assert!(matches!(world.remove_constraint(spring), Err(PhysicsError::ResourceNotFound(_))));
}

#[test]
fn test_cascade_removal() {
    let mut world = ParticleWorld::new();
    let hub = world.add_particle(particle(0.0, 0.0, 1.0));
    let a = world.add_particle(particle(100.0, 0.0, 1.0));
    let b = world.add_particle(particle(0.0, 100.0, 1.0));
    world.add_spring(hub, a, SpringConfig::default()).unwrap();
    world.add_spring(hub, b, SpringConfig::default()).unwrap();
    let kept = world.add_spring(a, b, SpringConfig::default()).unwrap();

    assert_eq!(world.constraints_for_particle(hub).len(), 2);

    let removed = world.remove_particle_and_constraints(hub).unwrap();
    assert_eq!(removed.position(), Vector2::zero());
    assert_eq!(world.constraint_count(), 1);
    assert!(world.get_constraint(kept).is_ok());

    let removed_events = world
        .get_events()
        .constraint_events()
        .filter(|e| e.event_type == ConstraintEventType::Removed)
        .count();
    assert_eq!(removed_events, 2);
    assert!(world
        .get_events()
        .particle_events()
        .any(|e| e.event_type == ParticleEventType::Removed && e.particle == hub));
}

#[test]
fn test_degenerate_constraint_is_skipped_without_disturbing_others() {
    let mut world = ParticleWorld::new();
    let a = world.add_particle(particle(5.0, 5.0, 1.0));
    let b = world.add_particle(particle(5.0, 5.0, 1.0));
    let c = world.add_particle(particle(0.0, 0.0, 1.0));
    let d = world.add_particle(particle(150.0, 0.0, 1.0));
    let degenerate = world.add_spring(a, b, SpringConfig::default()).unwrap();
    world.add_spring(c, d, SpringConfig::undamped()).unwrap();

    world.step(DT);

    let skipped: Vec<_> = world
        .get_events()
        .constraint_events()
        .filter(|e| e.event_type == ConstraintEventType::Skipped)
        .collect();
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0].constraint, degenerate);
    assert!(matches!(skipped[0].reason, Some(PhysicsError::DegenerateGeometry { .. })));

    for handle in [a, b, c, d] {
        let p = world.get_particle(handle).unwrap();
        assert!(p.position().is_finite());
        assert!(p.velocity().is_finite());
    }
    assert_eq!(world.get_particle(a).unwrap().position(), Vector2::new(5.0, 5.0));
    assert!(world.get_particle(c).unwrap().velocity().x > 0.0);
}

#[test]
fn test_add_constraint_rejects_missing_particles() {
    let mut world = ParticleWorld::new();
    let p1 = world.add_particle(particle(0.0, 0.0, 1.0));
    let p2 = world.add_particle(particle(150.0, 0.0, 1.0));
    world.remove_particle(p2).unwrap();

    assert!(matches!(
        world.add_spring(p1, p2, SpringConfig::default()),
        Err(PhysicsError::DanglingReference(_))
    ));
    assert!(world.add_bungee(p1, p1, SpringConfig::default()).is_err());
    assert_eq!(world.constraint_count(), 0);
}

#[test]
fn test_invalid_simulation_config_is_rejected() {
    let config = SimulationConfig { time_step: -1.0, ..Default::default() };
    assert!(matches!(
        ParticleWorld::with_config(config),
        Err(PhysicsError::InvalidConfiguration(_))
    ));

    let mut world = ParticleWorld::new();
    let config = SimulationConfig { max_substeps: 0, ..Default::default() };
    assert!(world.set_config(config).is_err());
    assert_eq!(world.get_config().max_substeps, 10);
}

#[test]
fn test_step_is_split_into_substeps() {
    let config = SimulationConfig { time_step: 0.01, max_substeps: 4, ..Default::default() };
    let mut world = ParticleWorld::with_config(config).unwrap();
    let p = world.add_particle(particle(0.0, 0.0, 1.0).with_velocity(Vector2::new(1.0, 0.0)));

    // 0.1s requested but only 4 substeps of 0.01s are allowed
    world.step(0.1);
    assert_relative_eq!(world.get_particle(p).unwrap().position().x, 0.04, epsilon = 1e-5);

    // The clock follows the integrated time, not the requested time
    assert_relative_eq!(world.get_time(), 0.04, epsilon = 1e-6);

    world.step(0.025);
    assert_relative_eq!(world.get_time(), 0.065, epsilon = 1e-6);
    assert_relative_eq!(world.get_particle(p).unwrap().position().x, 0.065, epsilon = 1e-5);
}

#[test]
fn test_events_are_drained_in_order() {
    let mut world = ParticleWorld::new();
    let a = world.add_particle(particle(0.0, 0.0, 1.0));
    let b = world.add_particle(particle(150.0, 0.0, 1.0));
    let spring = world.add_spring(a, b, SpringConfig::default()).unwrap();

    let events = world.get_events_mut();
    assert_eq!(events.pop_particle_event().map(|e| e.particle), Some(a));
    assert_eq!(events.pop_particle_event().map(|e| e.particle), Some(b));
    assert!(events.pop_particle_event().is_none());

    let added = events.pop_constraint_event().unwrap();
    assert_eq!(added.event_type, ConstraintEventType::Added);
    assert_eq!(added.constraint, spring);
    assert!(added.reason.is_none());
    assert!(events.pop_constraint_event().is_none());

    assert!(world.get_events().is_empty());
}

#[test]
fn test_integrators() {
    let mut explicit = EulerIntegrator::new();
    let mut symplectic = SymplecticEulerIntegrator::new();
    assert_eq!(explicit.name(), "Euler");
    assert_eq!(symplectic.name(), "SymplecticEuler");

    let start = particle(0.0, 0.0, 2.0).with_velocity(Vector2::new(1.0, 0.0));

    let mut a = start.clone();
    a.apply_force(Vector2::new(4.0, 0.0));
    explicit.integrate(&mut a, 0.5);
    // Position uses the old velocity
    assert_relative_eq!(a.position(), Vector2::new(0.5, 0.0));
    assert_relative_eq!(a.velocity(), Vector2::new(2.0, 0.0));
    assert_eq!(a.accumulated_force(), Vector2::zero());

    let mut b = start.clone();
    b.apply_force(Vector2::new(4.0, 0.0));
    symplectic.integrate(&mut b, 0.5);
    // Position uses the new velocity
    assert_relative_eq!(b.position(), Vector2::new(1.0, 0.0));
    assert_relative_eq!(b.velocity(), Vector2::new(2.0, 0.0));
    assert_eq!(b.accumulated_force(), Vector2::zero());

    let mut pinned = Particle::pinned(Vector2::new(3.0, 3.0));
    pinned.apply_force(Vector2::new(100.0, 0.0));
    symplectic.integrate(&mut pinned, 0.5);
    assert_eq!(pinned.position(), Vector2::new(3.0, 3.0));
    assert_eq!(pinned.accumulated_force(), Vector2::zero());
}

#[test]
fn test_world_with_explicit_euler() {
    let world = ParticleWorld::new().with_integrator(Box::new(EulerIntegrator::new()));
    assert_eq!(world.integrator_name(), "Euler");
}

#[test]
fn test_world_draws_every_constraint() {
    let mut world = ParticleWorld::new();
    let a = world.add_particle(particle(0.0, 0.0, 1.0));
    let b = world.add_particle(particle(100.0, 0.0, 1.0));
    let c = world.add_particle(particle(100.0, 100.0, 1.0));
    world.add_spring(a, b, SpringConfig::default()).unwrap();
    world.add_bungee(b, c, SpringConfig::default()).unwrap();

    let mut surface = RecordingSurface::new();
    world.draw(&mut surface);

    let widths: Vec<f32> = surface
        .strokes()
        .filter_map(|command| match command {
            DrawCommand::Stroke { line_width, .. } => Some(*line_width),
            _ => None,
        })
        .collect();
    assert_eq!(widths.len(), 2);
    assert!(widths.contains(&8.0));
    assert!(widths.contains(&4.0));
    assert_eq!(surface.save_depth(), 0);
}

#[test]
fn test_clear() {
    let mut world = ParticleWorld::new();
    let a = world.add_particle(particle(0.0, 0.0, 1.0));
    let b = world.add_particle(particle(100.0, 0.0, 1.0));
    world.add_spring(a, b, SpringConfig::default()).unwrap();
    world.step(DT);

    world.clear();
    assert_eq!(world.particle_count(), 0);
    assert_eq!(world.constraint_count(), 0);
    assert!(world.get_events().is_empty());
    assert_eq!(world.get_time(), 0.0);
}

#[cfg(feature = "parallel")]
mod parallel {
    use super::*;
    use phys_springs::core::scheduler::parallel::ParallelScheduler;
    use phys_springs::core::{SequentialScheduler, Storage};
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn build(world: ParticleWorld, seed: u64) -> ParticleWorld {
        let mut world = world;
        let mut rng = StdRng::seed_from_u64(seed);
        let handles: Vec<_> = (0..40)
            .map(|_| {
                world.add_particle(
                    particle(rng.gen_range(-400.0..400.0), rng.gen_range(-400.0..400.0), rng.gen_range(0.5..3.0))
                        .with_velocity(Vector2::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0))),
                )
            })
            .collect();
        for i in 0..handles.len() {
            let j = (i + 1 + rng.gen_range(0..5)) % handles.len();
            if i != j {
                world.add_spring(handles[i], handles[j], SpringConfig::default()).unwrap();
            }
        }
        world
    }

    #[test]
    fn test_parallel_scheduler_matches_sequential() {
        let mut sequential = build(ParticleWorld::new().with_scheduler(Box::new(SequentialScheduler)), 3);
        let mut parallel = build(
            ParticleWorld::new().with_scheduler(Box::new(ParallelScheduler::with_threads(4).unwrap())),
            3,
        );
        assert_eq!(parallel.scheduler_name(), "Parallel");

        for _ in 0..30 {
            sequential.step(DT);
            parallel.step(DT);
        }

        let expected: Vec<_> = sequential.particles().iter().map(|(_, p)| p.position()).collect();
        let actual: Vec<_> = parallel.particles().iter().map(|(_, p)| p.position()).collect();
        assert_eq!(expected, actual);
    }
}
