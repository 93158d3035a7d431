use crate::core::{ParticleHandle, ConstraintHandle};
use crate::error::PhysicsError;
use std::collections::VecDeque;

/// Types of particle events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleEventType {
    /// A particle has been added to the world
    Added,

    /// A particle has been removed from the world
    Removed,
}

/// An event related to a single particle
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleEvent {
    /// The type of particle event
    pub event_type: ParticleEventType,

    /// The particle that the event refers to
    pub particle: ParticleHandle,
}

/// Types of constraint events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintEventType {
    /// A constraint has been added to the world
    Added,

    /// A constraint has been removed from the world
    Removed,

    /// A constraint contributed no force this step
    Skipped,
}

/// An event related to a single constraint
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintEvent {
    /// The type of constraint event
    pub event_type: ConstraintEventType,

    /// The constraint that the event refers to
    pub constraint: ConstraintHandle,

    /// Why the constraint was skipped (only set for `Skipped`)
    pub reason: Option<PhysicsError>,
}

/// A queue of simulation events, cleared at the start of every step
#[derive(Debug, Default)]
pub struct EventQueue {
    /// Particle events
    particle_events: VecDeque<ParticleEvent>,

    /// Constraint events
    constraint_events: VecDeque<ConstraintEvent>,
}

impl EventQueue {
    /// Creates a new empty event queue
    pub fn new() -> Self {
        Self {
            particle_events: VecDeque::new(),
            constraint_events: VecDeque::new(),
        }
    }

    /// Adds a particle event to the queue
    pub fn add_particle_event(&mut self, event: ParticleEvent) {
        self.particle_events.push_back(event);
    }

    /// Adds a constraint event to the queue
    pub fn add_constraint_event(&mut self, event: ConstraintEvent) {
        self.constraint_events.push_back(event);
    }

    /// Records that a constraint was skipped for the given reason
    pub fn add_skipped_constraint(&mut self, constraint: ConstraintHandle, reason: PhysicsError) {
        self.constraint_events.push_back(ConstraintEvent {
            event_type: ConstraintEventType::Skipped,
            constraint,
            reason: Some(reason),
        });
    }

    /// Returns an iterator over the queued particle events
    pub fn particle_events(&self) -> impl Iterator<Item = &ParticleEvent> {
        self.particle_events.iter()
    }

    /// Returns an iterator over the queued constraint events
    pub fn constraint_events(&self) -> impl Iterator<Item = &ConstraintEvent> {
        self.constraint_events.iter()
    }

    /// Pops the oldest particle event
    pub fn pop_particle_event(&mut self) -> Option<ParticleEvent> {
        self.particle_events.pop_front()
    }

    /// Pops the oldest constraint event
    pub fn pop_constraint_event(&mut self) -> Option<ConstraintEvent> {
        self.constraint_events.pop_front()
    }

    /// Returns whether both queues are empty
    pub fn is_empty(&self) -> bool {
        self.particle_events.is_empty() && self.constraint_events.is_empty()
    }

    /// Clears all events
    pub fn clear(&mut self) {
        self.particle_events.clear();
        self.constraint_events.clear();
    }
}
