use slotmap::SlotMap;
use crate::core::{ParticleHandle, ConstraintHandle};
use crate::error::PhysicsError;
use crate::particles::Particle;
use crate::Result;

/// Generic storage trait for simulation objects
pub trait Storage<T, H> {
    /// Creates a new empty storage
    fn new() -> Self;

    /// Adds an item to the storage and returns its handle
    fn add(&mut self, item: T) -> H;

    /// Gets a reference to an item by its handle
    fn get(&self, handle: H) -> Option<&T>;

    /// Gets a mutable reference to an item by its handle
    fn get_mut(&mut self, handle: H) -> Option<&mut T>;

    /// Removes an item from the storage
    fn remove(&mut self, handle: H) -> Option<T>;

    /// Returns whether the handle still refers to a stored item
    fn contains(&self, handle: H) -> bool;

    /// Returns the number of items in the storage
    fn len(&self) -> usize;

    /// Returns whether the storage is empty
    fn is_empty(&self) -> bool;

    /// Clears all items from the storage
    fn clear(&mut self);

    /// Returns all live handles in storage order
    fn handles(&self) -> Vec<H>;

    /// Returns an iterator over all items in storage order
    fn iter<'a>(&'a self) -> impl Iterator<Item = (H, &'a T)> + 'a where T: 'a;

    /// Returns a mutable iterator over all items in storage order
    fn iter_mut<'a>(&'a mut self) -> impl Iterator<Item = (H, &'a mut T)> + 'a where T: 'a;
}

/// Arena owning every particle of a simulation.
///
/// Iteration follows slot order, so a step over the same arena is
/// deterministic.
#[derive(Debug, Clone, Default)]
pub struct ParticleStorage {
    items: SlotMap<ParticleHandle, Particle>,
}

impl Storage<Particle, ParticleHandle> for ParticleStorage {
    fn new() -> Self {
        Self {
            items: SlotMap::with_key(),
        }
    }

    fn add(&mut self, item: Particle) -> ParticleHandle {
        self.items.insert(item)
    }

    fn get(&self, handle: ParticleHandle) -> Option<&Particle> {
        self.items.get(handle)
    }

    fn get_mut(&mut self, handle: ParticleHandle) -> Option<&mut Particle> {
        self.items.get_mut(handle)
    }

    fn remove(&mut self, handle: ParticleHandle) -> Option<Particle> {
        self.items.remove(handle)
    }

    fn contains(&self, handle: ParticleHandle) -> bool {
        self.items.contains_key(handle)
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn clear(&mut self) {
        self.items.clear();
    }

    fn handles(&self) -> Vec<ParticleHandle> {
        self.items.keys().collect()
    }

    fn iter<'a>(&'a self) -> impl Iterator<Item = (ParticleHandle, &'a Particle)> + 'a where Particle: 'a {
        self.items.iter()
    }

    fn iter_mut<'a>(&'a mut self) -> impl Iterator<Item = (ParticleHandle, &'a mut Particle)> + 'a where Particle: 'a {
        self.items.iter_mut()
    }
}

impl ParticleStorage {
    /// Gets a particle by its handle, returning an error if it is gone
    pub fn get_particle(&self, handle: ParticleHandle) -> Result<&Particle> {
        self.get(handle)
            .ok_or_else(|| PhysicsError::DanglingReference(format!("Particle with handle {:?} not found", handle)))
    }

    /// Gets a mutable reference to a particle by its handle, returning an error if it is gone
    pub fn get_particle_mut(&mut self, handle: ParticleHandle) -> Result<&mut Particle> {
        self.get_mut(handle)
            .ok_or_else(|| PhysicsError::DanglingReference(format!("Particle with handle {:?} not found", handle)))
    }

    /// Resets the force accumulator of every particle
    pub fn clear_forces(&mut self) {
        for (_, particle) in self.items.iter_mut() {
            particle.clear_forces();
        }
    }
}

/// Storage for constraints
#[derive(Debug)]
pub struct ConstraintStorage<T> {
    items: SlotMap<ConstraintHandle, T>,
}

impl<T> Storage<T, ConstraintHandle> for ConstraintStorage<T> {
    fn new() -> Self {
        Self {
            items: SlotMap::with_key(),
        }
    }

    fn add(&mut self, item: T) -> ConstraintHandle {
        self.items.insert(item)
    }

    fn get(&self, handle: ConstraintHandle) -> Option<&T> {
        self.items.get(handle)
    }

    fn get_mut(&mut self, handle: ConstraintHandle) -> Option<&mut T> {
        self.items.get_mut(handle)
    }

    fn remove(&mut self, handle: ConstraintHandle) -> Option<T> {
        self.items.remove(handle)
    }

    fn contains(&self, handle: ConstraintHandle) -> bool {
        self.items.contains_key(handle)
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn clear(&mut self) {
        self.items.clear();
    }

    fn handles(&self) -> Vec<ConstraintHandle> {
        self.items.keys().collect()
    }

    fn iter<'a>(&'a self) -> impl Iterator<Item = (ConstraintHandle, &'a T)> + 'a where T: 'a {
        self.items.iter()
    }

    fn iter_mut<'a>(&'a mut self) -> impl Iterator<Item = (ConstraintHandle, &'a mut T)> + 'a where T: 'a {
        self.items.iter_mut()
    }
}

impl<T> ConstraintStorage<T> {
    /// Gets a constraint by its handle, returning an error if not found
    pub fn get_constraint(&self, handle: ConstraintHandle) -> Result<&T> {
        self.get(handle)
            .ok_or_else(|| PhysicsError::ResourceNotFound(format!("Constraint with handle {:?} not found", handle)))
    }

    /// Gets a mutable reference to a constraint by its handle, returning an error if not found
    pub fn get_constraint_mut(&mut self, handle: ConstraintHandle) -> Result<&mut T> {
        self.get_mut(handle)
            .ok_or_else(|| PhysicsError::ResourceNotFound(format!("Constraint with handle {:?} not found", handle)))
    }
}
