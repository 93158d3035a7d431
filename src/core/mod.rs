pub mod world;
pub mod config;
pub mod storage;
pub mod events;
pub mod scheduler;

pub use self::world::ParticleWorld;
pub use self::config::SimulationConfig;
pub use self::storage::{ParticleStorage, ConstraintStorage, Storage};
pub use self::events::{EventQueue, ParticleEvent, ParticleEventType, ConstraintEvent, ConstraintEventType};
pub use self::scheduler::{ForceScheduler, SequentialScheduler};

use slotmap::new_key_type;

new_key_type! {
    /// A stable identifier for a particle in a [`ParticleStorage`].
    ///
    /// Handles are generational: once a particle is removed its handle never
    /// resolves again, even if the slot is reused.
    pub struct ParticleHandle;

    /// A stable identifier for a constraint in a [`ConstraintStorage`]
    pub struct ConstraintHandle;
}
