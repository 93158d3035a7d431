mod particle;

pub use self::particle::Particle;
pub use self::particle_flags::ParticleFlags;

/// Flags for controlling particle behavior
pub mod particle_flags {
    use bitflags::bitflags;

    bitflags! {
        /// Flags for controlling how the integrator treats a particle
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct ParticleFlags: u32 {
            /// Particle is held in place; forces accumulate but are never integrated
            const PINNED = 0x01;

            /// Particle receives the world's gravity
            const AFFECTED_BY_GRAVITY = 0x02;
        }
    }

    impl Default for ParticleFlags {
        fn default() -> Self {
            Self::AFFECTED_BY_GRAVITY
        }
    }
}
