mod constraint;
mod spring;
mod bungee;

pub use self::constraint::{Constraint, ConstraintForces};
pub use self::spring::{Spring, SpringConfig, DampingCoefficients, DegeneratePolicy, SPRING_STYLE};
pub use self::bungee::{Bungee, BUNGEE_STYLE};
