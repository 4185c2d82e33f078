//! Concrete Agent implementations: interactive, scripted replay, and a
//! rule-based baseline. Every one of these implements the same
//! `gameplay::Agent` trait; the engine never knows which variant it is
//! talking to.

pub mod human;
pub use human::*;

pub mod rule_based;
pub use rule_based::*;

pub mod scripted;
pub use scripted::*;
