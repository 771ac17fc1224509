//! Deterministic Simulation Testing (DST) primitives.
//!
//! TigerStyle: All time and randomness in simulation components flows
//! through these types, so every test run with the same seed behaves
//! identically.

mod clock;
mod fault;
mod rng;

pub use clock::SimClock;
pub use fault::{FaultConfig, FaultInjector, FaultType};
pub use rng::DeterministicRng;
