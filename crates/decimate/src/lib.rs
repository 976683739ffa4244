//! Quadric-error-metric pair-contraction mesh decimation.
//!
//! Built on top of `meshcore`'s half-edge connectivity: this crate owns
//! decimation policy only -- quadric accumulation, pair cost, the
//! contraction priority queue, and the driver loop that ties them
//! together. It has no notion of half-edge connectivity itself.

mod config;
mod decimator;
mod driver;
mod pair;

pub use config::{DecimateConfig, DecimateError};
pub use decimator::{Decimator, StepOutcome};
pub use driver::{AbortHandle, Driver, DriverOutcome, SharedMesh};
pub use pair::{HeapEntry, OrderedCost, PairIndex, VertexPair};
