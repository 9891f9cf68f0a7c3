//! Scroll-driven choreography: offset grammar, regions, the priority scheduler and input
//! smoothing.

pub mod offsets;
pub mod region;
pub mod scheduler;
pub mod smoothing;
