//! Core data structures for the terrarium simulation.

pub mod creature;
pub mod environment;
pub mod genome;
pub mod population;
