//! Population-wide passes run by the population manager.

pub mod selection;
pub mod stats;
