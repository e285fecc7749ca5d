//! Step definitions and world for the formstore BDD scenarios

pub mod features;
