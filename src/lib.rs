//! Italian tax rules over persons and households.
//!
//! The rules in [`crate::core::taxes`] are pure functions: inputs come through the
//! [`crate::core::PersonInputs`] / [`crate::core::HouseholdInputs`] traits and legislative
//! parameters through [`crate::core::Parameters`]. [`crate::core::Simulation`] runs them
//! over a [`crate::core::Situation`] loaded from JSON.

pub mod core;
