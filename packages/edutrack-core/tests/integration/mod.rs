//! Integration test suite for the rule sets.
//!
//! 1. Seed-data scenario walkthrough
//! 2. Store invariants under arbitrary operation sequences

pub mod invariant_tests;
pub mod scenario_tests;
