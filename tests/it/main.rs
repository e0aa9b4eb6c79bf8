//! The only integration test crate

pub mod test_mutate;
pub mod test_psi;
pub mod test_resolve;
pub mod test_syntax;

// defines test case DSL and fixtures
pub mod util;
