//! # Domain Module
//!
//! Core governance types and rules, free of I/O.

pub mod config;
pub mod entities;
pub mod errors;
pub mod invariants;
pub mod late_quorum;
pub mod quorum;
pub mod safety;
pub mod services;
pub mod state_machine;
pub mod tally;
pub mod value_objects;

pub use config::*;
pub use entities::*;
pub use errors::*;
pub use invariants::*;
pub use late_quorum::*;
pub use quorum::*;
pub use safety::*;
pub use services::*;
pub use state_machine::*;
pub use tally::*;
pub use value_objects::*;
