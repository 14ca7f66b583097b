//! Core conversion logic
//!
//! This module contains the conversion pipeline components:
//! - `resolver` - Turns the declarative configuration into lookup tables
//! - `money` - Parses monetary and quantity text into signed decimals
//! - `engine` - Converts CSV rows to QIF records and routes them

pub mod engine;
pub mod money;
pub mod resolver;

pub use engine::{ConversionEngine, RunSummary};
pub use money::parse_signed_money;
pub use resolver::{ActionLookup, Destination, ResolvedConfig};
