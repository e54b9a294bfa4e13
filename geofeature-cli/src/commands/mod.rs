//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! - [`lookup`] - Resolve a dotted type path against a taxonomy
//! - [`encode`] - Build and encode one feature from command-line geometry
//! - [`inspect`] - Dump the features stored in a feature file

pub mod common;
pub mod encode;
pub mod inspect;
pub mod lookup;
