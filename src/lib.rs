//! Pcore
//!
//! A structural, parametric type system and the expression language that writes its types.
//!
//! # Example
//!
//! ```
//! use pcore::{Pcore, Value};
//!
//! let pcore = Pcore::new().unwrap();
//! let t = pcore.resolve_type("Array[Integer[0, 9], 1, 3]").unwrap();
//! assert!(t.is_instance(&Value::Array(vec![Value::Integer(4)])));
//! assert!(!t.is_instance(&Value::Array(vec![])));
//! ```
//!
//! # Layout
//!
//! - [`frontend`]: lexer and parser of type expressions
//! - [`types`]: the type lattice, assignability and membership
//! - [`evaluator`]: expression tree to type
//! - [`loader`]: scoped name resolution
//! - [`context`]: the [`Pcore`] context tying loaders, registry and configuration together

#![doc(html_root_url = "https://docs.rs/pcore")]
#![warn(rust_2018_idioms)]

pub mod context;
pub mod error;
pub mod evaluator;
pub mod frontend;
pub mod loader;
pub mod meta;
pub mod registry;
pub mod semver;
pub mod time;
pub mod types;
pub mod values;

// Utility modules
pub mod util;

pub use context::Pcore;
pub use error::{ParseError, PcoreError, Result, TypeAssertionError, TypeResolverError, ValidationError};
pub use evaluator::TypeEvaluator;
pub use types::Type;
pub use values::Value;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
