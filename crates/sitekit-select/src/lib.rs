//! sitekit Selection Register
//!
//! Holds at most one selected identifier (a favourite player, a preferred
//! lodge) drawn from a fixed [`Catalog`], persisted under one reserved store
//! key. Every "selected" affordance on every page reconciles against this
//! single value.
//!
//! # Semantics
//!
//! - `select(id)` replaces the selection and reports the previous one
//! - `select(id)` on the already-selected id toggles it off
//! - a stored id missing from the catalog is still returned by `current()`;
//!   resolving it against the catalog reports [`SelectError::NotFound`]
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use sitekit_select::{Catalog, SelectionRegister};
//! use sitekit_store::MemoryStore;
//!
//! let catalog = Arc::new(Catalog::new([(7_u32, "Tawanda Moyo"), (4, "Brian Ncube")]));
//! let register = SelectionRegister::new(catalog, Arc::new(MemoryStore::new()));
//!
//! register.select(7).unwrap();
//! let outcome = register.select(4).unwrap();
//! assert_eq!(outcome.previous, Some(7));
//! assert_eq!(register.current(), Some(4));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod catalog;
pub mod error;
pub mod register;

pub use catalog::Catalog;
pub use error::{Result, SelectError};
pub use register::{SelectOutcome, SelectionRegister, DEFAULT_SELECTION_KEY};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
