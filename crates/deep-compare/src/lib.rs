//! Structural comparison of arbitrary values with navigable mismatch reports.
//!
//! Instead of a bare "not equal", a comparison reports every place where two
//! values diverge, each one with the path that leads to it:
//!
//! ```
//! use deep_compare::{reflect_struct, compare};
//!
//! struct Author {
//!     first_name: String,
//! }
//!
//! struct Book {
//!     title: String,
//!     authors: Vec<Author>,
//! }
//!
//! reflect_struct!(Author { first_name });
//! reflect_struct!(Book { title, authors });
//!
//! let got = Book { title: "Dune".into(), authors: vec![Author { first_name: "Frank".into() }] };
//! let want = Book { title: "Dune".into(), authors: vec![Author { first_name: "Brian".into() }] };
//!
//! let err = compare(&got, &want).unwrap_err();
//! assert!(err
//!     .to_string()
//!     .starts_with("(Book).authors[0].first_name: String mismatch;"));
//! ```
//!
//! Values take part through the [`Reflect`] trait. Shared and cyclic
//! structure is handled by tracking which pairs of allocations were already
//! compared.

pub mod compare;
pub mod config;
pub mod mismatch;
pub mod path;
pub mod reflect;
pub mod render;
pub mod repr;
pub mod string_diff;

pub use compare::{compare, diff, equal};
pub use config::{Config, ConfigError, FieldRule};
pub use mismatch::{Mismatch, MismatchKind, Mismatches};
pub use path::{Path, PathNode};
pub use reflect::{Dyn, Field, Kind, Record, Reflect, Scalar, TypeInfo, View};
pub use render::{AnsiBackend, ColorBackend, ColorMode, PlainBackend, RenderOptions, Role};
pub use string_diff::Span;
