//! Hierarchical feature type taxonomy (the classificator).
//!
//! The taxonomy is a tree of named type nodes such as `natural` →
//! `coastline`. Every node has a stable global index, and a path through the
//! tree packs into a single [`TypeCode`] that features carry instead of a list
//! of strings.
//!
//! # Lifecycle
//!
//! The tree is built once (from an outline file via [`Taxonomy::load`], or
//! programmatically via [`TaxonomyBuilder`]) and is read-only afterwards.
//! Share it behind an `Arc` with any number of readers; there is no interior
//! mutability and no global instance.
//!
//! # Example
//!
//! ```
//! use geofeature::taxonomy::{Taxonomy, TypeCode};
//!
//! let taxonomy: Taxonomy = "natural\n  coastline\n  water\nhighway\n".parse().unwrap();
//!
//! let natural = taxonomy.root().binary_find("natural").unwrap();
//! let coastline = natural.binary_find("coastline").unwrap();
//! let code = TypeCode::EMPTY.push(natural.index()).push(coastline.index());
//!
//! assert_eq!(taxonomy.type_code_for_path("natural.coastline"), Some(code));
//! assert_eq!(taxonomy.path_of(code).as_deref(), Some("natural.coastline"));
//! assert!(natural.binary_find("forest").is_none());
//! ```

mod builder;
mod parser;
mod tree;
mod type_code;

use std::path::PathBuf;

use thiserror::Error;

pub use builder::{BuildId, TaxonomyBuilder};
pub use tree::{Node, Taxonomy};
pub use type_code::{TypeCode, TypeCodeError, MAX_DEPTH, MAX_INDEX, SLOT_BITS};

/// Separator between node names in a dotted type path.
pub const PATH_SEPARATOR: char = '.';

/// Errors raised while building or loading a taxonomy.
///
/// All of them are fatal for the caller: a process cannot classify features
/// without a complete tree.
#[derive(Debug, Error)]
pub enum TaxonomyError {
    /// The outline file could not be read.
    #[error("Failed to read taxonomy file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The outline text is malformed.
    #[error("Taxonomy syntax error on line {line}: {reason}")]
    Syntax { line: usize, reason: String },

    /// A node name is empty or contains reserved characters.
    #[error("Invalid node name '{0}'")]
    InvalidName(String),

    /// Two siblings share a name.
    #[error("Duplicate node '{name}' under '{parent}'")]
    DuplicateName { parent: String, name: String },

    /// The tree has more nodes than a type code slot can address.
    #[error("Taxonomy has {count} nodes; type codes can address at most {max}")]
    TooManyNodes { count: usize, max: usize },

    /// A node is nested deeper than a type code can describe.
    #[error("Node '{path}' is nested deeper than {max} levels")]
    TooDeep { path: String, max: usize },
}
