//! Weighted finite-state transducer engine for the rewrite library.
//!
//! This crate provides a mutable weighted transducer type, the algorithms the
//! rewrite engine composes (composition, projection, epsilon removal,
//! determinization, shortest distance, n-shortest paths, path enumeration,
//! arc sorting, trimming) and a binary archive of named rule transducers.
//!
//! # Architecture
//!
//! - [`fst`] -- `VectorFst`, transitions and property bits
//! - [`ops`] -- Projection, arc sorting, connection (trimming)
//! - [`compose`] -- Composition with epsilon-sequencing filters
//! - [`rmepsilon`] -- Epsilon removal
//! - [`shortest_distance`] -- Forward and reverse single-source distances
//! - [`determinize`] -- Weighted subset construction with pruning and a state cap
//! - [`shortest_path`] -- n-best path extraction
//! - [`paths`] -- Path enumeration with an explicit DFS stack
//! - [`format`] -- Archive header parsing and validation
//! - [`record`] -- Zero-copy state and transition record layout
//! - [`archive`] -- Named rule archives (reading and writing)

pub mod archive;
pub mod compose;
pub mod determinize;
pub mod format;
pub mod fst;
pub mod ops;
pub mod paths;
pub mod record;
pub mod rmepsilon;
pub mod shortest_distance;
pub mod shortest_path;

pub use archive::{ArchiveWriter, RuleArchive};
pub use compose::{ComposeFilter, compose};
pub use determinize::{DeterminizeConfig, DeterminizeResult, determinize};
pub use fst::{FstProperties, StateId, Transition, VectorFst};
pub use ops::{ArcSortType, ProjectType, arc_sort, connect, project};
pub use paths::{PathEntry, Paths, collect_paths, paths};
pub use rmepsilon::rm_epsilon;
pub use shortest_distance::{shortest_distance, shortest_distance_reverse};
pub use shortest_path::shortest_path;

pub use rewrite_core::{EPSILON, Label};

/// Error type for archive loading and path enumeration.
#[derive(Debug, thiserror::Error)]
pub enum FstError {
    #[error("invalid magic number in archive header")]
    InvalidMagic,
    #[error("archive too short: expected at least {expected} bytes, got {actual}")]
    TooShort { expected: usize, actual: usize },
    #[error("unsupported weight type {0} (only tropical archives are supported)")]
    UnsupportedWeightType(u8),
    #[error("unsupported archive version {0}")]
    UnsupportedVersion(u8),
    #[error("invalid archive entry {name:?}: {reason}")]
    InvalidEntry { name: String, reason: String },
    #[error("duplicate archive entry {0:?}")]
    DuplicateEntry(String),
    #[error("lattice is cyclic; it has infinitely many paths")]
    Cyclic,
    #[error("archive I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
