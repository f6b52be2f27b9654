//! Category graph storage, similarity and projection

pub mod builder;
pub mod entity;
pub mod filters;
pub mod index;
pub mod similarity;
pub mod store;
pub mod weighted;

pub use builder::{project, ProjectionBuilder, ProjectionGraph};
pub use entity::{Arch, ArchKind, Category, NodeId, NodeKind, Page};
pub use filters::{Dimension, Filters, Selections};
pub use index::EntityIndex;
pub use store::{EdgeInsert, EntryGraph};
pub use weighted::{Edge, WeightedGraph};
