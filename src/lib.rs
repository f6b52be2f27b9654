//! Category graph community analysis
//!
//! Load typed category/page relations into an [`EntryGraph`], project them
//! onto a weighted similarity graph, detect communities and edit the resulting
//! [`CommunitySet`].

pub mod cluster;
pub mod community;
pub mod config;
pub mod data;
pub mod error;
pub mod graph;
pub mod session;
pub mod storage;

pub use cluster::{Algorithm, Controller, CoverKind};
pub use community::{compare, Community, CommunitySet, Comparison};
pub use config::Config;
pub use error::{Error, RecordError, Result};
pub use graph::{EntryGraph, Filters, ProjectionGraph, Selections};
pub use session::{Session, Stage};
