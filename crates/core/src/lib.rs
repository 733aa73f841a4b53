//! Core domain types and shared logic for relink.
//!
//! This crate defines the data model used across all other crates:
//! - Primary resource records and their derived link/resource documents
//! - The typed link document patch and the found/not-found lookup result
//! - Short path and short URL derivation
//! - Task selection and the lookback window
//! - Configuration types

pub mod config;
pub mod error;
pub mod link;
pub mod resource;
pub mod task;

pub use error::{Error, Result};
pub use link::LinkDeriver;
pub use resource::{
    DerivedLinkDocument, DerivedResourceDocument, LinkDocumentPatch, Lookup,
    PrimaryResourceRecord, ResourceId,
};
pub use task::{LookbackDays, Task, parse_tasks};
