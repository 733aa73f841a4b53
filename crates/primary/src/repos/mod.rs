//! Repository traits for primary store operations.

pub mod resources;

pub use resources::ResourceRepo;
