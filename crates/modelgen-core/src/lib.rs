//! Core contracts and helpers for modelgen.
//!
//! This crate defines the reflected metadata model, the connection descriptor,
//! and the contract every code generator implements. Adapters, generators and
//! the CLI all build on these types.

pub mod constraints;
pub mod descriptor;
pub mod endpoint;
pub mod error;
pub mod generator;
pub mod graph;
pub mod model;
pub mod options;
pub mod types;
pub mod validation;

pub use constraints::{
    CheckConstraint, ColumnConstraint, Constraint, FkAction, FkMatchType, ForeignKey, Index,
    PrimaryKey, UniqueConstraint,
};
pub use descriptor::ConnectionDescriptor;
pub use endpoint::{EndpointInfo, EngineConfig};
pub use error::{Error, Result};
pub use generator::{GenerationError, Generator, GeneratorFactory};
pub use graph::{DependencyOrder, dependency_order};
pub use model::{Column, MetadataModel, Table, TableKey, TableKind};
pub use options::GeneratorOptions;
pub use types::{ColumnType, IdentityGeneration};
pub use validation::validate_model;

/// Current contract version of the serialized metadata model.
pub const MODEL_VERSION: &str = "0.1";
