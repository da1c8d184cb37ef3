//! Schema management module

mod builder;
mod model;

pub use builder::SchemaBuilder;
pub use model::{Column, ForeignKeyConstraint, Index, Interleave, KeyPart, OnDelete, Schema, Table};
