//! # dbml-core
//!
//! Resolved, validation-ready domain objects for DBML documents.
//!
//! These are the shapes handed to downstream consumers (validators, code
//! generators). They carry no source positions and no parse-time state;
//! `dbml-syntax` produces them from its AST.

pub mod types;

pub use types::{Column, Enum, Project, Table};
