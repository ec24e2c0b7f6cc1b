//! Schema-driven structural diff engine for JSON documents.
//!
//! Composes a [`schema::Planner`]-compiled [`schema::Plan`] with the [`diff`] engine and
//! [`aggregator`] to produce JSON Pointer-addressed add/remove/replace patches. See
//! [`facade::Patcher`] for the top-level entry point used by the CLI and library consumers.

pub mod aggregator;
pub mod diff;
pub mod equality;
pub mod facade;
pub mod parser;
pub mod patch;
pub mod path;
pub mod resolve;
pub mod schema;
