//! Wildcard Pattern Answer Source
//!
//! This module answers DNS queries from an operator-maintained table of
//! wildcard patterns:
//! * Line-oriented zones file parsing with per-line recovery
//! * Suffix-anchored wildcard compilation
//! * Lock-free hot reload of the pattern table
//! * MX/CNAME fake host and PTR reverse name synthesis
//!
//! # Module Structure
//!
//! * `pattern` - wildcard pattern compilation and matching
//! * `pattern_table` - the immutable table and its reloadable store
//! * `resolver` - query resolution and answer synthesis
//! * `answers` - registry for synthesized secondary answers
//! * `context` - configuration and component wiring
//! * `query_type` - record type definitions
//! * `errors` - error types

/// Registry for synthesized A and PTR answers
pub mod answers;

/// Configuration and shared context
pub mod context;

/// Error types for loading and synthesis
pub mod errors;

/// Wildcard pattern compilation
pub mod pattern;

/// Pattern table loading and atomic reload
pub mod pattern_table;

/// DNS query type definitions
pub mod query_type;

/// Pattern based query resolution
pub mod resolver;
