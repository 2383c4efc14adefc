//! Pattern Zone
//!
//! A wildcard answer source for DNS resolvers. Operators maintain a small
//! table of `<ip> <pattern>` lines; queries matching a pattern are answered
//! with the mapped address, and MX, CNAME and PTR answers are synthesized
//! on top of it.
//!
//! # Architecture
//!
//! * `dns::pattern_table` - config loading, wildcard compilation and hot reload
//! * `dns::resolver` - first-match lookup and answer synthesis
//! * `dns::answers` - registry for synthesized secondary answers

/// Pattern table, resolver and supporting types
pub mod dns;
