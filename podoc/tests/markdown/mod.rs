//! Markdown format tests
//!
//! Tests for bidirectional Markdown ↔ tree conversion.

mod import;
mod round_trip;
