//! Property-based tests for context propagation
