//! Integration tests for context propagation through the renderer


mod context_resolution;
mod lifecycle;
