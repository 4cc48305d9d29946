//! Property-based tests for the pixel codec and identifier generator
