//! Consolidated integration tests for shapeshift-core.

mod records;
