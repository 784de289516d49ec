//! Integration test suite modules.

mod resolver;
