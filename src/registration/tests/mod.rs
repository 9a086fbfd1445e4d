//! Unit tests for the registration lifecycle.

mod domain_tests;
mod file_store_tests;
mod manager_tests;
