//! Unit tests for the service registry bounded context.
