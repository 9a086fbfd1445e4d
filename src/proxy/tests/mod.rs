//! Unit tests for the proxy bounded context.
