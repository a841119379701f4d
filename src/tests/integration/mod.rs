//! Integration tests against a local mock of the morphology API.

mod morphology_integration;
