//! Integration Tests Module
//!
//! Cross-crate flows: templates and configs persisted through `AppState`,
//! rendered, and dispatched against a mock provider.

// Render and dispatch through the prompt service
mod pipeline_test;

// Store persistence across reopen
mod storage_test;

// Command envelopes
mod commands_test;
