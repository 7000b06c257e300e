//! Flows that span an orchestrator and the token service.

pub mod auth;
