//! Observability helpers for hosts embedding the engine.

pub mod logging;
