//! Unit tests module
//!
//! Contains unit tests for the standalone helpers that every adapter builds on.

mod location_model;
mod path_codec;
