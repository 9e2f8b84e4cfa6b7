//! Core domain types
//!
//! This module contains the structures shared between the client (which
//! produces them from wire data) and the actor layer (which streams them to
//! the command layer).

pub mod application;
pub mod envelope;
pub mod log;
