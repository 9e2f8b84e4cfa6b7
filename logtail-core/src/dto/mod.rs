//! Data Transfer Objects
//!
//! Wire representations of the responses returned by the log cache and the
//! cloud controller. DTOs are converted into domain types before they leave
//! the client layer.

pub mod application;
pub mod envelope;
pub mod log;
