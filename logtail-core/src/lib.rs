//! Logtail Core
//!
//! Core types and conversions for the Logtail log client.
//!
//! This crate contains:
//! - Domain types: normalized log messages, log-cache envelopes, applications
//! - DTOs: wire representations returned by the log cache and cloud controller
//! - Conversion from raw envelopes into log messages

pub mod convert;
pub mod domain;
pub mod dto;

/// Non-fatal warnings returned alongside API results
pub type Warnings = Vec<String>;
