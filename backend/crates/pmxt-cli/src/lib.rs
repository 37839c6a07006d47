//! pmxt-cli library
//!
//! Exports the API caller and logger for the binary and tests.

pub(crate) mod client;
pub mod logger;

pub use client::{CliClientResult, Client, ClientError};
