//! Common utilities module
//!
//! This module contains shared utilities used across the image loader.

pub mod error;

pub use error::{LoadError, Result};
