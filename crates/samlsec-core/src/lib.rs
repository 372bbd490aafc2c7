#![forbid(unsafe_code)]

//! Core types shared by the samlsec crates: the error type, algorithm
//! URIs and XML namespace constants.

pub mod algorithm;
pub mod error;
pub mod ns;

pub use error::{Error, Result};
