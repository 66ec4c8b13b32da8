//! Types shared between the word finder controller, its storage and its drivers.

pub mod domain;
pub mod error;
pub mod protocol;
