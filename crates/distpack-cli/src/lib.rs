//! distpack library - expose command handlers for the binary and tests

pub mod commands;
pub mod common;

pub use common::GlobalOpts;
pub use distpack_logger as logger;
