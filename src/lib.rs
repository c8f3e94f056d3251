// src/lib.rs

#[macro_use]
pub mod macros;

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod log;

pub mod diff;
pub mod notify;
pub mod source;
pub mod store;
pub mod summary;
pub mod tables;
pub mod text;
pub mod watch;

pub use error::{Result, WatchError};
