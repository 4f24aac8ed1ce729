pub mod cli;
pub mod config;
pub mod context;
pub mod domain;
pub mod error;
pub mod git;
pub mod package;
pub mod patcher;
pub mod process;
pub mod ui;

pub use error::{ReleaseError, Result};
