pub use crate::{config::Config, editor::Editor, error::Error};

pub mod ansi_escape;
mod config;
mod editor;
mod error;
mod row;
mod syntax;
mod terminal;
mod xdg;

#[cfg(unix)]
use crate::unix as sys;
#[cfg(windows)]
use crate::windows as sys;

#[cfg(unix)]
mod unix;
#[cfg(windows)]
mod windows;
