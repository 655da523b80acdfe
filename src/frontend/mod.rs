//! The interactive shell: parsing of input lines and dispatch to a
//! [`crate::Table`].

mod command;
mod repl;

pub use command::{Command, MetaCommand, PrepareError, Statement};
pub use repl::Repl;
