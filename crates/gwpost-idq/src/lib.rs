//! Glue for the iDQ glitch-classification pipeline.
//!
//! - [`config`]: the sectioned configuration file shared by all tasks
//! - [`gdb`]: command lines for the GraceDB helper executables
//! - [`output`]: classifier output tables and the quantities plotted from them

pub mod config;
pub mod gdb;
pub mod output;
