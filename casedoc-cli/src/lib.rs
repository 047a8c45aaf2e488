//! Library half of the `casedoc` binary: helpers shared by the commands.

pub mod cases;
