//! Plain text time tracking. Activities are written into a weekly log, and the cli shows how a
//! fixed weekly budget of working hours was split between them.
//!

pub mod budget;
pub mod cli;
pub mod fs;
pub mod log;
pub mod utils;
