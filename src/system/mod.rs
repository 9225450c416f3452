//! System-level modules
//!
//! Process-wide setup that runs before the server starts.

pub mod logging;
