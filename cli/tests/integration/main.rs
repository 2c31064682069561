//! Integration tests for the fazenda installer
//!
//! `cli_tests` spawns the actual binary; `server_tests` drives the HTTP
//! router in-process. Both are slower than the unit suite.

mod cli_tests;
mod server_tests;
