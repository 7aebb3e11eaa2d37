//! Interactive terminal chat.
//!
//! Entry point: [`loop_runner::run_chat_loop`]. The loop itself
//! ([`loop_runner::drive`]) is generic over its line source and writer so it
//! can run against scripted input.

pub mod input;
pub mod loop_runner;
