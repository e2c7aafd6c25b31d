//! planguard: redact plans before they leave the machine, build review
//! requests for them, and drive a small tool-using agent loop.

pub mod cli;
pub mod config;
pub mod core;
pub mod llm;
pub mod redact;
pub mod review;
pub mod skills;
pub mod ui;
