//! Inbound adapters: the HTTP surface and the command line.

pub mod cli;
pub mod http;
