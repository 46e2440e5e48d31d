//! Integration tests over the public simulation API.

mod common;
mod config;
mod scenarios;
