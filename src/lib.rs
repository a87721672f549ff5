//! Smart Bookmark: a minimal personal bookmark manager backed by a hosted
//! auth service and bookmark table.
//!
//! This library crate exposes all modules for use by the RPC bridge binary and integration tests.

pub mod app;
pub mod managers;
pub mod platform;
pub mod rpc_handler;
pub mod services;
pub mod types;
