//! A small server-rendered todo list: axum in front, SQLite behind.
//!
//! Every request opens its own storage session, runs one operation from
//! [`crate::core`], commits, and then either renders the list page or redirects
//! back to it.

pub mod adapters;
pub mod config;
pub mod core;
pub mod storage;
pub mod views;
