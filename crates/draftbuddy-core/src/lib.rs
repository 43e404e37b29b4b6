//! DraftBuddy Core - Frame Client Library
//!
//! This crate provides the shared client logic for DraftBuddy picture
//! frames. It handles subnet scanning and probing, a monitored device
//! connection with a guarded request gateway, typed gallery and
//! background operations, and the imaging pipeline that prepares
//! uploads and decodes on-device previews.

pub mod api;
pub mod connection;
pub mod discovery;
pub mod error;
pub mod imaging;
pub mod types;
