//! Test helpers para problemset-server.

#![allow(dead_code, unused_imports)]

pub mod assertions;
pub mod client;
pub mod doubles;
pub mod fixtures;
pub mod logs;

pub use assertions::*;
pub use client::{TestClient, TestResponse, client, client_with_state};
pub use doubles::{CountingStore, FailingCache, FailingStore};
pub use fixtures::*;
pub use logs::{CapturedLogs, capture_logs};
