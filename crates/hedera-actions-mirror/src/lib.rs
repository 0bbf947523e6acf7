//! Hedera Actions Mirror
//!
//! Read-only access to a network's mirror node. Every query is a single GET
//! returning JSON; nothing is retried or cached.

mod client;
mod error;

pub use client::{HttpMirrorClient, MirrorClient};
pub use error::MirrorError;
