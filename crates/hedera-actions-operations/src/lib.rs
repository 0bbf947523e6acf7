//! Hedera Actions Operations
//!
//! The dispatch core: each resource (`account`, `token`, `consensus`,
//! `mirror`) is a [`Service`] holding a fixed table of [`Operation`]s. A
//! service declares the parameter schema for its operations, extracts the
//! parameters an operation needs from a [`ParameterSource`], and dispatches
//! execution. The [`Registry`] maps resource names to services.
//!
//! Transactional operations go through the [`Context`]'s ledger client;
//! read-only operations go through its mirror client. Both produce an
//! [`OperationResult`].

mod account;
mod consensus;
mod context;
mod error;
mod mirror;
mod operation;
mod params;
mod registry;
mod schema;
mod service;
mod token;

pub use context::Context;
pub use error::ActionError;
pub use operation::{Operation, OperationResult};
pub use params::{Extractor, ParameterBag, ParameterSource, StaticParameters};
pub use registry::Registry;
pub use schema::{OptionDef, PropertyDef, PropertyKind};
pub use service::{ExtractFn, Service};
