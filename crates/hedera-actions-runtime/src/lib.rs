//! Hedera Actions Runtime
//!
//! Runs an action over a batch of input items. [`TemplateParameterSource`]
//! renders the action's parameter templates per item and coerces them to
//! their schema types; [`ItemExecutor`] dispatches each item through the
//! operation registry and collects the results in input order.

mod error;
mod executor;
mod input;
mod result;

pub use error::BatchError;
pub use executor::ItemExecutor;
pub use input::{TemplateParameterSource, coerce_value};
pub use result::{BatchResult, OutputItem};
