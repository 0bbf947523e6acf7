//! Input value types for action parameters.
//!
//! All parameter values are template strings that get resolved by minijinja
//! against the JSON of the item being processed. The resolved string is then
//! parsed into the type declared by the property schema.
//!
//! # Examples
//!
//! ```json
//! {
//!   "resource": "mirror",
//!   "mirrorOperation": "accountInfo",
//!   "accountId": "{{ account }}",
//!   "messageLimit": "25"
//! }
//! ```

/// A parameter value is a template string that gets resolved per item.
pub type InputValue = String;
