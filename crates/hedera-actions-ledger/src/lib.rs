//! Hedera Actions Ledger
//!
//! The transactional side of the adapter. Signing and consensus are not
//! implemented here; this crate only describes transactions, parses ids and
//! keys, and defines the [`LedgerClient`] capability that submits a
//! transaction and waits for its receipt.
//!
//! [`GatewayClient`] is the one concrete transport: it forwards transactions
//! as JSON to a signing gateway sidecar. Tests provide their own
//! [`LedgerClient`] implementations.

mod client;
mod entity;
mod error;
mod factory;
mod gateway;
mod keys;
mod receipt;
mod transaction;
pub mod units;

pub use client::{LedgerClient, Operator};
pub use entity::{AccountId, EntityId, NftId, TokenId, TopicId};
pub use error::LedgerError;
pub use factory::ClientFactory;
pub use gateway::GatewayClient;
pub use hedera_actions_config::Network;
pub use keys::{KeyAlgorithm, PrivateKey, PublicKey};
pub use receipt::{Status, TransactionId, TransactionReceipt, TransactionRecord, TransactionResponse};
pub use transaction::{
  HbarTransfer, NftTransfer, TokenCreate, TokenSupplyType, TokenTransfer, TokenType, Transaction,
  TransactionBody,
};
