//! Transaction descriptions.
//!
//! A [`Transaction`] is a body plus the extra keys that must sign it. The
//! operator key always signs implicitly; `signers` only lists keys beyond it
//! (custom submit keys, supply keys, ...).

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Serialize, Serializer};

use crate::entity::{AccountId, NftId, TokenId, TopicId};
use crate::keys::{PrivateKey, PublicKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenType {
  FungibleCommon,
  NonFungibleUnique,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenSupplyType {
  Infinite,
  Finite,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HbarTransfer {
  pub account_id: AccountId,
  pub tinybars: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenTransfer {
  pub token_id: TokenId,
  pub account_id: AccountId,
  /// Smallest units; negative for the sending side.
  pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NftTransfer {
  pub nft_id: NftId,
  pub sender: AccountId,
  pub receiver: AccountId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenCreate {
  pub name: String,
  pub symbol: String,
  pub token_type: TokenType,
  pub decimals: u32,
  pub initial_supply: u64,
  pub treasury_account_id: AccountId,
  pub supply_type: TokenSupplyType,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub max_supply: Option<u64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub supply_key: Option<PublicKey>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum TransactionBody {
  AccountCreate {
    key: PublicKey,
    /// Derive the account's EVM alias from an ECDSA key.
    alias_from_key: bool,
    initial_balance_tinybars: i64,
    /// `-1` for unlimited automatic token associations.
    max_automatic_token_associations: i32,
  },
  CryptoTransfer {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    hbar_transfers: Vec<HbarTransfer>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    nft_transfers: Vec<NftTransfer>,
  },
  TokenCreate(TokenCreate),
  TokenMint {
    token_id: TokenId,
    #[serde(skip_serializing_if = "is_zero")]
    amount: u64,
    #[serde(serialize_with = "serialize_metadata", skip_serializing_if = "Vec::is_empty")]
    metadata: Vec<Vec<u8>>,
  },
  TokenAirdrop {
    token_transfers: Vec<TokenTransfer>,
  },
  TopicCreate {
    #[serde(skip_serializing_if = "Option::is_none")]
    memo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    submit_key: Option<PublicKey>,
  },
  TopicMessageSubmit {
    topic_id: TopicId,
    message: String,
  },
}

impl TransactionBody {
  /// Short name used in logs.
  pub fn kind(&self) -> &'static str {
    match self {
      TransactionBody::AccountCreate { .. } => "accountCreate",
      TransactionBody::CryptoTransfer { .. } => "cryptoTransfer",
      TransactionBody::TokenCreate(_) => "tokenCreate",
      TransactionBody::TokenMint { .. } => "tokenMint",
      TransactionBody::TokenAirdrop { .. } => "tokenAirdrop",
      TransactionBody::TopicCreate { .. } => "topicCreate",
      TransactionBody::TopicMessageSubmit { .. } => "topicMessageSubmit",
    }
  }
}

fn is_zero(amount: &u64) -> bool {
  *amount == 0
}

fn serialize_metadata<S: Serializer>(metadata: &[Vec<u8>], serializer: S) -> Result<S::Ok, S::Error> {
  serializer.collect_seq(metadata.iter().map(|m| STANDARD.encode(m)))
}

/// A transaction ready to be handed to a [`crate::LedgerClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
  body: TransactionBody,
  signers: Vec<PrivateKey>,
}

impl Transaction {
  pub fn new(body: TransactionBody) -> Self {
    Self {
      body,
      signers: Vec::new(),
    }
  }

  /// Add a signature by `key` in addition to the operator's.
  pub fn sign(mut self, key: PrivateKey) -> Self {
    self.signers.push(key);
    self
  }

  pub fn body(&self) -> &TransactionBody {
    &self.body
  }

  pub fn signers(&self) -> &[PrivateKey] {
    &self.signers
  }
}
