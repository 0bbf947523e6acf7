//! Read-only queries against the network's mirror node.
//!
//! Every operation here is one GET (the watch operation polls) whose JSON is
//! mapped into a flat result. HBAR amounts are reported both in tinybars and
//! as a decimal HBAR string; token balances stay in the token's smallest unit.

mod account;
mod token;
mod topic;
mod watch;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, SecondsFormat};
use serde_json::{Map, Value};

use crate::error::ActionError;
use crate::params::{Extractor, ParameterBag};
use crate::schema::{OptionDef, PropertyDef};
use crate::service::Service;

pub(crate) use account::{AccountBalance, AccountInfo, AccountNfts, AccountTokens};
pub(crate) use token::{TokenBalance, TokenHolders, TokenInfo};
pub(crate) use topic::TopicMessages;
pub(crate) use watch::WatchTopicMessages;

const RESOURCE: &str = "mirror";

const DEFAULT_MESSAGE_LIMIT: u64 = 10;
const MAX_PAGE_LIMIT: u64 = 100;

pub(crate) fn service() -> Service {
  Service::new(RESOURCE)
    .property(
      PropertyDef::options(
        "mirrorOperation",
        "Operation",
        vec![
          OptionDef::new("Get Account HBAR Balance", "accountBalance")
            .describe("Get HBAR and token balances of an account"),
          OptionDef::new("Get Account Info", "accountInfo")
            .describe("Get account information from the mirror node"),
          OptionDef::new("Get Account NFTs", "accountNfts")
            .describe("List NFTs owned by an account"),
          OptionDef::new("Get Account Tokens", "accountTokens")
            .describe("Get all tokens associated with an account"),
          OptionDef::new("Get Token Balance", "tokenBalance")
            .describe("Get one account's balance of a token"),
          OptionDef::new("Get Token Holders", "tokenHolders")
            .describe("List the largest holders of a token"),
          OptionDef::new("Get Token Info", "tokenInfo")
            .describe("Get token information from the mirror node"),
          OptionDef::new("Get Topic Messages", "topicMessages")
            .describe("Get messages from a consensus topic"),
          OptionDef::new("Watch Topic Messages", "watchTopicMessages")
            .describe("Wait for new messages on a consensus topic"),
        ],
        "accountInfo",
      )
      .show_for(RESOURCE, &[]),
    )
    .property(
      PropertyDef::string("accountId", "Account ID")
        .required()
        .placeholder("0.0.12345")
        .show_for(RESOURCE, &["accountInfo"]),
    )
    .property(
      PropertyDef::string("balanceAccountId", "Account ID")
        .required()
        .placeholder("0.0.12345")
        .show_for(RESOURCE, &["accountBalance"]),
    )
    .property(
      PropertyDef::string("tokensAccountId", "Account ID")
        .required()
        .placeholder("0.0.12345")
        .show_for(RESOURCE, &["accountTokens"]),
    )
    .property(
      PropertyDef::string("nftsAccountId", "Account ID")
        .required()
        .placeholder("0.0.12345")
        .show_for(RESOURCE, &["accountNfts"]),
    )
    .property(
      PropertyDef::string("mirrorTokenId", "Token ID")
        .required()
        .placeholder("0.0.12345")
        .show_for(RESOURCE, &["tokenInfo"]),
    )
    .property(
      PropertyDef::string("tokenBalanceTokenId", "Token ID")
        .required()
        .placeholder("0.0.12345")
        .show_for(RESOURCE, &["tokenBalance"]),
    )
    .property(
      PropertyDef::string("tokenBalanceAccountId", "Account ID")
        .placeholder("0.0.12345")
        .describe("Account to check; defaults to the authenticated account")
        .show_for(RESOURCE, &["tokenBalance"]),
    )
    .property(
      PropertyDef::string("holdersTokenId", "Token ID")
        .required()
        .placeholder("0.0.12345")
        .show_for(RESOURCE, &["tokenHolders"]),
    )
    .property(
      PropertyDef::number("holderLimit", "Holder Limit", 25)
        .describe("Maximum number of holders to return (1-100)")
        .show_for(RESOURCE, &["tokenHolders"]),
    )
    .property(
      PropertyDef::string("topicId", "Topic ID")
        .required()
        .placeholder("0.0.12345")
        .show_for(RESOURCE, &["topicMessages", "watchTopicMessages"]),
    )
    .property(
      PropertyDef::number("messageLimit", "Message Limit", DEFAULT_MESSAGE_LIMIT)
        .describe("Maximum number of messages to return (1-100)")
        .show_for(RESOURCE, &["topicMessages", "watchTopicMessages"]),
    )
    .property(
      PropertyDef::number("sequenceFrom", "Sequence Number From", 0)
        .describe("Only messages at or after this sequence number; 0 for no bound")
        .show_for(RESOURCE, &["topicMessages", "watchTopicMessages"]),
    )
    .property(
      PropertyDef::number("maxWaitSeconds", "Max Wait (seconds)", 30)
        .describe("How long to wait for new messages before returning")
        .show_for(RESOURCE, &["watchTopicMessages"]),
    )
    .operation("accountBalance", extract_account_balance, AccountBalance)
    .operation("accountInfo", extract_account_info, AccountInfo)
    .operation("accountNfts", extract_account_nfts, AccountNfts)
    .operation("accountTokens", extract_account_tokens, AccountTokens)
    .operation("tokenBalance", extract_token_balance, TokenBalance)
    .operation("tokenHolders", extract_token_holders, TokenHolders)
    .operation("tokenInfo", extract_token_info, TokenInfo)
    .operation("topicMessages", extract_topic_messages, TopicMessages)
    .operation("watchTopicMessages", extract_watch, WatchTopicMessages)
}

fn extract_account_info(ex: &mut Extractor<'_>) -> Result<(), ActionError> {
  ex.required("accountId", "accountId")
}

fn extract_account_balance(ex: &mut Extractor<'_>) -> Result<(), ActionError> {
  ex.required("balanceAccountId", "accountId")
}

fn extract_account_tokens(ex: &mut Extractor<'_>) -> Result<(), ActionError> {
  ex.required("tokensAccountId", "accountId")
}

fn extract_account_nfts(ex: &mut Extractor<'_>) -> Result<(), ActionError> {
  ex.required("nftsAccountId", "accountId")
}

fn extract_token_info(ex: &mut Extractor<'_>) -> Result<(), ActionError> {
  ex.required("mirrorTokenId", "tokenId")
}

fn extract_token_balance(ex: &mut Extractor<'_>) -> Result<(), ActionError> {
  ex.required("tokenBalanceTokenId", "tokenId")?;
  ex.payer_as("accountId");
  ex.optional("tokenBalanceAccountId", "accountId")
}

fn extract_token_holders(ex: &mut Extractor<'_>) -> Result<(), ActionError> {
  ex.required("holdersTokenId", "tokenId")?;
  ex.optional("holderLimit", "limit")
}

fn extract_topic_messages(ex: &mut Extractor<'_>) -> Result<(), ActionError> {
  ex.required("topicId", "topicId")?;
  ex.optional("messageLimit", "limit")?;
  ex.optional("sequenceFrom", "sequenceFrom")
}

fn extract_watch(ex: &mut Extractor<'_>) -> Result<(), ActionError> {
  extract_topic_messages(ex)?;
  ex.optional("maxWaitSeconds", "maxWaitSeconds")
}

/// A page size parameter, defaulting to `default` and clamped to `1..=100`.
fn page_limit(params: &ParameterBag, key: &str, default: u64) -> Result<u64, ActionError> {
  let limit = match params.optional_f64(key)? {
    Some(n) => n.round().clamp(1.0, MAX_PAGE_LIMIT as f64) as u64,
    None => default,
  };
  Ok(limit.clamp(1, MAX_PAGE_LIMIT))
}

/// The response body as an object, or an upstream error naming `path`.
fn expect_object(value: Value, path: &str) -> Result<Map<String, Value>, ActionError> {
  match value {
    Value::Object(map) => Ok(map),
    other => Err(ActionError::upstream(format!(
      "unexpected response for {}: expected a JSON object, got {}",
      path, other
    ))),
  }
}

/// An array field, empty when absent.
fn array<'a>(data: &'a Map<String, Value>, key: &str) -> &'a [Value] {
  data
    .get(key)
    .and_then(Value::as_array)
    .map(Vec::as_slice)
    .unwrap_or(&[])
}

/// A field rendered as text; numbers are stringified and absence is empty.
fn text(data: &Map<String, Value>, key: &str) -> String {
  match data.get(key) {
    Some(Value::String(s)) => s.clone(),
    Some(Value::Number(n)) => n.to_string(),
    Some(Value::Bool(b)) => b.to_string(),
    _ => String::new(),
  }
}

fn integer(value: Option<&Value>) -> Option<i64> {
  match value? {
    Value::Number(n) => n.as_i64(),
    Value::String(s) => s.parse().ok(),
    _ => None,
  }
}

/// The key string of a mirror key object (`{"_type": ..., "key": ...}`).
fn key_of(data: &Map<String, Value>, field: &str) -> String {
  data
    .get(field)
    .and_then(|k| k.get("key"))
    .and_then(Value::as_str)
    .unwrap_or_default()
    .to_string()
}

/// Base64 payload decoded to text; invalid UTF-8 is replaced.
fn decode_text(encoded: &str) -> String {
  match STANDARD.decode(encoded) {
    Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
    Err(_) => encoded.to_string(),
  }
}

/// `seconds.nanoseconds` consensus time as an RFC 3339 UTC timestamp with
/// millisecond precision.
fn iso_timestamp(timestamp: &str) -> Option<String> {
  let (secs, nanos) = match timestamp.split_once('.') {
    Some((secs, frac)) => {
      let digits: String = frac.chars().chain(std::iter::repeat('0')).take(9).collect();
      (secs.parse::<i64>().ok()?, digits.parse::<u32>().ok()?)
    }
    None => (timestamp.parse::<i64>().ok()?, 0),
  };
  DateTime::from_timestamp(secs, nanos).map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true))
}
