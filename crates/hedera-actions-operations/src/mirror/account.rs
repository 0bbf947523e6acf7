use async_trait::async_trait;
use hedera_actions_ledger::units::format_tinybars;
use serde_json::{Map, Value, json};

use super::{MAX_PAGE_LIMIT, array, decode_text, expect_object, integer, iso_timestamp, key_of, text};
use crate::context::Context;
use crate::error::ActionError;
use crate::operation::{Operation, OperationResult, into_result};
use crate::params::ParameterBag;

fn hbar_balance(data: &Map<String, Value>) -> i64 {
  integer(data.get("balance").and_then(|b| b.get("balance"))).unwrap_or(0)
}

/// HBAR balance plus the token balances embedded in the account record.
pub(crate) struct AccountBalance;

#[async_trait]
impl Operation for AccountBalance {
  async fn execute(
    &self,
    params: &ParameterBag,
    ctx: &Context,
  ) -> Result<OperationResult, ActionError> {
    let account_id = params.account_id("accountId")?;
    let path = format!("/api/v1/accounts/{}", account_id);
    let data = expect_object(ctx.mirror().get_json(&path).await?, &path)?;

    let tinybars = hbar_balance(&data);
    let embedded = data
      .get("balance")
      .and_then(|b| b.get("tokens"))
      .and_then(Value::as_array)
      .cloned()
      .unwrap_or_default();

    let tokens: Map<String, Value> = embedded
      .iter()
      .filter_map(|t| {
        let id = t.get("token_id")?.as_str()?;
        Some((id.to_string(), t.get("balance").cloned().unwrap_or(json!(0))))
      })
      .collect();

    Ok(into_result(json!({
      "accountId": account_id.to_string(),
      "hbarBalance": format_tinybars(tinybars),
      "hbarBalanceTinybars": tinybars,
      "tokenCount": tokens.len(),
      "tokens": tokens,
    })))
  }
}

/// General account information.
pub(crate) struct AccountInfo;

#[async_trait]
impl Operation for AccountInfo {
  async fn execute(
    &self,
    params: &ParameterBag,
    ctx: &Context,
  ) -> Result<OperationResult, ActionError> {
    let account_id = params.account_id("accountId")?;
    let path = format!("/api/v1/accounts/{}", account_id);
    let data = expect_object(ctx.mirror().get_json(&path).await?, &path)?;

    let tinybars = hbar_balance(&data);
    let expiration = data
      .get("expiry_timestamp")
      .and_then(Value::as_str)
      .and_then(iso_timestamp)
      .unwrap_or_default();

    Ok(into_result(json!({
      "accountId": text(&data, "account"),
      "balance": format_tinybars(tinybars),
      "balanceTinybars": tinybars,
      "memo": text(&data, "memo"),
      "expirationTime": expiration,
      "evmAddress": text(&data, "evm_address"),
      "key": key_of(&data, "key"),
      "deleted": data.get("deleted").and_then(Value::as_bool).unwrap_or(false),
      "maxAutomaticTokenAssociations": integer(data.get("max_automatic_token_associations")),
      "autoRenewPeriod": integer(data.get("auto_renew_period")),
    })))
  }
}

/// Token relationships of an account.
pub(crate) struct AccountTokens;

#[async_trait]
impl Operation for AccountTokens {
  async fn execute(
    &self,
    params: &ParameterBag,
    ctx: &Context,
  ) -> Result<OperationResult, ActionError> {
    let account_id = params.account_id("accountId")?;
    let path = format!("/api/v1/accounts/{}/tokens?limit={}", account_id, MAX_PAGE_LIMIT);
    let data = expect_object(ctx.mirror().get_json(&path).await?, &path)?;

    let tokens: Vec<Value> = array(&data, "tokens")
      .iter()
      .filter_map(Value::as_object)
      .map(|t| {
        json!({
          "tokenId": text(t, "token_id"),
          "balance": t.get("balance").cloned().unwrap_or(json!(0)),
          "automaticAssociation": t.get("automatic_association").and_then(Value::as_bool).unwrap_or(false),
          "freezeStatus": text(t, "freeze_status"),
          "kycStatus": text(t, "kyc_status"),
        })
      })
      .collect();

    Ok(into_result(json!({
      "accountId": account_id.to_string(),
      "tokenCount": tokens.len(),
      "tokens": tokens,
    })))
  }
}

/// NFTs currently owned by an account.
pub(crate) struct AccountNfts;

#[async_trait]
impl Operation for AccountNfts {
  async fn execute(
    &self,
    params: &ParameterBag,
    ctx: &Context,
  ) -> Result<OperationResult, ActionError> {
    let account_id = params.account_id("accountId")?;
    let path = format!("/api/v1/accounts/{}/nfts?limit={}", account_id, MAX_PAGE_LIMIT);
    let data = expect_object(ctx.mirror().get_json(&path).await?, &path)?;

    let nfts: Vec<Value> = array(&data, "nfts")
      .iter()
      .filter_map(Value::as_object)
      .map(|n| {
        json!({
          "tokenId": text(n, "token_id"),
          "serialNumber": integer(n.get("serial_number")),
          "metadata": decode_text(&text(n, "metadata")),
          "createdTimestamp": text(n, "created_timestamp"),
          "deleted": n.get("deleted").and_then(Value::as_bool).unwrap_or(false),
        })
      })
      .collect();

    Ok(into_result(json!({
      "accountId": account_id.to_string(),
      "nftCount": nfts.len(),
      "nfts": nfts,
    })))
  }
}
