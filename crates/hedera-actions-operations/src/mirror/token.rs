use async_trait::async_trait;
use serde_json::{Value, json};

use super::{array, expect_object, integer, key_of, page_limit, text};
use crate::context::Context;
use crate::error::ActionError;
use crate::operation::{Operation, OperationResult, into_result};
use crate::params::ParameterBag;

const DEFAULT_HOLDER_LIMIT: u64 = 25;

/// Token metadata. `decimals` is passed through as the mirror reports it.
pub(crate) struct TokenInfo;

#[async_trait]
impl Operation for TokenInfo {
  async fn execute(
    &self,
    params: &ParameterBag,
    ctx: &Context,
  ) -> Result<OperationResult, ActionError> {
    let token_id = params.entity_id("tokenId")?;
    let path = format!("/api/v1/tokens/{}", token_id);
    let data = expect_object(ctx.mirror().get_json(&path).await?, &path)?;

    Ok(into_result(json!({
      "tokenId": text(&data, "token_id"),
      "name": text(&data, "name"),
      "symbol": text(&data, "symbol"),
      "type": text(&data, "type"),
      "decimals": data.get("decimals").cloned().unwrap_or(Value::Null),
      "totalSupply": text(&data, "total_supply"),
      "maxSupply": text(&data, "max_supply"),
      "supplyType": text(&data, "supply_type"),
      "treasuryAccountId": text(&data, "treasury_account_id"),
      "adminKey": key_of(&data, "admin_key"),
      "kycKey": key_of(&data, "kyc_key"),
      "freezeKey": key_of(&data, "freeze_key"),
      "wipeKey": key_of(&data, "wipe_key"),
      "supplyKey": key_of(&data, "supply_key"),
      "defaultFreezeStatus": data.get("freeze_default").and_then(Value::as_bool).unwrap_or(false),
      "deleted": data.get("deleted").and_then(Value::as_bool).unwrap_or(false),
      "autoRenewPeriod": integer(data.get("auto_renew_period")),
      "autoRenewAccount": text(&data, "auto_renew_account"),
      "expirationTime": text(&data, "expiry_timestamp"),
      "tokenMemo": text(&data, "memo"),
    })))
  }
}

/// One account's balance of one token, in the token's smallest unit.
pub(crate) struct TokenBalance;

#[async_trait]
impl Operation for TokenBalance {
  async fn execute(
    &self,
    params: &ParameterBag,
    ctx: &Context,
  ) -> Result<OperationResult, ActionError> {
    let token_id = params.entity_id("tokenId")?;
    let account_id = params.account_id("accountId")?;
    let path = format!(
      "/api/v1/tokens/{}/balances?order=desc&account.id={}",
      token_id, account_id
    );
    let data = expect_object(ctx.mirror().get_json(&path).await?, &path)?;

    let account = account_id.to_string();
    let entry = array(&data, "balances")
      .iter()
      .filter_map(Value::as_object)
      .find(|b| text(b, "account") == account);

    let mut result = into_result(json!({
      "accountId": account,
      "tokenId": token_id.to_string(),
      "hasToken": entry.is_some(),
      "balance": entry.and_then(|b| b.get("balance").cloned()).unwrap_or(json!(0)),
      "timestamp": text(&data, "timestamp"),
    }));
    if let Some(decimals) = entry.and_then(|b| integer(b.get("decimals"))) {
      result.insert("decimals".to_string(), json!(decimals));
    }
    Ok(result)
  }
}

/// Largest holders of a token.
pub(crate) struct TokenHolders;

#[async_trait]
impl Operation for TokenHolders {
  async fn execute(
    &self,
    params: &ParameterBag,
    ctx: &Context,
  ) -> Result<OperationResult, ActionError> {
    let token_id = params.entity_id("tokenId")?;
    let limit = page_limit(params, "limit", DEFAULT_HOLDER_LIMIT)?;
    let path = format!(
      "/api/v1/tokens/{}/balances?order=desc&limit={}",
      token_id, limit
    );
    let data = expect_object(ctx.mirror().get_json(&path).await?, &path)?;

    let holders: Vec<Value> = array(&data, "balances")
      .iter()
      .filter_map(Value::as_object)
      .map(|b| {
        json!({
          "accountId": text(b, "account"),
          "balance": b.get("balance").cloned().unwrap_or(json!(0)),
        })
      })
      .collect();

    Ok(into_result(json!({
      "tokenId": token_id.to_string(),
      "holderCount": holders.len(),
      "holders": holders,
      "timestamp": text(&data, "timestamp"),
    })))
  }
}
