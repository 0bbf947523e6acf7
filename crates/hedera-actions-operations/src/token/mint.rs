use async_trait::async_trait;
use hedera_actions_ledger::units::to_smallest_unit;
use hedera_actions_ledger::{Transaction, TransactionBody};
use serde_json::{Value, json};

use super::{MAX_METADATA_BYTES, lookup_decimals};
use crate::context::Context;
use crate::error::ActionError;
use crate::mirror::TokenInfo;
use crate::operation::{Operation, OperationResult, into_result, submit};
use crate::params::ParameterBag;

/// Mint additional supply of a fungible token, given in whole tokens.
pub(crate) struct MintFungibleToken {
  token_info: TokenInfo,
}

impl MintFungibleToken {
  pub(crate) fn new() -> Self {
    Self {
      token_info: TokenInfo,
    }
  }
}

#[async_trait]
impl Operation for MintFungibleToken {
  async fn execute(
    &self,
    params: &ParameterBag,
    ctx: &Context,
  ) -> Result<OperationResult, ActionError> {
    const NAME: &str = "mintFungibleToken";

    let token_id = params.entity_id("tokenId")?;
    let amount = params.f64("amount")?;
    if amount <= 0.0 {
      return Err(ActionError::validation("amount", "must be greater than zero"));
    }

    let decimals = lookup_decimals(&self.token_info, ctx, NAME, token_id).await?;
    let units = to_smallest_unit(amount, decimals)
      .map_err(|e| ActionError::validation("amount", e.to_string()))?;
    if units == 0 {
      return Err(ActionError::validation(
        "amount",
        format!("rounds to zero with {} decimals", decimals),
      ));
    }

    let supply_key = params.optional_private_key("supplyKey")?;

    let mut transaction = Transaction::new(TransactionBody::TokenMint {
      token_id,
      amount: units,
      metadata: Vec::new(),
    });
    if let Some(key) = supply_key {
      transaction = transaction.sign(key);
    }
    let (transaction_id, receipt) = submit(ctx, NAME, transaction).await?;

    Ok(into_result(json!({
      "status": receipt.status.as_str(),
      "tokenId": token_id.to_string(),
      "amount": amount,
      "decimals": decimals,
      "amountInSmallestUnit": units,
      "transactionId": transaction_id.to_string(),
    })))
  }
}

/// Mint one NFT whose metadata is either a URI or compact on-chain JSON.
pub(crate) struct MintNft;

#[async_trait]
impl Operation for MintNft {
  async fn execute(
    &self,
    params: &ParameterBag,
    ctx: &Context,
  ) -> Result<OperationResult, ActionError> {
    const NAME: &str = "mintNFT";

    let token_id = params.entity_id("tokenId")?;
    let (metadata_type, field, metadata) = match params.optional_str("metadataType").as_deref() {
      None | Some("uri") => ("uri", "metadataUri", params.str("metadataUri")?),
      Some("onchain") => ("onchain", "metadataJson", compact_json(params)?),
      Some(other) => {
        return Err(ActionError::validation(
          "metadataType",
          format!("expected uri or onchain, got '{}'", other),
        ));
      }
    };

    let size = metadata.len();
    if size > MAX_METADATA_BYTES {
      return Err(ActionError::validation(
        field,
        format!(
          "metadata is {} bytes, the maximum is {} bytes",
          size, MAX_METADATA_BYTES
        ),
      ));
    }

    let supply_key = params.optional_private_key("supplyKey")?;

    let mut transaction = Transaction::new(TransactionBody::TokenMint {
      token_id,
      amount: 0,
      metadata: vec![metadata.clone().into_bytes()],
    });
    if let Some(key) = supply_key {
      transaction = transaction.sign(key);
    }

    let (transaction_id, receipt) = submit(ctx, NAME, transaction).await?;
    let serial = receipt.serials.first().copied();

    Ok(into_result(json!({
      "status": receipt.status.as_str(),
      "tokenId": token_id.to_string(),
      "serialNumber": serial,
      "metadataType": metadata_type,
      "metadata": metadata,
      "metadataSize": size,
      "transactionId": transaction_id.to_string(),
    })))
  }
}

/// Serialize `metadataJson` without whitespace. A string holding JSON is
/// parsed first so its formatting does not count against the size limit.
fn compact_json(params: &ParameterBag) -> Result<String, ActionError> {
  let value = params
    .get("metadataJson")
    .ok_or_else(|| ActionError::validation("metadataJson", "is required"))?;

  let parsed = match value {
    Value::String(s) => serde_json::from_str::<Value>(s)
      .map_err(|e| ActionError::validation("metadataJson", format!("invalid JSON: {}", e)))?,
    other => other.clone(),
  };

  serde_json::to_string(&parsed)
    .map_err(|e| ActionError::validation("metadataJson", e.to_string()))
}
