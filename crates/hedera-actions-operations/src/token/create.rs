use async_trait::async_trait;
use hedera_actions_ledger::units::MAX_DECIMALS;
use hedera_actions_ledger::{
  PrivateKey, TokenCreate, TokenSupplyType, TokenType, Transaction, TransactionBody,
};
use serde_json::{Value, json};
use tracing::info;

use crate::context::Context;
use crate::error::ActionError;
use crate::operation::{Operation, OperationResult, into_result, submit};
use crate::params::ParameterBag;

/// Create a fungible token with the authenticated account as treasury.
///
/// Without `enableSupplyKey` the supply is fixed forever; with it the
/// operator key becomes the supply key.
pub(crate) struct CreateFungibleToken;

#[async_trait]
impl Operation for CreateFungibleToken {
  async fn execute(
    &self,
    params: &ParameterBag,
    ctx: &Context,
  ) -> Result<OperationResult, ActionError> {
    const NAME: &str = "createFungibleToken";

    let name = params.str("tokenName")?;
    let symbol = params.str("tokenSymbol")?;
    let treasury = params.account_id("treasuryAccountId")?;
    let decimals = params.u64("tokenDecimals")?;
    if decimals > MAX_DECIMALS as u64 {
      return Err(ActionError::validation(
        "tokenDecimals",
        format!("must be at most {}", MAX_DECIMALS),
      ));
    }
    let initial_supply = params.u64("initialSupply")?;
    let enable_supply_key = params.bool_or("enableSupplyKey", false);

    let supply_key = enable_supply_key.then(|| ctx.operator().public_key);

    let transaction = Transaction::new(TransactionBody::TokenCreate(TokenCreate {
      name: name.clone(),
      symbol: symbol.clone(),
      token_type: TokenType::FungibleCommon,
      decimals: decimals as u32,
      initial_supply,
      treasury_account_id: treasury,
      supply_type: TokenSupplyType::Infinite,
      max_supply: None,
      supply_key,
    }));

    let (transaction_id, receipt) = submit(ctx, NAME, transaction).await?;
    let token_id = receipt
      .token_id
      .ok_or_else(|| ActionError::operation(NAME, "receipt carries no token id"))?;

    info!(token_id = %token_id, symbol = %symbol, "token_created");

    Ok(into_result(json!({
      "tokenId": token_id.to_string(),
      "name": name,
      "symbol": symbol,
      "decimals": decimals,
      "initialSupply": initial_supply,
      "supplyKeyEnabled": enable_supply_key,
      "status": receipt.status.as_str(),
      "transactionId": transaction_id.to_string(),
    })))
  }
}

/// Create an NFT collection with the authenticated account as treasury.
///
/// A caller supplied supply key is used as is; otherwise a new ED25519 key is
/// generated and returned once in the result.
pub(crate) struct CreateNft;

#[async_trait]
impl Operation for CreateNft {
  async fn execute(
    &self,
    params: &ParameterBag,
    ctx: &Context,
  ) -> Result<OperationResult, ActionError> {
    const NAME: &str = "createNFT";

    let name = params.str("tokenName")?;
    let symbol = params.str("tokenSymbol")?;
    let treasury = params.account_id("treasuryAccountId")?;

    let supply_type = match params.optional_str("supplyType").as_deref() {
      None | Some("INFINITE") => TokenSupplyType::Infinite,
      Some("FINITE") => TokenSupplyType::Finite,
      Some(other) => {
        return Err(ActionError::validation(
          "supplyType",
          format!("expected FINITE or INFINITE, got '{}'", other),
        ));
      }
    };

    let max_supply = match supply_type {
      TokenSupplyType::Finite => {
        let max = params.u64("maxSupply")?;
        if max == 0 {
          return Err(ActionError::validation("maxSupply", "must be at least 1"));
        }
        Some(max)
      }
      TokenSupplyType::Infinite => None,
    };

    let (supply_key, generated) = match params.optional_private_key("supplyKey")? {
      Some(key) => (key, false),
      None => (PrivateKey::generate_ed25519(), true),
    };

    let transaction = Transaction::new(TransactionBody::TokenCreate(TokenCreate {
      name: name.clone(),
      symbol: symbol.clone(),
      token_type: TokenType::NonFungibleUnique,
      decimals: 0,
      initial_supply: 0,
      treasury_account_id: treasury,
      supply_type,
      max_supply,
      supply_key: Some(supply_key.public_key()),
    }));

    let (transaction_id, receipt) = submit(ctx, NAME, transaction).await?;
    let token_id = receipt
      .token_id
      .ok_or_else(|| ActionError::operation(NAME, "receipt carries no token id"))?;

    info!(token_id = %token_id, symbol = %symbol, supply_key_generated = generated, "nft_created");

    let mut result = into_result(json!({
      "tokenId": token_id.to_string(),
      "name": name,
      "symbol": symbol,
      "supplyType": if max_supply.is_some() { "FINITE" } else { "INFINITE" },
      "maxSupply": max_supply,
      "status": receipt.status.as_str(),
      "transactionId": transaction_id.to_string(),
    }));
    if generated {
      result.insert("supplyKey".to_string(), Value::String(supply_key.to_string()));
      result.insert("supplyKeyGenerated".to_string(), Value::Bool(true));
    }
    Ok(result)
  }
}
