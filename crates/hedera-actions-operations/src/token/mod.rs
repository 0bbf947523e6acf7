mod airdrop;
mod create;
mod mint;
mod transfer;

use serde_json::Value;

use crate::context::Context;
use crate::error::ActionError;
use crate::mirror::TokenInfo;
use crate::operation::Operation;
use crate::params::{Extractor, ParameterBag};
use crate::schema::{OptionDef, PropertyDef};
use crate::service::Service;
use hedera_actions_ledger::TokenId;
use hedera_actions_ledger::units::MAX_DECIMALS;

pub(crate) use airdrop::Airdrop;
pub(crate) use create::{CreateFungibleToken, CreateNft};
pub(crate) use mint::{MintFungibleToken, MintNft};
pub(crate) use transfer::TransferNft;

const RESOURCE: &str = "token";

/// Largest NFT metadata payload the ledger accepts, in bytes.
pub(crate) const MAX_METADATA_BYTES: usize = 100;

pub(crate) fn service() -> Service {
  Service::new(RESOURCE)
    .property(
      PropertyDef::options(
        "tokenOperation",
        "Operation",
        vec![
          OptionDef::new("Airdrop Token", "airdrop").describe("Airdrop tokens to an account"),
          OptionDef::new("Create Fungible Token", "createFungibleToken")
            .describe("Create a new fungible token"),
          OptionDef::new("Create NFT", "createNFT")
            .describe("Create a new non-fungible token (NFT) collection"),
          OptionDef::new("Mint Fungible Token", "mintFungibleToken")
            .describe("Mint additional supply for a fungible token"),
          OptionDef::new("Mint NFT", "mintNFT").describe("Mint a non-fungible token (NFT)"),
          OptionDef::new("Transfer NFT", "transferNFT")
            .describe("Transfer an NFT from one account to another"),
        ],
        "createFungibleToken",
      )
      .show_for(RESOURCE, &[]),
    )
    .property(
      PropertyDef::string("tokenName", "Token Name")
        .required()
        .placeholder("My Token")
        .show_for(RESOURCE, &["createFungibleToken", "createNFT"]),
    )
    .property(
      PropertyDef::string("tokenSymbol", "Symbol")
        .required()
        .placeholder("MTK")
        .show_for(RESOURCE, &["createFungibleToken", "createNFT"]),
    )
    .property(
      PropertyDef::number("tokenDecimals", "Decimals", 8)
        .required()
        .describe("Number of decimal places of the token")
        .show_for(RESOURCE, &["createFungibleToken"]),
    )
    .property(
      PropertyDef::number("initialSupply", "Initial Supply", 1_000_000)
        .required()
        .describe("Initial supply in the token's smallest unit")
        .show_for(RESOURCE, &["createFungibleToken"]),
    )
    .property(
      PropertyDef::boolean("enableSupplyKey", "Enable Supply Key", false)
        .describe("Set the operator key as supply key to allow future minting")
        .show_for(RESOURCE, &["createFungibleToken"]),
    )
    .property(
      PropertyDef::options(
        "supplyType",
        "Supply Type",
        vec![
          OptionDef::new("Finite", "FINITE").describe("Fixed maximum supply"),
          OptionDef::new("Infinite", "INFINITE").describe("Unlimited supply"),
        ],
        "INFINITE",
      )
      .required()
      .show_for(RESOURCE, &["createNFT"]),
    )
    .property(
      PropertyDef::number("maxSupply", "Max Supply", 1)
        .required()
        .show_for(RESOURCE, &["createNFT"])
        .show_when("supplyType", &["FINITE"]),
    )
    .property(
      PropertyDef::string("supplyKey", "Supply Key")
        .describe("Private key controlling minting; generated for new NFTs when empty")
        .show_for(RESOURCE, &["createNFT", "mintNFT", "mintFungibleToken"]),
    )
    .property(
      PropertyDef::string("tokenId", "Token ID")
        .required()
        .placeholder("0.0.12345")
        .show_for(
          RESOURCE,
          &["mintNFT", "mintFungibleToken", "airdrop", "transferNFT"],
        ),
    )
    .property(
      PropertyDef::options(
        "metadataType",
        "Metadata Type",
        vec![
          OptionDef::new("URI", "uri").describe("Store a URI pointing to off-chain metadata"),
          OptionDef::new("On-Chain JSON", "onchain").describe("Store compact JSON on-chain"),
        ],
        "uri",
      )
      .show_for(RESOURCE, &["mintNFT"]),
    )
    .property(
      PropertyDef::string("metadataUri", "Metadata URI")
        .placeholder("ipfs://QmHash...")
        .describe("URI pointing to the metadata JSON file")
        .show_for(RESOURCE, &["mintNFT"])
        .show_when("metadataType", &["uri"]),
    )
    .property(
      PropertyDef::json("metadataJson", "Metadata JSON")
        .describe("Metadata stored on-chain as compact JSON")
        .show_for(RESOURCE, &["mintNFT"])
        .show_when("metadataType", &["onchain"]),
    )
    .property(
      PropertyDef::number("amount", "Amount", 100)
        .required()
        .describe("Whole token amount; converted to smallest units using the token's decimals")
        .show_for(RESOURCE, &["mintFungibleToken"]),
    )
    .property(
      PropertyDef::number("serialNumber", "Serial Number", 1)
        .required()
        .show_for(RESOURCE, &["transferNFT"]),
    )
    .property(
      PropertyDef::string("fromAccountId", "From Account ID")
        .required()
        .placeholder("0.0.12345")
        .show_for(RESOURCE, &["transferNFT"]),
    )
    .property(
      PropertyDef::string("toAccountId", "To Account ID")
        .required()
        .placeholder("0.0.67890")
        .show_for(RESOURCE, &["transferNFT"]),
    )
    .property(
      PropertyDef::string("recipientAccountId", "Recipient Account ID")
        .required()
        .placeholder("0.0.12345")
        .show_for(RESOURCE, &["airdrop"]),
    )
    .property(
      PropertyDef::number("airdropAmount", "Amount", 100)
        .required()
        .describe("Whole token amount to airdrop")
        .show_for(RESOURCE, &["airdrop"]),
    )
    .operation("createFungibleToken", extract_create_fungible, CreateFungibleToken)
    .operation("createNFT", extract_create_nft, CreateNft)
    .operation(
      "mintFungibleToken",
      extract_mint_fungible,
      MintFungibleToken::new(),
    )
    .operation("mintNFT", extract_mint_nft, MintNft)
    .operation("transferNFT", extract_transfer_nft, TransferNft)
    .operation("airdrop", extract_airdrop, Airdrop::new())
}

fn extract_create_fungible(ex: &mut Extractor<'_>) -> Result<(), ActionError> {
  ex.required("tokenName", "tokenName")?;
  ex.required("tokenSymbol", "tokenSymbol")?;
  ex.required("tokenDecimals", "tokenDecimals")?;
  ex.required("initialSupply", "initialSupply")?;
  ex.optional("enableSupplyKey", "enableSupplyKey")?;
  ex.payer_as("treasuryAccountId");
  Ok(())
}

fn extract_create_nft(ex: &mut Extractor<'_>) -> Result<(), ActionError> {
  ex.required("tokenName", "tokenName")?;
  ex.required("tokenSymbol", "tokenSymbol")?;
  ex.optional("supplyType", "supplyType")?;
  let finite = ex
    .peek("supplyType")?
    .is_some_and(|v| v.as_str() == Some("FINITE"));
  if finite {
    ex.required("maxSupply", "maxSupply")?;
  }
  ex.optional("supplyKey", "supplyKey")?;
  ex.payer_as("treasuryAccountId");
  Ok(())
}

fn extract_mint_fungible(ex: &mut Extractor<'_>) -> Result<(), ActionError> {
  ex.required("tokenId", "tokenId")?;
  ex.required("amount", "amount")?;
  ex.optional("supplyKey", "supplyKey")
}

fn extract_mint_nft(ex: &mut Extractor<'_>) -> Result<(), ActionError> {
  ex.required("tokenId", "tokenId")?;
  ex.optional("metadataType", "metadataType")?;
  let onchain = ex
    .peek("metadataType")?
    .is_some_and(|v| v.as_str() == Some("onchain"));
  if onchain {
    ex.required("metadataJson", "metadataJson")?;
  } else {
    ex.required("metadataUri", "metadataUri")?;
  }
  ex.optional("supplyKey", "supplyKey")
}

fn extract_transfer_nft(ex: &mut Extractor<'_>) -> Result<(), ActionError> {
  ex.required("tokenId", "tokenId")?;
  ex.required("serialNumber", "serialNumber")?;
  ex.required("fromAccountId", "fromAccountId")?;
  ex.required("toAccountId", "toAccountId")
}

fn extract_airdrop(ex: &mut Extractor<'_>) -> Result<(), ActionError> {
  ex.required("tokenId", "tokenId")?;
  ex.required("recipientAccountId", "recipientAccountId")?;
  ex.required("airdropAmount", "airdropAmount")?;
  ex.payer_as("senderAccountId");
  Ok(())
}

/// Read a token's decimals through the mirror token-info operation.
///
/// Runs before any transaction is built; a failed lookup or a non-numeric
/// answer fails `operation`.
pub(crate) async fn lookup_decimals(
  token_info: &TokenInfo,
  ctx: &Context,
  operation: &str,
  token_id: TokenId,
) -> Result<u32, ActionError> {
  let query = ParameterBag::new().with("tokenId", token_id.to_string());
  let info = token_info.execute(&query, ctx).await.map_err(|e| {
    ActionError::operation(operation, format!("unable to fetch token decimals: {}", e))
  })?;

  let decimals = match info.get("decimals") {
    Some(Value::Number(n)) => n.as_u64(),
    Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
    _ => None,
  };

  match decimals {
    Some(d) if d <= MAX_DECIMALS as u64 => Ok(d as u32),
    _ => Err(ActionError::operation(
      operation,
      format!(
        "token {} reported unusable decimals: {}",
        token_id,
        info.get("decimals").cloned().unwrap_or(Value::Null)
      ),
    )),
  }
}
