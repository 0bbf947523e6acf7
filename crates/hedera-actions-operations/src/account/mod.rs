mod create;
mod transfer;

use crate::error::ActionError;
use crate::params::Extractor;
use crate::schema::{OptionDef, PropertyDef};
use crate::service::Service;

pub(crate) use create::CreateAccount;
pub(crate) use transfer::TransferHbar;

const RESOURCE: &str = "account";

pub(crate) fn service() -> Service {
  Service::new(RESOURCE)
    .property(
      PropertyDef::options(
        "accountOperation",
        "Operation",
        vec![
          OptionDef::new("Create Account", "create").describe("Create a new Hedera account"),
          OptionDef::new("Transfer HBAR", "transferHbar")
            .describe("Send HBAR from the authenticated account"),
        ],
        "create",
      )
      .show_for(RESOURCE, &[]),
    )
    .property(
      PropertyDef::number("initialBalance", "Initial Balance (HBAR)", 0)
        .describe("Initial HBAR funding for the new account")
        .show_for(RESOURCE, &["create"]),
    )
    .property(
      PropertyDef::string("recipientAccountId", "Recipient Account ID")
        .required()
        .placeholder("0.0.12345")
        .describe("The account receiving the HBAR")
        .show_for(RESOURCE, &["transferHbar"]),
    )
    .property(
      PropertyDef::number("hbarAmount", "Amount (HBAR)", 1)
        .required()
        .describe("How much HBAR to send")
        .show_for(RESOURCE, &["transferHbar"]),
    )
    .operation("create", extract_create, CreateAccount)
    .operation("transferHbar", extract_transfer, TransferHbar)
}

fn extract_create(ex: &mut Extractor<'_>) -> Result<(), ActionError> {
  ex.optional("initialBalance", "initialBalance")
}

fn extract_transfer(ex: &mut Extractor<'_>) -> Result<(), ActionError> {
  ex.required("recipientAccountId", "recipientAccountId")?;
  ex.required("hbarAmount", "amount")?;
  ex.payer_as("senderAccountId");
  Ok(())
}
