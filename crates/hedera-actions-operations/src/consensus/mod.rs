mod message;
mod topic;

use crate::error::ActionError;
use crate::params::Extractor;
use crate::schema::{OptionDef, PropertyDef};
use crate::service::Service;

pub(crate) use message::SubmitMessage;
pub(crate) use topic::CreateTopic;

const RESOURCE: &str = "consensus";

/// Largest consensus message the ledger accepts, in bytes.
pub(crate) const MAX_MESSAGE_BYTES: usize = 1024;

/// Largest topic memo, in bytes.
pub(crate) const MAX_MEMO_BYTES: usize = 100;

pub(crate) fn service() -> Service {
  Service::new(RESOURCE)
    .property(
      PropertyDef::options(
        "consensusOperation",
        "Operation",
        vec![
          OptionDef::new("Create Topic", "createTopic")
            .describe("Create a new consensus topic"),
          OptionDef::new("Submit Message", "submitMessage")
            .describe("Submit a message to a consensus topic"),
        ],
        "createTopic",
      )
      .show_for(RESOURCE, &[]),
    )
    .property(
      PropertyDef::string("topicMemo", "Topic Memo")
        .describe("Optional description for the topic (max 100 bytes)")
        .placeholder("IoT Sensor Data Stream")
        .show_for(RESOURCE, &["createTopic"]),
    )
    .property(
      PropertyDef::boolean("enableSubmitKey", "Restrict Submissions", false)
        .describe("Require the operator key to sign every submitted message")
        .show_for(RESOURCE, &["createTopic"]),
    )
    .property(
      PropertyDef::string("topicId", "Topic ID")
        .required()
        .placeholder("0.0.1234")
        .show_for(RESOURCE, &["submitMessage"]),
    )
    .property(
      PropertyDef::string("message", "Message")
        .required()
        .describe("The message to submit (max 1024 bytes)")
        .show_for(RESOURCE, &["submitMessage"]),
    )
    .property(
      PropertyDef::string("submitKey", "Submit Key")
        .describe("Private key to sign with when the topic has a custom submit key")
        .show_for(RESOURCE, &["submitMessage"]),
    )
    .operation("createTopic", extract_create_topic, CreateTopic)
    .operation("submitMessage", extract_submit_message, SubmitMessage)
}

fn extract_create_topic(ex: &mut Extractor<'_>) -> Result<(), ActionError> {
  ex.optional("topicMemo", "topicMemo")?;
  ex.optional("enableSubmitKey", "enableSubmitKey")?;
  ex.payer_as("payerAccountId");
  Ok(())
}

fn extract_submit_message(ex: &mut Extractor<'_>) -> Result<(), ActionError> {
  ex.required("topicId", "topicId")?;
  ex.required_verbatim("message", "message")?;
  ex.optional("submitKey", "submitKey")
}
