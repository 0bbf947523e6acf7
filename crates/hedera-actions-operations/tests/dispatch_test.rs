mod common;

use common::{Harness, PAYER};
use hedera_actions_ledger::{KeyAlgorithm, TransactionBody};
use hedera_actions_operations::{ActionError, StaticParameters};
use serde_json::json;

#[tokio::test]
async fn test_unknown_operation_fails_before_any_call() {
  let h = Harness::new();
  let source = StaticParameters::new(json!({ "topicId": "0.0.5" }));

  for resource in ["account", "token", "consensus", "mirror"] {
    let err = h.run(resource, "deleteEverything", &source).await.unwrap_err();
    assert!(
      matches!(err, ActionError::UnsupportedOperation { ref operation, .. } if operation == "deleteEverything"),
      "resource {} gave {:?}",
      resource,
      err
    );
  }

  let service = h.registry.get_service("token").unwrap();
  let params = hedera_actions_operations::ParameterBag::new();
  assert!(matches!(
    service.execute("burn", &params, &h.ctx).await,
    Err(ActionError::UnsupportedOperation { .. })
  ));

  assert!(h.ledger.submitted().is_empty());
  assert!(h.mirror.calls().is_empty());
}

#[tokio::test]
async fn test_unknown_resource() {
  let h = Harness::new();
  let source = StaticParameters::default();
  assert!(matches!(
    h.run("file", "create", &source).await,
    Err(ActionError::UnsupportedResource { .. })
  ));
}

#[test]
fn test_operation_catalogue() {
  let h = Harness::new();
  let names = |resource: &str| h.registry.get_service(resource).unwrap().operation_names().to_vec();

  assert_eq!(names("account"), vec!["create", "transferHbar"]);
  assert_eq!(names("consensus"), vec!["createTopic", "submitMessage"]);
  assert_eq!(names("token").len(), 6);
  assert_eq!(names("mirror").len(), 9);
  assert!(names("mirror").contains(&"watchTopicMessages"));
}

#[tokio::test]
async fn test_missing_required_parameter_is_validation_error() {
  let h = Harness::new();
  let source = StaticParameters::new(json!({ "message": "hello" }));

  let err = h.run("consensus", "submitMessage", &source).await.unwrap_err();
  assert!(matches!(err, ActionError::Validation { ref field, .. } if field == "topicId"));
  assert!(h.ledger.submitted().is_empty());
}

#[tokio::test]
async fn test_malformed_entity_id_is_validation_error() {
  let h = Harness::new();
  let source = StaticParameters::new(json!({ "mirrorTokenId": "token-42" }));

  let err = h.run("mirror", "tokenInfo", &source).await.unwrap_err();
  assert!(matches!(err, ActionError::Validation { ref field, .. } if field == "tokenId"));
  assert!(h.mirror.calls().is_empty());
}

#[tokio::test]
async fn test_create_account() {
  let h = Harness::new();
  h.ledger.respond_with(hedera_actions_ledger::TransactionReceipt {
    account_id: Some("0.0.4321".parse().unwrap()),
    ..hedera_actions_ledger::TransactionReceipt::with_status(
      hedera_actions_ledger::Status::success(),
    )
  });

  let source = StaticParameters::new(json!({ "initialBalance": 2.5 }));
  let result = h.run("account", "create", &source).await.unwrap();

  assert_eq!(result["status"], "SUCCESS");
  assert_eq!(result["newAccountId"], "0.0.4321");
  assert_eq!(result["privateKeyGenerated"], true);
  assert_eq!(result["initialBalance"], "2.5");

  let private_key: hedera_actions_ledger::PrivateKey =
    result["newAccountPrivateKey"].as_str().unwrap().parse().unwrap();
  assert_eq!(private_key.algorithm(), KeyAlgorithm::Ecdsa);
  assert_eq!(
    result["newAccountPublicKey"],
    private_key.public_key().to_string()
  );

  let submitted = h.ledger.submitted();
  assert_eq!(submitted.len(), 1);
  match submitted[0].body() {
    TransactionBody::AccountCreate {
      key,
      alias_from_key,
      initial_balance_tinybars,
      max_automatic_token_associations,
    } => {
      assert_eq!(*key, private_key.public_key());
      assert!(*alias_from_key);
      assert_eq!(*initial_balance_tinybars, 250_000_000);
      assert_eq!(*max_automatic_token_associations, -1);
    }
    other => panic!("unexpected body {:?}", other),
  }
}

#[tokio::test]
async fn test_create_account_without_receipt_account_id_fails() {
  let h = Harness::new();
  let source = StaticParameters::new(json!({}));

  let err = h.run("account", "create", &source).await.unwrap_err();
  assert!(matches!(err, ActionError::Operation { ref operation, .. } if operation == "create"));
}

#[tokio::test]
async fn test_transfer_hbar_from_payer() {
  let h = Harness::new();
  let source = StaticParameters::new(json!({
    "recipientAccountId": "0.0.2002",
    "hbarAmount": 0.5
  }));

  let result = h.run("account", "transferHbar", &source).await.unwrap();
  assert_eq!(result["senderAccountId"], PAYER);
  assert_eq!(result["amount"], "0.5");
  assert_eq!(result["amountTinybars"], 50_000_000);

  match h.ledger.submitted()[0].body() {
    TransactionBody::CryptoTransfer { hbar_transfers, nft_transfers } => {
      assert!(nft_transfers.is_empty());
      assert_eq!(hbar_transfers[0].account_id.to_string(), PAYER);
      assert_eq!(hbar_transfers[0].tinybars, -50_000_000);
      assert_eq!(hbar_transfers[1].account_id.to_string(), "0.0.2002");
      assert_eq!(hbar_transfers[1].tinybars, 50_000_000);
    }
    other => panic!("unexpected body {:?}", other),
  }
}

#[tokio::test]
async fn test_transfer_hbar_rejects_zero() {
  let h = Harness::new();
  let source = StaticParameters::new(json!({
    "recipientAccountId": "0.0.2002",
    "hbarAmount": 0
  }));

  let err = h.run("account", "transferHbar", &source).await.unwrap_err();
  assert!(matches!(err, ActionError::Validation { ref field, .. } if field == "amount"));
  assert!(h.ledger.submitted().is_empty());
}

#[tokio::test]
async fn test_non_success_status_is_operation_error() {
  let h = Harness::new();
  h.ledger
    .respond_with(hedera_actions_ledger::TransactionReceipt::with_status(
      hedera_actions_ledger::Status::new("INSUFFICIENT_PAYER_BALANCE"),
    ));
  let source = StaticParameters::new(json!({
    "recipientAccountId": "0.0.2002",
    "hbarAmount": 1
  }));

  let err = h.run("account", "transferHbar", &source).await.unwrap_err();
  match err {
    ActionError::Operation { operation, message } => {
      assert_eq!(operation, "transferHbar");
      assert!(message.contains("INSUFFICIENT_PAYER_BALANCE"));
    }
    other => panic!("unexpected error {:?}", other),
  }
}
