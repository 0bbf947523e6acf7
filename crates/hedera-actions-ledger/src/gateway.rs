//! Transport to the ledger gateway.
//!
//! Transactions are signed in-process: the gateway receives the exact body
//! bytes that were signed and one `{publicKey, signature}` pair per signer,
//! the operator first. Private keys never leave the process.

use std::net::IpAddr;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::{Host, Url};

use crate::client::{LedgerClient, Operator};
use crate::error::LedgerError;
use crate::keys::{PrivateKey, PublicKey};
use crate::receipt::{TransactionId, TransactionReceipt, TransactionRecord, TransactionResponse};
use crate::transaction::{Transaction, TransactionBody};
use hedera_actions_config::Network;

/// The document covered by the signatures.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignedBody<'a> {
  network: Network,
  operator_account_id: String,
  transaction: &'a TransactionBody,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignaturePair {
  public_key: PublicKey,
  signature: String,
}

/// Submission envelope posted to the gateway.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitRequest {
  network: Network,
  operator_account_id: String,
  /// Base64 of the signed [`SignedBody`] JSON.
  body_bytes: String,
  signatures: Vec<SignaturePair>,
}

impl SubmitRequest {
  fn signed(
    network: Network,
    operator: &Operator,
    transaction: &Transaction,
  ) -> Result<Self, LedgerError> {
    let body = SignedBody {
      network,
      operator_account_id: operator.account_id.to_string(),
      transaction: transaction.body(),
    };
    let bytes = serde_json::to_vec(&body)?;

    let signatures = std::iter::once(&operator.private_key)
      .chain(transaction.signers())
      .map(|key: &PrivateKey| SignaturePair {
        public_key: key.public_key(),
        signature: hex::encode(key.sign(&bytes)),
      })
      .collect();

    Ok(Self {
      network,
      operator_account_id: body.operator_account_id,
      body_bytes: STANDARD.encode(&bytes),
      signatures,
    })
  }
}

/// Plain http is only accepted for a gateway on the loopback interface.
fn require_secure(url: &Url) -> Result<(), LedgerError> {
  let loopback = match url.host() {
    Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
    Some(Host::Ipv4(ip)) => IpAddr::V4(ip).is_loopback(),
    Some(Host::Ipv6(ip)) => IpAddr::V6(ip).is_loopback(),
    None => false,
  };

  let message = match url.scheme() {
    "https" => return Ok(()),
    "http" if loopback => return Ok(()),
    "http" => "plain http is only allowed for a loopback gateway, use https".to_string(),
    scheme => format!("unsupported scheme '{}'", scheme),
  };
  Err(LedgerError::InvalidUrl {
    url: url.to_string(),
    message,
  })
}

/// Ledger client that signs transactions locally and submits them to the
/// gateway over HTTP.
#[derive(Debug, Clone)]
pub struct GatewayClient {
  http: Client,
  base_url: Url,
  network: Network,
  operator: Operator,
}

impl GatewayClient {
  pub fn new(gateway_url: &str, network: Network, operator: Operator) -> Result<Self, LedgerError> {
    let base_url = Url::parse(gateway_url).map_err(|e| LedgerError::InvalidUrl {
      url: gateway_url.to_string(),
      message: e.to_string(),
    })?;

    if base_url.cannot_be_a_base() {
      return Err(LedgerError::InvalidUrl {
        url: gateway_url.to_string(),
        message: "not a base url".to_string(),
      });
    }
    require_secure(&base_url)?;

    Ok(Self {
      http: Client::new(),
      base_url,
      network,
      operator,
    })
  }

  fn endpoint(&self, segments: &[&str]) -> Result<Url, LedgerError> {
    let mut url = self.base_url.clone();
    {
      let mut path = url.path_segments_mut().map_err(|_| LedgerError::InvalidUrl {
        url: self.base_url.to_string(),
        message: "not a base url".to_string(),
      })?;
      path.pop_if_empty();
      path.extend(["api", "v1", "transactions"]);
      path.extend(segments);
    }
    Ok(url)
  }

  async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, LedgerError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
      return Err(LedgerError::Gateway {
        status: status.as_u16(),
        body,
      });
    }

    serde_json::from_str(&body).map_err(|e| LedgerError::InvalidResponse {
      message: format!("{}: {}", e, body),
    })
  }
}

#[async_trait]
impl LedgerClient for GatewayClient {
  fn network(&self) -> Network {
    self.network
  }

  fn operator(&self) -> &Operator {
    &self.operator
  }

  #[instrument(
    name = "gateway_execute",
    skip(self, transaction),
    fields(kind = transaction.body().kind(), network = %self.network)
  )]
  async fn execute(&self, transaction: Transaction) -> Result<TransactionResponse, LedgerError> {
    let request = SubmitRequest::signed(self.network, &self.operator, &transaction)?;

    let url = self.endpoint(&[])?;
    let response = self.http.post(url).json(&request).send().await?;
    let submitted: TransactionResponse = Self::read_json(response).await?;

    debug!(transaction_id = %submitted.transaction_id, "transaction_submitted");
    Ok(submitted)
  }

  #[instrument(name = "gateway_receipt", skip(self), fields(transaction_id = %transaction_id))]
  async fn get_receipt(
    &self,
    transaction_id: &TransactionId,
  ) -> Result<TransactionReceipt, LedgerError> {
    let url = self.endpoint(&[&transaction_id.0, "receipt"])?;
    let response = self.http.get(url).send().await?;
    let receipt: TransactionReceipt = Self::read_json(response).await?;

    debug!(status = %receipt.status, "receipt_received");
    Ok(receipt)
  }

  #[instrument(name = "gateway_record", skip(self), fields(transaction_id = %transaction_id))]
  async fn get_record(
    &self,
    transaction_id: &TransactionId,
  ) -> Result<TransactionRecord, LedgerError> {
    let url = self.endpoint(&[&transaction_id.0, "record"])?;
    let response = self.http.get(url).send().await?;
    Self::read_json(response).await
  }
}
