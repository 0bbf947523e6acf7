use std::sync::Arc;

use hedera_actions_config::WatchSettings;
use hedera_actions_ledger::{AccountId, LedgerClient, Operator};
use hedera_actions_mirror::{HttpMirrorClient, MirrorClient};
use tokio_util::sync::CancellationToken;

/// Everything an operation may touch while it runs.
///
/// Built once per batch and shared read-only by every item. The mirror client
/// always targets the network the ledger client was built for.
#[derive(Clone)]
pub struct Context {
  ledger: Arc<dyn LedgerClient>,
  mirror: Arc<dyn MirrorClient>,
  cancel: CancellationToken,
  watch: WatchSettings,
}

impl Context {
  /// Derive the mirror client from the ledger client's network.
  pub fn new(ledger: Arc<dyn LedgerClient>) -> Self {
    let mirror = Arc::new(HttpMirrorClient::for_network(ledger.network()));
    Self::from_parts(ledger, mirror)
  }

  /// Use an explicit mirror client, e.g. a local mirror node.
  pub fn from_parts(ledger: Arc<dyn LedgerClient>, mirror: Arc<dyn MirrorClient>) -> Self {
    Self {
      ledger,
      mirror,
      cancel: CancellationToken::new(),
      watch: WatchSettings::default(),
    }
  }

  pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
    self.cancel = cancel;
    self
  }

  pub fn with_watch(mut self, watch: WatchSettings) -> Self {
    self.watch = watch;
    self
  }

  pub fn ledger(&self) -> &dyn LedgerClient {
    self.ledger.as_ref()
  }

  pub fn mirror(&self) -> &dyn MirrorClient {
    self.mirror.as_ref()
  }

  pub fn cancel(&self) -> &CancellationToken {
    &self.cancel
  }

  pub fn watch(&self) -> &WatchSettings {
    &self.watch
  }

  pub fn operator(&self) -> &Operator {
    self.ledger.operator()
  }

  /// The authenticated account paying for transactions.
  pub fn payer(&self) -> &AccountId {
    &self.ledger.operator().account_id
  }
}
