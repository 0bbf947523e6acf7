use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result, bail};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use hedera_actions_config::{ActionDef, Settings};
use hedera_actions_ledger::ClientFactory;
use hedera_actions_operations::{Context, Registry};
use hedera_actions_runtime::ItemExecutor;

/// hedera-actions - run Hedera ledger and mirror node operations over batches of items
#[derive(Parser)]
#[command(name = "hedera-actions")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Path to the settings file (default: ~/.hedera-actions/config.json)
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Run an action definition over its input items
  Run {
    /// Path to the action definition (JSON)
    action_file: PathBuf,

    /// Record failed items as `{ "error": ... }` instead of aborting
    #[arg(long)]
    continue_on_fail: bool,

    /// Maximum number of items processed at once
    #[arg(long)]
    concurrency: Option<usize>,
  },

  /// Print the parameter schema of every resource
  Schema,
}

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .with_writer(io::stderr)
    .init();

  let cli = Cli::parse();

  match cli.command {
    Some(Commands::Run {
      action_file,
      continue_on_fail,
      concurrency,
    }) => {
      let settings_path = match cli.config {
        Some(path) => path,
        None => default_settings_path()?,
      };
      let rt = tokio::runtime::Runtime::new()?;
      rt.block_on(run_action(
        &action_file,
        &settings_path,
        continue_on_fail,
        concurrency,
      ))?;
    }
    Some(Commands::Schema) => print_schema()?,
    None => {
      println!("hedera-actions - use --help to see available commands");
    }
  }

  Ok(())
}

fn default_settings_path() -> Result<PathBuf> {
  let home = dirs::home_dir().context("could not determine home directory")?;
  Ok(home.join(".hedera-actions").join("config.json"))
}

async fn run_action(
  action_file: &Path,
  settings_path: &Path,
  continue_on_fail: bool,
  concurrency: Option<usize>,
) -> Result<()> {
  let settings = Settings::load_or_default(settings_path)
    .with_context(|| format!("failed to load settings: {}", settings_path.display()))?;

  let content = tokio::fs::read_to_string(action_file)
    .await
    .with_context(|| format!("failed to read action file: {}", action_file.display()))?;
  let mut action: ActionDef = serde_json::from_str(&content)
    .with_context(|| format!("failed to parse action file: {}", action_file.display()))?;

  if let Some(items) = read_items_from_stdin()? {
    action.items = items;
  }

  let credentials = settings
    .resolve_credentials()
    .context("no credentials configured")?;
  ClientFactory::validate_credentials(&credentials).context("invalid credentials")?;
  let client = ClientFactory::create_client(&credentials, &settings.gateway_url)
    .context("failed to create ledger client")?;

  let cancel = CancellationToken::new();
  let ctx = Context::new(Arc::new(client))
    .with_watch(settings.watch)
    .with_cancel(cancel.clone());

  tokio::spawn(async move {
    if tokio::signal::ctrl_c().await.is_ok() {
      warn!("interrupt received, cancelling batch");
      cancel.cancel();
    }
  });

  let continue_on_fail =
    continue_on_fail || action.continue_on_fail.unwrap_or(settings.continue_on_fail);
  let executor = ItemExecutor::new(Arc::new(Registry::new()), ctx)
    .continue_on_fail(continue_on_fail)
    .concurrency(concurrency.unwrap_or(settings.concurrency));

  let result = executor
    .run_action(&action)
    .await
    .context("batch execution failed")?;

  eprintln!("Execution completed: {}", result.execution_id);
  eprintln!(
    "Items: {} ({} failed)",
    result.items.len(),
    result.failed_count()
  );

  println!("{}", serde_json::to_string_pretty(&result.items)?);

  Ok(())
}

fn print_schema() -> Result<()> {
  let registry = Registry::new();
  let mut properties = vec![registry.resource_property()];
  properties.extend(registry.all_properties());

  println!("{}", serde_json::to_string_pretty(&properties)?);
  Ok(())
}

/// Items piped on stdin as a JSON array replace the action's own items.
fn read_items_from_stdin() -> Result<Option<Vec<serde_json::Value>>> {
  if io::stdin().is_terminal() {
    return Ok(None);
  }

  let mut input = String::new();
  io::stdin()
    .read_to_string(&mut input)
    .context("failed to read items from stdin")?;

  if input.trim().is_empty() {
    return Ok(None);
  }

  match serde_json::from_str(&input).context("failed to parse items JSON from stdin")? {
    serde_json::Value::Array(items) => Ok(Some(items)),
    serde_json::Value::Object(item) => Ok(Some(vec![serde_json::Value::Object(item)])),
    other => bail!("expected a JSON array or object on stdin, got {}", other),
  }
}
