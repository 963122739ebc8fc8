//! `workflow-runner` CLI entry-point.
//!
//! Available sub-commands:
//! - `serve`    — start the runner HTTP service.
//! - `run`      — execute a workflow file once against a trigger file.
//! - `validate` — validate a workflow definition JSON file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::{Map, Value};
use tracing::info;
use tracing_subscriber::EnvFilter;

use connectors::{ConnectorConfig, ConnectorRegistry, PaymentConfig, SmsConfig};
use engine::{RunStatus, WorkflowEngine};

#[derive(Parser)]
#[command(
    name = "workflow-runner",
    about = "Workflow step-execution runner",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the runner HTTP service.
    Serve {
        #[arg(long, env = "RUNNER_BIND", default_value = "0.0.0.0:4000")]
        bind: String,
        #[command(flatten)]
        connectors: ConnectorArgs,
    },
    /// Execute a workflow once and print the result as JSON.
    Run {
        /// Path to the workflow definition JSON file.
        #[arg(long)]
        workflow: PathBuf,
        /// Path to a JSON object used as the trigger payload.
        #[arg(long)]
        trigger: Option<PathBuf>,
        /// Run id; a random UUID when omitted.
        #[arg(long)]
        run_id: Option<String>,
        #[command(flatten)]
        connectors: ConnectorArgs,
    },
    /// Validate a workflow definition JSON file.
    Validate {
        /// Path to the workflow JSON file.
        path: PathBuf,
    },
}

/// Provider settings. Leaving a credential unset puts that connector in mock mode.
#[derive(Args)]
struct ConnectorArgs {
    #[arg(long, env = "IR_SMS_API_KEY", hide_env_values = true)]
    sms_api_key: Option<String>,
    #[arg(long, env = "IR_SMS_API_BASE_URL")]
    sms_api_base_url: Option<String>,
    #[arg(long, env = "IR_PAYMENT_MERCHANT_ID", hide_env_values = true)]
    payment_merchant_id: Option<String>,
    #[arg(long, env = "IR_PAYMENT_CALLBACK_URL")]
    payment_callback_url: Option<String>,
    #[arg(long, env = "IR_PAYMENT_API_BASE_URL")]
    payment_api_base_url: Option<String>,
}

impl From<ConnectorArgs> for ConnectorConfig {
    fn from(args: ConnectorArgs) -> Self {
        Self {
            sms: SmsConfig {
                api_key: args.sms_api_key,
                api_base_url: args.sms_api_base_url,
            },
            payment: PaymentConfig {
                merchant_id: args.payment_merchant_id,
                callback_url: args.payment_callback_url,
                api_base_url: args.payment_api_base_url,
            },
        }
    }
}

fn build_engine(args: ConnectorArgs) -> WorkflowEngine {
    let registry = ConnectorRegistry::builtin(args.into());
    info!(operations = ?registry.operations(), "connector registry ready");
    WorkflowEngine::new(Arc::new(registry))
}

fn read_json(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read file {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("invalid JSON in {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { bind, connectors } => {
            info!("Starting runner on {bind}");
            let state = api::AppState::new(build_engine(connectors));
            api::serve(&bind, state).await.context("runner server failed")?;
        }
        Command::Run {
            workflow,
            trigger,
            run_id,
            connectors,
        } => {
            let definition = engine::parse_workflow(read_json(&workflow)?)
                .with_context(|| format!("invalid workflow {}", workflow.display()))?;
            let trigger: Map<String, Value> = match trigger {
                Some(path) => serde_json::from_value(read_json(&path)?)
                    .with_context(|| format!("trigger {} must be a JSON object", path.display()))?,
                None => Map::new(),
            };
            let run_id = run_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

            let result = build_engine(connectors)
                .execute(&run_id, trigger, &definition)
                .await;
            println!("{}", serde_json::to_string_pretty(&result)?);

            if result.status != RunStatus::Succeeded {
                std::process::exit(1);
            }
        }
        Command::Validate { path } => {
            let definition = engine::parse_workflow(read_json(&path)?);
            match definition {
                Ok(workflow) => {
                    let order = engine::definition::step_order(&workflow);
                    println!("✅ Workflow is valid. Execution order: {order:?}");
                }
                Err(e) => {
                    eprintln!("❌ Validation failed: {e}");
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
