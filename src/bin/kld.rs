//! Kaleido command line tool
//!
//! # Usage
//!
//! ```bash
//! # Provision everything described in a definition file
//! kld create consortium --file consortium.yaml
//!
//! # Create a single consortium
//! kld create consortium --name demo --desc "demo consortium" --mode multi-org
//!
//! kld list consortium
//! kld get consortium --id <id>
//! kld delete consortium --id <id>
//! ```
//!
//! ## Environment Variables
//!
//! - `KLD_API_URL`, `KLD_API_KEY`: API endpoint and key (also read from `.env`)
//! - `RUST_LOG`: log filter, defaults to `kld=info`

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use kld::aggregate::render_json;
use kld::client::{
    decode, validate_creation_response, validate_deletion_response, validate_get_response,
};
use kld::kld_types::{Consortium, ConsortiumMode, Identifier};
use kld::{
    reconcile, ClientConfig, ConfigOverrides, KaleidoClient, PollPolicy, ReconcileOptions,
    ResourceClient,
};

#[derive(Parser)]
#[command(name = "kld")]
#[command(about = "Command Line Tool for Kaleido resources management")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file with re-usable settings such as API URL and key (default is $HOME/.kld.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Kaleido API URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Kaleido API key
    #[arg(long, global = true)]
    api_key: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Create resources
    Create {
        #[command(subcommand)]
        resource: CreateResource,
    },
    /// List resources
    List {
        #[command(subcommand)]
        resource: ListResource,
    },
    /// Get resource details
    Get {
        #[command(subcommand)]
        resource: GetResource,
    },
    /// Delete resources
    Delete {
        #[command(subcommand)]
        resource: DeleteResource,
    },
}

#[derive(Subcommand)]
enum CreateResource {
    /// Create a consortium
    Consortium(CreateConsortiumArgs),
}

#[derive(Subcommand)]
enum ListResource {
    /// List the consortiums under the user's account
    Consortium,
}

#[derive(Subcommand)]
enum GetResource {
    /// Get the consortium details
    Consortium {
        /// Id of the consortium to retrieve
        #[arg(long, default_value = "")]
        id: String,
    },
}

#[derive(Subcommand)]
enum DeleteResource {
    /// Delete a consortium
    Consortium {
        /// Id of the consortium to delete
        #[arg(long, default_value = "")]
        id: String,
    },
}

#[derive(Args)]
struct CreateConsortiumArgs {
    /// Name of the consortium
    #[arg(short, long, default_value = "")]
    name: String,

    /// Short description of the purpose of the consortium
    #[arg(short, long, default_value = "")]
    desc: String,

    /// single-org or multi-org consortium
    #[arg(short, long, default_value = "single-org")]
    mode: String,

    /// Path to a consortium definition file; provisions the whole hierarchy
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Seconds between node state checks while waiting for initialization
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    poll_interval: u64,

    /// Seconds to wait for each node to leave the initializing state
    #[arg(long, default_value_t = 1800, value_parser = clap::value_parser!(u64).range(1..))]
    init_timeout: u64,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kld=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let overrides = ConfigOverrides {
        config_file: cli.config,
        api_url: cli.api_url,
        api_key: cli.api_key,
    };
    let config = ClientConfig::resolve(&overrides)?;
    let client = KaleidoClient::new(&config)?;

    match cli.command {
        Command::Create {
            resource: CreateResource::Consortium(args),
        } => create_consortium(&client, args).await,
        Command::List {
            resource: ListResource::Consortium,
        } => list_consortium(&client).await,
        Command::Get {
            resource: GetResource::Consortium { id },
        } => get_consortium(&client, &id).await,
        Command::Delete {
            resource: DeleteResource::Consortium { id },
        } => delete_consortium(&client, &id).await,
    }
}

async fn create_consortium(client: &KaleidoClient, args: CreateConsortiumArgs) -> Result<()> {
    if let Some(file) = args.file {
        let cancel = CancellationToken::new();
        let on_interrupt = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, cancelling");
                on_interrupt.cancel();
            }
        });

        let options = ReconcileOptions {
            poll: PollPolicy {
                interval: Duration::from_secs(args.poll_interval),
                timeout: Duration::from_secs(args.init_timeout),
            },
            cancel,
        };
        let out = reconcile(client, &file, options)
            .await
            .with_context(|| format!("Failed to provision {}", file.display()))?;

        println!("########");
        println!("{}", render_json(&out, false)?);
        return Ok(());
    }

    if args.name.is_empty() {
        bail!("Missing required parameter: --name for the consortium");
    }
    let Some(mode) = ConsortiumMode::parse(&args.mode) else {
        bail!("Invalid consortium mode: {}", args.mode);
    };

    let body = Consortium::new(&args.name, &args.desc, mode);
    let res = validate_creation_response(client.create_consortium(&body).await, "consortium")?;
    let created: Identifier = decode(&res, "consortium")?;
    info!(consortium_id = %created.id, "Consortium created");
    println!("{}", serde_json::to_string_pretty(&created)?);
    Ok(())
}

async fn list_consortium(client: &KaleidoClient) -> Result<()> {
    let res = validate_get_response(client.list_consortium().await, "consortium")
        .context("Failed to list consortiums")?;
    let consortiums: Vec<Consortium> = decode(&res, "consortium")?;
    println!("{}", serde_json::to_string_pretty(&consortiums)?);
    Ok(())
}

async fn get_consortium(client: &KaleidoClient, id: &str) -> Result<()> {
    require_id(id, "retrieve")?;
    let res = validate_get_response(client.get_consortium(id).await, "consortium")?;
    let consortium: Consortium = decode(&res, "consortium")?;
    println!("{}", serde_json::to_string_pretty(&consortium)?);
    Ok(())
}

async fn delete_consortium(client: &KaleidoClient, id: &str) -> Result<()> {
    require_id(id, "delete")?;
    validate_deletion_response(client.delete_consortium(id).await, "consortium")?;
    info!(consortium_id = id, "Consortium deleted");
    Ok(())
}

fn require_id(id: &str, action: &str) -> Result<()> {
    if id.is_empty() {
        bail!("Missing required parameter: --id for the consortium to {}", action);
    }
    Ok(())
}
