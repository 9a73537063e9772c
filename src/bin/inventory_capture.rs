//! Capture the cluster's hardware inventory and publish it to the
//! system-layout registry.
//!
//! Usage:
//!   inventory-capture --out-file dump.json --public-key public.pem \
//!       --auth-token $TOKEN \
//!       [--meds-json-file cabinets.json] [--maas-data-file bmcs.json]
//!
//! Generate a key pair for the dump with:
//!   openssl genrsa -out private.pem 2048
//!   openssl rsa -in private.pem -outform PEM -pubout -out public.pem

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use inventory_capture::merge;
use inventory_capture::model::Inventory;
use inventory_capture::publish::{PublishOutcome, RegistryClient};
use inventory_capture::sources::{bmc, cabinet, noderole, switches};

#[derive(Parser)]
#[command(name = "inventory-capture")]
#[command(about = "Build the cluster hardware inventory and publish it to the system-layout registry")]
struct Args {
    /// Where to write the registry state dump
    #[arg(long)]
    out_file: PathBuf,

    /// Public key sent with the dump request
    #[arg(long)]
    public_key: PathBuf,

    /// Bearer token for the management-service mesh
    #[arg(long, env = "INVENTORY_AUTH_TOKEN")]
    auth_token: String,

    /// Cabinet/network descriptor file (Mountain fleet); omit if none
    #[arg(long)]
    meds_json_file: Option<PathBuf>,

    /// Node-BMC credential file; omit if none
    #[arg(long)]
    maas_data_file: Option<PathBuf>,

    /// Switch-discovery service base address
    #[arg(long, default_value = "https://api-gw-service-nmn.local/apis/reds/v1")]
    reds_address: String,

    /// Node-role service base address
    #[arg(long, default_value = "https://api-gw-service-nmn.local/apis/smd/hsm/v1")]
    hsm_address: String,

    /// System-layout registry base address
    #[arg(long, default_value = "https://api-gw-service-nmn.local/apis/sls/v1")]
    sls_address: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let cabinets = match &args.meds_json_file {
        Some(path) => cabinet::load(path).context("loading cabinet descriptor")?,
        None => Inventory::new(),
    };
    let bmcs = match &args.maas_data_file {
        Some(path) => bmc::load(path).context("loading node-BMC data")?,
        None => Inventory::new(),
    };

    let switch_client = switches::SwitchClient::new(&args.reds_address, &args.auth_token)?;
    let port_map = switch_client
        .fetch_port_map()
        .await
        .context("querying switch discovery")?;
    let switch_records = switches::normalize(&port_map)?;

    // Node-role inference reads the partially merged map (cabinets and
    // switches) as its class context, so it runs after both.
    let context = merge::fold([
        ("cabinets", cabinets.clone()),
        ("switches", switch_records.clone()),
    ]);

    let role_client = noderole::NodeRoleClient::new(&args.hsm_address, &args.auth_token)?;
    let node_maps = role_client
        .fetch_node_maps()
        .await
        .context("querying node-role service")?;
    let nodes = noderole::normalize(&node_maps, &context, &bmcs)?;

    let inventory = merge::fold([
        ("cabinets", cabinets),
        ("switches", switch_records),
        ("node-role", nodes),
        ("node-bmcs", bmcs),
    ]);
    info!(records = inventory.len(), "inventory assembled");

    println!("{}", serde_json::to_string_pretty(&inventory)?);

    let registry = RegistryClient::new(&args.sls_address, &args.auth_token)?;
    let report = registry.publish(&inventory).await?;

    if report.has_failures() {
        println!("The following errors occurred uploading hardware:");
        for (xname, outcome) in &report.failures {
            if let PublishOutcome::Failed { status, body } = outcome {
                println!("{xname}: HTTP {status}: {body}");
            }
        }
    }

    registry
        .dump_state(&args.public_key, &args.out_file)
        .await
        .context("dumping registry state")?;

    Ok(())
}
