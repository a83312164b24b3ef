//! Dango command-line client
//!
//! Offline derivations (addresses, salts) and read-only chain queries.
//!
//! Run: cargo run -p dango-cli -- --rpc-url http://localhost:26657 chain-info

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dango_client::{
    Client, ClientConfig,
    dango_core::{
        Addr, Hash256, Json, Key, Query, UnsignedTx,
        codec::{decode_hex, encode_hex},
        derive_salt_from_json, predict_account_address, predict_address,
    },
    dango_rpc::HttpTransport,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "dango", author, version, about, long_about = None)]
struct Cli {
    /// CometBFT RPC endpoint
    #[arg(long, global = true, env = "DANGO_RPC_URL")]
    rpc_url: Option<String>,

    /// Chain id; fetched from the node when omitted
    #[arg(long, global = true, env = "DANGO_CHAIN_ID")]
    chain_id: Option<String>,

    /// Block height to query at, 0 for latest
    #[arg(long, global = true, default_value_t = 0)]
    height: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Address a contract gets when `deployer` instantiates `code_hash` with `salt`
    PredictAddress {
        #[arg(long)]
        deployer: String,
        /// Code hash as hex
        #[arg(long)]
        code_hash: String,
        /// Salt as a UTF-8 string
        #[arg(long, conflicts_with = "salt_hex")]
        salt: Option<String>,
        /// Salt as hex
        #[arg(long)]
        salt_hex: Option<String>,
    },
    /// Salt the account factory uses for a user's account
    DeriveSalt {
        #[arg(long)]
        username: String,
        #[arg(long, default_value_t = 0)]
        index: u32,
        /// Key object, e.g. `{"secp256k1":"<base64>"}`
        #[arg(long)]
        key: String,
    },
    /// Address of a user account before it is registered
    AccountAddress {
        #[arg(long)]
        factory: Addr,
        #[arg(long)]
        code_hash: Hash256,
        #[arg(long)]
        username: String,
        #[arg(long, default_value_t = 0)]
        index: u32,
        #[arg(long)]
        key: String,
    },
    /// Chain id and last finalized block
    ChainInfo,
    /// Balance of one denomination
    Balance { address: Addr, denom: String },
    /// Any app query, given as JSON
    QueryApp { query: String },
    /// Query a contract, message given as JSON
    WasmSmart { contract: Addr, msg: String },
    /// Dry-run an unsigned transaction given as JSON
    Simulate { tx: String },
}

fn parse_json(what: &str, s: &str) -> Result<Value> {
    serde_json::from_str(s).with_context(|| format!("{what} is not valid JSON"))
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn connect(cli: &Cli) -> Result<Client<HttpTransport>> {
    let mut config = ClientConfig::from_env();
    if let Some(url) = &cli.rpc_url {
        config.rpc_url = Some(url.clone());
    }
    if let Some(chain_id) = &cli.chain_id {
        config.chain_id = Some(chain_id.clone());
    }
    let client = Client::from_config(&config)?;
    debug!(url = ?config.resolve_rpc_url().ok(), batch = config.batch.is_some(), "connected");
    Ok(client)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    match &cli.command {
        Command::PredictAddress { deployer, code_hash, salt, salt_hex } => {
            let salt = match (salt, salt_hex) {
                (_, Some(hex)) => decode_hex(hex)?,
                (Some(text), None) => text.as_bytes().to_vec(),
                (None, None) => Vec::new(),
            };
            let address = predict_address(deployer, &decode_hex(code_hash)?, &salt)?;
            println!("{address}");
        },
        Command::DeriveSalt { username, index, key } => {
            let salt = derive_salt_from_json(username, *index, &parse_json("key", key)?)?;
            println!("{}", encode_hex(salt));
        },
        Command::AccountAddress { factory, code_hash, username, index, key } => {
            let key = Key::from_json(&parse_json("key", key)?)?;
            let address = predict_account_address(*factory, *code_hash, username, *index, &key)?;
            info!(%username, index, key_hash = %key.key_hash(), "predicted account address");
            println!("{address}");
        },
        Command::ChainInfo => {
            let info = connect(&cli)?.get_chain_info(cli.height).await?;
            print_json(&info)?;
        },
        Command::Balance { address, denom } => {
            let amount = connect(&cli)?.get_balance(*address, denom, cli.height).await?;
            println!("{amount} {denom}");
        },
        Command::QueryApp { query } => {
            let query: Query = serde_json::from_value(parse_json("query", query)?)
                .context("not a known app query")?;
            let res = connect(&cli)?.query_app(&query, cli.height).await?;
            print_json(&res)?;
        },
        Command::WasmSmart { contract, msg } => {
            let msg = parse_json("msg", msg)?;
            let res: Json = connect(&cli)?.query_wasm_smart(*contract, &msg, cli.height).await?;
            print_json(&res)?;
        },
        Command::Simulate { tx } => {
            let tx: UnsignedTx = serde_json::from_value(parse_json("tx", tx)?)
                .context("expecting {\"sender\", \"msgs\", \"data\"}")?;
            let outcome = connect(&cli)?.simulate(&tx).await?;
            print_json(&outcome)?;
        },
    }

    Ok(())
}
