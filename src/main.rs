use std::io::Read;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};

use openw_signer::config::SignerConfig;
use openw_signer::crypto::synthetic::{synthetic_public_key, synthetic_secret_key};
use openw_signer::signing::BatchSigner;
use openw_signer::types::{RawTransaction, SignatureMap, SmartContractRawTransaction};
use openw_signer::utils::logging::init_tracing;
use openw_signer::wallet::keystore::MasterKey;

#[derive(Parser)] // no Debug: carries key material
#[command(name = "openw-signer")]
#[command(about = "Sign custody-service transactions locally", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign every obligation of a value-transfer transaction
    SignRaw(SignArgs),
    /// Sign the obligations of a smart-contract call
    SignContract(SignArgs),
    /// Sign a standalone `accountID -> [KeySignature]` map
    SignHash(SignArgs),
    /// Print the BLS synthetic secret key (and its public key) for a raw key
    SyntheticKey {
        /// Raw secret exponent, 1 to 32 bytes of hex
        private_key_hex: String,
    },
}

#[derive(Args)]
struct SignArgs {
    /// JSON input file; stdin when omitted
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Master seed as hex (16 to 64 bytes)
    #[arg(long, conflicts_with = "mnemonic", required_unless_present = "mnemonic")]
    seed_hex: Option<String>,

    /// BIP-39 mnemonic phrase
    #[arg(long)]
    mnemonic: Option<String>,

    /// BIP-39 passphrase
    #[arg(long, default_value = "")]
    passphrase: String,

    /// Sign independent obligations in parallel
    #[arg(long)]
    parallel: bool,

    /// Log every obligation signed
    #[arg(short, long)]
    verbose: bool,

    /// Print addresses and digests unredacted in logs
    #[arg(long)]
    no_redact: bool,

    /// Pretty-print the signed JSON
    #[arg(long)]
    pretty: bool,
}

impl SignArgs {
    fn master_key(&self) -> anyhow::Result<MasterKey> {
        let key = match (&self.seed_hex, &self.mnemonic) {
            (Some(seed_hex), _) => MasterKey::from_seed_hex(seed_hex)?,
            (None, Some(mnemonic)) => MasterKey::from_mnemonic(mnemonic, &self.passphrase)?,
            (None, None) => bail!("either --seed-hex or --mnemonic is required"),
        };
        Ok(key)
    }

    fn signer(&self) -> BatchSigner {
        let env = SignerConfig::from_env();
        let config = SignerConfig::default()
            .with_verbose(self.verbose || env.verbose)
            .with_parallel(self.parallel || env.parallel)
            .with_redact_logs(!self.no_redact);
        BatchSigner::new(config)
    }

    fn read_input(&self) -> anyhow::Result<String> {
        let mut buf = String::new();
        match &self.input {
            Some(path) => {
                buf = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
            }
            None => {
                std::io::stdin().read_to_string(&mut buf).context("reading stdin")?;
            }
        }
        Ok(buf)
    }

    fn print<T: serde::Serialize>(&self, value: &T) -> anyhow::Result<()> {
        let json = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        println!("{}", json);
        Ok(())
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::SignRaw(args) => {
            let mut tx: RawTransaction = serde_json::from_str(&args.read_input()?).context("parsing raw transaction")?;
            args.signer().sign_raw_transaction(&mut tx, &args.master_key()?)?;
            args.print(&tx)
        }
        Command::SignContract(args) => {
            let mut tx: SmartContractRawTransaction =
                serde_json::from_str(&args.read_input()?).context("parsing smart contract transaction")?;
            args.signer().sign_smart_contract_transaction(&mut tx, &args.master_key()?)?;
            args.print(&tx)
        }
        Command::SignHash(args) => {
            let mut obligations: SignatureMap =
                serde_json::from_str(&args.read_input()?).context("parsing signature map")?;
            let signed = args.signer().sign_tx_hash(&mut obligations, &args.master_key()?)?;
            args.print(&signed)
        }
        Command::SyntheticKey { private_key_hex } => {
            let raw = zeroize::Zeroizing::new(
                hex::decode(private_key_hex.trim()).context("private key is not hex")?,
            );
            let secret = zeroize::Zeroizing::new(synthetic_secret_key(&raw)?);
            let public = synthetic_public_key(&raw)?;
            println!(
                "{}",
                serde_json::json!({
                    "syntheticSecretKey": hex::encode(secret.as_slice()),
                    "syntheticPublicKey": hex::encode(public),
                })
            );
            Ok(())
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let verbose = match &cli.command {
        Command::SignRaw(args) | Command::SignContract(args) | Command::SignHash(args) => args.verbose,
        Command::SyntheticKey { .. } => false,
    };
    init_tracing(if verbose { "debug" } else { "warn" });

    if let Err(e) = run(cli) {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}
