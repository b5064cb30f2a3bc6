use std::path::Path;

use anyhow::{bail, Context};
use colored::Colorize;
use serde_json::json;

use bidchain_crypto::SigningKey;
use bidchain_issuer::Issuer;
use bidchain_ledger::{ChainVerifier, InvalidChain, Ledger};
use bidchain_protocol::LedgerCodec;
use bidchain_server::{BidchainServer, ServerConfig};
use bidchain_types::{ImpId, Price};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let format = cli.format;
    match cli.command {
        Command::Serve(args) => cmd_serve(args),
        Command::Create(args) => cmd_create(args, format),
        Command::Update(args) => cmd_update(args, format),
        Command::Verify(args) => cmd_verify(args, format),
        Command::Price(args) => cmd_price(args, format),
    }
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if args.peer.is_some() {
        config.peer_url = args.peer;
    }

    println!(
        "bidchain server on {} (peer: {})",
        config.bind_addr.to_string().bold(),
        config.peer_url.as_deref().unwrap_or("none").blue()
    );
    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;
    runtime.block_on(BidchainServer::new(config).serve())?;
    Ok(())
}

fn cmd_create(args: CreateArgs, format: OutputFormat) -> anyhow::Result<()> {
    let ledger = create_ledger(args.imp_id.clone(), args.price)?;
    emit_ledger(&ledger, args.out.as_deref(), format, || {
        format!(
            "{} Created ledger for {} at {}",
            "✓".green().bold(),
            args.imp_id.as_str().yellow(),
            args.price.to_string().bold()
        )
    })
}

fn cmd_update(args: UpdateArgs, format: OutputFormat) -> anyhow::Result<()> {
    let ledger = update_ledger(&args.ledger, args.price, args.imp_id)?;
    emit_ledger(&ledger, args.out.as_deref(), format, || {
        format!(
            "{} Price updated to {}",
            "✓".green().bold(),
            args.price.to_string().bold()
        )
    })
}

fn cmd_verify(args: VerifyArgs, format: OutputFormat) -> anyhow::Result<()> {
    let ledger = read_ledger(&args.ledger)?;
    let result = ChainVerifier::verify(ledger.blocks());

    match format {
        OutputFormat::Json => {
            let violation = result.as_ref().err().map(InvalidChain::to_string);
            println!(
                "{}",
                json!({
                    "isValid": result.is_ok(),
                    "blocks": ledger.len(),
                    "violation": violation,
                })
            );
        }
        OutputFormat::Text => match &result {
            Ok(()) => {
                println!("{} Ledger integrity verified", "✓".green().bold());
                println!("  Blocks: {}", ledger.len().to_string().bold());
                println!("  Hash chain: {}", "valid".green());
                println!("  Signatures: {}", "valid".green());
            }
            Err(violation) => {
                println!("{} Ledger failed verification", "✗".red().bold());
                println!("  {}", violation.to_string().red());
            }
        },
    }

    if let Err(violation) = result {
        bail!("{}: {violation}", args.ledger.display());
    }
    Ok(())
}

fn cmd_price(args: PriceArgs, format: OutputFormat) -> anyhow::Result<()> {
    let ledger = read_ledger(&args.ledger)?;
    let Some(price) = ledger.current_price() else {
        bail!("ledger holds no creation at index 1; no current price");
    };
    match format {
        OutputFormat::Json => println!("{}", json!({ "price": price })),
        OutputFormat::Text => println!("{price}"),
    }
    Ok(())
}

/// Originate a ledger under a fresh key.
pub fn create_ledger(imp_id: ImpId, price: Price) -> anyhow::Result<Ledger> {
    let issuer = Issuer::create(Some(imp_id), Some(price))?;
    Ok(issuer.into_ledger())
}

/// Adopt the ledger at `path` under a fresh key and append an update.
/// Refuses to sign on top of a ledger that fails verification.
pub fn update_ledger(path: &Path, price: Price, imp_id: Option<ImpId>) -> anyhow::Result<Ledger> {
    let ledger = read_ledger(path)?;
    let mut issuer = Issuer::holder(SigningKey::generate(), imp_id, ledger.into_blocks())?;
    let block = issuer
        .issue_price_update(price)
        .with_context(|| format!("updating {}", path.display()))?;
    tracing::debug!(index = block.index, hash = %block.hash.short_hex(), "appended price update");
    Ok(issuer.into_ledger())
}

pub fn read_ledger(path: &Path) -> anyhow::Result<Ledger> {
    let bytes =
        std::fs::read(path).with_context(|| format!("reading ledger {}", path.display()))?;
    LedgerCodec::decode(&bytes).with_context(|| format!("decoding ledger {}", path.display()))
}

pub fn write_ledger(ledger: &Ledger, path: &Path) -> anyhow::Result<()> {
    let mut bytes = serde_json::to_vec_pretty(ledger)?;
    bytes.push(b'\n');
    std::fs::write(path, bytes).with_context(|| format!("writing ledger {}", path.display()))
}

fn emit_ledger(
    ledger: &Ledger,
    out: Option<&Path>,
    format: OutputFormat,
    summary: impl FnOnce() -> String,
) -> anyhow::Result<()> {
    let Some(path) = out else {
        println!("{}", serde_json::to_string_pretty(ledger)?);
        return Ok(());
    };
    write_ledger(ledger, path)?;
    match format {
        OutputFormat::Json => println!(
            "{}",
            json!({
                "out": path.display().to_string(),
                "blocks": ledger.len(),
                "tip": ledger.tip().hash,
            })
        ),
        OutputFormat::Text => {
            println!("{}", summary());
            println!("  Blocks: {}", ledger.len().to_string().bold());
            println!("  Tip: {}", ledger.tip().hash.short_hex().cyan());
            println!("  Written to {}", path.display().to_string().bold());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bidchain_ledger::Payload;

    fn price(v: f64) -> Price {
        Price::new(v).unwrap()
    }

    #[test]
    fn create_update_verify_through_files() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("ledger.json");
        let second = dir.path().join("updated.json");

        let ledger = create_ledger(ImpId::new("imp-1").unwrap(), price(5.0)).unwrap();
        write_ledger(&ledger, &first).unwrap();

        let updated = update_ledger(&first, price(7.5), None).unwrap();
        write_ledger(&updated, &second).unwrap();

        let reread = read_ledger(&second).unwrap();
        assert_eq!(reread.len(), 3);
        assert_eq!(reread.current_price(), Some(price(7.5)));
        assert!(ChainVerifier::validate(&reread));

        cmd_verify(VerifyArgs { ledger: second.clone() }, OutputFormat::Json).unwrap();
        cmd_price(PriceArgs { ledger: second }, OutputFormat::Text).unwrap();
    }

    #[test]
    fn update_refuses_tampered_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");

        let mut blocks = create_ledger(ImpId::new("imp-1").unwrap(), price(5.0))
            .unwrap()
            .into_blocks();
        if let Payload::Creation(tx) = &mut blocks[1].payload {
            tx.price = price(1.0);
        }
        write_ledger(&Ledger::from_blocks(blocks).unwrap(), &path).unwrap();

        assert!(update_ledger(&path, price(2.0), None).is_err());
        assert!(cmd_verify(VerifyArgs { ledger: path }, OutputFormat::Text).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_ledger(&dir.path().join("absent.json")).is_err());
    }

    #[test]
    fn empty_ledger_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.json");
        std::fs::write(&path, "[]").unwrap();
        assert!(read_ledger(&path).is_err());
    }

    #[test]
    fn price_without_creation_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("genesis.json");
        write_ledger(&Ledger::new().unwrap(), &path).unwrap();
        assert!(cmd_price(PriceArgs { ledger: path }, OutputFormat::Text).is_err());
    }
}
