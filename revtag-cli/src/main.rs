use clap::Parser;
use revtag::tracing::prefix;
use revtag::{load_config, Error};
use revtag_core::{AccountId, EntityId, Fingerprinter, MemoryPorts, ObjectId, PortSet, Viewer};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "revtag")]
#[command(about = "Compute the fingerprint (ETag) of an entity from a JSON state snapshot")]
#[command(version)]
struct Args {
    /// JSON snapshot of entities, accounts, groups, scopes and logs
    #[arg(short, long)]
    snapshot: PathBuf,

    /// Entity to fingerprint
    #[arg(short, long)]
    entity: i32,

    /// Viewing account, a positive account number (anonymous when omitted)
    #[arg(short, long, value_parser = clap::value_parser!(i32).range(1..))]
    viewer: Option<i32>,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Format version (overrides config and environment)
    #[arg(long)]
    format_version: Option<u32>,

    /// Fingerprint a single revision of the entity (40 hex chars)
    #[arg(long)]
    revision: Option<String>,

    /// Print the quoted ETag header form
    #[arg(long)]
    header: bool,

    /// Log level (debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

async fn run(args: &Args) -> revtag::Result<String> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(version) = args.format_version {
        config.format_version = version;
    }

    let snapshot = std::fs::read_to_string(&args.snapshot)?;
    let ports = MemoryPorts::from_json(&snapshot)?;
    info!("{} loaded snapshot {}", prefix::LOAD, args.snapshot.display());

    let viewer = Viewer::from(args.viewer.map(AccountId));
    let entity = EntityId(args.entity);
    let engine = Fingerprinter::new(PortSet::uniform(&ports)).with_config(config);

    let token = match &args.revision {
        Some(raw) => {
            let revision: ObjectId = raw
                .parse()
                .map_err(|e: revtag_core::ParseObjectIdError| Error::Input(e.to_string()))?;
            engine.compute_revision(entity, viewer, revision).await?
        }
        None => engine.compute(entity, viewer).await?,
    };
    info!("{} entity {} -> {}", prefix::FINGERPRINT, entity, token);

    Ok(if args.header {
        token.header_value()
    } else {
        token.to_hex()
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    revtag::tracing::init_with_filter(&args.log_level);

    println!("{}", run(&args).await?);
    Ok(())
}
