mod config;
mod error;

use clap::{Parser, Subcommand};

use auth::{Identity, Role, TokenKeeper};
use engine::{NewRequest, RequestEngine};
use storage::{DocumentType, RequestId, RequestPatch, RequestStore, Status};

use config::Config;
use error::{Error, Result};

const CONFIG_FILE: &str = "registrar.toml";
const SECRET_ENV: &str = "REGISTRAR_SECRET";

#[derive(Parser)]
#[command(name = "registrar")]
#[command(about = "Document request workflow", long_about = None)]
#[command(version)]
struct Cli {
    /// Bearer token, defaults to $REGISTRAR_TOKEN.
    #[arg(long, global = true, env = "REGISTRAR_TOKEN")]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Issue a signed token for a subject
    IssueToken {
        /// Subject id the token identifies
        #[arg(long)]
        subject: String,
        /// Role embedded in the token (student or admin)
        #[arg(long)]
        role: Role,
        /// Lifetime in days (1-7), defaults to the configured value
        #[arg(long)]
        ttl_days: Option<i64>,
    },
    /// Submit a new document request
    Submit {
        /// Document to request (e.g. "Transcript", "Good Moral")
        #[arg(long)]
        document_type: DocumentType,
        /// Why the document is needed
        #[arg(long)]
        purpose: String,
        /// Number of copies (1-5), defaults to 1
        #[arg(long)]
        copies: Option<u8>,
    },
    /// List your own requests, newest first
    List,
    /// List every request (admin only)
    ListAll,
    /// Show the most recent requests
    Recent {
        #[arg(short, long, default_value = "5")]
        limit: usize,
    },
    /// Show a single request
    Show {
        #[arg(long)]
        id: RequestId,
    },
    /// Edit your own pending request
    Edit {
        #[arg(long)]
        id: RequestId,
        #[arg(long)]
        document_type: Option<DocumentType>,
        #[arg(long)]
        purpose: Option<String>,
        #[arg(long)]
        copies: Option<u8>,
    },
    /// Withdraw your own pending request
    Delete {
        #[arg(long)]
        id: RequestId,
    },
    /// Approve a pending request (admin only)
    Approve {
        #[arg(long)]
        id: RequestId,
    },
    /// Decline a pending request (admin only)
    Decline {
        #[arg(long)]
        id: RequestId,
    },
    /// Mark an approved request ready for pickup (admin only)
    Ready {
        #[arg(long)]
        id: RequestId,
    },
    /// Show request counters (admin only)
    Stats,
}

fn main() {
    init_tracing();

    if let Err(e) = run() {
        eprintln!("Error [{}]: {e}", e.http_status());
        std::process::exit(1);
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config()?;
    let keeper = TokenKeeper::new(secret()?)?;

    if let Commands::IssueToken {
        subject,
        role,
        ttl_days,
    } = &cli.command
    {
        let ttl = ttl_days.unwrap_or(config.token.ttl_days);
        println!("{}", keeper.issue(subject.as_str(), *role, ttl)?);
        return Ok(());
    }

    // Everything below acts on a verified identity: authentication first,
    // authorization inside the engine.
    let identity = keeper.verify(cli.token.as_deref().unwrap_or_default())?;
    let engine = RequestEngine::new(RequestStore::open(&config.database.path)?);

    match cli.command {
        Commands::IssueToken { .. } => unreachable!("handled above"),
        Commands::Submit {
            document_type,
            purpose,
            copies,
        } => {
            let created = engine.create(
                &identity,
                NewRequest {
                    document_type,
                    purpose,
                    number_of_copies: copies,
                },
            )?;
            print_json(&created)
        }
        Commands::List => print_json(&engine.list_own(&identity)?),
        Commands::ListAll => print_json(&engine.list_all(&identity)?),
        Commands::Recent { limit } => print_json(&engine.recent(&identity, limit)?),
        Commands::Show { id } => print_json(&engine.get(&identity, id)?),
        Commands::Edit {
            id,
            document_type,
            purpose,
            copies,
        } => {
            let patch = RequestPatch {
                document_type,
                purpose,
                number_of_copies: copies,
            };
            print_json(&engine.edit(&identity, id, patch)?)
        }
        Commands::Delete { id } => {
            engine.delete(&identity, id)?;
            println!("Request {id} deleted");
            Ok(())
        }
        Commands::Approve { id } => transition(&engine, &identity, id, Status::Approved),
        Commands::Decline { id } => transition(&engine, &identity, id, Status::Declined),
        Commands::Ready { id } => transition(&engine, &identity, id, Status::Ready),
        Commands::Stats => print_json(&engine.stats(&identity)?),
    }
}

fn transition(
    engine: &RequestEngine,
    identity: &Identity,
    id: RequestId,
    target: Status,
) -> Result<()> {
    let updated = engine.transition(identity, id, target)?;
    print_json(&updated)
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn load_config() -> Result<Config> {
    if std::path::Path::new(CONFIG_FILE).exists() {
        Config::load(CONFIG_FILE)
    } else {
        Ok(Config::default())
    }
}

fn secret() -> Result<String> {
    std::env::var(SECRET_ENV).map_err(|_| Error::MissingSecret(SECRET_ENV))
}
