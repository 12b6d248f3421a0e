//! Shelfscan CLI - scan shelves and manage your book libraries

mod commands;

use anyhow::Result;
use clap::{ArgGroup, Parser, Subcommand};
use shelfscan_core::ScanConfig;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "shelfscan")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Library database file (defaults to SHELFSCAN_DB_PATH or ./shelfscan.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recognize the books in a shelf photo
    Scan {
        /// Shelf photo path
        image: PathBuf,

        /// Spine text to use instead of simulated OCR (repeatable)
        #[arg(short, long = "fragment")]
        fragments: Vec<String>,

        /// Seed for simulated OCR
        #[arg(long)]
        seed: Option<u64>,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Add the recognized books to a library
        #[arg(long)]
        accept: bool,

        /// Library for accepted books
        #[arg(short, long, requires = "accept")]
        library: Option<String>,
    },

    /// Look up a single book by title/author or ISBN
    #[command(group(ArgGroup::new("query").required(true).args(["title", "isbn"])))]
    Lookup {
        /// Book title
        #[arg(short, long)]
        title: Option<String>,

        /// Book author
        #[arg(short, long, requires = "title")]
        author: Option<String>,

        /// ISBN-10 or ISBN-13
        #[arg(short, long, conflicts_with = "title")]
        isbn: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage libraries
    Libraries {
        #[command(subcommand)]
        action: Option<LibraryAction>,
    },

    /// List books
    Books {
        /// Only books in this library
        #[arg(short, long)]
        library: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Update a book's reading status
    #[command(group(ArgGroup::new("status").required(true).multiple(true)))]
    Mark {
        /// Book id
        id: String,

        /// Mark as read
        #[arg(long, group = "status", conflicts_with = "unread")]
        read: bool,

        /// Mark as unread
        #[arg(long, group = "status")]
        unread: bool,

        /// Add to the to-read list
        #[arg(long, group = "status", conflicts_with = "not_to_read")]
        to_read: bool,

        /// Remove from the to-read list
        #[arg(long, group = "status")]
        not_to_read: bool,
    },

    /// Sync the local library with your account
    Sync {
        /// Account user id
        #[arg(short, long)]
        user: String,

        /// Profile server URL (defaults to SHELFSCAN_REMOTE_URL)
        #[arg(long)]
        remote: Option<String>,
    },

    /// Upload the local library to your account, replacing its book list
    Upload {
        /// Account user id
        #[arg(short, long)]
        user: String,

        /// Profile server URL (defaults to SHELFSCAN_REMOTE_URL)
        #[arg(long)]
        remote: Option<String>,
    },
}

#[derive(Subcommand)]
enum LibraryAction {
    /// List libraries with their book counts
    List,

    /// Create a library
    Create {
        /// Library name
        name: String,
    },

    /// Delete a library and its books
    Delete {
        /// Library name
        name: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "shelfscan=debug,shelfscan_core=debug"
    } else {
        "shelfscan=info,shelfscan_core=warn"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = ScanConfig::from_env();
    if let Some(db) = cli.db {
        config.db_path = db;
    }

    match cli.command {
        Commands::Scan {
            image,
            fragments,
            seed,
            json,
            accept,
            library,
        } => {
            let options = commands::ScanOptions {
                fragments,
                seed,
                json,
                accept_into: accept.then(|| library.unwrap_or_else(|| config.default_library.clone())),
            };
            commands::scan(&config, &image, options).await
        }

        Commands::Lookup {
            title,
            author,
            isbn,
            json,
        } => {
            let query = match (title, isbn) {
                (_, Some(isbn)) => commands::LookupQuery::Isbn(isbn),
                (Some(title), None) => commands::LookupQuery::TitleAuthor { title, author },
                (None, None) => anyhow::bail!("Provide --title or --isbn"),
            };
            commands::lookup(&config, query, json).await
        }

        Commands::Libraries { action } => match action.unwrap_or(LibraryAction::List) {
            LibraryAction::List => commands::list_libraries(&config),
            LibraryAction::Create { name } => commands::create_library(&config, &name),
            LibraryAction::Delete { name } => commands::delete_library(&config, &name),
        },

        Commands::Books { library, json } => commands::books(&config, library.as_deref(), json).await,

        Commands::Mark {
            id,
            read,
            unread,
            to_read,
            not_to_read,
        } => {
            let is_read = (read || unread).then_some(read);
            let is_to_read = (to_read || not_to_read).then_some(to_read);
            commands::mark(&config, &id, is_read, is_to_read)
        }

        Commands::Sync { user, remote } => {
            if let Some(remote) = remote {
                config.remote_url = remote;
            }
            commands::sync(&config, &user).await
        }

        Commands::Upload { user, remote } => {
            if let Some(remote) = remote {
                config.remote_url = remote;
            }
            commands::upload(&config, &user).await
        }
    }
}
