//! CLI entry point for blogdesk

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use blogdesk::commands;
use blogdesk::services::TermKind;
use blogdesk::Desk;

#[derive(Parser)]
#[command(name = "blogdesk")]
#[command(version)]
#[command(about = "Admin client for a content-block blog CMS", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new desk folder
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Log in to the admin API
    Login {
        #[arg(short, long)]
        username: String,

        /// Password (falls back to BLOGDESK_PASSWORD)
        #[arg(short, long, env = "BLOGDESK_PASSWORD", hide_env_values = true)]
        password: String,

        /// Log in even when a valid session exists
        #[arg(short, long)]
        force: bool,
    },

    /// Forget the stored session
    Logout,

    /// Show the current session
    Status,

    /// Manage posts
    #[command(subcommand)]
    Post(PostCommand),

    /// Compress and upload an image
    Upload {
        image: PathBuf,

        /// JPEG quality between 0 and 1
        #[arg(short, long)]
        quality: Option<f32>,

        /// Maximum width in pixels
        #[arg(short = 'w', long)]
        max_width: Option<u32>,
    },

    /// Manage categories
    #[command(subcommand)]
    Category(TermCommand),

    /// Manage tags
    #[command(subcommand)]
    Tag(TermCommand),

    /// Manage newsletter subscriptions
    #[command(subcommand)]
    Newsletter(NewsletterCommand),

    /// Display version information
    Version,
}

#[derive(Subcommand)]
enum PostCommand {
    /// List posts
    List,

    /// Show a post and its blocks
    Show { id: i64 },

    /// Create a post from a YAML draft
    New { file: PathBuf },

    /// Replace a post with a YAML draft
    Edit { id: i64, file: PathBuf },

    /// Delete one or more posts
    Delete {
        #[arg(required = true)]
        ids: Vec<i64>,
    },

    /// Render a draft or a stored post to HTML
    Render {
        /// Draft file
        #[arg(conflicts_with = "id")]
        file: Option<PathBuf>,

        /// Stored post id
        #[arg(long)]
        id: Option<i64>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the slug for a title
    Slug {
        title: String,

        /// Avoid slugs already used by posts
        #[arg(short, long)]
        unique: bool,
    },
}

#[derive(Subcommand)]
enum TermCommand {
    /// List with post counts
    List,

    /// Create with a slug derived from the name
    Add {
        name: String,

        #[arg(long)]
        color: Option<String>,
    },

    /// Delete if no post uses it
    Delete { id: i64 },
}

#[derive(Subcommand)]
enum NewsletterCommand {
    Subscribe { email: String },
    Unsubscribe { email: String },
    /// List subscribers
    Subscribers,
    /// Show subscription counters
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "blogdesk=debug,info"
    } else {
        "blogdesk=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing desk in {:?}", target_dir);
            commands::init::init_desk(&target_dir)?;
            println!("Initialized blogdesk in {:?}", target_dir);
        }

        Commands::Login {
            username,
            password,
            force,
        } => {
            let desk = Desk::new(&base_dir)?;
            commands::auth::login(&desk, &username, &password, force).await?;
        }

        Commands::Logout => {
            let desk = Desk::new(&base_dir)?;
            commands::auth::logout(&desk)?;
        }

        Commands::Status => {
            let desk = Desk::new(&base_dir)?;
            commands::auth::status(&desk).await?;
        }

        Commands::Post(cmd) => {
            let desk = Desk::new(&base_dir)?;
            run_post(&desk, cmd).await?;
        }

        Commands::Upload {
            image,
            quality,
            max_width,
        } => {
            let desk = Desk::new(&base_dir)?;
            commands::upload::run(&desk, &image, quality, max_width).await?;
        }

        Commands::Category(cmd) => {
            let desk = Desk::new(&base_dir)?;
            run_term(&desk, TermKind::Category, cmd).await?;
        }

        Commands::Tag(cmd) => {
            let desk = Desk::new(&base_dir)?;
            run_term(&desk, TermKind::Tag, cmd).await?;
        }

        Commands::Newsletter(cmd) => {
            let desk = Desk::new(&base_dir)?;
            match cmd {
                NewsletterCommand::Subscribe { email } => {
                    commands::newsletter::subscribe(&desk, &email).await?
                }
                NewsletterCommand::Unsubscribe { email } => {
                    commands::newsletter::unsubscribe(&desk, &email).await?
                }
                NewsletterCommand::Subscribers => commands::newsletter::subscribers(&desk).await?,
                NewsletterCommand::Stats => commands::newsletter::stats(&desk).await?,
            }
        }

        Commands::Version => {
            println!("blogdesk version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

async fn run_post(desk: &Desk, cmd: PostCommand) -> Result<()> {
    match cmd {
        PostCommand::List => commands::posts::list(desk).await,
        PostCommand::Show { id } => commands::posts::show(desk, id).await,
        PostCommand::New { file } => commands::posts::create(desk, &file).await,
        PostCommand::Edit { id, file } => commands::posts::edit(desk, id, &file).await,
        PostCommand::Delete { ids } => commands::posts::delete(desk, &ids).await,
        PostCommand::Render { file, id, output } => {
            commands::posts::render(desk, file.as_deref(), id, output.as_deref()).await
        }
        PostCommand::Slug { title, unique } => commands::posts::slug(desk, &title, unique).await,
    }
}

async fn run_term(desk: &Desk, kind: TermKind, cmd: TermCommand) -> Result<()> {
    match cmd {
        TermCommand::List => commands::taxonomy::list(desk, kind).await,
        TermCommand::Add { name, color } => commands::taxonomy::add(desk, kind, &name, color).await,
        TermCommand::Delete { id } => commands::taxonomy::delete(desk, kind, id).await,
    }
}
