//! Command-line interface.

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::{debug, info};

use crate::config::SiteConfig;
use crate::contact::{Attachment, ContactDesk, ContactForm};
use crate::error::{FolioError, Result};
use crate::logging::LogFormat;
use crate::markup::Markup;
use crate::server::{self, AppState};
use crate::site::Site;
use crate::theme::{resolve_theme, FileThemeStore, Theme, ThemeStore};

/// Static generator and preview server for a JSON-backed portfolio blog.
#[derive(Parser, Debug)]
#[command(name = "folio", version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[arg(long, value_enum, default_value = "human", global = true)]
    pub log_format: LogFormat,

    /// Path to the YAML configuration file.
    #[arg(short, long, global = true, env = "FOLIO_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write the static site.
    Build(BuildArgs),

    /// Serve pages straight from the article store.
    Serve(ServeArgs),

    /// Render a plaintext body to HTML on stdout.
    Render(RenderArgs),

    /// Show or change the stored theme preference.
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },

    /// Validate and send the contact form.
    Contact(ContactArgs),

    /// Print a chat deep link.
    ChatLink(ChatLinkArgs),

    /// Check a newsletter signup address.
    Newsletter {
        #[arg(default_value = "")]
        email: String,
    },
}

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Output directory.
    #[arg(short, long, default_value = "public")]
    pub dest: PathBuf,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to bind, overriding `server.bind`.
    #[arg(short, long)]
    pub bind: Option<String>,
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Input file, or `-` for stdin.
    pub file: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum ThemeAction {
    /// Print the effective theme and where it comes from.
    Get,
    /// Store a preference (`light` or `dark`).
    Set { theme: String },
    /// Flip the effective theme and store it.
    Toggle,
    /// Forget the stored preference.
    Clear,
}

#[derive(Args, Debug)]
pub struct ContactArgs {
    #[arg(long, default_value = "")]
    pub name: String,
    #[arg(long, default_value = "")]
    pub email: String,
    #[arg(long, default_value = "")]
    pub subject: String,
    #[arg(long, default_value = "")]
    pub message: String,
    /// File to describe in the message. Only its name and size are sent.
    #[arg(long)]
    pub attachment: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ChatLinkArgs {
    /// Message text; the configured default is used when blank.
    #[arg(default_value = "")]
    pub message: String,

    /// Use the configured quick-help message.
    #[arg(long, conflicts_with = "message")]
    pub quick: bool,
}

pub async fn dispatch(cli: Cli) -> Result<()> {
    let config = SiteConfig::load(cli.config.as_deref())?;
    match cli.command {
        Commands::Build(args) => build(config, &args).await,
        Commands::Serve(args) => serve(config, args).await,
        Commands::Render(args) => render(&args),
        Commands::Theme { action } => theme(&config, action),
        Commands::Contact(args) => contact(&config, args).await,
        Commands::ChatLink(args) => {
            let desk = ContactDesk::new(&config.contact)?;
            let message = if args.quick {
                config.contact.quick_message.as_str()
            } else {
                args.message.as_str()
            };
            println!("{}", desk.chat_link(message));
            Ok(())
        }
        Commands::Newsletter { email } => {
            let notice = ContactDesk::new(&config.contact)?.newsletter(&email);
            println!("{notice}");
            Ok(())
        }
    }
}

async fn build(config: SiteConfig, args: &BuildArgs) -> Result<()> {
    let stored = FileThemeStore::new(config.theme.prefs_file.clone())
        .load_async()
        .await;
    let site = Site::new(config, args.dest.clone(), stored)?;
    let pages = site.build().await?;
    println!("wrote {} pages to {}", pages.len(), args.dest.display());
    Ok(())
}

async fn serve(mut config: SiteConfig, args: ServeArgs) -> Result<()> {
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    let bind = config.server.bind.clone();
    server::serve(AppState::new(config)?, &bind).await
}

fn render(args: &RenderArgs) -> Result<()> {
    let text = if args.file == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .map_err(|e| FolioError::io("<stdin>", e))?;
        text
    } else {
        std::fs::read_to_string(&args.file).map_err(|e| FolioError::io(&args.file, e))?
    };
    debug!(bytes = text.len(), "rendering markup");
    println!("{}", Markup::new()?.render(&text));
    Ok(())
}

fn theme(config: &SiteConfig, action: ThemeAction) -> Result<()> {
    let store = FileThemeStore::new(config.theme.prefs_file.clone());
    match action {
        ThemeAction::Get => {
            let stored = store.load();
            let origin = if stored.is_some() { "stored" } else { "system" };
            let theme = resolve_theme(stored, config.theme.system);
            println!("{} ({origin})", theme.as_str());
        }
        ThemeAction::Set { theme } => {
            let theme: Theme = theme.parse()?;
            store.save(theme)?;
            println!("{}", theme.as_str());
        }
        ThemeAction::Toggle => {
            let theme = resolve_theme(store.load(), config.theme.system).toggled();
            store.save(theme)?;
            println!("{}", theme.as_str());
        }
        ThemeAction::Clear => {
            store.clear()?;
            info!(path = %store.path().display(), "theme preference cleared");
        }
    }
    Ok(())
}

async fn contact(config: &SiteConfig, args: ContactArgs) -> Result<()> {
    let attachment = match &args.attachment {
        Some(path) => Some(describe_attachment(path)?),
        None => None,
    };
    let form = ContactForm {
        name: args.name,
        email: args.email,
        subject: args.subject,
        message: args.message,
        attachment,
    };
    let notice = ContactDesk::new(&config.contact)?.submit(&form).await?;
    println!("{notice}");
    Ok(())
}

fn describe_attachment(path: &Path) -> Result<Attachment> {
    let meta = std::fs::metadata(path).map_err(|e| FolioError::io(path, e))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(Attachment {
        name,
        size_bytes: meta.len(),
    })
}
