//! `scribe` server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) layered under
//! `SCRIBE_*` environment variables, opens the SQLite store, and either serves
//! HTTP or runs one of the administrative subcommands.
//!
//! ```text
//! scribe serve
//! echo 'hunter22' | scribe create-user alice
//! scribe create-group --title Cats --slug cats
//! ```

use std::{
  io::{self, BufRead, Write},
  path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use scribe_core::{group::NewGroup, store::BlogStore, user::SignupForm};
use scribe_store_sqlite::SqliteStore;
use scribe_web::{AppState, ServerConfig, auth::hash_password};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Scribe blogging server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml", global = true)]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Run the HTTP server (the default).
  Serve,
  /// Register a user; the password is read from stdin.
  CreateUser { username: String },
  /// Create a group posts can be filed under.
  CreateGroup {
    #[arg(long)]
    title:       String,
    #[arg(long)]
    slug:        String,
    #[arg(long, default_value = "")]
    description: String,
  },
  /// Print the argon2 hash for a password entered on stdin and exit.
  HashPassword,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("SCRIBE"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  match cli.command.unwrap_or(Command::Serve) {
    Command::Serve => serve(server_cfg).await,
    Command::CreateUser { username } => {
      let store = open_store(&server_cfg).await?;
      create_user(&store, username).await
    }
    Command::CreateGroup { title, slug, description } => {
      let store = open_store(&server_cfg).await?;
      let group = NewGroup { title, slug, description }
        .validate()
        .map_err(|errors| anyhow::anyhow!("invalid group: {errors}"))?;
      let group = store
        .create_group(group)
        .await
        .context("failed to create group")?;
      println!("created group {} ({})", group.slug, group.group_id);
      Ok(())
    }
    Command::HashPassword => {
      let password = read_password()?;
      println!("{}", hash_password(&password)?);
      Ok(())
    }
  }
}

async fn serve(server_cfg: ServerConfig) -> anyhow::Result<()> {
  let store = open_store(&server_cfg).await?;
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);
  let app = scribe_web::router(AppState::new(store, server_cfg));

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

async fn open_store(server_cfg: &ServerConfig) -> anyhow::Result<SqliteStore> {
  let store_path = expand_tilde(&server_cfg.store_path);
  SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))
}

async fn create_user(store: &SqliteStore, username: String) -> anyhow::Result<()> {
  let password = read_password()?;
  let signup = SignupForm { username, password }
    .validate()
    .map_err(|errors| anyhow::anyhow!("invalid user: {errors}"))?;

  let hash = hash_password(&signup.password)?;
  let user = store
    .create_user(signup.username, hash)
    .await
    .context("failed to create user")?;
  println!("created user {} ({})", user.username, user.user_id);
  Ok(())
}

/// Read one line from stdin as the password.
fn read_password() -> anyhow::Result<String> {
  let stdin = io::stdin();
  eprint!("Password: ");
  io::stderr().flush().ok();
  let mut line = String::new();
  stdin.lock().read_line(&mut line)?;
  Ok(
    line
      .trim_end_matches('\n')
      .trim_end_matches('\r')
      .to_string(),
  )
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
