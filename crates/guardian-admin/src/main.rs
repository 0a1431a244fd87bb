//! `guardian` — account management for guardian (parent) accounts.
//!
//! Reads `guardian.toml` (or the path given with `--config`), layered with
//! `GUARDIAN_*` environment variables, and opens the SQLite store it names.
//!
//! ```
//! guardian create-superuser --phone "+20 123 456 7890" --full-name "Head Teacher"
//! guardian show 01234567890
//! ```

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use guardian_admin::{
  AdminConfig,
  commands::{self, CreateArgs},
  expand_tilde,
};
use guardian_core::{credential::Argon2Hasher, factory::ParentAccountFactory};
use guardian_store_sqlite::SqliteStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Guardian account management")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "guardian.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Create a regular parent account.
  CreateUser(CreateArgs),

  /// Create a parent account with staff and superuser status.
  CreateSuperuser(CreateArgs),

  /// Print the canonical E.164 form of a phone number.
  Normalize {
    phone: String,

    /// Region for numbers written without `+CC`; overrides the config.
    #[arg(long)]
    region: Option<String>,
  },

  /// Show the account with this primary phone.
  Show {
    phone: String,

    #[arg(long)]
    json: bool,
  },

  /// List all accounts, oldest first.
  List,

  /// Delete the account with this primary phone.
  Delete { phone: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("GUARDIAN"))
    .build()
    .context("failed to read config file")?;

  let admin_cfg: AdminConfig = settings
    .try_deserialize()
    .context("failed to deserialise AdminConfig")?;

  // Normalizing needs no store.
  if let Command::Normalize { phone, region } = &cli.command {
    let canonical = admin_cfg.normalize_phone(phone, region.as_deref())?;
    println!("{canonical}");
    return Ok(());
  }

  let normalizer = admin_cfg
    .normalizer()
    .context("invalid default_region in config")?;

  let store_path = expand_tilde(&admin_cfg.store_path);
  if let Some(dir) = store_path.parent().filter(|d| !d.as_os_str().is_empty()) {
    std::fs::create_dir_all(dir)
      .with_context(|| format!("failed to create {dir:?}"))?;
  }

  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;
  tracing::debug!(path = ?store_path, "opened store");

  let factory = ParentAccountFactory::new(store, Argon2Hasher, normalizer);

  match cli.command {
    Command::CreateUser(args) => {
      check_required(&args)?;
      let password = prompt_password(&args)?;
      let parent =
        commands::create_account(&factory, &args, password.as_deref(), false).await?;
      println!("Created {parent}");
    }
    Command::CreateSuperuser(args) => {
      check_required(&args)?;
      let password = prompt_password(&args)?;
      let parent =
        commands::create_account(&factory, &args, password.as_deref(), true).await?;
      println!("Created superuser {parent}");
    }
    Command::Show { phone, json } => {
      let parent = commands::lookup(&factory, &phone)
        .await?
        .with_context(|| format!("no parent with phone {phone}"))?;
      if json {
        println!("{}", serde_json::to_string_pretty(&parent)?);
      } else {
        print!("{}", commands::describe(&parent));
      }
    }
    Command::List => {
      use guardian_core::store::ParentStore as _;
      for parent in factory.store().list_parents().await? {
        let mut flags = Vec::new();
        if !parent.is_active {
          flags.push("inactive");
        }
        if parent.is_staff {
          flags.push("staff");
        }
        if parent.is_superuser {
          flags.push("superuser");
        }
        if flags.is_empty() {
          println!("{parent}");
        } else {
          println!("{parent} [{}]", flags.join(", "));
        }
      }
    }
    Command::Delete { phone } => {
      if commands::delete_account(&factory, &phone).await? {
        println!("Deleted {phone}");
      } else {
        anyhow::bail!("no parent with phone {phone}");
      }
    }
    Command::Normalize { .. } => unreachable!("handled before opening the store"),
  }

  Ok(())
}

/// Fail before prompting for a password if a required field is blank.
fn check_required(args: &CreateArgs) -> anyhow::Result<()> {
  match args.extra_fields().missing_required() {
    Some(field) => anyhow::bail!("--{} must not be empty", field.replace('_', "-")),
    None => Ok(()),
  }
}

/// Read the password twice from stdin, unless `--no-password` was given.
/// An empty entry yields an unusable password.
fn prompt_password(args: &CreateArgs) -> anyhow::Result<Option<String>> {
  if args.no_password {
    return Ok(None);
  }
  let first = read_line("Password: ")?;
  if first.is_empty() {
    return Ok(None);
  }
  let second = read_line("Password (again): ")?;
  if first != second {
    anyhow::bail!("passwords do not match");
  }
  Ok(Some(first))
}

fn read_line(prompt: &str) -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  print!("{prompt}");
  io::stdout().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  Ok(
    line
      .trim_end_matches('\n')
      .trim_end_matches('\r')
      .to_string(),
  )
}
