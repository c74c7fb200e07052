//! User management CLI
//!
//! Adds, lists and removes the staff accounts that may sign in to the
//! admin API. Works against the PostgreSQL database only.

use std::io::{self, BufRead, IsTerminal};
use std::sync::Arc;

use anyhow::{Context, bail};
use api::{AppConfig, Storage};
use auth::PgUserRepository;
use auth::application::manage_users::{AddUserInput, ManageUsersUseCase};
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "manage", author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a staff user
    AddUser {
        user_name: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long, default_value = "")]
        first_name: String,
        #[arg(long, default_value = "")]
        last_name: String,
        /// Prompted for (without echo) when omitted; piped stdin is read as one line
        #[arg(long)]
        password: Option<String>,
    },
    /// List every user
    ListUsers,
    /// Delete a user by name
    RemoveUser { user_name: String },
}

fn read_password() -> anyhow::Result<String> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return rpassword::prompt_password("Password: ").context("Failed to read password");
    }
    password_line(stdin.lock())
}

fn password_line(mut reader: impl BufRead) -> anyhow::Result<String> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "manage=info,auth=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;

    let Storage::Postgres(database_url) = &config.storage else {
        bail!("manage needs a PostgreSQL DATABASE_URL");
    };

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;

    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    let use_case = ManageUsersUseCase::new(
        Arc::new(PgUserRepository::new(pool)),
        Arc::new(config.auth),
    );

    match cli.command {
        Command::AddUser {
            user_name,
            email,
            first_name,
            last_name,
            password,
        } => {
            let password = match password {
                Some(password) => password,
                None => read_password()?,
            };
            let user = use_case
                .add_user(AddUserInput {
                    user_name,
                    password,
                    email,
                    first_name,
                    last_name,
                })
                .await?;
            println!("Added {} ({})", user.user_name, user.user_id);
        }
        Command::ListUsers => {
            for user in use_case.list_users().await? {
                println!(
                    "{}\t{}\t{}",
                    user.user_name,
                    user.full_name(),
                    if user.is_staff { "staff" } else { "-" }
                );
            }
        }
        Command::RemoveUser { user_name } => {
            let user = use_case.remove_user(&user_name).await?;
            println!("Removed {}", user.user_name);
        }
    }

    Ok(())
}
