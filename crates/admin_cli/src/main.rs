use std::error::Error;

use clap::{Args, Parser, Subcommand};
use engine::{Engine, ExternalIdentity};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

#[derive(Parser, Debug)]
#[command(name = "grosz-admin")]
#[command(about = "Admin utilities for grosz (bootstrap users)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:./grosz.db?mode=rwc")]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    /// Provision a user, or refresh an existing one's credentials.
    Create(UserCreateArgs),
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    email: String,
    #[arg(long)]
    name: Option<String>,
    /// Identity provider recorded on the account.
    #[arg(long, default_value = "local")]
    provider: String,
}

fn prompt_password_twice() -> Result<String, Box<dyn Error + Send + Sync>> {
    for _ in 0..3 {
        let first = rpassword::prompt_password("Password: ")?;
        if first.is_empty() {
            eprintln!("Password must not be empty.");
            continue;
        }

        let second = rpassword::prompt_password("Confirm password: ")?;
        if first == second {
            return Ok(first);
        }

        eprintln!("Passwords do not match. Try again.");
    }

    Err("too many attempts".into())
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;

    match cli.command {
        Command::User(User {
            command: UserCommand::Create(args),
        }) => {
            let password = prompt_password_twice()?;
            let password_hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)?;

            let engine = Engine::builder().database(db.clone()).build().await?;
            let user = engine
                .sign_in_identity(ExternalIdentity {
                    email: args.email,
                    name: args.name,
                    image: None,
                    provider: args.provider,
                    password_hash: Some(password_hash),
                })
                .await?;

            println!("provisioned user: {} ({})", user.email, user.id);
        }
    }

    Ok(())
}
