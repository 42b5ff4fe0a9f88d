//! Create a developer account directly in the database.
//!
//! Self-registration deliberately refuses the developer role, so the first
//! operator account is bootstrapped with this tool. The password is read
//! from `TRIPTRACK_DEVELOPER_PASSWORD` rather than a flag so it never lands
//! in shell history or the process list.

use std::env;
use std::sync::Arc;

use backend::domain::auth::PASSWORD_MIN;
use backend::domain::ports::{PasswordHasher, UserRepository};
use backend::domain::{EmailAddress, Role, RoleProfile, User, UserId, Username};
use backend::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
use backend::outbound::security::Argon2PasswordHasher;
use chrono::Utc;
use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use tokio::runtime::Builder;
use zeroize::Zeroizing;

const PASSWORD_ENV: &str = "TRIPTRACK_DEVELOPER_PASSWORD";

/// `create-developer` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "create-developer",
    about = "Create a developer account; reads the password from TRIPTRACK_DEVELOPER_PASSWORD",
    version
)]
struct CliArgs {
    /// Login name for the new developer account.
    #[arg(long, value_name = "name")]
    username: String,
    /// Contact email for the new developer account.
    #[arg(long, value_name = "address")]
    email: String,
    /// Database connection URL. Falls back to `TRIPTRACK_DATABASE_URL` when omitted.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let runtime = Builder::new_current_thread().enable_all().build()?;
    runtime.block_on(async_main())
}

async fn async_main() -> Result<()> {
    let args = CliArgs::try_parse()?;

    let username = Username::new(&args.username)?;
    let email = EmailAddress::new(&args.email)?;
    let password = read_password()?;

    let database_url = resolve_database_url(args.database_url)?;
    let pool = DbPool::new(PoolConfig::new(&database_url)).await?;
    let users = DieselUserRepository::new(pool);

    let hasher = Arc::new(Argon2PasswordHasher::new());
    let password_hash = hasher.hash(&password)?;

    let user = User::new(
        UserId::random(),
        username,
        email,
        Role::Developer,
        None,
        Utc::now(),
    );
    let profile = RoleProfile::default_for(Role::Developer);

    users.create_account(&user, &profile, &password_hash).await?;

    println!("created developer account");
    println!("user_id={}", user.id());
    println!("username={}", user.username());
    Ok(())
}

fn read_password() -> Result<Zeroizing<String>> {
    let password = env::var(PASSWORD_ENV)
        .map(Zeroizing::new)
        .map_err(|_| eyre!("{PASSWORD_ENV} must be set"))?;
    if password.chars().count() < PASSWORD_MIN {
        return Err(eyre!(
            "{PASSWORD_ENV} must be at least {PASSWORD_MIN} characters"
        ));
    }
    Ok(password)
}

fn resolve_database_url(flag: Option<String>) -> Result<String> {
    match flag {
        Some(url) => Ok(url),
        None => env::var("TRIPTRACK_DATABASE_URL")
            .map_err(|_| eyre!("pass --database-url or set TRIPTRACK_DATABASE_URL")),
    }
}
