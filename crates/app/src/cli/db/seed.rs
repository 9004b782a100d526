use clap::Args;
use pickflow_app::{config::AppConfig, domain::users::data::NewUser};

#[derive(Debug, Args)]
pub(crate) struct SeedArgs {
    /// Username of the superadmin to create when none exists yet
    #[arg(long, requires_all = ["superadmin_email", "superadmin_password_hash"])]
    superadmin_username: Option<String>,

    /// Email of the bootstrapped superadmin
    #[arg(long, requires = "superadmin_username")]
    superadmin_email: Option<String>,

    /// Pre-hashed password of the bootstrapped superadmin
    #[arg(long, env = "SUPERADMIN_PASSWORD_HASH", hide_env_values = true)]
    superadmin_password_hash: Option<String>,

    /// Display name of the bootstrapped superadmin; defaults to the username
    #[arg(long)]
    superadmin_full_name: Option<String>,
}

pub(crate) async fn run(args: SeedArgs, config: &AppConfig) -> Result<(), String> {
    let ctx = crate::cli::context(config).await?;

    let inserted = ctx
        .users
        .seed_roles()
        .await
        .map_err(|error| format!("failed to seed roles: {error}"))?;

    println!("roles_inserted: {inserted}");

    let (Some(username), Some(email), Some(password_hash)) = (
        args.superadmin_username,
        args.superadmin_email,
        args.superadmin_password_hash,
    ) else {
        return Ok(());
    };

    if password_hash.trim().is_empty() {
        return Err("superadmin password hash cannot be empty".to_string());
    }

    let superadmin = ctx
        .users
        .bootstrap_superadmin(NewUser {
            full_name: args.superadmin_full_name.unwrap_or_else(|| username.clone()),
            username,
            email,
            password_hash,
            is_active: true,
            initial_role: None,
        })
        .await
        .map_err(|error| format!("failed to bootstrap superadmin: {error}"))?;

    println!("superadmin_uuid: {}", superadmin.uuid);
    println!("superadmin_username: {}", superadmin.username);

    Ok(())
}
