use pickflow_app::{config::AppConfig, database};

pub(crate) async fn run(config: &AppConfig) -> Result<(), String> {
    let pool = database::connect_with_retry(
        &config.database.database_url,
        config.database.db_connect_attempts,
        config.database.connect_interval(),
    )
    .await
    .map_err(|error| format!("failed to connect to database: {error}"))?;

    database::migrate(&pool)
        .await
        .map_err(|error| format!("failed to apply migrations: {error}"))?;

    println!("migrations applied");

    Ok(())
}
