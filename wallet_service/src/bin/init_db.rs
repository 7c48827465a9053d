use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;
use wallet_service::config::Settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    let settings = Settings::from_env()?;

    println!("Connecting to wallet_db at {}...", settings.database_url);
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&settings.database_url)
        .await
        .map_err(|e| format!("Failed to connect: {}", e))?;

    println!("Running migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| format!("Migration failed: {}", e))?;

    println!("✅ Wallet DB initialized successfully!");
    Ok(())
}
