mod db;
mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "grosz={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let database = db::connection(&settings.server.database).await?;
    let engine = engine::Engine::builder()
        .database(database.clone())
        .build()
        .await?;

    let bind = settings
        .server
        .bind
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let addr = format!("{}:{}", bind, settings.server.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    server::run_with_listener(engine, database.clone(), listener).await?;

    Ok(())
}
