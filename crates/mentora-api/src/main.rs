use mentora_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    mentora_api::setup::init_telemetry();

    // Load configuration; a missing required value stops the process here.
    let config = Config::from_env()?;

    // Initialize the application (database, storage, providers, routes)
    let (_state, router) = mentora_api::setup::initialize_app(config.clone()).await?;

    // Start the server
    mentora_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
