use clap::Parser;
use tracing_subscriber::EnvFilter;

use housewhisper::cli::{self, Args};
use housewhisper::config::AppConfig;
use housewhisper::models::Session;
use housewhisper::services::ai::openai::OpenAiProvider;
use housewhisper::services::backend::http::HttpBackend;
use housewhisper::services::conversation::Assistant;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Error: failed to load .env file: {e}");
            std::process::exit(1);
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::from_env().with_args(&args);
    if let Err(e) = config.validate() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    tracing::info!(
        server = %config.server_url,
        model = %config.model,
        "starting chat session"
    );

    let llm = OpenAiProvider::new(
        config.api_key.clone(),
        config.model.clone(),
        config.openai_url.clone(),
    );
    let backend = HttpBackend::new(config.server_url.clone());
    let assistant = Assistant::new(Box::new(llm), Box::new(backend));

    let mut session = Session::new(config.agent_id.clone(), config.client_id.clone());

    let mut stdout = std::io::stdout();
    cli::print_banner(&mut stdout, &session)?;

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    cli::run_chat(&assistant, &mut session, stdin, &mut stdout).await?;

    Ok(())
}
