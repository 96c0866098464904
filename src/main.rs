use chess_referee::config::AppConfig;
use chess_referee::console;
use chess_referee::session::SessionRegistry;
use tokio::io::BufReader;

#[tokio::main]
async fn main() {
    // Initialize tracing (structured logging). Logs go to stderr so they
    // never interleave with the console on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chess_referee=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::from_env();
    let registry = SessionRegistry::new(&config);

    tracing::info!("chess-referee v{} starting", env!("CARGO_PKG_VERSION"));

    let handle = registry.create().await;
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();

    if let Err(e) = console::run(&handle, &config, stdin, &mut stdout).await {
        eprintln!("Console error: {e}");
        std::process::exit(1);
    }

    if let Err(e) = registry.finish(handle.game_id()).await {
        tracing::warn!(error = %e, "failed to close game session");
    }
}
