//! Placefinder demo: one autocomplete round trip from the command line.
//!
//! Reads the API key from PLACEFINDER_API_KEY, searches the first
//! argument, and prints the matches.

use anyhow::Result;
use placefinder::config::Settings;
use placefinder::locales::Language;
use placefinder::network::HttpClient;
use placefinder::providers::RemotePlacesProvider;
use placefinder::request::SearchRequest;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();

    info!("Starting placefinder v{}", placefinder::VERSION);

    let input = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "coffee".to_string());

    let mut settings = Settings::default();
    settings.merge_env();

    let client = HttpClient::with_settings(&settings.outgoing)?;
    let provider = Arc::new(RemotePlacesProvider::new(
        Arc::new(client),
        settings.remote.clone(),
    ));

    let language = settings
        .search
        .default_language
        .as_deref()
        .and_then(Language::from_name)
        .unwrap_or_default();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let err_tx = tx.clone();
    let request = SearchRequest::new(provider, input.clone())
        .with_timeout(settings.search.timeout())
        .with_language(language)
        .on_success(move |matches| {
            let _ = tx.send(Ok(matches));
        })
        .on_failure(move |err| {
            let _ = err_tx.send(Err(err));
        });

    info!("Searching '{}' (language {})", input, language);
    request.execute();

    match rx.recv().await {
        Some(Ok(matches)) => {
            info!("{} matches", matches.len());
            for m in &matches {
                println!("{:<40} {}", m.primary_label(), m.secondary_label());
            }
        }
        Some(Err(err)) => eprintln!("search failed: {err}"),
        None => {}
    }

    Ok(())
}
