//! Run with: cargo run -p shiori-api --example search -- "Yotsuba"
//!
//! Searches MangaDex and prints the first hit with its chapters and stats.
//! Writes the default config file on first run.

use shiori_api::{Config, MangaDexClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("shiori_api=debug")
        .init();

    let query = std::env::args().nth(1).unwrap_or_else(|| "Yotsuba".into());
    let config = Config::load()?;
    let config_path = Config::config_path();
    if !config_path.exists() {
        config.save_to(&config_path)?;
        println!("Wrote default config to {}", config_path.display());
    }
    let client = MangaDexClient::from_config(&config.mangadex)?;
    println!("Searching {} for {query:?}", client.base_url());

    let results = client.search_manga(&query).await;
    if results.is_empty() {
        println!("No results for {query:?}.");
        return Ok(());
    }
    for hit in &results {
        println!("{}  {hit}", hit.id);
    }

    let first = &results[0];
    println!();
    if let Some(stats) = client.get_manga_stats(&first.id).await {
        if let Some(rating) = stats.rating_bayesian() {
            println!("Rating:  {rating:.2}");
        }
        if let Some(follows) = stats.follows() {
            println!("Follows: {follows}");
        }
    }

    let chapters = client.get_chapters(&first.id).await;
    println!("{} English chapters", chapters.len());
    for chapter in chapters.iter().take(5) {
        println!("  {chapter}");
    }

    if let Some(chapter) = chapters.first() {
        let pages = client.get_page_urls(&chapter.id).await;
        println!();
        println!("{} pages in {chapter}", pages.len());
        if let Some(page) = pages.first() {
            println!("  {page}");
        }
    }

    Ok(())
}
