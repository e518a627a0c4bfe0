use clap::Parser;
use log::info;
use readberserk_scraper::{Args, HttpFetcher, Settings, run};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::from(Args::parse());
    let fetcher = HttpFetcher::new(&settings.home_url, settings.timeout)?;

    let summary = run(&fetcher, &settings).await.unwrap_or_else(|err| {
        eprintln!("could not list chapters: {err}");
        std::process::exit(1);
    });

    info!(
        "{} chapters converted, {} failed, {} pages missing",
        summary.completed.len(),
        summary.failed.len(),
        summary.missing.len()
    );

    Ok(())
}
