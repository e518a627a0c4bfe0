use log::{debug, warn};
use reqwest::Url;
use scraper::Html;

use crate::{
    errors::ScraperErrors,
    fetch::Fetch,
    site::{self, CHAPTER_LINKS},
};

/// Chapter urls linked from the home page, in document order.
pub async fn fetch_chapter_urls<F: Fetch + ?Sized>(
    fetcher: &F,
    home_url: &str,
) -> Result<Vec<String>, ScraperErrors> {
    let html_content = fetcher.text(home_url).await?;
    let urls = parse_chapter_urls(&html_content, home_url)?;
    debug!("found {} chapters on {home_url}", urls.len());

    Ok(urls)
}

pub fn parse_chapter_urls(html_content: &str, home_url: &str) -> Result<Vec<String>, ScraperErrors> {
    let doc = Html::parse_document(html_content);
    let selector = site::selector(CHAPTER_LINKS);
    let base = Url::parse(home_url).ok();

    let urls: Vec<String> = doc
        .select(&selector)
        .enumerate()
        .filter_map(|(i, a)| match a.attr("href") {
            Some(href) => Some(resolve(base.as_ref(), href.trim())),
            None => {
                warn!("chapter link {} on {home_url} has no href", i + 1);
                None
            }
        })
        .collect();

    if urls.is_empty() {
        return Err(ScraperErrors::MissingElement {
            url: home_url.to_string(),
            selector: CHAPTER_LINKS,
        });
    }

    Ok(urls)
}

fn resolve(base: Option<&Url>, href: &str) -> String {
    base.and_then(|base| base.join(href).ok())
        .map(String::from)
        .unwrap_or_else(|| href.to_string())
}
