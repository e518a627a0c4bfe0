use std::{path::Path, pin::pin};

use futures::stream::{self, StreamExt};
use log::{debug, info, warn};
use scraper::Html;
use tokio::fs;

use crate::{
    errors::ScraperErrors,
    fetch::Fetch,
    models::{MissingPages, ScrapeReport},
    pdf::jpeg,
    progress::ProgressReporter,
    site::{self, PAGE_CONTAINER, PAGE_IMAGE, PAGE_LIST},
};

/// Strips a `?t=` cache buster and trailing carriage returns. The HTML parser
/// normalizes a bare `\r` to `\n`, so both are trimmed.
pub fn clean_image_url(src: &str) -> &str {
    let url = match src.find("?t=") {
        Some(index) => &src[..index],
        None => src,
    };
    url.trim_end_matches(['\r', '\n'])
}

/// Extension to save a page under, or `None` when the url is not a jpeg.
pub fn jpeg_extension(url: &str) -> Option<&'static str> {
    if url.ends_with(".jpeg") {
        Some("jpeg")
    } else if url.ends_with(".jpg") {
        Some("jpg")
    } else {
        None
    }
}

pub fn page_file_name(slug: &str, index: usize, extension: &str) -> String {
    format!("{slug}-page-{index}.{extension}")
}

/// Image `src` of every page container, in document order. Containers without
/// an image yield `None` so they still count toward the page total.
pub fn parse_image_sources(
    html_content: &str,
    chapter_url: &str,
) -> Result<Vec<Option<String>>, ScraperErrors> {
    let doc = Html::parse_document(html_content);
    let page_list = doc
        .select(&site::selector(PAGE_LIST))
        .next()
        .ok_or_else(|| ScraperErrors::MissingElement {
            url: chapter_url.to_string(),
            selector: PAGE_LIST,
        })?;

    let image_selector = site::selector(PAGE_IMAGE);
    Ok(page_list
        .select(&site::selector(PAGE_CONTAINER))
        .map(|container| {
            container
                .select(&image_selector)
                .next()
                .and_then(|img| img.attr("src"))
                .map(str::to_string)
        })
        .collect())
}

/// Downloads the page images of one chapter into a directory.
pub struct PageScraper<'a, F: Fetch + ?Sized> {
    fetcher: &'a F,
    jobs: usize,
    show_progress: bool,
}

impl<'a, F: Fetch + ?Sized> PageScraper<'a, F> {
    pub fn new(fetcher: &'a F) -> Self {
        Self {
            fetcher,
            jobs: 1,
            show_progress: true,
        }
    }

    /// Number of image requests kept in flight. Files are still written in page order.
    pub fn jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Saves every jpeg page of `chapter_url` as `<dir>/<slug>-page-<n>.<ext>`.
    ///
    /// Pages that are not jpegs, fail to download, or do not decode as jpeg are
    /// recorded in `missing` and do not consume an index. Entries recorded before
    /// an error stay in `missing`.
    pub async fn scrape(
        &self,
        chapter_url: &str,
        dir: &Path,
        slug: &str,
        missing: &mut MissingPages,
    ) -> Result<ScrapeReport, ScraperErrors> {
        let html_content = self.fetcher.text(chapter_url).await?;
        let sources = parse_image_sources(&html_content, chapter_url)?;

        fs::create_dir_all(dir)
            .await
            .map_err(|err| ScraperErrors::io(dir, err))?;

        let mut report = ScrapeReport {
            total: sources.len(),
            ..Default::default()
        };

        let mut accepted = Vec::new();
        for (i, src) in sources.iter().enumerate() {
            let Some(src) = src else {
                warn!("{slug}: page element {} has no image", i + 1);
                continue;
            };
            let url = clean_image_url(src);
            match jpeg_extension(url) {
                Some(extension) => accepted.push((url.to_string(), extension)),
                None => {
                    debug!("{slug}: skipping non-jpeg page {url}");
                    missing.insert(url.to_string(), slug.to_string());
                    report.skipped += 1;
                }
            }
        }

        let progress = ProgressReporter::new(report.total as u64, self.show_progress);
        progress.update(0);

        let downloads = stream::iter(accepted)
            .map(|(url, extension)| async move {
                let result = self.fetcher.bytes(&url).await;
                (url, extension, result)
            })
            .buffered(self.jobs);
        let mut downloads = pin!(downloads);

        while let Some((url, extension, result)) = downloads.next().await {
            let data = match result {
                Ok(data) if jpeg::is_jpeg(&data) => data,
                Ok(_) => {
                    warn!("{slug}: {url} did not return a jpeg");
                    missing.insert(url, slug.to_string());
                    report.skipped += 1;
                    continue;
                }
                Err(err) => {
                    warn!("{slug}: {err}");
                    missing.insert(url, slug.to_string());
                    report.skipped += 1;
                    continue;
                }
            };

            let file_path = dir.join(page_file_name(slug, report.downloaded, extension));
            if let Err(err) = fs::write(&file_path, &data).await {
                progress.finish();
                return Err(ScraperErrors::io(&file_path, err));
            }

            report.downloaded += 1;
            progress.update(report.downloaded as u64);
        }
        progress.finish();

        info!(
            "{slug}: saved {}/{} pages to {}",
            report.downloaded,
            report.total,
            dir.display()
        );
        println!("===============================================");
        println!("All images downloaded successfully.");

        Ok(report)
    }
}
