use std::path::Path;

use log::{error, info};
use tokio::task;

use crate::{
    chapters::fetch_chapter_urls,
    config::Settings,
    errors::ScraperErrors,
    fetch::Fetch,
    models::{Chapter, ChapterPaths, CompletedChapter, FailedChapter, RunSummary},
    pages::PageScraper,
    pdf::{images_to_pdf, reverse_pdf},
    slug::chapter_slug,
};

const RULE: &str = "===============================================";

/// Lists the chapters, then scrapes, assembles and reverses each one in turn.
///
/// Only a failure to list chapters is returned as an error; a failing chapter is
/// recorded in the summary and the run moves on.
pub async fn run<F: Fetch + ?Sized>(
    fetcher: &F,
    settings: &Settings,
) -> Result<RunSummary, ScraperErrors> {
    let chapter_urls = fetch_chapter_urls(fetcher, &settings.home_url).await?;
    info!("{} chapters listed on {}", chapter_urls.len(), settings.home_url);

    let scraper = PageScraper::new(fetcher)
        .jobs(settings.jobs)
        .show_progress(settings.show_progress);

    let mut summary = RunSummary::default();
    for url in chapter_urls {
        let Some(slug) = chapter_slug(&url, &settings.distinguisher) else {
            let err = ScraperErrors::MissingSlug {
                url: url.clone(),
                distinguisher: settings.distinguisher.clone(),
            };
            error!("skipping {url}: {err}");
            summary.failed.push(FailedChapter {
                chapter: url,
                kind: err.kind(),
                message: err.to_string(),
            });
            continue;
        };
        let chapter = Chapter {
            slug: slug.to_string(),
            url: url.clone(),
        };

        println!("CURRENTLY PROCESSING {chapter}");
        println!("{RULE}");

        let paths = ChapterPaths::new(&settings.output_root, &chapter.slug);
        match process_chapter(&scraper, &chapter, &paths, &mut summary).await {
            Ok(pages) => summary.completed.push(CompletedChapter {
                slug: chapter.slug,
                paths,
                pages,
            }),
            Err(err) => {
                error!("{chapter} failed ({} error): {err}", err.kind());
                summary.failed.push(FailedChapter {
                    chapter: chapter.slug,
                    kind: err.kind(),
                    message: err.to_string(),
                });
            }
        }

        println!("{RULE}\n\n\n");
    }

    print_report(&summary);
    Ok(summary)
}

async fn process_chapter<F: Fetch + ?Sized>(
    scraper: &PageScraper<'_, F>,
    chapter: &Chapter,
    paths: &ChapterPaths,
    summary: &mut RunSummary,
) -> Result<usize, ScraperErrors> {
    scraper
        .scrape(&chapter.url, &paths.images, &chapter.slug, &mut summary.missing)
        .await?;

    let (images, pdf) = (paths.images.clone(), paths.pdf.clone());
    let pages = blocking(&paths.pdf, move || images_to_pdf(&images, &pdf)).await?;
    println!("...PDF GENERATED");

    let (pdf, reversed_pdf) = (paths.pdf.clone(), paths.reversed_pdf.clone());
    blocking(&paths.reversed_pdf, move || reverse_pdf(&pdf, &reversed_pdf)).await?;
    println!("...PDF REVERSED");

    Ok(pages)
}

/// Runs file and lopdf work off the async worker threads.
async fn blocking<T, F>(output: &Path, work: F) -> Result<T, ScraperErrors>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, ScraperErrors> + Send + 'static,
{
    task::spawn_blocking(work)
        .await
        .map_err(|source| ScraperErrors::Interrupted {
            path: output.to_path_buf(),
            source,
        })?
}

fn print_report(summary: &RunSummary) {
    println!(
        "ALL CHAPTERS DOWNLOADED! PLEASE NOTE THESE CHAPTERS HAD SOME ERRORS AND SKIPPED SOME PAGES ON THE WEBSITE. PLEASE DOUBLE CHECK THESE CHAPTERS BEFORE READING"
    );
    println!("{:#?}", summary.missing);

    if !summary.failed.is_empty() {
        println!("{RULE}");
        println!("THESE CHAPTERS FAILED AND WERE NOT CONVERTED:");
        for failed in &summary.failed {
            println!("  {} [{}] {}", failed.chapter, failed.kind, failed.message);
        }
    }
}
