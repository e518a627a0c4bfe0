use std::{path::PathBuf, time::Duration};

use clap::Parser;

use crate::site::{HOME_URL, SLUG_DISTINGUISHER};

#[derive(Parser, Debug, Clone)]
#[command(about = "Download every chapter of the site as page-ordered and reversed PDFs")]
pub struct Args {
    #[arg(long, default_value = HOME_URL, help = "home page listing the chapters")]
    pub home_url: String,

    #[arg(
        short,
        long,
        default_value = "NO-PNG-CONTENT",
        help = "root for the IMAGES, PDFS and REV_PDFS directories"
    )]
    pub output: PathBuf,

    #[arg(long, default_value = SLUG_DISTINGUISHER, help = "url segment preceding the chapter slug")]
    pub distinguisher: String,

    #[arg(short = 'j', long, default_value_t = 1, help = "image downloads in flight per chapter")]
    pub jobs: usize,

    #[arg(long, default_value_t = 30, help = "per-request timeout in seconds")]
    pub timeout: u64,

    #[arg(long, help = "hide the per-chapter progress bar")]
    pub no_progress: bool,
}

/// Everything a run needs, independent of how it was parsed.
#[derive(Debug, Clone)]
pub struct Settings {
    pub home_url: String,
    pub output_root: PathBuf,
    pub distinguisher: String,
    pub jobs: usize,
    pub timeout: Duration,
    pub show_progress: bool,
}

impl From<Args> for Settings {
    fn from(args: Args) -> Self {
        Self {
            home_url: args.home_url,
            output_root: args.output,
            distinguisher: args.distinguisher,
            jobs: args.jobs.max(1),
            timeout: Duration::from_secs(args.timeout),
            show_progress: !args.no_progress,
        }
    }
}
