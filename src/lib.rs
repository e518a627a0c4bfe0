pub mod chapters;
pub mod config;
pub mod errors;
pub mod fetch;
pub mod models;
pub mod pages;
pub mod pdf;
pub mod pipeline;
pub mod progress;
pub mod site;
pub mod slug;

pub use config::{Args, Settings};
pub use errors::{ErrorKind, ScraperErrors};
pub use fetch::{Fetch, HttpFetcher};
pub use pipeline::run;
