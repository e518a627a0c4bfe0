//! Markup of readberserk.com. Everything here breaks if the site changes.

use scraper::Selector;

pub const HOME_URL: &str = "https://readberserk.com/";
pub const SLUG_DISTINGUISHER: &str = "chapter/";

pub const CHAPTER_LINKS: &str = "a.btn.btn-sm.btn-primary.mr-2";
pub const PAGE_LIST: &str = "div.pages";
pub const PAGE_CONTAINER: &str = "div.img_container";
pub const PAGE_IMAGE: &str = "img.pages__img";

pub(crate) fn selector(css: &'static str) -> Selector {
    Selector::parse(css).unwrap()
}
