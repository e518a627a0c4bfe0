/// Returns the part of `url` between `distinguisher` and the next `/`.
///
/// `https://readberserk.com/chapter/berserk-chapter-a0/` with `chapter/`
/// yields `berserk-chapter-a0`. Without a following `/` the rest of the url is
/// taken. An absent distinguisher or an empty slug yields `None`.
pub fn chapter_slug<'a>(url: &'a str, distinguisher: &str) -> Option<&'a str> {
    let start = url.find(distinguisher)? + distinguisher.len();
    let rest = &url[start..];
    let slug = match rest.find('/') {
        Some(end) => &rest[..end],
        None => rest,
    };

    (!slug.is_empty()).then_some(slug)
}
