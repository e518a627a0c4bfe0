use std::{collections::HashMap, fs, path::Path, time::Duration};

use async_trait::async_trait;
use lopdf::Document;
use readberserk_scraper::{Fetch, ScraperErrors, Settings, run};

const HOME: &str = "https://readberserk.com/";

#[derive(Default)]
struct Site {
    bodies: HashMap<String, Vec<u8>>,
}

impl Site {
    fn serve(&mut self, url: &str, body: impl Into<Vec<u8>>) {
        self.bodies.insert(url.to_string(), body.into());
    }

    fn lookup(&self, url: &str) -> Result<Vec<u8>, ScraperErrors> {
        self.bodies.get(url).cloned().ok_or_else(|| ScraperErrors::BadStatus {
            url: url.to_string(),
            status: 404,
        })
    }
}

#[async_trait]
impl Fetch for Site {
    async fn text(&self, url: &str) -> Result<String, ScraperErrors> {
        Ok(String::from_utf8_lossy(&self.lookup(url)?).into_owned())
    }

    async fn bytes(&self, url: &str) -> Result<Vec<u8>, ScraperErrors> {
        self.lookup(url)
    }
}

/// SOI, SOF0 and EOI: enough for the pdf layer to size a page.
fn jpeg(width: u16, height: u16) -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8, 0xFF, 0xC0, 0x00, 0x11, 0x08];
    data.extend_from_slice(&height.to_be_bytes());
    data.extend_from_slice(&width.to_be_bytes());
    data.push(3);
    for id in 1..=3u8 {
        data.extend_from_slice(&[id, 0x11, 0x00]);
    }
    data.extend_from_slice(&[0xFF, 0xD9]);
    data
}

fn page_widths(path: &Path) -> Vec<i64> {
    let doc = Document::load(path).unwrap();
    doc.get_pages()
        .into_values()
        .map(|id| {
            let media_box = doc
                .get_dictionary(id)
                .unwrap()
                .get(b"MediaBox")
                .unwrap()
                .as_array()
                .unwrap();
            media_box[2].as_i64().unwrap()
        })
        .collect()
}

#[tokio::test]
async fn three_chapters_of_five_pages() {
    let mut site = Site::default();
    let slugs = ["berserk-chapter-a0", "berserk-chapter-1", "berserk-chapter-2"];

    let links: String = slugs
        .iter()
        .map(|slug| {
            format!(r#"<a class="btn btn-sm btn-primary mr-2" href="{HOME}chapter/{slug}/">Read</a>"#)
        })
        .collect();
    site.serve(HOME, format!("<html><body>{links}</body></html>"));

    for (c, slug) in slugs.iter().enumerate() {
        let mut pages = String::new();
        for p in 0..5u16 {
            let url = format!("https://cdn.readberserk.test/{slug}/{p:02}.jpeg");
            pages.push_str(&format!(
                r#"<div class="img_container"><img class="pages__img" src="{url}?t=123"></div>"#
            ));
            site.serve(&url, jpeg(100 * (c as u16 + 1) + p, 400));
        }
        site.serve(
            &format!("{HOME}chapter/{slug}/"),
            format!(r#"<html><body><div class="pages">{pages}</div></body></html>"#),
        );
    }

    let root = tempfile::tempdir().unwrap();
    let settings = Settings {
        home_url: HOME.to_string(),
        output_root: root.path().to_path_buf(),
        distinguisher: "chapter/".to_string(),
        jobs: 1,
        timeout: Duration::from_secs(5),
        show_progress: false,
    };

    let summary = run(&site, &settings).await.unwrap();

    assert_eq!(summary.completed.len(), 3);
    assert!(summary.failed.is_empty());
    assert!(summary.missing.is_empty());

    for (c, slug) in slugs.iter().enumerate() {
        let images = root.path().join("IMAGES").join(slug);
        assert_eq!(fs::read_dir(&images).unwrap().count(), 5);
        assert!(images.join(format!("{slug}-page-4.jpeg")).is_file());

        let base = 100 * (c as i64 + 1);
        let pdf = root.path().join("PDFS").join(format!("{slug}.pdf"));
        let forward = page_widths(&pdf);
        assert_eq!(forward, (0..5).map(|p| base + p).collect::<Vec<_>>());

        let reversed_pdf = root.path().join("REV_PDFS").join(format!("{slug}-reversed.pdf"));
        let reversed = page_widths(&reversed_pdf);
        assert_eq!(reversed.len(), 5);
        assert_eq!(reversed[0], forward[4]);
        assert_eq!(reversed.iter().rev().copied().collect::<Vec<_>>(), forward);
    }
}

#[tokio::test]
async fn missing_pages_are_reported_per_chapter() {
    let mut site = Site::default();
    site.serve(
        HOME,
        format!(
            r#"<a class="btn btn-sm btn-primary mr-2" href="{HOME}chapter/c1/">1</a>
               <a class="btn btn-sm btn-primary mr-2" href="{HOME}chapter/c2/">2</a>"#
        ),
    );
    site.serve(
        &format!("{HOME}chapter/c1/"),
        r#"<div class="pages">
             <div class="img_container"><img class="pages__img" src="https://cdn.test/c1/0.jpg"></div>
             <div class="img_container"><img class="pages__img" src="https://cdn.test/c1/1.png"></div>
             <div class="img_container"><img class="pages__img" src="https://cdn.test/c1/2.jpg"></div>
           </div>"#,
    );
    site.serve(
        &format!("{HOME}chapter/c2/"),
        r#"<div class="pages">
             <div class="img_container"><img class="pages__img" src="https://cdn.test/c2/0.gif"></div>
             <div class="img_container"><img class="pages__img" src="https://cdn.test/c2/1.jpg"></div>
           </div>"#,
    );
    site.serve("https://cdn.test/c1/0.jpg", jpeg(10, 10));
    site.serve("https://cdn.test/c1/2.jpg", jpeg(12, 10));
    site.serve("https://cdn.test/c2/1.jpg", jpeg(21, 10));

    let root = tempfile::tempdir().unwrap();
    let settings = Settings {
        home_url: HOME.to_string(),
        output_root: root.path().to_path_buf(),
        distinguisher: "chapter/".to_string(),
        jobs: 4,
        timeout: Duration::from_secs(5),
        show_progress: false,
    };

    let summary = run(&site, &settings).await.unwrap();

    assert_eq!(summary.completed.len(), 2);
    assert_eq!(summary.missing.len(), 2);
    assert_eq!(summary.missing["https://cdn.test/c1/1.png"], "c1");
    assert_eq!(summary.missing["https://cdn.test/c2/0.gif"], "c2");

    let c1 = root.path().join("IMAGES").join("c1");
    assert!(c1.join("c1-page-1.jpg").is_file());
    assert!(!c1.join("c1-page-2.jpg").exists());
    assert_eq!(page_widths(&root.path().join("PDFS").join("c1.pdf")), vec![10, 12]);
    assert_eq!(
        page_widths(&root.path().join("REV_PDFS").join("c2-reversed.pdf")),
        vec![21]
    );
}
