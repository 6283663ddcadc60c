//! Print output
//!
//! Each document renders to fixed A4 pages. A [`PrintJob`] writes the
//! selected pages into one self-contained HTML file and hands it to the
//! system browser, whose print dialog produces paper or PDF.

pub mod html;
mod quote_page;
mod techpack_pages;

pub use quote_page::render_quote;
pub use techpack_pages::render_techpack;

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::str::FromStr;

use chrono::Local;
use sow_types::{Error, Result};
use tracing::{debug, info};

use crate::constants::print::MAX_DOCUMENT_PAGES;

/// One rendered A4 page
#[derive(Debug, Clone, PartialEq)]
pub struct PrintPage {
    /// Short identifier ("pedido", "costura", "estampa", "corte")
    pub key: &'static str,
    /// Human label used in page pickers
    pub title: &'static str,
    /// Inner HTML of the page
    pub body: String,
}

/// Which pages of a document to print, 1-based
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSet {
    #[default]
    All,
    Only(BTreeSet<usize>),
}

impl PageSet {
    pub fn only(pages: impl IntoIterator<Item = usize>) -> Self {
        PageSet::Only(pages.into_iter().collect())
    }

    pub fn contains(&self, page: usize) -> bool {
        match self {
            PageSet::All => true,
            PageSet::Only(pages) => pages.contains(&page),
        }
    }

    /// Reject pages past the end of a document with `page_count` pages
    pub fn check(&self, page_count: usize) -> Result<()> {
        match self {
            PageSet::Only(pages) => match pages.iter().find(|page| **page > page_count) {
                Some(page) => Err(Error::Validation(format!(
                    "Página {} não existe; o documento tem {} página(s).",
                    page, page_count
                ))),
                None => Ok(()),
            },
            PageSet::All => Ok(()),
        }
    }

    /// Keep the selected pages in document order
    pub fn select(&self, pages: Vec<PrintPage>) -> Vec<PrintPage> {
        pages
            .into_iter()
            .enumerate()
            .filter(|(index, _)| self.contains(index + 1))
            .map(|(_, page)| page)
            .collect()
    }
}

impl FromStr for PageSet {
    type Err = Error;

    /// Accepts `all`, `1,3`, `1-2` and combinations like `1,3-4`.
    /// Page numbers run from 1 to [`MAX_DOCUMENT_PAGES`].
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") || s.eq_ignore_ascii_case("todas") {
            return Ok(PageSet::All);
        }

        let invalid = || Error::Validation(format!("Seleção de páginas inválida: {}", s));
        let parse_page = |text: &str| -> Result<usize> {
            match text.trim().parse::<usize>() {
                Ok(n) if (1..=MAX_DOCUMENT_PAGES).contains(&n) => Ok(n),
                Ok(n) if n > MAX_DOCUMENT_PAGES => Err(Error::Validation(format!(
                    "Página {} não existe; os documentos têm no máximo {} páginas.",
                    n, MAX_DOCUMENT_PAGES
                ))),
                _ => Err(invalid()),
            }
        };

        let mut pages = BTreeSet::new();
        for part in s.split(',') {
            match part.split_once('-') {
                Some((start, end)) => {
                    let (start, end) = (parse_page(start)?, parse_page(end)?);
                    if start > end {
                        return Err(invalid());
                    }
                    pages.extend(start..=end);
                }
                None => {
                    pages.insert(parse_page(part)?);
                }
            }
        }
        Ok(PageSet::Only(pages))
    }
}

impl fmt::Display for PageSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageSet::All => f.write_str("all"),
            PageSet::Only(pages) => {
                let list: Vec<String> = pages.iter().map(|p| p.to_string()).collect();
                f.write_str(&list.join(","))
            }
        }
    }
}

/// Writes print files and optionally opens them
#[derive(Debug, Clone)]
pub struct PrintJob {
    print_dir: PathBuf,
    open: bool,
}

impl PrintJob {
    pub fn new(print_dir: PathBuf) -> Self {
        Self {
            print_dir,
            open: true,
        }
    }

    /// Only write the file
    pub fn without_opening(mut self) -> Self {
        self.open = false;
        self
    }

    /// Render the selected `pages` under `title` and return the written file
    pub fn run(&self, title: &str, pages: Vec<PrintPage>, selection: &PageSet) -> Result<PathBuf> {
        selection.check(pages.len())?;
        let selected = selection.select(pages);
        if selected.is_empty() {
            return Err(Error::Validation("Nenhuma página selecionada para impressão.".to_string()));
        }

        let bodies: Vec<String> = selected.into_iter().map(|page| page.body).collect();
        let content = html::document(title, &bodies);

        std::fs::create_dir_all(&self.print_dir)?;
        let file_name = format!(
            "{}-{}.html",
            slug(title),
            Local::now().format("%Y%m%d-%H%M%S%3f")
        );
        let path = self.print_dir.join(file_name);
        std::fs::write(&path, content)?;
        info!(path = %path.display(), pages = bodies.len(), "print file written");

        if self.open {
            open_in_browser(&path)?;
        }
        Ok(path)
    }
}

/// File-name-safe lowercase ASCII form of `title`
fn slug(title: &str) -> String {
    let mut out = String::new();
    for ch in title.chars() {
        let mapped = match ch {
            'á' | 'à' | 'â' | 'ã' | 'Á' | 'À' | 'Â' | 'Ã' => 'a',
            'é' | 'ê' | 'É' | 'Ê' => 'e',
            'í' | 'Í' => 'i',
            'ó' | 'ô' | 'õ' | 'Ó' | 'Ô' | 'Õ' => 'o',
            'ú' | 'Ú' => 'u',
            'ç' | 'Ç' => 'c',
            c if c.is_ascii_alphanumeric() => c.to_ascii_lowercase(),
            _ => '-',
        };
        if mapped == '-' && (out.is_empty() || out.ends_with('-')) {
            continue;
        }
        out.push(mapped);
    }
    let trimmed = out.trim_end_matches('-');
    if trimmed.is_empty() {
        "documento".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Open `path` with the platform's default handler
pub fn open_in_browser(path: &Path) -> Result<()> {
    let mut command = if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", ""]);
        cmd
    } else if cfg!(target_os = "macos") {
        Command::new("open")
    } else {
        Command::new("xdg-open")
    };
    command.arg(path);

    debug!(?command, "opening print file");
    command
        .spawn()
        .map(|_| ())
        .map_err(|e| Error::Print(format!("não foi possível abrir {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(n: usize) -> Vec<PrintPage> {
        (1..=n)
            .map(|i| PrintPage {
                key: "p",
                title: "Página",
                body: format!("<p>{}</p>", i),
            })
            .collect()
    }

    #[test]
    fn test_parse_page_set() {
        assert_eq!("".parse::<PageSet>().unwrap(), PageSet::All);
        assert_eq!("all".parse::<PageSet>().unwrap(), PageSet::All);
        assert_eq!("1,3".parse::<PageSet>().unwrap(), PageSet::only([1, 3]));
        assert_eq!("1-2".parse::<PageSet>().unwrap(), PageSet::only([1, 2]));
        assert_eq!(" 3 , 1-2 ".parse::<PageSet>().unwrap(), PageSet::only([1, 2, 3]));
        assert!("0".parse::<PageSet>().is_err());
        assert!("3-1".parse::<PageSet>().is_err());
        assert!("1,,2".parse::<PageSet>().is_err());
        assert!("um".parse::<PageSet>().is_err());
    }

    #[test]
    fn test_select_keeps_order() {
        let selected = PageSet::only([3, 1]).select(pages(3));
        let bodies: Vec<_> = selected.iter().map(|p| p.body.as_str()).collect();
        assert_eq!(bodies, ["<p>1</p>", "<p>3</p>"]);
        assert_eq!(PageSet::All.select(pages(3)).len(), 3);
        assert!(PageSet::only([5]).select(pages(3)).is_empty());
    }

    #[test]
    fn test_pages_past_the_end_are_rejected() {
        let err = "1-20000000".parse::<PageSet>().unwrap_err();
        assert!(err.is_validation());
        assert!("4".parse::<PageSet>().unwrap_err().is_validation());
        assert!("2,99999999999".parse::<PageSet>().is_err());
        assert_eq!("1-3".parse::<PageSet>().unwrap(), PageSet::only([1, 2, 3]));

        let selection: PageSet = "2".parse().unwrap();
        assert!(selection.check(3).is_ok());
        assert!(selection.check(1).unwrap_err().is_validation());
        assert!(PageSet::All.check(1).is_ok());

        let job = PrintJob::new(PathBuf::from("unused-print-dir")).without_opening();
        assert!(job.run("Pedido", pages(1), &selection).unwrap_err().is_validation());
    }

    #[test]
    fn test_display() {
        assert_eq!(PageSet::only([1, 3]).to_string(), "1,3");
        assert_eq!(PageSet::All.to_string(), "all");
    }

    #[test]
    fn test_slug() {
        assert_eq!(slug("Orç. 001/2025 - Ana"), "orc-001-2025-ana");
        assert_eq!(slug("Ficha Técnica"), "ficha-tecnica");
        assert_eq!(slug("///"), "documento");
    }
}
