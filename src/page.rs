//! Landing page served at `/`.
//!
//! The page is a liquid template read from disk. It is parsed at most once:
//! [`LandingPage::template`] initializes a shared [`OnceCell`], so concurrent
//! first requests wait for a single load and then share the parsed template
//! without further locking. Rendering uses an empty context.
//!
//! [`stock_template`] produces the default `home.html` (a form that builds
//! `/lorem` URLs and previews the result), generated with Maud so the markup
//! is checked at compile time. `lorem-picsum gen-template` prints it.

use maud::{DOCTYPE, Markup, html};
use std::path::{Path, PathBuf};
#[cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;
use tokio::sync::OnceCell;

#[derive(Error, Debug)]
pub enum PageError {
    #[error("Failed to read template {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Template error: {0}")]
    Template(#[from] liquid::Error),
}

/// Lazily parsed landing page template.
pub struct LandingPage {
    path: PathBuf,
    template: OnceCell<liquid::Template>,
    #[cfg(test)]
    loads: AtomicUsize,
}

impl LandingPage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            template: OnceCell::new(),
            #[cfg(test)]
            loads: AtomicUsize::new(0),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The parsed template, loading it on first use.
    ///
    /// A failed load leaves the cell empty; the next caller retries.
    pub async fn template(&self) -> Result<&liquid::Template, PageError> {
        self.template.get_or_try_init(|| self.load()).await
    }

    /// Render the page with an empty context.
    pub async fn render(&self) -> Result<String, PageError> {
        let template = self.template().await?;
        Ok(template.render(&liquid::object!({}))?)
    }

    /// Number of times the template file has been read and parsed.
    #[cfg(test)]
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    async fn load(&self) -> Result<liquid::Template, PageError> {
        #[cfg(test)]
        self.loads.fetch_add(1, Ordering::SeqCst);
        tracing::info!(path = %self.path.display(), "load template");
        let source = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| PageError::Io {
                path: self.path.clone(),
                source,
            })?;
        let parser = liquid::ParserBuilder::with_stdlib().build()?;
        Ok(parser.parse(&source)?)
    }
}

/// The stock landing page, as written to `templates/home.html`.
pub fn stock_template() -> String {
    home_document().into_string()
}

fn home_document() -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { "Lorem Picsum" }
                link rel="stylesheet" href="/assets/style.css";
            }
            body {
                header {
                    h1 { "Lorem Picsum" }
                    p { "Placeholder images on demand." }
                }
                main {
                    (image_form())
                    div #thumb {}
                    (usage())
                }
                script src="/assets/script.js" {}
            }
        }
    }
}

fn image_form() -> Markup {
    html! {
        form #lorem-form {
            label { "Width " input #w type="number" min="1" value="180"; }
            label { "Height " input #h type="number" min="1" value="120"; }
            label {
                "Font size "
                input #fs type="range" min="6" max="96" value="14";
                output #fs-out { "14" }
            }
            label { "Text " input #s type="text" placeholder="Hello"; }
            label { input #p type="checkbox"; " Show WIDTH x HEIGHT" }
            fieldset {
                legend { "Format" }
                label { input type="radio" name="t" value="jpg" checked; " JPEG" }
                label { input type="radio" name="t" value="png"; " PNG" }
                label { input type="radio" name="t" value="gif"; " GIF" }
            }
            button #btn-create type="button" { "Create" }
        }
    }
}

fn usage() -> Markup {
    html! {
        section #usage {
            h2 { "URL parameters" }
            pre { code { "/lorem?w=300&h=200&fs=20&s=Hello&p=1&t=png" } }
            dl {
                dt { code { "w" } ", " code { "h" } }
                dd { "Width and height in pixels (default 180 x 120)." }
                dt { code { "fs" } }
                dd { "Font size (default 14)." }
                dt { code { "s" } }
                dd { "Text to draw." }
                dt { code { "p" } }
                dd { code { "1" } " adds a WIDTH x HEIGHT label." }
                dt { code { "t" } }
                dd { code { "png" } ", " code { "gif" } ", anything else is JPEG." }
            }
        }
    }
}
