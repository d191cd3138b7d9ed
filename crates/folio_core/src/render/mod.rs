//! Static HTML rendering of the portfolio page.
//!
//! # Responsibility
//! - Render the navigation bar and all seven sections from the site data.
//! - Mark reveal targets (`fade-item`) exactly as [`PageLayout`] lays them
//!   out, with their stagger delay inlined.
//!
//! # Invariants
//! - Every section element carries its stable anchor id.
//! - Absent optional fields produce no markup at all.
//! - Without scripting every `fade-item` stays visible (`noscript` style).
//!
//! # See also
//! - `page::PageLayout` for the reveal-target labels.

mod sections;

use crate::model::section::SectionKind;
use crate::nav::NAV_LINKS;
use crate::page::PageLayout;
use crate::reveal::RevealBehavior;
use crate::site::SiteDocument;
use log::debug;
use maud::{html, Markup, PreEscaped, DOCTYPE};

const NOSCRIPT_STYLE: &str = ".fade-item { opacity: 1 !important; transform: none !important; }";

/// Reveal attributes of one element.
pub(crate) struct Mark {
    pub label: String,
    pub slot: u32,
    /// `transition-delay` declaration, only for non-zero delays.
    pub style: Option<String>,
}

/// Resolves reveal attributes from the page layout.
pub(crate) struct RevealMarks<'a> {
    layout: &'a PageLayout,
    behavior: RevealBehavior,
}

impl<'a> RevealMarks<'a> {
    fn new(layout: &'a PageLayout, behavior: RevealBehavior) -> Self {
        Self { layout, behavior }
    }

    pub fn get(&self, section: SectionKind, label: &str) -> Mark {
        let slot = self
            .layout
            .element(section, label)
            .map(|element| element.stagger_slot)
            .unwrap_or_default();
        let delay_ms = self.behavior.delay_for(slot).as_millis();
        Mark {
            label: label.to_string(),
            slot,
            style: (delay_ms > 0).then(|| format!("transition-delay: {delay_ms}ms")),
        }
    }
}

/// Renders the whole page.
pub fn render_page(document: &SiteDocument) -> Markup {
    let data = &document.data;
    let options = &document.options;
    let layout = PageLayout::from_data(data);
    let marks = RevealMarks::new(&layout, options.reveal_behavior());
    let brand = options.brand_for(&data.hero);

    debug!(
        "event=render_page module=render status=ok targets={}",
        layout.target_count()
    );

    html! {
        (DOCTYPE)
        html lang=(options.lang) {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (options.title_for(&data.hero)) }
                @if let Some(description) = &data.hero.description {
                    meta name="description" content=(description);
                }
                noscript { style { (PreEscaped(NOSCRIPT_STYLE)) } }
            }
            body {
                (navigation(&brand))
                main {
                    (sections::hero(&data.hero, &marks))
                    (sections::about(&data.about, &marks))
                    (sections::projects(&data.projects, &marks))
                    (sections::skills(&data.skills, &marks))
                    (sections::diplomas(&data.diplomas, &marks))
                    (sections::contact(&data.contact, &marks))
                }
                (sections::footer(&data.footer, &brand))
                div.toast-stack id="notifications" aria-live="polite" {}
            }
        }
    }
}

/// Renders the page to an HTML string.
pub fn render_to_string(document: &SiteDocument) -> String {
    render_page(document).into_string()
}

fn navigation(brand: &str) -> Markup {
    html! {
        nav.navbar {
            a.brand href={ "#" (SectionKind::Hero.anchor()) } { (brand) }
            ul.nav-links {
                @for link in &NAV_LINKS {
                    li { a href=(link.href()) { (link.label) } }
                }
            }
            button.menu-toggle type="button" aria-label="Abrir menú" aria-expanded="false" {
                span {}
                span {}
                span {}
            }
        }
    }
}
