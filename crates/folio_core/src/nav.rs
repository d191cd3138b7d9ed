//! Top navigation bar state.
//!
//! # Responsibility
//! - Track the scrolled flag and the mobile menu toggle.
//! - Resolve in-page links into scroll requests.
//!
//! # Invariants
//! - Resolving an unknown anchor leaves the state untouched.
//! - Resolving a known anchor always closes the mobile menu.

use crate::model::section::SectionKind;
use log::debug;

/// Scroll offset past which the bar switches to its compact style.
pub const SCROLLED_OFFSET_PX: f64 = 50.0;

/// One entry of the navigation bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavLink {
    pub label: &'static str,
    pub section: SectionKind,
}

impl NavLink {
    /// `#anchor` link target.
    pub fn href(&self) -> String {
        format!("#{}", self.section.anchor())
    }
}

/// Navigation entries in page order. The footer has no entry.
pub const NAV_LINKS: [NavLink; 6] = [
    NavLink {
        label: "Inicio",
        section: SectionKind::Hero,
    },
    NavLink {
        label: "Sobre mí",
        section: SectionKind::About,
    },
    NavLink {
        label: "Proyectos",
        section: SectionKind::Projects,
    },
    NavLink {
        label: "Habilidades",
        section: SectionKind::Skills,
    },
    NavLink {
        label: "Diplomas",
        section: SectionKind::Diplomas,
    },
    NavLink {
        label: "Contacto",
        section: SectionKind::Contact,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Smooth,
    Instant,
}

/// Vertical alignment of the target after scrolling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBlock {
    Start,
    Center,
    End,
}

/// Host instruction to bring a section into view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollRequest {
    pub section: SectionKind,
    pub anchor: &'static str,
    pub behavior: ScrollBehavior,
    pub block: ScrollBlock,
}

impl ScrollRequest {
    fn smooth_to(section: SectionKind) -> Self {
        Self {
            section,
            anchor: section.anchor(),
            behavior: ScrollBehavior::Smooth,
            block: ScrollBlock::Start,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Navigation {
    scrolled: bool,
    mobile_menu_open: bool,
}

impl Navigation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_scrolled(&self) -> bool {
        self.scrolled
    }

    pub fn is_mobile_menu_open(&self) -> bool {
        self.mobile_menu_open
    }

    /// Updates the scrolled flag from the page offset. Returns the new flag.
    pub fn on_scroll(&mut self, offset_px: f64) -> bool {
        self.scrolled = offset_px > SCROLLED_OFFSET_PX;
        self.scrolled
    }

    /// Flips the mobile menu. Returns whether it is now open.
    pub fn toggle_mobile_menu(&mut self) -> bool {
        self.mobile_menu_open = !self.mobile_menu_open;
        self.mobile_menu_open
    }

    /// Resolves `href` (`#anchor` or `anchor`) into a smooth scroll request.
    pub fn scroll_to(&mut self, href: &str) -> Option<ScrollRequest> {
        let Some(section) = SectionKind::from_anchor(href) else {
            debug!(
                "event=nav_scroll module=nav status=ignored href={}",
                href.trim()
            );
            return None;
        };
        self.mobile_menu_open = false;
        Some(ScrollRequest::smooth_to(section))
    }
}

/// Brand mark shown in the bar, built from the owner's initials: `<AL/>`.
pub fn brand_mark(name: &str) -> String {
    format!("<{}/>", initials(name))
}

/// Uppercased first letter of every word in `name`.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}
