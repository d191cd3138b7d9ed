//! Page section identities and anchors.

use serde::{Deserialize, Serialize};

/// One named region of the portfolio page, in page order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Hero,
    About,
    Projects,
    Skills,
    Diplomas,
    Contact,
    Footer,
}

impl SectionKind {
    /// Every section in render order.
    pub const ALL: [SectionKind; 7] = [
        Self::Hero,
        Self::About,
        Self::Projects,
        Self::Skills,
        Self::Diplomas,
        Self::Contact,
        Self::Footer,
    ];

    /// Stable element id used for intra-page navigation.
    pub fn anchor(self) -> &'static str {
        match self {
            Self::Hero => "inicio",
            Self::About => "sobre-mi",
            Self::Projects => "proyectos",
            Self::Skills => "habilidades",
            Self::Diplomas => "diplomas",
            Self::Contact => "contacto",
            Self::Footer => "footer",
        }
    }

    /// Resolves an anchor id, with or without a leading `#`.
    pub fn from_anchor(value: &str) -> Option<Self> {
        let normalized = value.trim();
        let normalized = normalized.strip_prefix('#').unwrap_or(normalized);
        Self::ALL
            .into_iter()
            .find(|section| section.anchor() == normalized)
    }

    /// Snake-case name used in logs and layout labels.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hero => "hero",
            Self::About => "about",
            Self::Projects => "projects",
            Self::Skills => "skills",
            Self::Diplomas => "diplomas",
            Self::Contact => "contact",
            Self::Footer => "footer",
        }
    }
}
