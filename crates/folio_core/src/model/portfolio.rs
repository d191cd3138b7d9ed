//! Portfolio section records.
//!
//! Wire names follow the camelCase keys of the site data file (`showStats`,
//! `additionalInfo`). Every list defaults to empty and every optional text
//! field defaults to `None`, so partial data files still load.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Title used for the contact acknowledgment when the data file has none.
pub const DEFAULT_ACK_TITLE: &str = "¡Mensaje enviado con éxito!";
/// Description used for the contact acknowledgment when the data file has none.
pub const DEFAULT_ACK_DESCRIPTION: &str =
    "Gracias por contactarme. Te responderé lo antes posible.";

/// Whole percentage in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Percent(u8);

impl Percent {
    pub fn new(value: i64) -> Result<Self, PercentError> {
        u8::try_from(value)
            .ok()
            .filter(|level| *level <= 100)
            .map(Self)
            .ok_or(PercentError(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Percent {
    type Error = PercentError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Percent> for u8 {
    fn from(value: Percent) -> Self {
        value.0
    }
}

impl Display for Percent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Percentage outside `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PercentError(pub i64);

impl Display for PercentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "percentage must be within 0..=100, got {}", self.0)
    }
}

impl Error for PercentError {}

/// Whole static input of the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioData {
    pub hero: HeroData,
    pub about: AboutData,
    #[serde(default)]
    pub projects: Vec<ProjectCard>,
    #[serde(default)]
    pub skills: SkillsData,
    #[serde(default)]
    pub diplomas: Vec<DiplomaCard>,
    pub contact: ContactData,
    #[serde(default)]
    pub footer: FooterData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroData {
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Call-to-action label; the button scrolls to the projects section.
    #[serde(default)]
    pub cta: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    /// Stats render only when this is set and `stats` is non-empty.
    #[serde(default)]
    pub show_stats: bool,
    #[serde(default)]
    pub stats: Vec<HeroStat>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroStat {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AboutData {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub story: Vec<String>,
    #[serde(default)]
    pub values: Vec<ValueCard>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueCard {
    #[serde(default)]
    pub icon: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectCard {
    pub id: u32,
    pub title: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub image: Option<String>,
    /// CSS color used for the card glow.
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillsData {
    #[serde(default)]
    pub technical: Vec<SkillBar>,
    #[serde(default)]
    pub languages: Vec<LanguageBar>,
    #[serde(default)]
    pub additional_info: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillBar {
    pub name: String,
    pub level: Percent,
    #[serde(default)]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageBar {
    pub name: String,
    pub level: Percent,
    #[serde(default)]
    pub flag: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiplomaCard {
    pub id: u32,
    pub title: String,
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactData {
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub social: Vec<SocialLink>,
    #[serde(default)]
    pub acknowledgment: Option<Acknowledgment>,
}

impl ContactData {
    /// Acknowledgment published on submit, falling back to the defaults.
    pub fn acknowledgment_or_default(&self) -> Acknowledgment {
        self.acknowledgment.clone().unwrap_or_default()
    }
}

/// Social profile link. Links with `text` render as labelled buttons, the
/// rest as icon-only links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    pub url: String,
    #[serde(default)]
    pub text: Option<String>,
}

/// Notification shown after a contact submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgment {
    pub title: String,
    pub description: String,
}

impl Default for Acknowledgment {
    fn default() -> Self {
        Self {
            title: DEFAULT_ACK_TITLE.to_string(),
            description: DEFAULT_ACK_DESCRIPTION.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FooterData {
    #[serde(default)]
    pub copyright: Option<String>,
    #[serde(default)]
    pub legal: Vec<LegalLink>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalLink {
    pub text: String,
    pub link: String,
}
