//! Site-level options read from the `options` object of the data file.
//!
//! Every key is optional; absent keys fall back to the page defaults
//! (Spanish page, 10% reveal threshold, 100 ms stagger, 3 s notifications).

use crate::model::portfolio::HeroData;
use crate::nav::brand_mark;
use crate::notify::DEFAULT_NOTIFICATION_TTL_MS;
use crate::reveal::{RevealBehavior, Threshold, DEFAULT_STAGGER_MS};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_LANG: &str = "es";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteOptions {
    /// `lang` attribute of the document root.
    pub lang: String,
    /// Document title; derived from the hero when absent.
    pub page_title: Option<String>,
    /// Navigation brand text; the owner's initials when absent.
    pub brand: Option<String>,
    pub reveal_threshold: Threshold,
    pub stagger_ms: u64,
    pub notification_ttl_ms: u64,
}

impl Default for SiteOptions {
    fn default() -> Self {
        Self {
            lang: DEFAULT_LANG.to_string(),
            page_title: None,
            brand: None,
            reveal_threshold: Threshold::default(),
            stagger_ms: DEFAULT_STAGGER_MS,
            notification_ttl_ms: DEFAULT_NOTIFICATION_TTL_MS,
        }
    }
}

impl SiteOptions {
    /// Reveal behavior shared by every section of the page.
    pub fn reveal_behavior(&self) -> RevealBehavior {
        RevealBehavior::new(
            self.reveal_threshold,
            Duration::from_millis(self.stagger_ms),
        )
    }

    /// `page_title`, else `"<name> | <title>"`, else the bare name.
    pub fn title_for(&self, hero: &HeroData) -> String {
        if let Some(title) = non_blank(self.page_title.as_deref()) {
            return title.to_string();
        }
        match non_blank(hero.title.as_deref()) {
            Some(role) => format!("{} | {}", hero.name.trim(), role),
            None => hero.name.trim().to_string(),
        }
    }

    pub fn brand_for(&self, hero: &HeroData) -> String {
        match non_blank(self.brand.as_deref()) {
            Some(brand) => brand.to_string(),
            None => brand_mark(&hero.name),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::SiteOptions;
    use crate::model::portfolio::HeroData;
    use std::time::Duration;

    fn hero(title: Option<&str>) -> HeroData {
        HeroData {
            name: "Ada Lovelace".to_string(),
            title: title.map(str::to_string),
            subtitle: None,
            description: None,
            cta: None,
            image: None,
            show_stats: false,
            stats: Vec::new(),
        }
    }

    #[test]
    fn missing_keys_use_page_defaults() {
        let options: SiteOptions =
            serde_json::from_value(serde_json::json!({ "staggerMs": 50 })).expect("options");
        assert_eq!(options.lang, "es");
        assert_eq!(options.notification_ttl_ms, 3_000);
        let behavior = options.reveal_behavior();
        assert_eq!(behavior.threshold.value(), 0.1);
        assert_eq!(behavior.delay_for(2), Duration::from_millis(100));
    }

    #[test]
    fn invalid_threshold_is_rejected() {
        let err = serde_json::from_value::<SiteOptions>(serde_json::json!({
            "revealThreshold": 1.5
        }))
        .unwrap_err();
        assert!(err.to_string().contains("[0, 1]"), "unexpected error: {err}");
    }

    #[test]
    fn title_and_brand_derive_from_hero() {
        let options = SiteOptions::default();
        assert_eq!(
            options.title_for(&hero(Some("Ingeniera"))),
            "Ada Lovelace | Ingeniera"
        );
        assert_eq!(options.title_for(&hero(Some("  "))), "Ada Lovelace");
        assert_eq!(options.brand_for(&hero(None)), "<AL/>");

        let custom = SiteOptions {
            page_title: Some("Portafolio".to_string()),
            brand: Some("ada.dev".to_string()),
            ..SiteOptions::default()
        };
        assert_eq!(custom.title_for(&hero(None)), "Portafolio");
        assert_eq!(custom.brand_for(&hero(None)), "ada.dev");
    }
}
