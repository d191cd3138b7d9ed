//! Core logic for the folio portfolio page.
//! This crate owns the page state machines and renders the static page.

pub mod config;
pub mod contact;
pub mod logging;
pub mod model;
pub mod nav;
pub mod notify;
pub mod page;
pub mod render;
pub mod reveal;
pub mod schedule;
pub mod site;

pub use config::SiteOptions;
pub use contact::{
    ConstraintViolations, ContactError, ContactField, ContactForm, SubmitEvent, SubmitOutcome,
};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::portfolio::{Acknowledgment, PortfolioData};
pub use model::section::SectionKind;
pub use nav::{Navigation, ScrollRequest, NAV_LINKS};
pub use notify::{
    ListenerError, ListenerId, NotificationBus, NotificationEntry, NotificationId, NotifyError,
    PublishReceipt, RemovalHandle, Subscription,
};
pub use page::{PageLayout, PageSession, UnavailableWatchers, WatcherFactory};
pub use render::{render_page, render_to_string};
pub use reveal::{
    RevealBehavior, RevealController, RevealError, RevealTargetId, RevealTransition, Threshold,
    VisibilityEvent, VisibilityWatcher, WatchMode,
};
pub use schedule::{Clock, ManualClock, SystemClock};
pub use site::{load_site, parse_site, SiteDocument, SiteError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
