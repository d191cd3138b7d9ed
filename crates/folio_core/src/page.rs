//! Page layout and mounted page session.
//!
//! # Responsibility
//! - Derive the reveal-target layout of every section from the data.
//! - Mount one reveal controller per section with a shared behavior.
//! - Own the navigation state, the contact form and the notification bus for
//!   the lifetime of the page.
//!
//! # Invariants
//! - Every section uses the same declarative reveal behavior.
//! - The layout lists targets in the order the renderer emits them.
//! - Shutdown tears down every controller before closing the bus.
//!
//! # See also
//! - `render` for the markup that carries these labels.

use crate::contact::{ContactError, ContactForm, SubmitEvent, SubmitOutcome};
use crate::model::portfolio::{Acknowledgment, PortfolioData};
use crate::model::section::SectionKind;
use crate::nav::Navigation;
use crate::notify::{NotificationBus, RemovalHandle};
use crate::reveal::{
    Container, ElementSpec, RevealBehavior, RevealController, RevealTransition, VisibilityEvent,
    VisibilityWatcher,
};
use log::{debug, info};
use std::collections::BTreeMap;

/// Reveal-target layout of the whole page, one container per section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLayout {
    containers: Vec<Container>,
}

impl PageLayout {
    /// Lays out every section of `data`.
    ///
    /// The hero reveals as one block; the footer has no reveal targets.
    pub fn from_data(data: &PortfolioData) -> Self {
        let containers = SectionKind::ALL
            .into_iter()
            .map(|section| Container::new(section, section_elements(section, data)))
            .collect();
        Self { containers }
    }

    pub fn container(&self, section: SectionKind) -> Option<&Container> {
        self.containers
            .iter()
            .find(|container| container.section == section)
    }

    pub fn containers(&self) -> &[Container] {
        &self.containers
    }

    /// Reveal element for `label` in `section`, if laid out.
    pub fn element(&self, section: SectionKind, label: &str) -> Option<&ElementSpec> {
        self.container(section)?
            .reveal_targets()
            .find(|element| element.label == label)
    }

    pub fn target_count(&self) -> usize {
        self.containers
            .iter()
            .map(|container| container.reveal_targets().count())
            .sum()
    }
}

fn section_elements(section: SectionKind, data: &PortfolioData) -> Vec<ElementSpec> {
    match section {
        SectionKind::Hero => vec![ElementSpec::target("hero-content")],
        SectionKind::Footer => Vec::new(),
        SectionKind::About => {
            let mut elements = vec![ElementSpec::target("about-title")];
            if data.about.image.is_some() {
                elements.push(ElementSpec::target("about-image"));
            }
            elements.push(ElementSpec::target("about-story"));
            elements.extend(staggered("about-value", data.about.values.len()));
            elements
        }
        SectionKind::Projects => {
            let mut elements = vec![ElementSpec::target("projects-title")];
            elements.extend(staggered("project", data.projects.len()));
            elements
        }
        SectionKind::Skills => vec![
            ElementSpec::target("skills-title"),
            ElementSpec::target("skills-technical"),
            ElementSpec::target("skills-languages"),
        ],
        SectionKind::Diplomas => {
            let mut elements = vec![ElementSpec::target("diplomas-title")];
            elements.extend(staggered("diploma", data.diplomas.len()));
            elements
        }
        SectionKind::Contact => vec![
            ElementSpec::target("contact-title"),
            ElementSpec::target("contact-info"),
            ElementSpec::target("contact-form"),
        ],
    }
}

fn staggered(prefix: &str, count: usize) -> impl Iterator<Item = ElementSpec> + '_ {
    (0..count).map(move |index| {
        let slot = u32::try_from(index).unwrap_or(u32::MAX);
        ElementSpec::staggered(format!("{prefix}-{index}"), slot)
    })
}

/// Supplies the host visibility primitive for each section.
///
/// Returning `None` means the primitive is unavailable for that section.
pub trait WatcherFactory {
    fn watcher_for(&mut self, section: SectionKind) -> Option<Box<dyn VisibilityWatcher>>;
}

/// Host without any visibility primitive; every section fails open.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableWatchers;

impl WatcherFactory for UnavailableWatchers {
    fn watcher_for(&mut self, _section: SectionKind) -> Option<Box<dyn VisibilityWatcher>> {
        None
    }
}

/// Mounted page: reveal controllers, navigation, contact form and bus.
#[derive(Debug)]
pub struct PageSession {
    controllers: BTreeMap<SectionKind, RevealController>,
    navigation: Navigation,
    contact: ContactForm,
    bus: NotificationBus,
    // Scheduled removals of acknowledgments published by the contact form.
    contact_removals: Vec<RemovalHandle>,
    closed: bool,
}

impl PageSession {
    /// Mounts every section of `layout` with the same `behavior`.
    pub fn mount(
        layout: &PageLayout,
        behavior: RevealBehavior,
        watchers: &mut dyn WatcherFactory,
        bus: NotificationBus,
        acknowledgment: Acknowledgment,
    ) -> Self {
        let controllers = layout
            .containers()
            .iter()
            .map(|container| {
                let watcher = watchers.watcher_for(container.section);
                (
                    container.section,
                    RevealController::mount(container, behavior, watcher),
                )
            })
            .collect::<BTreeMap<_, _>>();

        info!(
            "event=page_mount module=page status=ok sections={} targets={}",
            controllers.len(),
            layout.target_count()
        );

        Self {
            controllers,
            navigation: Navigation::new(),
            contact: ContactForm::new(acknowledgment),
            bus,
            contact_removals: Vec::new(),
            closed: false,
        }
    }

    pub fn controller(&self, section: SectionKind) -> Option<&RevealController> {
        self.controllers.get(&section)
    }

    pub fn controller_mut(&mut self, section: SectionKind) -> Option<&mut RevealController> {
        self.controllers.get_mut(&section)
    }

    /// Routes one host visibility batch to the section's controller.
    ///
    /// Unknown or unmounted sections produce no transitions.
    pub fn dispatch(
        &mut self,
        section: SectionKind,
        events: &[VisibilityEvent],
    ) -> Vec<RevealTransition> {
        self.controllers
            .get_mut(&section)
            .map(|controller| controller.on_visibility_batch(events))
            .unwrap_or_default()
    }

    /// Tears down and drops one section's controller.
    ///
    /// Unmounting the contact section also withdraws the acknowledgments it
    /// published whose removal has not fired yet.
    pub fn unmount(&mut self, section: SectionKind) -> bool {
        let Some(mut controller) = self.controllers.remove(&section) else {
            return false;
        };
        controller.teardown();
        if section == SectionKind::Contact {
            self.withdraw_contact_acknowledgments();
        }
        true
    }

    fn withdraw_contact_acknowledgments(&mut self) {
        let mut withdrawn = 0usize;
        for removal in self.contact_removals.drain(..) {
            if removal.cancel() && self.bus.dismiss(removal.entry()) {
                withdrawn += 1;
            }
        }
        debug!("event=contact_unmount module=page status=ok withdrawn={}", withdrawn);
    }

    pub fn navigation(&self) -> &Navigation {
        &self.navigation
    }

    pub fn navigation_mut(&mut self) -> &mut Navigation {
        &mut self.navigation
    }

    pub fn contact(&self) -> &ContactForm {
        &self.contact
    }

    pub fn contact_mut(&mut self) -> &mut ContactForm {
        &mut self.contact
    }

    pub fn bus(&self) -> &NotificationBus {
        &self.bus
    }

    /// Submits the contact form against the session bus.
    pub fn submit_contact(
        &mut self,
        event: &mut SubmitEvent,
    ) -> Result<SubmitOutcome, ContactError> {
        let outcome = self.contact.submit(event, &self.bus)?;
        if let SubmitOutcome::Sent(receipt) = &outcome {
            self.contact_removals.retain(RemovalHandle::is_pending);
            self.contact_removals.push(receipt.removal.clone());
        }
        Ok(outcome)
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Tears down every controller, then shuts the bus down. Idempotent.
    pub fn shutdown(&mut self) {
        if self.closed {
            return;
        }
        for controller in self.controllers.values_mut() {
            controller.teardown();
        }
        let cancelled = self.bus.shutdown();
        self.closed = true;
        info!(
            "event=page_shutdown module=page status=ok sections={} cancelled_removals={}",
            self.controllers.len(),
            cancelled
        );
    }
}

impl Drop for PageSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::PageLayout;
    use crate::model::portfolio::{
        AboutData, ContactData, DiplomaCard, FooterData, HeroData, PortfolioData, ProjectCard,
        SkillsData,
    };
    use crate::model::section::SectionKind;

    fn project(id: u32) -> ProjectCard {
        ProjectCard {
            id,
            title: format!("Proyecto {id}"),
            category: None,
            description: None,
            technologies: Vec::new(),
            image: None,
            color: None,
        }
    }

    fn data() -> PortfolioData {
        PortfolioData {
            hero: HeroData {
                name: "Ada Lovelace".to_string(),
                title: None,
                subtitle: None,
                description: None,
                cta: None,
                image: None,
                show_stats: false,
                stats: Vec::new(),
            },
            about: AboutData {
                title: "Sobre mí".to_string(),
                description: None,
                story: Vec::new(),
                values: Vec::new(),
                image: None,
            },
            projects: vec![project(1), project(2), project(3)],
            skills: SkillsData::default(),
            diplomas: vec![DiplomaCard {
                id: 1,
                title: "Bachillerato".to_string(),
                institution: None,
                year: None,
                icon: None,
            }],
            contact: ContactData {
                title: "Contacto".to_string(),
                subtitle: None,
                email: None,
                phone: None,
                location: None,
                social: Vec::new(),
                acknowledgment: None,
            },
            footer: FooterData::default(),
        }
    }

    #[test]
    fn hero_reveals_as_one_block_and_footer_has_no_targets() {
        let layout = PageLayout::from_data(&data());
        let hero: Vec<&str> = layout
            .container(SectionKind::Hero)
            .expect("hero laid out")
            .reveal_targets()
            .map(|element| element.label.as_str())
            .collect();
        assert_eq!(hero, vec!["hero-content"]);
        let footer = layout.container(SectionKind::Footer).expect("footer laid out");
        assert_eq!(footer.reveal_targets().count(), 0);
        assert_eq!(layout.containers().len(), 7);
    }

    #[test]
    fn project_cards_are_staggered_by_position() {
        let layout = PageLayout::from_data(&data());
        let slots: Vec<(String, u32)> = layout
            .container(SectionKind::Projects)
            .expect("projects")
            .reveal_targets()
            .map(|element| (element.label.clone(), element.stagger_slot))
            .collect();
        assert_eq!(
            slots,
            vec![
                ("projects-title".to_string(), 0),
                ("project-0".to_string(), 0),
                ("project-1".to_string(), 1),
                ("project-2".to_string(), 2),
            ]
        );
        assert!(layout.element(SectionKind::About, "about-image").is_none());
    }
}
