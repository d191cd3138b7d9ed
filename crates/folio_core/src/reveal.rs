//! Scroll-triggered, one-way reveal of page elements.
//!
//! # Responsibility
//! - Discover the reveal targets of one section container at mount time.
//! - Mark a target revealed the first time enough of it becomes visible.
//! - Detach from the host visibility primitive on teardown.
//!
//! # Invariants
//! - `revealed` only ever transitions `false -> true`, at most once.
//! - After teardown no event mutates any target.
//! - Without a visibility primitive every target is revealed at mount, so
//!   content is never hidden permanently.
//! - Stagger delays affect presentation only, never the flag.

use crate::model::section::SectionKind;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::time::Duration;

/// Visible fraction required before a target reveals.
pub const DEFAULT_REVEAL_THRESHOLD: f64 = 0.1;
/// Presentation delay added per stagger slot.
pub const DEFAULT_STAGGER_MS: u64 = 100;

/// Fraction of a target's bounding box that must be inside the viewport.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Threshold(f64);

impl Threshold {
    /// Creates a threshold in `[0, 1]`.
    ///
    /// # Errors
    /// - Returns [`RevealError::InvalidThreshold`] for NaN or out-of-range
    ///   values.
    pub fn new(value: f64) -> Result<Self, RevealError> {
        if value.is_nan() || !(0.0..=1.0).contains(&value) {
            return Err(RevealError::InvalidThreshold(value));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Whether a visible `ratio` satisfies this threshold.
    ///
    /// A zero threshold still requires some part of the target to be visible.
    pub fn is_met_by(self, ratio: f64) -> bool {
        if self.0 == 0.0 {
            ratio > 0.0
        } else {
            ratio >= self.0
        }
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self(DEFAULT_REVEAL_THRESHOLD)
    }
}

impl TryFrom<f64> for Threshold {
    type Error = RevealError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Threshold> for f64 {
    fn from(value: Threshold) -> Self {
        value.0
    }
}

/// Declarative reveal behavior attached to a section container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealBehavior {
    pub threshold: Threshold,
    pub stagger: Duration,
}

impl RevealBehavior {
    pub fn new(threshold: Threshold, stagger: Duration) -> Self {
        Self { threshold, stagger }
    }

    /// Presentation delay for one stagger slot.
    pub fn delay_for(&self, stagger_slot: u32) -> Duration {
        self.stagger.saturating_mul(stagger_slot)
    }
}

impl Default for RevealBehavior {
    fn default() -> Self {
        Self {
            threshold: Threshold::default(),
            stagger: Duration::from_millis(DEFAULT_STAGGER_MS),
        }
    }
}

/// Reveal errors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RevealError {
    InvalidThreshold(f64),
}

impl Display for RevealError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidThreshold(value) => {
                write!(f, "reveal threshold must be within [0, 1], got {value}")
            }
        }
    }
}

impl Error for RevealError {}

/// One element laid out inside a section container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementSpec {
    pub label: String,
    /// Marked for reveal (`fade-item` in the rendered page).
    pub reveal: bool,
    /// Position in a staggered list; `0` means no extra delay.
    pub stagger_slot: u32,
}

impl ElementSpec {
    pub fn target(label: impl Into<String>) -> Self {
        Self::staggered(label, 0)
    }

    pub fn staggered(label: impl Into<String>, stagger_slot: u32) -> Self {
        Self {
            label: label.into(),
            reveal: true,
            stagger_slot,
        }
    }

    /// Element that is laid out but never animated.
    pub fn plain(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            reveal: false,
            stagger_slot: 0,
        }
    }
}

/// Section container as laid out at mount time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub section: SectionKind,
    pub elements: Vec<ElementSpec>,
}

impl Container {
    pub fn new(section: SectionKind, elements: Vec<ElementSpec>) -> Self {
        Self { section, elements }
    }

    /// Elements marked for reveal, in document order.
    pub fn reveal_targets(&self) -> impl Iterator<Item = &ElementSpec> {
        self.elements.iter().filter(|element| element.reveal)
    }
}

/// Stable arena index of one reveal target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RevealTargetId(usize);

impl RevealTargetId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Arena record for one reveal target.
#[derive(Debug, Clone, PartialEq)]
pub struct RevealTarget {
    id: RevealTargetId,
    label: String,
    stagger_slot: u32,
    revealed: bool,
    last_ratio: f64,
}

impl RevealTarget {
    pub fn id(&self) -> RevealTargetId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn stagger_slot(&self) -> u32 {
        self.stagger_slot
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Most recent visible ratio reported by the host.
    pub fn last_ratio(&self) -> f64 {
        self.last_ratio
    }
}

/// Owns every reveal target of one mounted container.
#[derive(Debug, Default)]
pub struct RevealArena {
    targets: Vec<RevealTarget>,
}

impl RevealArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, label: impl Into<String>, stagger_slot: u32) -> RevealTargetId {
        let id = RevealTargetId(self.targets.len());
        self.targets.push(RevealTarget {
            id,
            label: label.into(),
            stagger_slot,
            revealed: false,
            last_ratio: 0.0,
        });
        id
    }

    pub fn get(&self, id: RevealTargetId) -> Option<&RevealTarget> {
        self.targets.get(id.0)
    }

    fn get_mut(&mut self, id: RevealTargetId) -> Option<&mut RevealTarget> {
        self.targets.get_mut(id.0)
    }

    pub fn find(&self, label: &str) -> Option<&RevealTarget> {
        self.targets.iter().find(|target| target.label == label)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RevealTarget> {
        self.targets.iter()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Host visibility primitive (an intersection observer in a browser).
///
/// The controller registers target ids; the host reports changes back through
/// [`RevealController::on_visibility`].
pub trait VisibilityWatcher {
    fn observe(&mut self, target: RevealTargetId, threshold: Threshold);
    fn disconnect(&mut self);
}

/// Visibility change reported by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityEvent {
    pub target: RevealTargetId,
    /// Visible fraction of the target's bounding box.
    pub ratio: f64,
}

impl VisibilityEvent {
    pub fn new(target: RevealTargetId, ratio: f64) -> Self {
        Self { target, ratio }
    }
}

/// Visual transition the host should play for a newly revealed target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealTransition {
    pub target: RevealTargetId,
    pub stagger_slot: u32,
    pub delay: Duration,
}

/// Lifecycle state of one controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchMode {
    /// Targets are registered with the host primitive.
    Observing,
    /// No targets; nothing is watched and nothing fires.
    Idle,
    /// No host primitive; every target was revealed at mount.
    FailOpen,
    /// Torn down; events are ignored.
    Detached,
}

/// Reveal-on-visibility behavior bound to one mounted section.
pub struct RevealController {
    section: SectionKind,
    behavior: RevealBehavior,
    arena: RevealArena,
    watcher: Option<Box<dyn VisibilityWatcher>>,
    mode: WatchMode,
    mount_transitions: Vec<RevealTransition>,
}

impl RevealController {
    /// Mounts the behavior on `container`.
    ///
    /// Targets are discovered once; later additions are not watched. Passing
    /// `None` for `watcher` means the host primitive is unavailable and every
    /// target is revealed immediately; those transitions are available from
    /// [`RevealController::take_mount_transitions`].
    pub fn mount(
        container: &Container,
        behavior: RevealBehavior,
        watcher: Option<Box<dyn VisibilityWatcher>>,
    ) -> Self {
        let mut arena = RevealArena::new();
        for element in container.reveal_targets() {
            arena.alloc(element.label.clone(), element.stagger_slot);
        }

        let mut controller = Self {
            section: container.section,
            behavior,
            arena,
            watcher: None,
            mode: WatchMode::Idle,
            mount_transitions: Vec::new(),
        };

        if controller.arena.is_empty() {
            debug!(
                "event=reveal_mount module=reveal status=ok section={} targets=0 mode=idle",
                controller.section.as_str()
            );
            return controller;
        }

        match watcher {
            Some(mut watcher) => {
                for target in controller.arena.iter() {
                    watcher.observe(target.id, behavior.threshold);
                }
                controller.watcher = Some(watcher);
                controller.mode = WatchMode::Observing;
                debug!(
                    "event=reveal_mount module=reveal status=ok section={} targets={} threshold={}",
                    controller.section.as_str(),
                    controller.arena.len(),
                    behavior.threshold.value()
                );
            }
            None => {
                let ids: Vec<RevealTargetId> =
                    controller.arena.iter().map(|target| target.id).collect();
                let transitions: Vec<RevealTransition> = ids
                    .into_iter()
                    .filter_map(|id| controller.reveal(id))
                    .collect();
                controller.mount_transitions = transitions;
                controller.mode = WatchMode::FailOpen;
                warn!(
                    "event=reveal_fail_open module=reveal status=degraded section={} targets={}",
                    controller.section.as_str(),
                    controller.arena.len()
                );
            }
        }
        controller
    }

    /// Applies one visibility change.
    ///
    /// Returns a transition only when the target reveals for the first time.
    /// Events after teardown, for unknown ids, or for revealed targets change
    /// nothing.
    pub fn on_visibility(&mut self, event: VisibilityEvent) -> Option<RevealTransition> {
        if self.mode != WatchMode::Observing {
            return None;
        }
        let ratio = if event.ratio.is_nan() {
            0.0
        } else {
            event.ratio.clamp(0.0, 1.0)
        };
        let threshold = self.behavior.threshold;
        let target = self.arena.get_mut(event.target)?;
        target.last_ratio = ratio;
        if target.revealed || !threshold.is_met_by(ratio) {
            return None;
        }
        self.reveal(event.target)
    }

    /// Applies one host callback batch.
    ///
    /// Transitions are ordered by delay, then by document order, so targets
    /// that become visible together animate in index order.
    pub fn on_visibility_batch(&mut self, events: &[VisibilityEvent]) -> Vec<RevealTransition> {
        let mut transitions: Vec<RevealTransition> = events
            .iter()
            .filter_map(|event| self.on_visibility(*event))
            .collect();
        transitions.sort_by_key(|transition| (transition.delay, transition.target));
        transitions
    }

    /// Stops watching and releases the host primitive. Idempotent.
    pub fn teardown(&mut self) {
        if self.mode == WatchMode::Detached {
            return;
        }
        if let Some(mut watcher) = self.watcher.take() {
            watcher.disconnect();
        }
        self.mode = WatchMode::Detached;
        debug!(
            "event=reveal_teardown module=reveal status=ok section={} revealed={}/{}",
            self.section.as_str(),
            self.revealed_count(),
            self.arena.len()
        );
    }

    /// Transitions produced at mount by the fail-open path.
    pub fn take_mount_transitions(&mut self) -> Vec<RevealTransition> {
        std::mem::take(&mut self.mount_transitions)
    }

    pub fn section(&self) -> SectionKind {
        self.section
    }

    pub fn behavior(&self) -> RevealBehavior {
        self.behavior
    }

    pub fn mode(&self) -> WatchMode {
        self.mode
    }

    pub fn is_detached(&self) -> bool {
        self.mode == WatchMode::Detached
    }

    pub fn targets(&self) -> &RevealArena {
        &self.arena
    }

    pub fn is_revealed(&self, id: RevealTargetId) -> bool {
        self.arena.get(id).is_some_and(RevealTarget::is_revealed)
    }

    pub fn revealed_count(&self) -> usize {
        self.arena.iter().filter(|target| target.revealed).count()
    }

    fn reveal(&mut self, id: RevealTargetId) -> Option<RevealTransition> {
        let behavior = self.behavior;
        let target = self.arena.get_mut(id)?;
        if target.revealed {
            return None;
        }
        target.revealed = true;
        Some(RevealTransition {
            target: id,
            stagger_slot: target.stagger_slot,
            delay: behavior.delay_for(target.stagger_slot),
        })
    }
}

impl Drop for RevealController {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl Debug for RevealController {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevealController")
            .field("section", &self.section)
            .field("behavior", &self.behavior)
            .field("mode", &self.mode)
            .field("targets", &self.arena.len())
            .field("revealed", &self.revealed_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{
        Container, ElementSpec, RevealBehavior, RevealController, RevealError, Threshold,
        VisibilityEvent, WatchMode,
    };
    use crate::model::section::SectionKind;

    #[test]
    fn threshold_rejects_out_of_range_and_nan() {
        assert!(Threshold::new(0.0).is_ok());
        assert!(Threshold::new(1.0).is_ok());
        assert_eq!(
            Threshold::new(1.5).unwrap_err(),
            RevealError::InvalidThreshold(1.5)
        );
        assert!(Threshold::new(f64::NAN).is_err());
    }

    #[test]
    fn zero_threshold_still_requires_visibility() {
        let threshold = Threshold::new(0.0).expect("zero threshold");
        assert!(!threshold.is_met_by(0.0));
        assert!(threshold.is_met_by(0.01));
    }

    #[test]
    fn plain_elements_are_not_targets() {
        let container = Container::new(
            SectionKind::Skills,
            vec![ElementSpec::plain("decoration"), ElementSpec::target("title")],
        );
        let controller = RevealController::mount(&container, RevealBehavior::default(), None);
        assert_eq!(controller.targets().len(), 1);
        assert_eq!(controller.mode(), WatchMode::FailOpen);
    }

    #[test]
    fn nan_ratio_is_treated_as_hidden() {
        let container = Container::new(SectionKind::About, vec![ElementSpec::target("title")]);
        let mut controller = RevealController::mount(
            &container,
            RevealBehavior::default(),
            Some(Box::new(NullWatcher)),
        );
        let id = controller.targets().iter().next().expect("one target").id();
        assert_eq!(controller.on_visibility(VisibilityEvent::new(id, f64::NAN)), None);
        assert!(!controller.is_revealed(id));
    }

    struct NullWatcher;

    impl super::VisibilityWatcher for NullWatcher {
        fn observe(&mut self, _target: super::RevealTargetId, _threshold: Threshold) {}
        fn disconnect(&mut self) {}
    }
}
