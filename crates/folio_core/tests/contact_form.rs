use folio_core::model::portfolio::{DEFAULT_ACK_DESCRIPTION, DEFAULT_ACK_TITLE};
use folio_core::{
    Acknowledgment, ContactError, ContactField, ContactForm, ManualClock, NotificationBus,
    NotifyError, SubmitEvent, SubmitOutcome,
};
use std::cell::Cell;
use std::rc::Rc;

fn filled_form() -> ContactForm {
    let mut form = ContactForm::new(Acknowledgment::default());
    form.on_field_change(ContactField::Name, "Ada");
    form.on_field_change(ContactField::Email, "ada@example.com");
    form.on_field_change(ContactField::Subject, "Hola");
    form.on_field_change(ContactField::Message, "Quiero colaborar");
    form
}

#[test]
fn submit_publishes_once_and_resets_fields() {
    let clock = ManualClock::new();
    let bus = NotificationBus::with_default_ttl(Rc::new(clock.clone()));
    let calls = Rc::new(Cell::new(0));
    let seen = Rc::clone(&calls);
    let _subscription = bus.subscribe(move || {
        seen.set(seen.get() + 1);
        Ok(())
    });

    let mut form = filled_form();
    let mut event = SubmitEvent::new();
    let outcome = form.submit(&mut event, &bus).unwrap();

    assert!(event.is_default_prevented());
    assert!(matches!(outcome, SubmitOutcome::Sent(_)));
    assert_eq!(calls.get(), 1);
    assert!(form.is_empty());

    let entries = bus.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].title, DEFAULT_ACK_TITLE);
    assert_eq!(entries[0].description, DEFAULT_ACK_DESCRIPTION);

    clock.advance(3_000);
    assert_eq!(bus.poll(), 1);
}

#[test]
fn empty_required_field_blocks_submission() {
    let clock = ManualClock::new();
    let bus = NotificationBus::with_default_ttl(Rc::new(clock));

    let mut form = filled_form();
    form.on_field_change(ContactField::Subject, "");
    let mut event = SubmitEvent::new();
    let outcome = form.submit(&mut event, &bus).unwrap();

    assert!(event.is_default_prevented());
    match outcome {
        SubmitOutcome::Rejected(violations) => {
            assert_eq!(violations.missing, vec![ContactField::Subject]);
            assert!(!violations.invalid_email);
        }
        SubmitOutcome::Sent(_) => panic!("submission should be rejected"),
    }
    assert!(bus.is_empty());
    assert_eq!(form.value(ContactField::Name), "Ada");
}

#[test]
fn malformed_email_blocks_submission() {
    let bus = NotificationBus::with_default_ttl(Rc::new(ManualClock::new()));
    let mut form = filled_form();
    form.on_field_change(ContactField::Email, "ada.example.com");

    let outcome = form.submit(&mut SubmitEvent::new(), &bus).unwrap();
    assert!(matches!(
        outcome,
        SubmitOutcome::Rejected(ref violations) if violations.invalid_email
    ));
    assert!(bus.is_empty());
}

#[test]
fn whitespace_only_email_is_reported_missing() {
    let bus = NotificationBus::with_default_ttl(Rc::new(ManualClock::new()));
    let mut form = filled_form();
    form.on_field_change(ContactField::Email, "   ");

    match form.submit(&mut SubmitEvent::new(), &bus).unwrap() {
        SubmitOutcome::Rejected(violations) => {
            assert_eq!(violations.missing, vec![ContactField::Email]);
            assert!(!violations.invalid_email);
        }
        SubmitOutcome::Sent(_) => panic!("submission should be rejected"),
    }
    assert!(bus.is_empty());
    assert_eq!(form.value(ContactField::Email), "   ");
}

#[test]
fn custom_acknowledgment_is_published() {
    let bus = NotificationBus::with_default_ttl(Rc::new(ManualClock::new()));
    let mut form = ContactForm::new(Acknowledgment {
        title: "Thanks!".to_string(),
        description: "I'll reply soon.".to_string(),
    });
    for field in ContactField::ALL {
        form.on_field_change(field, "x@example.com");
    }

    form.submit(&mut SubmitEvent::new(), &bus).unwrap();
    assert_eq!(bus.entries()[0].title, "Thanks!");
}

#[test]
fn closed_bus_keeps_the_typed_values() {
    let bus = NotificationBus::with_default_ttl(Rc::new(ManualClock::new()));
    bus.shutdown();

    let mut form = filled_form();
    let err = form.submit(&mut SubmitEvent::new(), &bus).unwrap_err();
    assert_eq!(err, ContactError::Notify(NotifyError::Closed));
    assert_eq!(form.value(ContactField::Message), "Quiero colaborar");
}

#[test]
fn named_changes_reject_unknown_controls() {
    let mut form = ContactForm::default();
    form.on_named_change("email", "ada@example.com").unwrap();
    assert_eq!(form.value(ContactField::Email), "ada@example.com");

    let err = form.on_named_change("phone", "600").unwrap_err();
    assert_eq!(err, ContactError::UnknownField("phone".to_string()));
}
