use folio_core::{ListenerError, ManualClock, NotificationBus, NotifyError};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

fn bus_at(clock: &ManualClock) -> NotificationBus {
    NotificationBus::with_default_ttl(Rc::new(clock.clone()))
}

fn counter() -> (Rc<Cell<usize>>, impl Fn() -> Result<(), ListenerError>) {
    let calls = Rc::new(Cell::new(0));
    let seen = Rc::clone(&calls);
    (calls, move || {
        seen.set(seen.get() + 1);
        Ok(())
    })
}

#[test]
fn publish_is_visible_until_ttl_elapses() {
    let clock = ManualClock::starting_at(1_000);
    let bus = bus_at(&clock);

    let receipt = bus.publish("Hola", "Mensaje").unwrap();
    let entries = bus.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id, receipt.id);
    assert_eq!(entries[0].title, "Hola");
    assert_eq!(bus.next_removal_due_ms(), Some(4_000));

    clock.advance(2_999);
    assert_eq!(bus.poll(), 0);
    assert_eq!(bus.len(), 1);

    clock.advance(1);
    assert_eq!(bus.poll(), 1);
    assert!(bus.is_empty());
    assert!(!receipt.removal.is_pending());
}

#[test]
fn two_publishes_expire_independently() {
    let clock = ManualClock::new();
    let bus = bus_at(&clock);

    let first = bus.publish("uno", "").unwrap();
    clock.advance(1_000);
    let second = bus.publish("dos", "").unwrap();
    assert!(first.id < second.id);

    clock.advance(2_000);
    assert_eq!(bus.poll(), 1);
    let remaining: Vec<_> = bus.entries().into_iter().map(|entry| entry.id).collect();
    assert_eq!(remaining, vec![second.id]);

    clock.advance(1_000);
    assert_eq!(bus.poll(), 1);
    assert!(bus.is_empty());
}

#[test]
fn same_millisecond_publishes_get_distinct_ids() {
    let clock = ManualClock::starting_at(42);
    let bus = bus_at(&clock);

    let first = bus.publish("a", "").unwrap();
    let second = bus.publish("b", "").unwrap();
    assert_ne!(first.id, second.id);
    assert_eq!(first.id.issued_at_ms(), second.id.issued_at_ms());
    assert_eq!(bus.len(), 2);
}

#[test]
fn listeners_hear_publish_and_removal() {
    let clock = ManualClock::new();
    let bus = bus_at(&clock);
    let (calls, listener) = counter();
    let _subscription = bus.subscribe(listener);

    bus.publish("a", "").unwrap();
    assert_eq!(calls.get(), 1);

    clock.advance(3_000);
    bus.poll();
    assert_eq!(calls.get(), 2);
}

#[test]
fn unsubscribed_listener_is_never_called() {
    let clock = ManualClock::new();
    let bus = bus_at(&clock);
    let (calls, listener) = counter();

    let subscription = bus.subscribe(listener);
    assert!(subscription.unsubscribe());
    assert!(!subscription.unsubscribe());

    bus.publish("a", "").unwrap();
    clock.advance(3_000);
    bus.poll();
    assert_eq!(calls.get(), 0);
    assert_eq!(bus.listener_count(), 0);
}

#[test]
fn failing_and_panicking_listeners_do_not_stop_fan_out() {
    let clock = ManualClock::new();
    let bus = bus_at(&clock);
    let _failing = bus.subscribe(|| Err(ListenerError::new("render failed")));
    let _panicking = bus.subscribe(|| panic!("listener exploded"));
    let (calls, listener) = counter();
    let _healthy = bus.subscribe(listener);

    bus.publish("a", "").unwrap();
    assert_eq!(calls.get(), 1);
    assert_eq!(bus.len(), 1);
}

#[test]
fn listener_may_unsubscribe_another_during_fan_out() {
    let clock = ManualClock::new();
    let bus = bus_at(&clock);
    let order = Rc::new(RefCell::new(Vec::new()));
    let victim_slot: Rc<RefCell<Option<folio_core::Subscription>>> = Rc::new(RefCell::new(None));

    let first_order = Rc::clone(&order);
    let slot = Rc::clone(&victim_slot);
    let _first = bus.subscribe(move || {
        first_order.borrow_mut().push("first");
        if let Some(victim) = slot.borrow().as_ref() {
            victim.unsubscribe();
        }
        Ok(())
    });
    let victim_order = Rc::clone(&order);
    let victim = bus.subscribe(move || {
        victim_order.borrow_mut().push("victim");
        Ok(())
    });
    *victim_slot.borrow_mut() = Some(victim);

    bus.publish("a", "").unwrap();
    bus.publish("b", "").unwrap();
    assert_eq!(*order.borrow(), vec!["first", "first"]);
}

#[test]
fn listener_may_unsubscribe_itself_and_publish_reentrantly() {
    let clock = ManualClock::new();
    let bus = bus_at(&clock);
    let own: Rc<RefCell<Option<folio_core::Subscription>>> = Rc::new(RefCell::new(None));

    let handle = bus.clone();
    let slot = Rc::clone(&own);
    let subscription = bus.subscribe(move || {
        if let Some(me) = slot.borrow_mut().take() {
            me.unsubscribe();
            handle.publish("eco", "").map_err(|err| ListenerError::new(err.to_string()))?;
        }
        Ok(())
    });
    *own.borrow_mut() = Some(subscription);

    bus.publish("a", "").unwrap();
    assert_eq!(bus.len(), 2);
    assert_eq!(bus.listener_count(), 0);
}

#[test]
fn cancelled_removal_keeps_entry_until_dismissed() {
    let clock = ManualClock::new();
    let bus = bus_at(&clock);
    let receipt = bus.publish("a", "").unwrap();

    assert!(receipt.removal.cancel());
    assert!(!receipt.removal.cancel());
    clock.advance(10_000);
    assert_eq!(bus.poll(), 0);
    assert_eq!(bus.len(), 1);

    assert!(bus.dismiss(receipt.id));
    assert!(!bus.dismiss(receipt.id));
    assert!(bus.is_empty());
}

#[test]
fn dismiss_cancels_the_pending_removal() {
    let clock = ManualClock::new();
    let bus = bus_at(&clock);
    let receipt = bus.publish("a", "").unwrap();

    assert!(bus.dismiss(receipt.id));
    assert_eq!(bus.pending_removals(), 0);
    assert!(!receipt.removal.is_pending());
}

#[test]
fn shutdown_cancels_everything_and_rejects_publish() {
    let clock = ManualClock::new();
    let bus = bus_at(&clock);
    let (calls, listener) = counter();
    let _subscription = bus.subscribe(listener);
    bus.publish("a", "").unwrap();
    bus.publish("b", "").unwrap();

    assert_eq!(bus.shutdown(), 2);
    assert_eq!(bus.shutdown(), 0);
    assert!(bus.is_closed());
    assert_eq!(bus.pending_removals(), 0);
    assert_eq!(bus.listener_count(), 0);
    assert_eq!(bus.publish("c", "").unwrap_err(), NotifyError::Closed);

    clock.advance(5_000);
    assert_eq!(bus.poll(), 0);
    assert_eq!(calls.get(), 2);
}
