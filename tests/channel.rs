use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use evchannel::{
    ChannelConfig, Envelope, EventChannel, FailurePolicy, Handle, HandlerError, HandlerFn,
    HandlerRef, Hub, HubConfig, Subscription, SubscriptionToken,
};
use parking_lot::Mutex;

type Calls = Arc<Mutex<Vec<(&'static str, u32, u32)>>>;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Hit {
    attacker: u32,
    damage: u32,
}

fn recorder(calls: &Calls, tag: &'static str) -> HandlerRef<Hit> {
    let calls = Arc::clone(calls);
    HandlerFn::arc(tag, move |hit: &Hit| {
        calls.lock().push((tag, hit.attacker, hit.damage));
        Ok::<_, HandlerError>(())
    })
}

fn tags(calls: &Calls) -> Vec<&'static str> {
    calls.lock().iter().map(|c| c.0).collect()
}

#[test]
fn test_handlers_run_once_each_in_registration_order() {
    let calls: Calls = Arc::default();
    let ch = EventChannel::<Hit>::named("hit");
    ch.subscribe(recorder(&calls, "a"));
    ch.subscribe(recorder(&calls, "b"));

    let report = ch.publish(&Hit { attacker: 7, damage: 12 }).unwrap();

    assert_eq!(report.delivered, 2);
    assert!(report.is_clean());
    assert_eq!(*calls.lock(), vec![("a", 7, 12), ("b", 7, 12)]);
}

#[test]
fn test_unsubscribed_handler_is_not_invoked() {
    let calls: Calls = Arc::default();
    let ch = EventChannel::<Hit>::new();
    let token = ch.subscribe(recorder(&calls, "a"));

    assert!(ch.unsubscribe(token));
    let report = ch.publish(&Hit { attacker: 1, damage: 1 }).unwrap();

    assert_eq!(report.invoked(), 0);
    assert!(calls.lock().is_empty());
}

#[test]
fn test_same_handler_twice_runs_twice() {
    let calls: Calls = Arc::default();
    let ch = EventChannel::<Hit>::new();
    let a = recorder(&calls, "a");
    let t1 = ch.subscribe(Arc::clone(&a));
    let t2 = ch.subscribe(a);

    assert_ne!(t1, t2);
    ch.publish(&Hit { attacker: 2, damage: 3 }).unwrap();
    assert_eq!(tags(&calls), vec!["a", "a"]);

    // removing one registration leaves the other in place
    ch.unsubscribe(t1);
    ch.publish(&Hit { attacker: 2, damage: 3 }).unwrap();
    assert_eq!(tags(&calls), vec!["a", "a", "a"]);
}

#[test]
fn test_publish_with_no_subscribers_is_noop() {
    let ch = EventChannel::<Hit>::with_config(
        ChannelConfig::default().with_failure(FailurePolicy::Propagate),
    );
    let report = ch.publish(&Hit { attacker: 0, damage: 0 }).unwrap();
    assert_eq!(report.invoked(), 0);
    assert_eq!(report.pruned, 0);
}

#[test]
fn test_double_and_unknown_unsubscribe_keep_order() {
    let calls: Calls = Arc::default();
    let ch = EventChannel::<Hit>::new();
    ch.subscribe(recorder(&calls, "a"));
    let b = ch.subscribe(recorder(&calls, "b"));
    ch.subscribe(recorder(&calls, "c"));

    let other = EventChannel::<Hit>::new();
    let foreign: SubscriptionToken = other.subscribe(recorder(&calls, "x"));

    assert!(ch.unsubscribe(b));
    assert!(!ch.unsubscribe(b));
    assert!(!ch.unsubscribe(foreign));

    ch.publish(&Hit { attacker: 1, damage: 1 }).unwrap();
    assert_eq!(tags(&calls), vec!["a", "c"]);
}

#[test]
fn test_scoped_subscription_unsubscribes_on_drop() {
    let calls: Calls = Arc::default();
    let ch = EventChannel::<Hit>::new();
    {
        let guard = ch.subscribe_scoped(recorder(&calls, "scoped"));
        assert!(guard.is_active());
        ch.publish(&Hit { attacker: 1, damage: 1 }).unwrap();
    }
    assert!(ch.is_empty());
    ch.publish(&Hit { attacker: 1, damage: 1 }).unwrap();
    assert_eq!(tags(&calls), vec!["scoped"]);
}

#[test]
fn test_scoped_subscription_cancel_and_detach() {
    let calls: Calls = Arc::default();
    let ch = EventChannel::<Hit>::new();

    let mut cancelled = ch.subscribe_scoped(recorder(&calls, "a"));
    assert!(cancelled.cancel());
    assert!(!cancelled.cancel());
    assert_eq!(cancelled.token(), None);

    let detached = ch.subscribe_scoped(recorder(&calls, "b"));
    let token = detached.detach().unwrap();
    assert!(ch.contains(token));

    drop(cancelled);
    ch.publish(&Hit { attacker: 1, damage: 1 }).unwrap();
    assert_eq!(tags(&calls), vec!["b"]);
}

#[test]
fn test_guard_outliving_channel_is_harmless() {
    let calls: Calls = Arc::default();
    let ch = EventChannel::<Hit>::new();
    let guard = ch.subscribe_scoped(recorder(&calls, "a"));
    drop(ch);
    assert!(!guard.is_active());
    drop(guard);
}

struct Radar {
    seen: AtomicUsize,
}

impl Handle<Hit> for Radar {
    fn on_event(&self, _hit: &Hit) -> Result<(), HandlerError> {
        self.seen.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn name(&self) -> &str {
        "radar"
    }
}

#[test]
fn test_weak_subscription_is_pruned_after_subscriber_drops() {
    let ch = EventChannel::<Hit>::new();
    let radar = Arc::new(Radar {
        seen: AtomicUsize::new(0),
    });
    let token = ch.subscribe_weak(&radar);

    ch.publish(&Hit { attacker: 1, damage: 1 }).unwrap();
    assert_eq!(radar.seen.load(Ordering::SeqCst), 1);
    assert_eq!(Arc::strong_count(&radar), 1);

    drop(radar);
    let report = ch.publish(&Hit { attacker: 1, damage: 1 }).unwrap();

    assert_eq!(report.invoked(), 0);
    assert_eq!(report.pruned, 1);
    assert!(!ch.contains(token));
    assert!(ch.is_empty());
}

#[test]
fn test_prune_without_publish() {
    let ch = EventChannel::<Hit>::new();
    let radar = Arc::new(Radar {
        seen: AtomicUsize::new(0),
    });
    ch.subscribe_weak(&radar);
    assert_eq!(ch.prune(), 0);

    drop(radar);
    assert_eq!(ch.len(), 1);
    assert_eq!(ch.prune(), 1);
    assert!(ch.is_empty());
}

#[test]
fn test_handler_unsubscribing_itself_during_publish() {
    let calls: Calls = Arc::default();
    let ch = EventChannel::<Hit>::new();
    let slot: Arc<Mutex<Option<SubscriptionToken>>> = Arc::default();

    ch.subscribe(recorder(&calls, "a"));
    let token = {
        let ch2 = ch.clone();
        let slot = Arc::clone(&slot);
        let calls = Arc::clone(&calls);
        ch.subscribe_fn("one-shot", move |hit: &Hit| {
            calls.lock().push(("one-shot", hit.attacker, hit.damage));
            if let Some(me) = slot.lock().take() {
                ch2.unsubscribe(me);
            }
            Ok(())
        })
    };
    *slot.lock() = Some(token);
    ch.subscribe(recorder(&calls, "c"));

    ch.publish(&Hit { attacker: 1, damage: 1 }).unwrap();
    ch.publish(&Hit { attacker: 2, damage: 2 }).unwrap();

    assert_eq!(tags(&calls), vec!["a", "one-shot", "c", "a", "c"]);
}

#[test]
fn test_subscribe_during_publish_applies_to_next_publish() {
    let calls: Calls = Arc::default();
    let ch = EventChannel::<Hit>::new();
    {
        let ch2 = ch.clone();
        let calls = Arc::clone(&calls);
        let added = AtomicUsize::new(0);
        ch.subscribe_fn("spawner", move |_: &Hit| {
            if added.fetch_add(1, Ordering::SeqCst) == 0 {
                ch2.subscribe(recorder(&calls, "late"));
            }
            Ok(())
        });
    }

    let first = ch.publish(&Hit { attacker: 1, damage: 1 }).unwrap();
    let second = ch.publish(&Hit { attacker: 1, damage: 1 }).unwrap();

    assert_eq!(first.delivered, 1);
    assert_eq!(second.delivered, 2);
    assert_eq!(tags(&calls), vec!["late"]);
}

#[test]
fn test_reentrant_publish_from_handler() {
    let depth = Arc::new(AtomicUsize::new(0));
    let ch = EventChannel::<u32>::new();
    {
        let ch2 = ch.clone();
        let depth = Arc::clone(&depth);
        ch.subscribe_fn("chain", move |n: &u32| {
            depth.fetch_add(1, Ordering::SeqCst);
            if *n > 0 {
                ch2.publish(&(n - 1)).map_err(|e| HandlerError::fail(e.to_string()))?;
            }
            Ok(())
        });
    }

    ch.publish(&3).unwrap();
    assert_eq!(depth.load(Ordering::SeqCst), 4);
}

#[test]
fn test_propagate_policy_stops_remaining_handlers() {
    let calls: Calls = Arc::default();
    let ch = EventChannel::<Hit>::with_config(
        ChannelConfig::default()
            .with_name("hit")
            .with_failure(FailurePolicy::Propagate),
    );
    ch.subscribe(recorder(&calls, "a"));
    ch.subscribe_fn("guard", |hit: &Hit| {
        if hit.damage > 100 {
            return Err(HandlerError::fail("overkill"));
        }
        Ok(())
    });
    ch.subscribe(recorder(&calls, "c"));

    ch.publish(&Hit { attacker: 1, damage: 5 }).unwrap();
    let err = ch.publish(&Hit { attacker: 1, damage: 500 }).unwrap_err();

    assert_eq!(err.as_label(), "dispatch_aborted");
    assert_eq!(err.cause(), &HandlerError::fail("overkill"));
    assert_eq!(tags(&calls), vec!["a", "c", "a"]);
}

#[test]
fn test_isolate_policy_reports_and_continues() {
    let calls: Calls = Arc::default();
    let ch = EventChannel::<Hit>::named("hit");
    ch.subscribe_fn("flaky", |_: &Hit| Err(HandlerError::fail("nope")));
    ch.subscribe(recorder(&calls, "b"));

    let report = ch.publish(&Hit { attacker: 1, damage: 1 }).unwrap();

    assert!(!report.is_clean());
    assert_eq!(report.failures[0].handler, "flaky");
    assert_eq!(tags(&calls), vec!["b"]);
}

#[test]
fn test_envelope_carries_source_to_every_handler() {
    let seen: Arc<Mutex<Vec<(u32, &'static str)>>> = Arc::default();
    let ch: EventChannel<Envelope<u32, &'static str>> = EventChannel::named("taunt");
    for _ in 0..2 {
        let seen = Arc::clone(&seen);
        ch.subscribe_fn("listener", move |ev| {
            seen.lock().push((ev.source, ev.payload));
            Ok(())
        });
    }

    ch.publish_from(42, "come here").unwrap();

    assert_eq!(*seen.lock(), vec![(42, "come here"), (42, "come here")]);
}

#[test]
fn test_concurrent_publish_and_subscribe() {
    let ch = EventChannel::<u32>::new();
    let total = Arc::new(AtomicUsize::new(0));
    {
        let total = Arc::clone(&total);
        ch.subscribe_fn("sum", move |n: &u32| {
            total.fetch_add(*n as usize, Ordering::SeqCst);
            Ok(())
        });
    }

    let publishers: Vec<_> = (0..4)
        .map(|_| {
            let ch = ch.clone();
            thread::spawn(move || {
                for _ in 0..100 {
                    ch.publish(&1).unwrap();
                }
            })
        })
        .collect();
    let churn = {
        let ch = ch.clone();
        thread::spawn(move || {
            for _ in 0..100 {
                let t = ch.subscribe_fn("noop", |_: &u32| Ok(()));
                ch.unsubscribe(t);
            }
        })
    };

    for p in publishers {
        p.join().unwrap();
    }
    churn.join().unwrap();

    assert_eq!(total.load(Ordering::SeqCst), 400);
    assert_eq!(ch.len(), 1);
}

/// Runs `f` on a worker thread and fails the test if it does not return in time.
fn finishes_in_time<F: FnOnce() + Send + 'static>(f: F) {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        f();
        let _ = tx.send(());
    });
    assert!(
        rx.recv_timeout(Duration::from_secs(3)).is_ok(),
        "operation hung or panicked"
    );
}

/// Handler owning a scoped registration on the channel it is subscribed to.
struct Panel {
    _feed: Subscription<Hit>,
}

impl Handle<Hit> for Panel {
    fn on_event(&self, _hit: &Hit) -> Result<(), HandlerError> {
        Ok(())
    }
}

fn panel_channel(calls: &Calls) -> (EventChannel<Hit>, SubscriptionToken) {
    let ch = EventChannel::<Hit>::new();
    let feed = ch.subscribe_scoped(recorder(calls, "feed"));
    let token = ch.subscribe(Arc::new(Panel { _feed: feed }));
    (ch, token)
}

#[test]
fn test_unsubscribe_drops_handler_that_unsubscribes_a_sibling() {
    finishes_in_time(|| {
        let calls: Calls = Arc::default();
        let (ch, token) = panel_channel(&calls);
        assert_eq!(ch.len(), 2);

        assert!(ch.unsubscribe(token));
        assert!(ch.is_empty(), "panel's guard should remove the feed");
    });
}

#[test]
fn test_clear_drops_handler_that_unsubscribes_a_sibling() {
    finishes_in_time(|| {
        let calls: Calls = Arc::default();
        let (ch, _token) = panel_channel(&calls);

        assert_eq!(ch.clear(), 2);
        assert!(ch.is_empty());
        ch.publish(&Hit { attacker: 1, damage: 1 }).unwrap();
        assert!(calls.lock().is_empty());
    });
}

#[test]
fn test_prune_after_weak_handler_released_its_sibling() {
    finishes_in_time(|| {
        let calls: Calls = Arc::default();
        let ch = EventChannel::<Hit>::new();
        let feed = ch.subscribe_scoped(recorder(&calls, "feed"));
        let panel = Arc::new(Panel { _feed: feed });
        ch.subscribe_weak(&panel);
        drop(panel);

        assert_eq!(ch.prune(), 1);
        assert!(ch.is_empty());
    });
}

/// Handler that asks the hub about its own channel when dropped.
struct Watcher {
    hub: Arc<Hub>,
    saw_detached: Arc<AtomicBool>,
}

impl Handle<Hit> for Watcher {
    fn on_event(&self, _hit: &Hit) -> Result<(), HandlerError> {
        Ok(())
    }
}

impl Drop for Watcher {
    fn drop(&mut self) {
        let detached = !self.hub.contains::<Hit>();
        self.saw_detached.store(detached, Ordering::SeqCst);
    }
}

fn watched_hub() -> (Arc<Hub>, Arc<AtomicBool>) {
    let hub = Arc::new(Hub::new(HubConfig::default()));
    let saw_detached = Arc::new(AtomicBool::new(false));
    hub.channel::<Hit>().subscribe(Arc::new(Watcher {
        hub: Arc::clone(&hub),
        saw_detached: Arc::clone(&saw_detached),
    }));
    (hub, saw_detached)
}

#[test]
fn test_hub_remove_drops_channel_after_releasing_map() {
    finishes_in_time(|| {
        let (hub, saw_detached) = watched_hub();

        assert!(hub.remove::<Hit>());
        assert!(saw_detached.load(Ordering::SeqCst));
    });
}

#[test]
fn test_hub_shutdown_with_handlers_touching_hub_and_siblings() {
    finishes_in_time(|| {
        let (hub, saw_detached) = watched_hub();
        let calls: Calls = Arc::default();
        let ch = hub.channel::<Hit>();
        let feed = ch.subscribe_scoped(recorder(&calls, "feed"));
        ch.subscribe(Arc::new(Panel { _feed: feed }));

        assert_eq!(hub.shutdown(), 1);
        assert!(ch.is_empty());
        assert!(saw_detached.load(Ordering::SeqCst));
    });
}
