mod common;

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use hamlet_core::{BotIdentity, GatewayEvent, triggers};
use hamlet_framework::{
    BindingMode, EventArgs, EventBus, EventDispatcher, EventManifest, EventUnit, ManifestDir,
    StaticSource, event_service,
};
use parking_lot::Mutex;

fn ready_event() -> GatewayEvent {
    GatewayEvent::Ready(BotIdentity {
        id: common::BOT_ID,
        tag: "hamlet#0420".into(),
    })
}

fn args() -> EventArgs {
    EventArgs::new(common::app(Default::default()), ready_event())
}

fn counting(name: &str, once: bool, counter: &Arc<AtomicUsize>) -> EventUnit {
    let counter = Arc::clone(counter);
    EventUnit {
        name: Some(name.to_owned()),
        once,
        execute: Some(event_service(move |_| {
            let c = Arc::clone(&counter);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        })),
        ..EventUnit::default()
    }
}

fn recording(name: &str, label: &'static str, log: &Arc<Mutex<Vec<&'static str>>>) -> EventUnit {
    let log = Arc::clone(log);
    EventUnit {
        name: Some(name.to_owned()),
        once: false,
        execute: Some(event_service(move |_| {
            let log = Arc::clone(&log);
            async move {
                log.lock().push(label);
                Ok(())
            }
        })),
        ..EventUnit::default()
    }
}

fn dispatcher() -> EventDispatcher {
    EventDispatcher::new(Arc::new(EventBus::new()))
}

#[tokio::test]
async fn test_unbound_trigger_is_noop() {
    let dispatcher = dispatcher();
    let report = dispatcher.dispatch("nobody-listens", args()).await;
    assert_eq!(report.invoked(), 0);
}

#[tokio::test]
async fn test_repeating_fires_every_time() {
    let counter = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&counter);
    let source = StaticSource::new("test").with("t::tick", move || counting("tick", false, &c));

    let dispatcher = dispatcher();
    dispatcher.register_all(&source).await;
    for _ in 0..3 {
        dispatcher.dispatch("tick", args()).await;
    }
    assert_eq!(counter.load(Ordering::SeqCst), 3);
    assert_eq!(dispatcher.bus().binding_count("tick"), 1);
}

#[tokio::test]
async fn test_once_fires_at_most_once() {
    let counter = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&counter);
    let source = StaticSource::new("test").with("t::boot", move || counting("boot", true, &c));

    let dispatcher = dispatcher();
    dispatcher.register_all(&source).await;
    assert_eq!(dispatcher.bus().binding_count("boot"), 1);

    let first = dispatcher.dispatch("boot", args()).await;
    let second = dispatcher.dispatch("boot", args()).await;
    assert_eq!(first.completed, 1);
    assert_eq!(second.invoked(), 0);
    assert_eq!(counter.load(Ordering::SeqCst), 1);
    assert!(dispatcher.bus().triggers().is_empty());
}

#[tokio::test]
async fn test_once_removed_even_when_handler_fails() {
    let bus = EventBus::new();
    bus.bind(
        "boot",
        hamlet_framework::EventBinding {
            mode: BindingMode::Once,
            handler: event_service(|_| async { Err("boom".into()) }),
            origin: "t::boot".into(),
        },
    );

    let report = bus.dispatch("boot", args()).await;
    assert_eq!(report.failed, 1);
    assert_eq!(bus.binding_count("boot"), 0);
}

#[tokio::test]
async fn test_once_concurrent_dispatch() {
    let counter = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&counter);
    let source = StaticSource::new("test").with("t::boot", move || counting("boot", true, &c));

    let dispatcher = dispatcher();
    dispatcher.register_all(&source).await;

    let (a, b) = tokio::join!(
        dispatcher.dispatch("boot", args()),
        dispatcher.dispatch("boot", args())
    );
    assert_eq!(a.invoked() + b.invoked(), 1);
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_handlers_run_in_registration_order() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let (l1, l2, l3) = (Arc::clone(&log), Arc::clone(&log), Arc::clone(&log));
    let source = StaticSource::new("test")
        .with("t::a", move || recording("go", "a", &l1))
        .with("t::b", move || recording("go", "b", &l2))
        .with("t::c", move || recording("go", "c", &l3));

    let dispatcher = dispatcher();
    dispatcher.register_all(&source).await;
    dispatcher.dispatch("go", args()).await;
    assert_eq!(*log.lock(), ["a", "b", "c"]);
}

#[tokio::test]
async fn test_failing_handler_does_not_stop_others() {
    let counter = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&counter);
    let source = StaticSource::new("test")
        .with("t::bad", || EventUnit {
            name: Some("go".into()),
            execute: Some(event_service(|_| async { Err("bad handler".into()) })),
            ..EventUnit::default()
        })
        .with("t::good", move || counting("go", false, &c));

    let dispatcher = dispatcher();
    dispatcher.register_all(&source).await;
    let report = dispatcher.dispatch("go", args()).await;
    assert_eq!(report.failed, 1);
    assert_eq!(report.completed, 1);
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_invalid_event_plugins_skipped() {
    let counter = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&counter);
    let source = StaticSource::new("test")
        .with("t::nameless", || EventUnit {
            execute: Some(event_service(|_| async { Ok(()) })),
            ..EventUnit::default()
        })
        .with("t::inert", || EventUnit {
            name: Some("go".into()),
            ..EventUnit::default()
        })
        .with("t::ok", move || counting("go", false, &c));

    let dispatcher = dispatcher();
    let report = dispatcher.register_all(&source).await;
    assert_eq!(report.loaded, 1);
    assert_eq!(report.skipped, 2);
    assert_eq!(dispatcher.bus().binding_count("go"), 1);
}

async fn write(dir: &Path, name: &str, body: &str) {
    tokio::fs::write(dir.join(name), body).await.unwrap();
}

#[tokio::test]
async fn test_manifest_events() {
    let tmp = tempfile::tempdir().unwrap();
    write(
        tmp.path(),
        "boot.toml",
        "name = \"ready\"\nonce = true\n[execute]\nlog = \"up\"\n",
    )
    .await;
    write(
        tmp.path(),
        "chatter.toml",
        "name = \"messageCreate\"\n[execute]\nlog = \"seen\"\n",
    )
    .await;
    write(tmp.path(), "broken.toml", "name = \n").await;

    let dispatcher = dispatcher();
    let report = dispatcher
        .register_all(&ManifestDir::<EventManifest>::new(tmp.path()))
        .await;
    assert_eq!(report.loaded, 2);
    assert_eq!(
        dispatcher.bus().triggers(),
        [triggers::MESSAGE_CREATE, triggers::READY]
    );

    dispatcher.dispatch(triggers::READY, args()).await;
    assert_eq!(dispatcher.bus().binding_count(triggers::READY), 0);
}

#[tokio::test]
async fn test_missing_event_directory_binds_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let dispatcher = dispatcher();
    let report = dispatcher
        .register_all(&ManifestDir::<EventManifest>::new(tmp.path().join("nope")))
        .await;
    assert_eq!(report.loaded, 0);
    assert!(dispatcher.bus().triggers().is_empty());
}
