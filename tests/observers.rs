use ferrous_ctor::{
    Component, DiError, Injectable, LoggingObserver, Parameter, RegistryObserver, TypeRegistry,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("ferrous_ctor=trace"))
        .with_test_writer()
        .try_init();
}

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<String>>,
}

impl Recorder {
    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

impl RegistryObserver for Recorder {
    fn registering(&self, type_name: &str) {
        self.push(format!("registering {}", short(type_name)));
    }

    fn registered(&self, type_name: &str, _duration: Duration) {
        self.push(format!("registered {}", short(type_name)));
    }

    fn registration_failed(&self, type_name: &str, error: &DiError) {
        self.push(format!("failed {} ({:?})", short(type_name), error.kind()));
    }

    fn creating(&self, id: &str) {
        self.push(format!("creating {}", short(id)));
    }

    fn created(&self, id: &str, _duration: Duration) {
        self.push(format!("created {}", short(id)));
    }

    fn creation_failed(&self, id: &str, _error: &DiError) {
        self.push(format!("creation failed {}", short(id)));
    }
}

fn short(name: &str) -> &str {
    name.rsplit("::").next().unwrap_or(name)
}

struct Wheel;
struct Bike;
struct Loop;

impl Injectable for Wheel {
    fn component() -> Component {
        Component::builder::<Self>().constructor([], |_| Ok(Wheel)).build()
    }
}

impl Injectable for Bike {
    fn component() -> Component {
        Component::builder::<Self>()
            .constructor([Parameter::of::<Wheel>(), Parameter::of::<Wheel>()], |_| Ok(Bike))
            .build()
    }
}

impl Injectable for Loop {
    fn component() -> Component {
        Component::builder::<Self>()
            .constructor([Parameter::of::<Loop>()], |_| Ok(Loop))
            .build()
    }
}

#[test]
fn test_observer_sees_top_level_calls_only() {
    init_tracing();
    let recorder = Arc::new(Recorder::default());
    let mut registry = TypeRegistry::new();
    registry.add_observer(recorder.clone());

    registry.register::<Bike>().unwrap();
    registry.create_type::<Bike>(&[]).unwrap();

    assert_eq!(
        recorder.events(),
        vec!["registering Bike", "registered Bike", "creating Bike", "created Bike"]
    );
}

#[test]
fn test_observer_sees_failures() {
    init_tracing();
    let recorder = Arc::new(Recorder::default());
    let mut registry = TypeRegistry::new();
    registry.add_observer(recorder.clone());

    assert!(registry.register::<Loop>().is_err());
    assert!(registry.create("Loop", &[]).is_err());

    assert_eq!(
        recorder.events(),
        vec![
            "registering Loop",
            "failed Loop (Registration)",
            "creating Loop",
            "creation failed Loop",
        ]
    );
}

#[test]
fn test_multiple_observers_and_logging() {
    init_tracing();
    let first = Arc::new(Recorder::default());
    let second = Arc::new(Recorder::default());
    let mut registry = TypeRegistry::new();
    registry
        .add_observer(first.clone())
        .add_observer(second.clone())
        .add_observer(Arc::new(LoggingObserver::with_prefix("test")));

    registry.register::<Wheel>().unwrap();
    assert_eq!(first.events(), second.events());
    assert_eq!(first.events().len(), 2);
}

#[test]
fn test_logging_observer_prefix() {
    assert_eq!(LoggingObserver::new().prefix(), "[ferrous-ctor]");
    assert_eq!(LoggingObserver::default().prefix(), "[ferrous-ctor]");
    assert_eq!(LoggingObserver::with_prefix("wiring").prefix(), "wiring");
}
