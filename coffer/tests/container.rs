use coffer::binding::Concrete;
use coffer::container::{Container, ContainerBuilder};
use coffer::error::{LookupError, ResolveError};
use coffer::instance::{downcast, service, InstancePtr, ParameterOverrides, ServicePtr};
use coffer::introspection::{DescriptorRegistry, ParameterDescriptor, TypeDescriptor};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

struct MemorySink;

struct NullSink;

struct Dispatcher {
    sink: InstancePtr,
}

struct Notifier {
    sink: InstancePtr,
}

struct ReportGenerator {
    sink: InstancePtr,
    name: String,
}

struct Throttle;

struct Fallback {
    sink: InstancePtr,
}

fn create_registry() -> DescriptorRegistry {
    DescriptorRegistry::default()
        .with(TypeDescriptor::interface("EventSink"))
        .with(
            TypeDescriptor::of::<MemorySink>("MemorySink")
                .with_capability("EventSink")
                .with_constructor(Vec::new(), |_arguments: &[InstancePtr]| {
                    Ok(service(MemorySink))
                }),
        )
        .with(
            TypeDescriptor::of::<NullSink>("NullSink")
                .with_capability("EventSink")
                .with_constructor(Vec::new(), |_arguments: &[InstancePtr]| Ok(service(NullSink))),
        )
        .with(
            TypeDescriptor::of::<Dispatcher>("Dispatcher").with_constructor(
                vec![ParameterDescriptor::service("sink", "EventSink")],
                |arguments: &[InstancePtr]| {
                    Ok(service(Dispatcher {
                        sink: arguments[0].clone(),
                    }))
                },
            ),
        )
        .with(
            TypeDescriptor::of::<Notifier>("Notifier").with_constructor(
                vec![ParameterDescriptor::service("sink", "EventSink")],
                |arguments: &[InstancePtr]| {
                    Ok(service(Notifier {
                        sink: arguments[0].clone(),
                    }))
                },
            ),
        )
        .with(
            TypeDescriptor::of::<ReportGenerator>("ReportGenerator").with_constructor(
                vec![
                    ParameterDescriptor::service("sink", "EventSink"),
                    ParameterDescriptor::primitive("name")
                        .with_default(service("default".to_string())),
                ],
                |arguments: &[InstancePtr]| {
                    let name = downcast::<String>(&arguments[1])
                        .ok_or_else(|| ResolveError::Incompatible("ReportGenerator".to_string()))?;

                    Ok(service(ReportGenerator {
                        sink: arguments[0].clone(),
                        name: (*name).clone(),
                    }))
                },
            ),
        )
        .with(
            TypeDescriptor::of::<Throttle>("Throttle").with_constructor(
                vec![ParameterDescriptor::primitive("rate")],
                |_arguments: &[InstancePtr]| Ok(service(Throttle)),
            ),
        )
        .with(
            TypeDescriptor::of::<Fallback>("Fallback").with_constructor(
                vec![ParameterDescriptor::service("sink", "MissingPort")
                    .with_default(service(NullSink))],
                |arguments: &[InstancePtr]| {
                    Ok(service(Fallback {
                        sink: arguments[0].clone(),
                    }))
                },
            ),
        )
}

fn create_container() -> Container {
    ContainerBuilder::new()
        .with_introspector(Box::new(create_registry()))
        .build()
}

#[test]
fn should_reuse_shared_instances() {
    let mut container = create_container();
    container.singleton("EventSink", "MemorySink").unwrap();

    let first = container.make("EventSink").unwrap();
    let second = container.make("EventSink").unwrap();

    assert!(ServicePtr::ptr_eq(&first, &second));
}

#[test]
fn should_bypass_the_cache_with_overrides() {
    let mut container = create_container();
    container.singleton("EventSink", "MemorySink").unwrap();
    let cached = container.make("EventSink").unwrap();

    let overrides: ParameterOverrides = [("unused".to_string(), service(0_u8))]
        .into_iter()
        .collect();
    let fresh = container.make_with("EventSink", overrides).unwrap();

    assert!(!ServicePtr::ptr_eq(&cached, &fresh));
    assert!(ServicePtr::ptr_eq(
        &cached,
        &container.make("EventSink").unwrap()
    ));
}

#[test]
fn should_treat_aliases_transparently() {
    let mut container = create_container();
    container.singleton("EventSink", "MemorySink").unwrap();
    container.alias("EventSink", "sink");

    let canonical = container.make("EventSink").unwrap();
    let aliased = container.make("sink").unwrap();

    assert!(ServicePtr::ptr_eq(&canonical, &aliased));
    assert!(container.resolved("sink"));
    assert!(container.is_alias("sink"));
    assert_eq!(container.get_alias("sink"), "EventSink");
}

#[test]
#[should_panic(expected = "aliased to itself")]
fn should_reject_self_aliases() {
    let mut container = create_container();
    container.alias("EventSink", "EventSink");
}

#[test]
#[should_panic(expected = "aliased to itself")]
fn should_reject_alias_cycles() {
    let mut container = create_container();
    container.alias("a", "b");
    container.alias("b", "a");
    container.get_alias("a");
}

#[test]
fn should_scope_contextual_overrides_to_the_building_concrete() {
    let mut container = create_container();
    container.bind("EventSink", "MemorySink", false).unwrap();
    container
        .when("Dispatcher")
        .needs("EventSink")
        .give("NullSink");

    let dispatcher = downcast::<Dispatcher>(&container.make("Dispatcher").unwrap()).unwrap();
    assert!(downcast::<NullSink>(&dispatcher.sink).is_some());

    let notifier = downcast::<Notifier>(&container.make("Notifier").unwrap()).unwrap();
    assert!(downcast::<MemorySink>(&notifier.sink).is_some());
}

#[test]
fn should_apply_extenders_in_registration_order() {
    let mut container = create_container();
    container
        .bind(
            "greeting",
            Concrete::factory(|_container: &mut Container, _overrides: &ParameterOverrides| {
                Ok(service("base".to_string()))
            }),
            false,
        )
        .unwrap();

    container
        .extend("greeting", |instance: InstancePtr, _container: &mut Container| {
            service(format!("{}+first", downcast::<String>(&instance).unwrap()))
        })
        .unwrap();
    container
        .extend("greeting", |instance: InstancePtr, _container: &mut Container| {
            service(format!("{}+second", downcast::<String>(&instance).unwrap()))
        })
        .unwrap();

    let value = downcast::<String>(&container.make("greeting").unwrap()).unwrap();
    assert_eq!(*value, "base+first+second");
}

#[test]
fn should_extend_cached_singletons_and_notify() {
    let mut container = create_container();
    container
        .instance("greeting", service("base".to_string()))
        .unwrap();

    let fired = Arc::new(AtomicUsize::new(0));
    let seen = Arc::new(Mutex::new(None::<InstancePtr>));
    let observed_fired = fired.clone();
    let observed_seen = seen.clone();
    container
        .rebinding(
            "greeting",
            move |_container: &mut Container, instance: &InstancePtr| {
                observed_fired.fetch_add(1, Ordering::SeqCst);
                *observed_seen.lock().unwrap() = Some(instance.clone());
            },
        )
        .unwrap();
    assert_eq!(fired.load(Ordering::SeqCst), 0);

    container
        .extend("greeting", |instance: InstancePtr, _container: &mut Container| {
            service(format!("{}+decorated", downcast::<String>(&instance).unwrap()))
        })
        .unwrap();

    assert_eq!(fired.load(Ordering::SeqCst), 1);
    let replaced = container.make("greeting").unwrap();
    assert_eq!(*downcast::<String>(&replaced).unwrap(), "base+decorated");

    let seen = seen.lock().unwrap().clone().unwrap();
    assert_eq!(*downcast::<String>(&seen).unwrap(), "base+decorated");
}

#[test]
fn should_inject_defaults_and_overrides() {
    let mut container = create_container();
    container.bind("EventSink", "MemorySink", false).unwrap();

    let report = downcast::<ReportGenerator>(&container.make("ReportGenerator").unwrap()).unwrap();
    assert_eq!(report.name, "default");
    assert!(downcast::<MemorySink>(&report.sink).is_some());

    let overrides: ParameterOverrides = [("name".to_string(), service("custom".to_string()))]
        .into_iter()
        .collect();
    let report =
        downcast::<ReportGenerator>(&container.make_with("ReportGenerator", overrides).unwrap())
            .unwrap();
    assert_eq!(report.name, "custom");
    assert!(downcast::<MemorySink>(&report.sink).is_some());
}

#[test]
fn should_fail_on_unresolvable_primitives() {
    let mut container = create_container();

    assert_eq!(
        container.make("Throttle").unwrap_err(),
        ResolveError::UnresolvablePrimitive {
            parameter: "rate".to_string(),
            declared_in: "Throttle".to_string(),
        }
    );
}

#[test]
fn should_inject_contextual_primitives() {
    let mut container = create_container();
    container.bind("EventSink", "MemorySink", false).unwrap();
    container
        .when("ReportGenerator")
        .needs("$name")
        .give(service("from-context".to_string()));

    let report = downcast::<ReportGenerator>(&container.make("ReportGenerator").unwrap()).unwrap();
    assert_eq!(report.name, "from-context");

    // a bare name given for a primitive target is injected verbatim
    let mut container = create_container();
    container.bind("EventSink", "MemorySink", false).unwrap();
    container.when("ReportGenerator").needs("$name").give("literal");

    let report = downcast::<ReportGenerator>(&container.make("ReportGenerator").unwrap()).unwrap();
    assert_eq!(report.name, "literal");
}

#[test]
fn should_aggregate_tagged_services() {
    let mut container = create_container();
    container.tag(["MemorySink", "NullSink"], &["sinks"]);

    let sinks = container.tagged("sinks").unwrap();
    assert_eq!(sinks.len(), 2);
    assert!(downcast::<MemorySink>(&sinks[0]).is_some());
    assert!(downcast::<NullSink>(&sinks[1]).is_some());

    // members are resolved fresh on every call
    let again = container.tagged("sinks").unwrap();
    assert!(!ServicePtr::ptr_eq(&sinks[0], &again[0]));

    assert!(container.tagged("unknown").unwrap().is_empty());
}

#[test]
fn should_notify_rebound_callbacks_on_rebinding() {
    let mut container = create_container();
    container.singleton("EventSink", "MemorySink").unwrap();
    container.make("EventSink").unwrap();

    let fired = Arc::new(AtomicUsize::new(0));
    let seen = Arc::new(Mutex::new(None::<InstancePtr>));
    let observed_fired = fired.clone();
    let observed_seen = seen.clone();
    let primed = container
        .rebinding(
            "EventSink",
            move |_container: &mut Container, instance: &InstancePtr| {
                observed_fired.fetch_add(1, Ordering::SeqCst);
                *observed_seen.lock().unwrap() = Some(instance.clone());
            },
        )
        .unwrap();
    assert!(primed.is_some());
    assert_eq!(fired.load(Ordering::SeqCst), 0);

    container.singleton("EventSink", "NullSink").unwrap();

    assert_eq!(fired.load(Ordering::SeqCst), 1);
    let seen = seen.lock().unwrap().clone().unwrap();
    assert!(downcast::<NullSink>(&seen).is_some());
}

#[test]
fn should_notify_rebound_callbacks_on_instance_replacement() {
    let mut container = create_container();
    container.bind("EventSink", "MemorySink", false).unwrap();

    let fired = Arc::new(AtomicUsize::new(0));
    let observed_fired = fired.clone();
    container
        .rebinding(
            "EventSink",
            move |_container: &mut Container, _instance: &InstancePtr| {
                observed_fired.fetch_add(1, Ordering::SeqCst);
            },
        )
        .unwrap();

    container.instance("EventSink", service(NullSink)).unwrap();
    assert_eq!(fired.load(Ordering::SeqCst), 1);
    assert!(downcast::<NullSink>(&container.make("EventSink").unwrap()).is_some());
}

#[test]
fn should_distinguish_missing_entries() {
    let mut container = create_container();

    assert!(matches!(
        container.get("Ghost").unwrap_err(),
        LookupError::EntryNotFound(..)
    ));

    container
        .bind(
            "broken",
            Concrete::factory(|_container: &mut Container, _overrides: &ParameterOverrides| {
                Err(ResolveError::UnknownType("inner".to_string()))
            }),
            false,
        )
        .unwrap();
    assert!(matches!(
        container.get("broken").unwrap_err(),
        LookupError::Resolve(..)
    ));

    // an unbound but describable concrete still resolves
    assert!(container.get("MemorySink").is_ok());
}

#[test]
fn should_report_build_chains_for_uninstantiable_targets() {
    let mut container = create_container();

    let error = container.make("Dispatcher").unwrap_err();
    assert_eq!(
        error,
        ResolveError::NotInstantiable {
            concrete: "EventSink".to_string(),
            build_stack: vec!["Dispatcher".to_string()],
        }
    );
    assert!(error.to_string().contains("while building [Dispatcher]"));
}

#[test]
fn should_fall_back_to_optional_service_defaults() {
    let mut container = create_container();

    let fallback = downcast::<Fallback>(&container.make("Fallback").unwrap()).unwrap();
    assert!(downcast::<NullSink>(&fallback.sink).is_some());
}

#[test]
fn should_fire_before_resolving_on_cache_hits() {
    let mut container = create_container();
    container.singleton("MemorySink", "MemorySink").unwrap();

    let before = Arc::new(AtomicUsize::new(0));
    let resolving = Arc::new(AtomicUsize::new(0));
    let observed_before = before.clone();
    let observed_resolving = resolving.clone();
    container.before_resolving(
        "MemorySink",
        move |_abstract_name: &str, _overrides: &ParameterOverrides, _container: &mut Container| {
            observed_before.fetch_add(1, Ordering::SeqCst);
        },
    );
    container.resolving(
        "MemorySink",
        move |_instance: &InstancePtr, _container: &mut Container| {
            observed_resolving.fetch_add(1, Ordering::SeqCst);
        },
    );

    container.make("MemorySink").unwrap();
    container.make("MemorySink").unwrap();

    assert_eq!(before.load(Ordering::SeqCst), 2);
    assert_eq!(resolving.load(Ordering::SeqCst), 1);
}

#[test]
fn should_order_global_callbacks_before_type_specific_ones() {
    let mut container = create_container();

    let order = Arc::new(Mutex::new(Vec::new()));
    let seen_global = order.clone();
    let seen_typed = order.clone();
    let seen_after = order.clone();
    container.resolving_any(move |_instance: &InstancePtr, _container: &mut Container| {
        seen_global.lock().unwrap().push("global");
    });
    container.resolving(
        "MemorySink",
        move |_instance: &InstancePtr, _container: &mut Container| {
            seen_typed.lock().unwrap().push("typed");
        },
    );
    container.after_resolving(
        "MemorySink",
        move |_instance: &InstancePtr, _container: &mut Container| {
            seen_after.lock().unwrap().push("after");
        },
    );

    container.make("MemorySink").unwrap();

    assert_eq!(*order.lock().unwrap(), vec!["global", "typed", "after"]);
}

#[test]
fn should_preserve_auxiliary_registrations_across_flush() {
    let mut container = create_container();
    container
        .extend("EventSink", |_instance: InstancePtr, _container: &mut Container| {
            service("extended".to_string())
        })
        .unwrap();
    container.tag(["MemorySink"], &["sinks"]);
    container.bind("EventSink", "MemorySink", false).unwrap();
    container.alias("EventSink", "sink");
    container.make("sink").unwrap();

    assert!(container.bound("EventSink"));
    assert!(container.resolved("EventSink"));

    container.flush();

    assert!(!container.bound("EventSink"));
    assert!(!container.resolved("EventSink"));
    assert!(!container.is_alias("sink"));

    // extenders, tags, and contextual bindings survive a flush
    assert!(container.tags().contains_key("sinks"));
    assert_eq!(container.tagged("sinks").unwrap().len(), 1);

    container.bind("EventSink", "MemorySink", false).unwrap();
    let value = container.make("EventSink").unwrap();
    assert_eq!(*downcast::<String>(&value).unwrap(), "extended");
}

#[test]
fn should_skip_existing_bindings_with_bind_if() {
    let mut container = create_container();
    container.bind_if("EventSink", "MemorySink", false).unwrap();
    container.bind_if("EventSink", "NullSink", false).unwrap();

    assert!(downcast::<MemorySink>(&container.make("EventSink").unwrap()).is_some());

    container.singleton_if("EventSink", "NullSink").unwrap();
    assert!(!container.is_shared("EventSink"));
}

#[test]
fn should_resolve_through_factory_handles() {
    let mut container = create_container();

    let handle = container.factory("MemorySink");
    assert_eq!(handle.abstract_name(), "MemorySink");
    assert!(downcast::<MemorySink>(&handle.resolve(&mut container).unwrap()).is_some());
}

#[test]
fn should_inject_tagged_collections() {
    let mut container = create_container();
    container.tag(["MemorySink", "NullSink"], &["sinks"]);
    container
        .when("Dispatcher")
        .needs("EventSink")
        .give_tagged("sinks");

    let dispatcher = downcast::<Dispatcher>(&container.make("Dispatcher").unwrap()).unwrap();
    let sinks = downcast::<Vec<InstancePtr>>(&dispatcher.sink).unwrap();
    assert_eq!(sinks.len(), 2);
}

#[test]
fn should_forget_instances_individually_and_wholesale() {
    let mut container = create_container();
    container.singleton("EventSink", "MemorySink").unwrap();
    let cached = container.make("EventSink").unwrap();

    container.forget_instance("EventSink");
    let rebuilt = container.make("EventSink").unwrap();
    assert!(!ServicePtr::ptr_eq(&cached, &rebuilt));

    container.forget_instances();
    assert!(!ServicePtr::ptr_eq(
        &rebuilt,
        &container.make("EventSink").unwrap()
    ));
}
