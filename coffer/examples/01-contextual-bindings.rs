use coffer::container::ContainerBuilder;
use coffer::instance::{downcast, service, InstancePtr};
use coffer::introspection::{DescriptorRegistry, ParameterDescriptor, TypeDescriptor};

struct MemoryStore;

struct FileStore;

struct SessionManager {
    store: InstancePtr,
}

struct CacheManager {
    store: InstancePtr,
}

fn store_name(store: &InstancePtr) -> &'static str {
    if downcast::<MemoryStore>(store).is_some() {
        "memory store"
    } else {
        "file store"
    }
}

fn main() {
    let registry = DescriptorRegistry::default()
        .with(TypeDescriptor::interface("Store"))
        .with(
            TypeDescriptor::of::<MemoryStore>("MemoryStore")
                .with_capability("Store")
                .with_constructor(Vec::new(), |_arguments: &[InstancePtr]| {
                    Ok(service(MemoryStore))
                }),
        )
        .with(
            TypeDescriptor::of::<FileStore>("FileStore")
                .with_capability("Store")
                .with_constructor(Vec::new(), |_arguments: &[InstancePtr]| Ok(service(FileStore))),
        )
        .with(
            TypeDescriptor::of::<SessionManager>("SessionManager").with_constructor(
                vec![ParameterDescriptor::service("store", "Store")],
                |arguments: &[InstancePtr]| {
                    Ok(service(SessionManager {
                        store: arguments[0].clone(),
                    }))
                },
            ),
        )
        .with(
            TypeDescriptor::of::<CacheManager>("CacheManager").with_constructor(
                vec![ParameterDescriptor::service("store", "Store")],
                |arguments: &[InstancePtr]| {
                    Ok(service(CacheManager {
                        store: arguments[0].clone(),
                    }))
                },
            ),
        );

    let mut container = ContainerBuilder::new()
        .with_introspector(Box::new(registry))
        .build();

    // note: for the sake of simplicity, errors are unwrapped, rather than
    // gracefully handled
    container.bind("Store", "MemoryStore", false).unwrap();

    // sessions must survive restarts, so only SessionManager gets files
    container
        .when("SessionManager")
        .needs("Store")
        .give("FileStore");

    let sessions =
        downcast::<SessionManager>(&container.make("SessionManager").unwrap()).unwrap();
    println!("SessionManager uses the {}", store_name(&sessions.store));

    let cache = downcast::<CacheManager>(&container.make("CacheManager").unwrap()).unwrap();
    println!("CacheManager uses the {}", store_name(&cache.store));
}
