use coffer::container::ContainerBuilder;
use coffer::instance::{downcast, service, InstancePtr, ParameterOverrides};
use coffer::introspection::{DescriptorRegistry, ParameterDescriptor, TypeDescriptor};

// a sink we would like to hide behind the "Sink" abstract
struct ConsoleSink;

impl ConsoleSink {
    fn write(&self, line: &str) {
        println!("{line}");
    }
}

// a consumer with one service dependency and one primitive parameter
struct Reporter {
    sink: InstancePtr,
    prefix: String,
}

impl Reporter {
    fn report(&self, message: &str) {
        let sink = downcast::<ConsoleSink>(&self.sink).expect("console sink");
        sink.write(&format!("{}: {}", self.prefix, message));
    }
}

fn main() {
    // descriptors play the role reflection plays elsewhere: ordered
    // constructor parameters plus a callable instantiating the type
    let registry = DescriptorRegistry::default()
        .with(TypeDescriptor::interface("Sink"))
        .with(
            TypeDescriptor::of::<ConsoleSink>("ConsoleSink")
                .with_capability("Sink")
                .with_constructor(Vec::new(), |_arguments: &[InstancePtr]| {
                    Ok(service(ConsoleSink))
                }),
        )
        .with(
            TypeDescriptor::of::<Reporter>("Reporter").with_constructor(
                vec![
                    ParameterDescriptor::service("sink", "Sink"),
                    ParameterDescriptor::primitive("prefix")
                        .with_default(service("report".to_string())),
                ],
                |arguments: &[InstancePtr]| {
                    Ok(service(Reporter {
                        sink: arguments[0].clone(),
                        prefix: (*downcast::<String>(&arguments[1]).unwrap()).clone(),
                    }))
                },
            ),
        );

    let mut container = ContainerBuilder::new()
        .with_introspector(Box::new(registry))
        .build();

    // note: for the sake of simplicity, errors are unwrapped, rather than
    // gracefully handled
    container.singleton("Sink", "ConsoleSink").unwrap();

    let reporter = downcast::<Reporter>(&container.make("Reporter").unwrap()).unwrap();
    reporter.report("container is up");

    // explicit overrides win over declared defaults
    let overrides: ParameterOverrides = [("prefix".to_string(), service("audit".to_string()))]
        .into_iter()
        .collect();
    let audit = downcast::<Reporter>(&container.make_with("Reporter", overrides).unwrap()).unwrap();
    audit.report("override in effect");
}
