/// Registration ordering, resolution, and builder-side validation

use ferrous_component::{
    service_of, ComponentCollection, ComponentDescriptor, DescriptorError, LifecycleHook,
    TypeDeclaration,
};

trait Foo {}
struct FooA;
struct FooB;
struct FooC;

#[test]
fn higher_order_index_registers_first() {
    let foo = service_of::<dyn Foo>();
    let mut components = ComponentCollection::new();
    components
        .add_component::<FooA>(ComponentDescriptor::for_service(foo).with_order_index(5))
        .add_component::<FooB>(ComponentDescriptor::for_service(foo).with_order_index(10));

    let plan = components.build();
    let order: Vec<_> = plan.registrations().iter().map(|r| r.component()).collect();
    assert_eq!(order, vec![service_of::<FooB>(), service_of::<FooA>()]);
    assert_eq!(plan.registrations()[0].sequence(), 0);
    assert_eq!(plan.registrations()[1].sequence(), 1);
}

#[test]
fn keyless_resolve_returns_smallest_order_index() {
    let foo = service_of::<dyn Foo>();
    let mut components = ComponentCollection::new();
    components
        .add_component::<FooA>(ComponentDescriptor::for_service(foo).with_order_index(10))
        .add_component::<FooC>(ComponentDescriptor::for_service(foo).with_order_index(1))
        .add_component::<FooB>(ComponentDescriptor::for_service(foo).with_order_index(5));

    let plan = components.build();
    let resolved = plan.resolve(foo).unwrap();
    assert_eq!(resolved.order_index(), 1);
    assert_eq!(resolved.component(), service_of::<FooC>());

    let all: Vec<_> = plan.resolve_all(foo).iter().map(|r| r.order_index()).collect();
    assert_eq!(all, vec![10, 5, 1]);
}

#[test]
fn equal_order_index_keeps_scan_order() {
    let foo = service_of::<dyn Foo>();
    let mut components = ComponentCollection::new();
    components
        .add_component::<FooB>(ComponentDescriptor::for_service(foo))
        .add_component::<FooA>(ComponentDescriptor::for_service(foo))
        .add_component::<FooC>(ComponentDescriptor::for_service(foo));

    let plan = components.build();
    let order: Vec<_> = plan.registrations().iter().map(|r| r.component()).collect();
    assert_eq!(order, vec![service_of::<FooB>(), service_of::<FooA>(), service_of::<FooC>()]);

    // Last scanned wins a keyless resolve
    assert_eq!(plan.resolve(foo).unwrap().component(), service_of::<FooC>());
}

#[test]
fn negative_order_indices_sort_after_zero() {
    let foo = service_of::<dyn Foo>();
    let mut components = ComponentCollection::new();
    components
        .add_component::<FooA>(ComponentDescriptor::for_service(foo).with_order_index(i32::MIN))
        .add_component::<FooB>(ComponentDescriptor::for_service(foo))
        .add_component::<FooC>(ComponentDescriptor::for_service(foo).with_order_index(i32::MAX));

    let plan = components.build();
    let order: Vec<_> = plan.registrations().iter().map(|r| r.order_index()).collect();
    assert_eq!(order, vec![i32::MAX, 0, i32::MIN]);
    assert_eq!(plan.resolve(foo).unwrap().component(), service_of::<FooA>());
}

#[test]
fn keyed_and_keyless_are_separate_groups() {
    let foo = service_of::<dyn Foo>();
    let mut components = ComponentCollection::new();
    components
        .add_component::<FooA>(ComponentDescriptor::for_keyed_service(foo, "a").with_order_index(1))
        .add_component::<FooB>(ComponentDescriptor::for_service(foo).with_order_index(7));

    let plan = components.build();
    assert_eq!(plan.resolve(foo).unwrap().component(), service_of::<FooB>());
    assert_eq!(plan.resolve_keyed(foo, "a").unwrap().component(), service_of::<FooA>());
    assert!(plan.resolve_keyed(foo, "missing").is_none());
    assert_eq!(plan.resolve_all(foo).len(), 1);
}

#[test]
fn keyed_lookups_outlive_the_key_string() {
    let foo = service_of::<dyn Foo>();
    let mut components = ComponentCollection::new();
    components
        .add_component::<FooA>(ComponentDescriptor::for_keyed_service(foo, "route-1"))
        .add_component::<FooB>(ComponentDescriptor::for_keyed_service(foo, "route-1"))
        .add_component::<FooC>(ComponentDescriptor::for_service(foo));
    let plan = components.build();

    let found = {
        let key = format!("route-{}", 1);
        plan.resolve_keyed(foo, &key)
    };
    assert_eq!(found.unwrap().component(), service_of::<FooB>());

    let candidates: Vec<_> = {
        let key = String::from("route-1");
        plan.candidates(foo, Some(&key)).collect()
    };
    assert_eq!(candidates.len(), 2);

    // An empty key is the keyless registration
    assert_eq!(plan.resolve_keyed(foo, "").unwrap().component(), service_of::<FooC>());
}

#[test]
fn same_class_conflict_orders_and_warns() {
    let foo = service_of::<dyn Foo>();
    let mut components = ComponentCollection::new();
    components.add_components::<FooA>([
        ComponentDescriptor::for_service(foo).with_order_index(5),
        ComponentDescriptor::for_service(foo).with_order_index(10),
    ]);

    let plan = components.build();
    let order: Vec<_> = plan.registrations().iter().map(|r| r.order_index()).collect();
    assert_eq!(order, vec![10, 5]);

    let report = plan.report();
    assert!(report.skipped.is_empty());
    assert_eq!(report.warnings.len(), 1);
    match &report.warnings[0] {
        DescriptorError::ConflictingDescriptors { service, key, order_indices, .. } => {
            assert_eq!(*service, foo);
            assert_eq!(*key, None);
            assert_eq!(order_indices, &vec![10, 5]);
        }
        other => panic!("unexpected warning: {other:?}"),
    }
}

#[test]
fn conflicts_are_reported_in_first_seen_order() {
    let foo = service_of::<dyn Foo>();
    let mut components = ComponentCollection::new();
    components.add_components::<FooA>(
        ["zeta", "alpha", "mid", "zeta", "alpha", "mid", "zeta"]
            .into_iter()
            .enumerate()
            .map(|(i, key)| {
                ComponentDescriptor::for_keyed_service(foo, key).with_order_index(i as i32)
            }),
    );

    let plan = components.build();
    let keys: Vec<_> = plan
        .report()
        .warnings
        .iter()
        .map(|w| match w {
            DescriptorError::ConflictingDescriptors { key, order_indices, .. } => {
                (key.clone().unwrap_or_default(), order_indices.clone())
            }
            other => panic!("unexpected warning: {other:?}"),
        })
        .collect();
    assert_eq!(
        keys,
        vec![
            ("zeta".to_string(), vec![6, 3, 0]),
            ("alpha".to_string(), vec![4, 1]),
            ("mid".to_string(), vec![5, 2]),
        ]
    );
    assert_eq!(plan.resolve_keyed(foo, "zeta").unwrap().order_index(), 0);
}

#[test]
fn same_class_duplicate_with_equal_order_later_wins() {
    let foo = service_of::<dyn Foo>();
    let mut components = ComponentCollection::new();
    components.add_components::<FooA>([
        ComponentDescriptor::for_service(foo).with_init_method(""),
        ComponentDescriptor::for_service(foo).with_auto_activate(true),
    ]);

    let plan = components.build();
    assert!(plan.report().is_clean());
    assert!(plan.resolve(foo).unwrap().auto_activate());
}

#[test]
fn different_classes_same_service_do_not_conflict() {
    let foo = service_of::<dyn Foo>();
    let mut components = ComponentCollection::new();
    components
        .add_component::<FooA>(ComponentDescriptor::for_service(foo).with_order_index(1))
        .add_component::<FooB>(ComponentDescriptor::for_service(foo).with_order_index(2));

    assert!(components.build().report().warnings.is_empty());
}

#[test]
fn abstract_declaration_is_inert() {
    struct AbstractBase;

    let mut components = ComponentCollection::new();
    components
        .declare(TypeDeclaration::abstract_type::<AbstractBase>())
        .add_component::<AbstractBase>(ComponentDescriptor::new().with_order_index(3));

    let plan = components.build();
    assert!(plan.is_empty());
    assert!(plan.report().is_clean());
    assert_eq!(plan.report().inert, vec![service_of::<AbstractBase>()]);
}

#[test]
fn abstract_descriptor_is_inert_even_when_malformed() {
    struct AbstractBase;

    let mut components = ComponentCollection::new();
    components
        .add_component::<AbstractBase>(ComponentDescriptor::new().with_keys(["a", "b"]))
        .declare(TypeDeclaration::abstract_type::<AbstractBase>());

    let plan = components.build();
    assert!(plan.is_empty());
    assert!(plan.report().skipped.is_empty());
}

#[test]
fn descriptors_are_not_inherited() {
    struct Base;
    struct Derived;

    let mut components = ComponentCollection::new();
    components
        .add_component::<Base>(ComponentDescriptor::new())
        .declare(TypeDeclaration::concrete::<Derived>().with_base(service_of::<Base>()));

    let plan = components.build();
    assert!(plan.registrations_of(service_of::<Derived>()).is_empty());
    assert_eq!(plan.registrations_of(service_of::<Base>()).len(), 1);
    assert!(plan.resolve(service_of::<Derived>()).is_none());
}

#[test]
fn descriptors_do_not_propagate_through_traits() {
    trait Capability {}
    struct Implementor;
    impl Capability for Implementor {}

    let mut components = ComponentCollection::new();
    components.add_component::<dyn Capability>(ComponentDescriptor::new());
    components.declare(TypeDeclaration::concrete::<Implementor>());

    let plan = components.build();
    assert!(plan.registrations_of(service_of::<Implementor>()).is_empty());
}

#[test]
fn invalid_descriptor_is_skipped_without_aborting() {
    let foo = service_of::<dyn Foo>();
    let mut components = ComponentCollection::new();
    components
        .add_component::<FooA>(
            ComponentDescriptor::keyed("x").with_services([foo, service_of::<FooA>()]),
        )
        .add_component::<FooA>(ComponentDescriptor::for_service(foo))
        .add_component::<FooB>(ComponentDescriptor::for_service(foo));

    let plan = components.build();
    assert_eq!(plan.len(), 2);
    assert_eq!(plan.report().skipped.len(), 1);
    assert!(plan.report().skipped[0].is_invalid_shape());
    assert_eq!(plan.report().for_component(service_of::<FooA>()).count(), 1);
    assert_eq!(plan.report().for_component(service_of::<FooB>()).count(), 0);
}

#[test]
fn missing_lifecycle_methods_are_reported() {
    struct Connection;

    let mut components = ComponentCollection::new();
    components
        .declare(TypeDeclaration::concrete::<Connection>().with_methods(["open"]))
        .add_component::<Connection>(
            ComponentDescriptor::keyed("ok").with_init_method("open"),
        )
        .add_component::<Connection>(
            ComponentDescriptor::keyed("bad")
                .with_init_method("open")
                .with_destroy_method("close"),
        );

    let plan = components.build();
    assert_eq!(plan.len(), 1);
    assert!(plan.resolve_keyed(service_of::<Connection>(), "ok").is_some());

    match &plan.report().skipped[..] {
        [DescriptorError::MissingLifecycleMethod { hook, method, .. }] => {
            assert_eq!(*hook, LifecycleHook::Destroy);
            assert_eq!(method, "close");
        }
        other => panic!("unexpected report: {other:?}"),
    }
}

#[test]
fn undeclared_types_have_no_methods() {
    struct Worker;

    let mut components = ComponentCollection::new();
    components.add_component::<Worker>(ComponentDescriptor::new().with_init_method("run"));

    let plan = components.build();
    assert!(plan.is_empty());
    assert!(matches!(
        plan.report().skipped[0],
        DescriptorError::MissingLifecycleMethod { hook: LifecycleHook::Init, .. }
    ));
}

#[test]
fn auto_activated_in_registration_order() {
    let mut components = ComponentCollection::new();
    components
        .add_component::<FooA>(ComponentDescriptor::new().with_auto_activate(true))
        .add_component::<FooB>(ComponentDescriptor::new())
        .add_component::<FooC>(
            ComponentDescriptor::new().with_auto_activate(true).with_order_index(9),
        );

    let plan = components.build();
    let eager: Vec<_> = plan.auto_activated().map(|r| r.component()).collect();
    assert_eq!(eager, vec![service_of::<FooC>(), service_of::<FooA>()]);
}

#[test]
fn multi_service_registration_covers_every_binding() {
    trait Reader {}
    trait Writer {}
    struct File;

    let mut components = ComponentCollection::new();
    components.add_component::<File>(
        ComponentDescriptor::new()
            .with_services([service_of::<dyn Reader>(), service_of::<dyn Writer>()]),
    );

    let plan = components.build();
    assert_eq!(plan.len(), 1);
    let via_reader = plan.resolve(service_of::<dyn Reader>()).unwrap();
    let via_writer = plan.resolve(service_of::<dyn Writer>()).unwrap();
    assert_eq!(via_reader.sequence(), via_writer.sequence());
    assert!(plan.resolve(service_of::<File>()).is_none());
}
