/// Property-based tests for registration and creation
///
/// These tests use proptest to generate random inputs and verify invariants
/// that should hold for all valid registrations.

use ferrous_ctor::{Component, Injectable, Parameter, TypeRegistry, Value};
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::sync::Arc;

struct Leaf;
struct Branch {
    leaf: Arc<Leaf>,
}
struct Root {
    branch: Arc<Branch>,
}

#[derive(Debug)]
struct Panel {
    width: i32,
    label: String,
}

impl Injectable for Leaf {
    fn component() -> Component {
        Component::builder::<Self>().constructor([], |_| Ok(Leaf)).build()
    }
}

impl Injectable for Branch {
    fn component() -> Component {
        Component::builder::<Self>()
            .constructor([Parameter::of::<Leaf>()], |args| Ok(Branch { leaf: args.get::<Leaf>(0)? }))
            .build()
    }
}

impl Injectable for Root {
    fn component() -> Component {
        Component::builder::<Self>()
            .constructor([Parameter::of::<Branch>()], |args| Ok(Root { branch: args.get::<Branch>(0)? }))
            .build()
    }
}

impl Injectable for Panel {
    fn component() -> Component {
        Component::builder::<Self>()
            .constructor([Parameter::value::<i32>()], |args| {
                Ok(Panel { width: args.value::<i32>(0)?, label: String::new() })
            })
            .constructor([Parameter::value::<String>()], |args| {
                Ok(Panel { width: -1, label: args.value::<String>(0)? })
            })
            .constructor([Parameter::value::<i32>(), Parameter::value::<String>()], |args| {
                Ok(Panel { width: args.value::<i32>(0)?, label: args.value::<String>(1)? })
            })
            .build()
    }
}

fn register(registry: &mut TypeRegistry, which: u8) {
    let result = match which % 4 {
        0 => registry.register::<Leaf>(),
        1 => registry.register::<Branch>(),
        2 => registry.register::<Root>(),
        _ => registry.register::<Panel>(),
    };
    result.unwrap();
}

fn ids(registry: &TypeRegistry) -> BTreeSet<String> {
    registry.registered_ids().map(str::to_string).collect()
}

// Property: registration order and repetition never change the resulting key set
proptest! {
    #[test]
    fn registration_order_is_irrelevant(order in prop::collection::vec(0u8..4, 1..20)) {
        let mut shuffled = TypeRegistry::new();
        for which in &order {
            register(&mut shuffled, *which);
        }

        let mut once = TypeRegistry::new();
        let distinct: BTreeSet<u8> = order.iter().map(|w| w % 4).collect();
        for which in &distinct {
            register(&mut once, *which);
        }

        prop_assert_eq!(ids(&shuffled), ids(&once));
        prop_assert_eq!(shuffled.graph().len(), once.graph().len());
    }
}

proptest! {
    #[test]
    fn every_registered_chain_creates(repeats in 1usize..5) {
        let mut registry = TypeRegistry::new();
        for _ in 0..repeats {
            registry.register::<Root>().unwrap();
        }

        let root = registry.create_type::<Root>(&[]).unwrap();
        let again = registry.create_type::<Root>(&[]).unwrap();
        prop_assert!(!Arc::ptr_eq(&root.branch.leaf, &again.branch.leaf));
    }
}

// Property: overloads always route by argument types
proptest! {
    #[test]
    fn overloads_route_by_signature(width in any::<i32>(), label in "[a-z]{0,12}") {
        let mut registry = TypeRegistry::new();
        registry.register::<Panel>().unwrap();

        let by_width = registry.create_type::<Panel>(&[Value::new(width)]).unwrap();
        prop_assert_eq!(by_width.width, width);
        prop_assert!(by_width.label.is_empty());

        let by_label = registry.create_type::<Panel>(&[Value::from(label.as_str())]).unwrap();
        prop_assert_eq!(by_label.width, -1);
        prop_assert_eq!(&by_label.label, &label);

        let both = registry
            .create_type::<Panel>(&[Value::new(width), Value::new(label.clone())])
            .unwrap();
        prop_assert_eq!(both.width, width);
        prop_assert_eq!(&both.label, &label);
    }
}

proptest! {
    #[test]
    fn unknown_identifiers_never_instantiate(name in "[A-Za-z_][A-Za-z0-9_]{0,16}") {
        let mut registry = TypeRegistry::new();
        registry.register::<Root>().unwrap();
        prop_assert!(registry.create(&name, &[]).is_err());
    }
}
