// tests/concurrency.rs
//! Concurrent requests for the same key share one adapter.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use conform::meta::{Attribute, MemberBuilder, TypeDefKind};
use conform::{AdapterRegistry, Call, NativeRegistry, Object, SymbolTable, TypeRef, Value};

#[test]
fn concurrent_static_adapters_are_the_same_instance() {
    let mut table = SymbolTable::new();
    let int = table.primitive("int");
    let ops = table.declare_type("Num.Ops", TypeDefKind::Interface);
    table.add_attribute(ops, Attribute::new("conform.Static"));
    table.add_member(ops, MemberBuilder::method("one").static_member().returns(int.clone()));
    let imp = table.declare_type("Num.Impl", TypeDefKind::Class);
    let one = table.add_member(imp, MemberBuilder::method("one").static_member().returns(int));

    let mut natives = NativeRegistry::new();
    natives.register(one, |_, _| Ok(Value::Int(1)));
    let registry = AdapterRegistry::new(Arc::new(table), Arc::new(natives));
    let ops = TypeRef::named(ops);
    let imp = TypeRef::named(imp);

    let adapters: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| s.spawn(|| registry.static_adapter(&ops, &imp).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for adapter in &adapters[1..] {
        assert!(Arc::ptr_eq(&adapters[0], adapter));
    }
    assert_eq!(adapters[0].invoke("one", &Call::empty()).unwrap(), Value::Int(1));
    assert_eq!(registry.cache_stats().statics, 1);
}

#[test]
fn concurrent_instance_adapters_share_a_shape() {
    let mut table = SymbolTable::new();
    let int = table.primitive("int");
    let counter = table.declare_type("App.Counter", TypeDefKind::Interface);
    table.add_member(counter, MemberBuilder::method("next").returns(int.clone()));
    let ticker = table.declare_type("App.Ticker", TypeDefKind::Class);
    let next = table.add_member(ticker, MemberBuilder::method("next").returns(int));

    let calls = Arc::new(AtomicUsize::new(0));
    let seen = calls.clone();
    let mut natives = NativeRegistry::new();
    natives.register(next, move |_, _| {
        Ok(Value::Int(seen.fetch_add(1, Ordering::SeqCst) as i64))
    });
    let registry = AdapterRegistry::new(Arc::new(table), Arc::new(natives));
    let counter = TypeRef::named(counter);
    let ticker = TypeRef::named(ticker);

    std::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                let adapter = registry
                    .adapt(&counter, Object::new(ticker.clone()).into_ref())
                    .unwrap();
                adapter.invoke("next", &Call::empty()).unwrap();
            });
        }
    });

    assert_eq!(calls.load(Ordering::SeqCst), 4);
    assert_eq!(registry.cache_stats().polymorphic, 1);
}
