// tests/scenarios.rs
//! End-to-end adaptation scenarios over programmatically built graphs.

use std::sync::Arc;

use conform::errors::{AdapterError, InvokeError};
use conform::identity::{MemberId, TypeDefId};
use conform::meta::{GenericParamDef, MemberBuilder, MetadataProvider, TypeDefKind};
use conform::{
    AdapterRegistry, Call, ComplianceOracle, NativeRegistry, Object, SymbolTable, TypeRef, Value,
};

struct Geo {
    table: SymbolTable,
    natives: NativeRegistry,
    shape: TypeRef,
    circle: TypeRef,
    square: TypeRef,
}

fn geo() -> Geo {
    let mut table = SymbolTable::new();
    let double = table.primitive("double");

    let shape = table.declare_type("Geo.Shape", TypeDefKind::Interface);
    table.add_member(shape, MemberBuilder::method("area").returns(double.clone()));

    let circle = table.declare_type("Geo.Circle", TypeDefKind::Class);
    let circle_area =
        table.add_member(circle, MemberBuilder::method("area").returns(double.clone()));

    let square = table.declare_type("Geo.Square", TypeDefKind::Class);
    table.add_member(
        square,
        MemberBuilder::method("area")
            .param("scale", double.clone())
            .returns(double),
    );

    let mut natives = NativeRegistry::new();
    natives.register(circle_area, |this, _| {
        let r = this
            .and_then(|o| o.get("radius"))
            .and_then(|v| v.as_float())
            .unwrap_or_default();
        Ok(Value::Float(std::f64::consts::PI * r * r))
    });

    Geo {
        table,
        natives,
        shape: TypeRef::named(shape),
        circle: TypeRef::named(circle),
        square: TypeRef::named(square),
    }
}

fn member_named(table: &SymbolTable, def: TypeDefId, name: &str) -> MemberId {
    table
        .members_of(def)
        .into_iter()
        .find(|m| m.name == name)
        .map(|m| m.id)
        .unwrap()
}

#[test]
fn circle_area_forwards_through_the_adapter() {
    let Geo {
        table,
        natives,
        shape,
        circle,
        ..
    } = geo();
    let table = Arc::new(table);
    let registry = AdapterRegistry::new(table.clone(), Arc::new(natives));
    let oracle = ComplianceOracle::new(table);

    let instance = Object::new(circle.clone()).with_field("radius", 2.0).into_ref();
    let adapter = registry.adapt(&shape, instance).unwrap();
    let area = adapter.invoke("area", &Call::empty()).unwrap();
    assert!((area.as_float().unwrap() - 12.566).abs() < 1e-3);

    assert!(oracle.is_duck(&circle, &shape).unwrap());
    assert!(!oracle.is_implementation(&circle, &shape).unwrap());
}

#[test]
fn wrong_arity_is_a_missing_member() {
    let Geo {
        table,
        natives,
        shape,
        square,
        ..
    } = geo();
    let table = Arc::new(table);
    let registry = AdapterRegistry::new(table.clone(), Arc::new(natives));
    let oracle = ComplianceOracle::new(table);

    let err = registry
        .adapt(&shape, Object::new(square.clone()).into_ref())
        .unwrap_err();
    assert_eq!(
        err,
        AdapterError::MissingMember {
            capability: "Geo.Shape".to_string(),
            candidate: "Geo.Square".to_string(),
            member: "Geo.Shape.area(): double".to_string(),
        }
    );
    assert!(!oracle.is_duck(&square, &shape).unwrap());
    assert!(oracle.require_duck(&square, &shape).is_err());
}

#[test]
fn distinct_runtime_types_get_distinct_shapes() {
    let mut table = SymbolTable::new();
    let double = table.primitive("double");
    let shape = table.declare_type("Geo.Shape", TypeDefKind::Interface);
    table.add_member(shape, MemberBuilder::method("area").returns(double.clone()));
    let figure = table.declare_type("Geo.Figure", TypeDefKind::Class);
    let figure_area =
        table.add_member(figure, MemberBuilder::method("area").returns(double.clone()));
    let ring = table.declare_type("Geo.Ring", TypeDefKind::Class);
    table.set_base(ring, TypeRef::named(figure));
    let disc = table.declare_type("Geo.Disc", TypeDefKind::Class);
    table.set_base(disc, TypeRef::named(figure));
    let disc_area = table.add_member(disc, MemberBuilder::method("area").returns(double));

    let mut natives = NativeRegistry::new();
    natives.register(figure_area, |_, _| Ok(Value::Float(1.0)));
    natives.register(disc_area, |_, _| Ok(Value::Float(2.0)));
    let registry = AdapterRegistry::new(Arc::new(table), Arc::new(natives));

    let shape = TypeRef::named(shape);
    let figure = TypeRef::named(figure);
    let ring = Object::new(TypeRef::named(ring)).into_ref();
    let disc = Object::new(TypeRef::named(disc)).into_ref();

    let a = registry.adapt(&shape, ring.clone()).unwrap();
    let b = registry.adapt(&shape, disc.clone()).unwrap();
    assert!(!Arc::ptr_eq(a.shape(), b.shape()));
    assert_eq!(a.invoke("area", &Call::empty()).unwrap(), Value::Float(1.0));
    assert_eq!(b.invoke("area", &Call::empty()).unwrap(), Value::Float(2.0));
    assert_eq!(a.shape().slots()[0].depth, 1);
    assert_eq!(b.shape().slots()[0].depth, 0);

    // Declared-type adaptation binds the figure's member for every instance.
    let c = registry.adapt_as(&shape, &figure, ring).unwrap();
    let d = registry.adapt_as(&shape, &figure, disc).unwrap();
    assert!(Arc::ptr_eq(c.shape(), d.shape()));
    assert_eq!(d.invoke("area", &Call::empty()).unwrap(), Value::Float(1.0));

    let stats = registry.cache_stats();
    assert_eq!(stats.polymorphic, 2);
    assert_eq!(stats.declared, 1);
}

#[test]
fn renamed_method_generics_forward_type_arguments() {
    let mut table = SymbolTable::new();
    let string = table.primitive("string");
    let store = table.declare_type("Kv.Store", TypeDefKind::Interface);
    table.add_member(
        store,
        MemberBuilder::method("get")
            .generic(GenericParamDef::new("T"))
            .param("key", string.clone())
            .returns(TypeRef::method_param(0, "T")),
    );
    let memory = table.declare_type("Kv.Memory", TypeDefKind::Class);
    let get = table.add_member(
        memory,
        MemberBuilder::method("get")
            .generic(GenericParamDef::new("U"))
            .param("name", string)
            .returns(TypeRef::method_param(0, "U")),
    );
    let int = table.primitive("int");

    let mut natives = NativeRegistry::new();
    natives.register(get, |_, call| {
        let key = call.string(0)?;
        Ok(Value::str(&format!("{key}:{}", call.type_args.len())))
    });
    let registry = AdapterRegistry::new(Arc::new(table), Arc::new(natives));
    let adapter = registry
        .adapt(&TypeRef::named(store), Object::new(TypeRef::named(memory)).into_ref())
        .unwrap();

    let call = Call::new(vec![Value::str("k")]).with_type_args(vec![int]);
    assert_eq!(adapter.invoke("get", &call).unwrap(), Value::str("k:1"));

    let err = adapter
        .invoke("get", &Call::new(vec![Value::str("k")]))
        .unwrap_err();
    assert!(matches!(err, InvokeError::GenericArity { expected: 1, found: 0, .. }));
}

#[test]
fn out_parameters_come_back_in_a_tuple() {
    let mut table = SymbolTable::new();
    let string = table.primitive("string");
    let int = table.primitive("int");
    let boolean = table.primitive("bool");

    let parser = table.declare_type("Num.Parser", TypeDefKind::Interface);
    table.add_attribute(parser, conform::meta::Attribute::new("conform.Static"));
    table.set_type_params(parser, vec![GenericParamDef::new("T")]);
    table.add_member(
        parser,
        MemberBuilder::method("tryParse")
            .static_member()
            .param("s", string.clone())
            .out_param("value", TypeRef::type_param(parser, 0, "T"))
            .returns(boolean.clone()),
    );

    let int_parser = table.declare_type("Num.IntParser", TypeDefKind::Class);
    table.add_member(
        int_parser,
        MemberBuilder::method("tryParse")
            .static_member()
            .param("s", string.clone())
            .out_param("value", int.clone())
            .returns(boolean),
    );
    let loose = table.declare_type("Num.LooseParser", TypeDefKind::Class);
    table.add_member(
        loose,
        MemberBuilder::method("parse")
            .static_member()
            .param("s", string)
            .returns(int.clone()),
    );

    let try_parse = member_named(&table, int_parser, "tryParse");
    let mut natives = NativeRegistry::new();
    natives.register(try_parse, |_, call| {
        Ok(match call.string(0)?.parse::<i64>() {
            Ok(n) => Value::Tuple(vec![Value::Bool(true), Value::Int(n)]),
            Err(_) => Value::Tuple(vec![Value::Bool(false), Value::Int(0)]),
        })
    });

    let capability = TypeRef::generic(parser, vec![int]);
    let registry = AdapterRegistry::new(Arc::new(table), Arc::new(natives));

    let adapter = registry
        .static_adapter(&capability, &TypeRef::named(int_parser))
        .unwrap();
    assert!(adapter.target().is_none());
    let result = adapter
        .invoke("tryParse", &Call::new(vec![Value::str("42"), Value::Unit]))
        .unwrap();
    assert_eq!(result, Value::Tuple(vec![Value::Bool(true), Value::Int(42)]));

    let err = registry
        .static_adapter(&capability, &TypeRef::named(loose))
        .unwrap_err();
    match err {
        AdapterError::MissingMember { member, candidate, .. } => {
            assert_eq!(candidate, "Num.LooseParser");
            assert_eq!(member, "static Num.Parser.tryParse(string, out int): bool");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    // Failed lookups leave nothing behind.
    assert_eq!(registry.cache_stats().statics, 1);
}

#[test]
fn static_interface_requires_the_marker() {
    let mut table = SymbolTable::new();
    let int = table.primitive("int");
    let ops = table.declare_type("Num.Ops", TypeDefKind::Interface);
    table.add_attribute(ops, conform::meta::Attribute::new("conform.Static"));
    table.add_member(ops, MemberBuilder::method("zero").static_member().returns(int.clone()));

    let plain = table.declare_type("Num.Plain", TypeDefKind::Class);
    let plain_zero = table.add_member(
        plain,
        MemberBuilder::method("zero").static_member().returns(int.clone()),
    );
    let marked = table.declare_type("Num.Marked", TypeDefKind::Class);
    let marked_zero =
        table.add_member(marked, MemberBuilder::method("zero").static_member().returns(int));
    let marker = table.marker_for(TypeRef::named(ops));
    table.add_interface(marked, marker);

    let mut natives = NativeRegistry::new();
    natives.register(plain_zero, |_, _| Ok(Value::Int(0)));
    natives.register(marked_zero, |_, _| Ok(Value::Int(0)));
    let registry = AdapterRegistry::new(Arc::new(table), Arc::new(natives));
    let ops = TypeRef::named(ops);

    assert!(registry.static_adapter(&ops, &TypeRef::named(plain)).is_ok());
    assert!(matches!(
        registry.static_interface(&ops, &TypeRef::named(plain)),
        Err(AdapterError::NotAnImplementation { .. })
    ));
    let adapter = registry
        .static_interface(&ops, &TypeRef::named(marked))
        .unwrap();
    assert_eq!(adapter.invoke("zero", &Call::empty()).unwrap(), Value::Int(0));
}

#[test]
fn same_arity_overloads_round_trip() {
    let mut table = SymbolTable::new();
    let int = table.primitive("int");
    let string = table.primitive("string");
    let writer = table.declare_type("Io.Writer", TypeDefKind::Interface);
    let sink = table.declare_type("Io.Sink", TypeDefKind::Class);
    for owner in [writer, sink] {
        table.add_member(
            owner,
            MemberBuilder::method("write").param("n", int.clone()).returns(string.clone()),
        );
        table.add_member(
            owner,
            MemberBuilder::method("write").param("s", string.clone()).returns(string.clone()),
        );
    }
    let overloads: Vec<MemberId> = table
        .members_of(sink)
        .into_iter()
        .map(|m| m.id)
        .collect();

    let mut natives = NativeRegistry::new();
    natives.register(overloads[0], |_, call| Ok(Value::str(&format!("n={}", call.int(0)?))));
    natives.register(overloads[1], |_, call| Ok(Value::str(&format!("s={}", call.string(0)?))));
    let registry = AdapterRegistry::new(Arc::new(table), Arc::new(natives));
    let adapter = registry
        .adapt(&TypeRef::named(writer), Object::new(TypeRef::named(sink)).into_ref())
        .unwrap();

    assert_eq!(adapter.shape().len(), 2);
    let text = adapter.invoke("write", &Call::new(vec![Value::str("hi")])).unwrap();
    assert_eq!(text, Value::str("s=hi"));
    let number = adapter.invoke("write", &Call::new(vec![Value::Int(7)])).unwrap();
    assert_eq!(number, Value::str("n=7"));
}
