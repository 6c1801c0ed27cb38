//! Integration tests for the deferred reflection layer.
//!
//! Every test builds its own module holding a `TestClass` equivalent to:
//!
//! ```csharp
//! public class TestClass {
//!     private string _property;
//!     public string Property { get; set; }          // wraps _property
//!     public TestClass() { }
//!     public TestClass(string property) { Property = property; }
//!     public string PublicMethod(string s) => s;
//!     private string PrivateMethod(string s) => s;
//!     public static string StaticMethod(string s) => s;
//! }
//! ```

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use dotreflect::{prelude::*, Error, Result};

const TEST_CLASS: &str = "Tests.TestClass";

fn identity(method: dotreflect::runtime::MethodBuilder) -> dotreflect::runtime::MethodBuilder {
    method
        .param("s", TypeSignature::String)
        .returns(TypeSignature::String)
        .body(|_, args| Ok(args[0].clone()))
}

fn test_module() -> Result<DeferredRc<ModuleRc>> {
    let module = Arc::new(Module::new("Tests"));
    ClassBuilder::new(TEST_CLASS)
        .field(
            "_property",
            TypeSignature::String,
            MemberAttributes::PRIVATE,
        )
        .property("Property", TypeSignature::String, "_property")
        .method("PublicMethod", |m| identity(m.public()))
        .method("PrivateMethod", |m| identity(m.private()))
        .method("StaticMethod", |m| identity(m.public().static_method()))
        .constructor(|c| c)
        .constructor(|c| {
            c.param("property", TypeSignature::String)
                .body(|this, args| this.set("_property", args[0].clone()))
        })
        .build(&module)?;

    Ok(Arc::new(Deferred::ready(module)))
}

fn test_type() -> Result<DeferredRc<TypeRc>> {
    resolve_type(Some(&test_module()?), TEST_CLASS)
}

#[test]
fn test_resolve_and_invoke_instance_method() -> Result<()> {
    let ty = test_type()?;
    let method = resolve_method(Some(&ty), "PublicMethod")?;

    let instance: ObjectRef = create_instance(Some(&ty), &[])?;
    let result: String = invoke(Some(&method), Some(&instance), &["x".into()])?;
    assert_eq!(result, "x");

    // a direct handle works the same as the cell
    let handle = method.get()?;
    let result: String = invoke(Some(&handle), Some(&instance), &["x".into()])?;
    assert_eq!(result, "x");
    Ok(())
}

#[test]
fn test_resolve_and_invoke_static_method() -> Result<()> {
    let ty = test_type()?;
    let method = resolve_method_with(Some(&ty), "StaticMethod", BindingFlags::PUBLIC_STATIC)?;

    let result: String = invoke_static(Some(&method), &["y".into()])?;
    assert_eq!(result, "y");

    let result: String = invoke_static_by_name(Some(&ty), "StaticMethod", &["y".into()])?;
    assert_eq!(result, "y");
    Ok(())
}

#[test]
fn test_constructor_round_trip() -> Result<()> {
    let ty = test_type()?;
    let field = resolve_field_with(Some(&ty), "_property", BindingFlags::NON_PUBLIC_INSTANCE)?;
    let getter = resolve_property(Some(&ty), "Property", true)?;

    let instance: ObjectRef = create_instance(Some(&ty), &["z".into()])?;
    let by_field: String = get_value(Some(&field), Some(&instance))?;
    let by_getter: String = invoke(Some(&getter), Some(&instance), &[])?;

    assert_eq!(by_field, "z");
    assert_eq!(by_getter, "z");
    Ok(())
}

#[test]
fn test_property_setter() -> Result<()> {
    let ty = test_type()?;
    let setter = resolve_property(Some(&ty), "Property", false)?;
    let field = resolve_field_with(Some(&ty), "_property", BindingFlags::NON_PUBLIC_INSTANCE)?;

    let instance: ObjectRef = create_instance(Some(&ty), &[])?;
    invoke::<(), _>(Some(&setter), Some(&instance), &["set".into()])?;

    let value: String = get_value(Some(&field), Some(&instance))?;
    assert_eq!(value, "set");
    Ok(())
}

#[test]
fn test_missing_method_fails_on_access() -> Result<()> {
    let ty = test_type()?;

    // creating the cell succeeds
    let missing = resolve_method(Some(&ty), "Missing")?;
    assert!(!missing.is_evaluated());

    let first = missing.value().unwrap_err();
    let second = missing.value().unwrap_err();
    assert!(matches!(
        first,
        Error::MemberNotFound {
            kind: MemberKind::Method,
            ..
        }
    ));
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_missing_type_fails_on_access() -> Result<()> {
    let module = test_module()?;
    let ty = resolve_type(Some(&module), "Tests.UnknownType")?;
    let method = resolve_method(Some(&ty), "PublicMethod")?;

    assert!(matches!(
        method.value(),
        Err(Error::MemberNotFound {
            kind: MemberKind::Type,
            ..
        })
    ));
    Ok(())
}

#[test]
fn test_filter_exclusivity() -> Result<()> {
    let ty = test_type()?;

    for (name, filter) in [
        ("PrivateMethod", BindingFlags::NON_PUBLIC_INSTANCE),
        ("StaticMethod", BindingFlags::PUBLIC_STATIC),
    ] {
        let hidden = resolve_method(Some(&ty), name)?;
        assert!(matches!(hidden.value(), Err(Error::MemberNotFound { .. })));

        let visible = resolve_method_with(Some(&ty), name, filter)?;
        assert_eq!(visible.value()?.name, name);
    }

    let hidden = resolve_field(Some(&ty), "_property")?;
    assert!(matches!(hidden.value(), Err(Error::MemberNotFound { .. })));

    let non_public = BindingFlags::NON_PUBLIC_INSTANCE;
    let public_only = resolve_method_with(Some(&ty), "PublicMethod", non_public)?;
    assert!(public_only.value().is_err());

    let getter = resolve_property_with(Some(&ty), "Property", true, non_public)?;
    assert!(matches!(
        getter.value(),
        Err(Error::MemberNotFound {
            kind: MemberKind::Property,
            ..
        })
    ));
    let getter = resolve_property_with(Some(&ty), "Property", true, BindingFlags::ALL)?;
    assert_eq!(getter.value()?.name, "get_Property");
    Ok(())
}

#[test]
fn test_null_inputs_are_immediate() {
    let none_module: Option<&DeferredRc<ModuleRc>> = None;
    let none_type: Option<&DeferredRc<TypeRc>> = None;
    let none_method: Option<&DeferredRc<MethodRc>> = None;
    let none_field: Option<&DeferredRc<FieldRc>> = None;

    assert_eq!(
        resolve_type(none_module, TEST_CLASS).unwrap_err(),
        Error::NullInput("module")
    );
    assert_eq!(
        resolve_method(none_type, "PublicMethod").unwrap_err(),
        Error::NullInput("ty")
    );
    assert_eq!(
        resolve_method_with(none_type, "PrivateMethod", BindingFlags::ALL).unwrap_err(),
        Error::NullInput("ty")
    );
    assert_eq!(
        resolve_property(none_type, "Property", true).unwrap_err(),
        Error::NullInput("ty")
    );
    assert_eq!(
        resolve_property_with(none_type, "Property", false, BindingFlags::ALL).unwrap_err(),
        Error::NullInput("ty")
    );
    assert_eq!(
        resolve_field_with(none_type, "_property", BindingFlags::ALL).unwrap_err(),
        Error::NullInput("ty")
    );
    assert_eq!(
        create_instance::<ObjectRef, _>(none_type, &[]).unwrap_err(),
        Error::NullInput("ty")
    );
    assert_eq!(
        invoke_static::<String, _>(none_method, &["x".into()]).unwrap_err(),
        Error::NullInput("method")
    );
    assert_eq!(
        invoke_static_by_name::<String, _>(none_type, "StaticMethod", &[]).unwrap_err(),
        Error::NullInput("ty")
    );
    assert_eq!(
        get_value::<String, _>(none_field, None).unwrap_err(),
        Error::NullInput("field")
    );
    let err = value_of::<TypeRc>(None).unwrap_err();
    assert_eq!(err, Error::NullInput("cell"));
}

#[test]
fn test_missing_receiver_is_dispatch_error() -> Result<()> {
    let ty = test_type()?;
    let method = resolve_method(Some(&ty), "PublicMethod")?;

    let err = invoke::<String, _>(Some(&method), None, &["x".into()]).unwrap_err();
    assert_eq!(
        err,
        Error::TypeMismatch {
            expected: TEST_CLASS.to_string(),
            found: "null".to_string(),
        }
    );
    let direct = method.get()?.invoke(None, &["x".into()]).unwrap_err();
    assert_eq!(err, direct);
    Ok(())
}

#[test]
fn test_type_mismatch() -> Result<()> {
    let ty = test_type()?;
    let method = resolve_method(Some(&ty), "PublicMethod")?;
    let instance: ObjectRef = create_instance(Some(&ty), &[])?;

    let err = invoke::<bool, _>(Some(&method), Some(&instance), &["x".into()]).unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { .. }));

    let err = invoke::<String, _>(Some(&method), Some(&instance), &[Value::from(1)]).unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { .. }));

    let err = create_instance::<String, _>(Some(&ty), &[]).unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { .. }));
    Ok(())
}

#[test]
fn test_resolution_chain_runs_once() -> Result<()> {
    let lookups = Arc::new(AtomicUsize::new(0));
    let counter = lookups.clone();
    let module = test_module()?;

    let ty: DeferredRc<TypeRc> = Arc::new(Deferred::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        let module = module.get()?;
        let ty = module.get_type(TEST_CLASS);
        ty.ok_or_else(|| Error::MemberNotFound {
            kind: MemberKind::Type,
            owner: module.name.clone(),
            name: TEST_CLASS.to_string(),
        })
    }));
    let public = resolve_method(Some(&ty), "PublicMethod")?;
    let getter = resolve_property(Some(&ty), "Property", true)?;
    assert_eq!(lookups.load(Ordering::SeqCst), 0);

    let instance: ObjectRef = create_instance(Some(&ty), &[])?;
    for _ in 0..10 {
        let _: String = invoke(Some(&public), Some(&instance), &["x".into()])?;
        let _: Option<String> = invoke(Some(&getter), Some(&instance), &[])?;
    }
    assert_eq!(lookups.load(Ordering::SeqCst), 1);
    Ok(())
}

#[test]
fn test_failure_is_not_retried() -> Result<()> {
    let module = Arc::new(Module::new("Late"));
    let cell = Arc::new(Deferred::ready(module.clone()));
    let ty = resolve_type(Some(&cell), "Late.Arrival")?;

    assert!(ty.value().is_err());
    ClassBuilder::new("Late.Arrival").build(&module)?;

    // the cached failure stays, a fresh cell sees the new type
    assert!(ty.value().is_err());
    let fresh = resolve_type(Some(&cell), "Late.Arrival")?;
    assert!(fresh.value().is_ok());
    Ok(())
}
