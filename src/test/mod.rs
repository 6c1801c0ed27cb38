use std::sync::{Arc, OnceLock};

use crate::{
    reflect::{create_instance, Deferred, DeferredRc},
    runtime::{ClassBuilder, MemberAttributes, Module, ModuleRc, ObjectRef, TypeRc, TypeSignature},
    Result,
};

pub const TEST_MODULE: &str = "Tests";
pub const TEST_CLASS: &str = "Tests.TestClass";

/// Defines `TestClass` in `module`:
///
/// - private field `_property: string`
/// - public property `Property` backed by `_property`
/// - `PublicMethod(string) -> string`, `PrivateMethod(string) -> string` and the static
///   `StaticMethod(string) -> string`, all returning their argument
/// - a default constructor and `.ctor(string)` which initializes `Property`
pub fn define_test_class(module: &Module) -> Result<TypeRc> {
    let identity = |m: crate::runtime::MethodBuilder| {
        m.param("s", TypeSignature::String)
            .returns(TypeSignature::String)
            .body(|_, args| Ok(args[0].clone()))
    };

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
        .build(module)
}

// Shared across all unit tests, the module is only ever read
pub fn test_module() -> ModuleRc {
    static MODULE: OnceLock<ModuleRc> = OnceLock::new();
    MODULE
        .get_or_init(|| {
            let module = Arc::new(Module::new(TEST_MODULE));
            define_test_class(&module).unwrap();
            module
        })
        .clone()
}

pub fn test_module_cell() -> DeferredRc<ModuleRc> {
    Arc::new(Deferred::ready(test_module()))
}

pub fn test_class() -> TypeRc {
    test_module().get_type(TEST_CLASS).unwrap()
}

pub fn test_instance() -> ObjectRef {
    create_instance(Some(&test_class()), &[]).unwrap()
}
