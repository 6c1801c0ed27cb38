//! Fluent definition of runtime types.
//!
//! [`ClassBuilder`] collects fields, methods, properties and constructors and registers the
//! finished [`RuntimeType`] with a [`Module`]. Method and constructor bodies are plain Rust
//! closures.
//!
//! # Example
//!
//! ```rust
//! use dotreflect::runtime::{ClassBuilder, MemberAttributes, Module, TypeSignature, Value};
//!
//! let module = Module::new("Tests");
//! let ty = ClassBuilder::new("Tests.Greeter")
//!     .field("_name", TypeSignature::String, MemberAttributes::PRIVATE)
//!     .property("Name", TypeSignature::String, "_name")
//!     .method("Greet", |method| {
//!         method
//!             .public()
//!             .returns(TypeSignature::String)
//!             .body(|this, _| {
//!                 let name = this.map(|this| this.get("_name")).transpose()?;
//!                 Ok(Value::from(format!("Hello {}", name.unwrap_or(Value::Null))))
//!             })
//!     })
//!     .build(&module)?;
//!
//! assert_eq!(ty.fullname(), "Tests.Greeter");
//! assert_eq!(ty.methods.count(), 3); // Greet, get_Name, set_Name
//! # Ok::<(), dotreflect::Error>(())
//! ```

use std::sync::Arc;

use crate::{
    runtime::{
        Constructor, ConstructorBody, Field, MemberAttributes, MemberKind, Method, MethodBody,
        MethodRc, Module, ObjectRef, Parameter, Property, RuntimeType, Token, TokenKind, TypeRc,
        TypeSignature, Value,
    },
    Result,
};

struct FieldDef {
    name: String,
    signature: TypeSignature,
    flags: MemberAttributes,
}

struct PropertyDef {
    name: String,
    signature: TypeSignature,
    backing_field: String,
    read_only: bool,
}

/// Builder for one method
pub struct MethodBuilder {
    name: String,
    flags: MemberAttributes,
    params: Vec<Parameter>,
    return_type: TypeSignature,
    body: Option<MethodBody>,
}

impl MethodBuilder {
    /// Start a private instance method returning `void`
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        MethodBuilder {
            name: name.into(),
            flags: MemberAttributes::PRIVATE,
            params: Vec::new(),
            return_type: TypeSignature::Void,
            body: None,
        }
    }

    /// Make the method public
    #[must_use]
    pub fn public(self) -> Self {
        self.access(MemberAttributes::PUBLIC)
    }

    /// Make the method private
    #[must_use]
    pub fn private(self) -> Self {
        self.access(MemberAttributes::PRIVATE)
    }

    /// Set the access level
    #[must_use]
    pub fn access(mut self, access: MemberAttributes) -> Self {
        self.flags = self.flags.with_access(access);
        self
    }

    /// Make the method static
    #[must_use]
    pub fn static_method(mut self) -> Self {
        self.flags |= MemberAttributes::STATIC;
        self
    }

    fn special_name(mut self) -> Self {
        self.flags |= MemberAttributes::SPECIAL_NAME;
        self
    }

    /// Append a parameter
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, signature: TypeSignature) -> Self {
        self.params.push(Parameter {
            name: name.into(),
            signature,
        });
        self
    }

    /// Set the return type
    #[must_use]
    pub fn returns(mut self, signature: TypeSignature) -> Self {
        self.return_type = signature;
        self
    }

    /// Set the implementation. Without one the method does nothing and returns `void`.
    #[must_use]
    pub fn body<F>(mut self, body: F) -> Self
    where
        F: Fn(Option<&ObjectRef>, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        self.body = Some(Arc::new(body));
        self
    }

    fn build(self, ty: &RuntimeType) -> Result<MethodRc> {
        Ok(Arc::new(Method {
            token: Token::next(TokenKind::MethodDef)?,
            name: self.name,
            flags: self.flags,
            params: self.params,
            return_type: self.return_type,
            declaring_type: ty.token,
            declaring_name: ty.fullname(),
            body: self
                .body
                .unwrap_or_else(|| Arc::new(|_, _| Ok(Value::Void))),
        }))
    }
}

/// Builder for one instance constructor
pub struct ConstructorBuilder {
    flags: MemberAttributes,
    params: Vec<Parameter>,
    body: Option<ConstructorBody>,
}

impl ConstructorBuilder {
    fn new() -> Self {
        ConstructorBuilder {
            flags: MemberAttributes::PUBLIC | MemberAttributes::SPECIAL_NAME,
            params: Vec::new(),
            body: None,
        }
    }

    /// Set the access level (constructors start out public)
    #[must_use]
    pub fn access(mut self, access: MemberAttributes) -> Self {
        self.flags = self.flags.with_access(access);
        self
    }

    /// Append a parameter
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, signature: TypeSignature) -> Self {
        self.params.push(Parameter {
            name: name.into(),
            signature,
        });
        self
    }

    /// Set the implementation, which initializes the new instance
    #[must_use]
    pub fn body<F>(mut self, body: F) -> Self
    where
        F: Fn(&ObjectRef, &[Value]) -> Result<()> + Send + Sync + 'static,
    {
        self.body = Some(Arc::new(body));
        self
    }
}

/// Fluent builder for a class of the runtime type system
pub struct ClassBuilder {
    namespace: String,
    name: String,
    base: Option<TypeRc>,
    fields: Vec<FieldDef>,
    properties: Vec<PropertyDef>,
    methods: Vec<MethodBuilder>,
    constructors: Vec<ConstructorBuilder>,
}

impl ClassBuilder {
    /// Start a class. A qualified name (`Namespace.Name`) is split at the last `.`.
    #[must_use]
    pub fn new(name: &str) -> Self {
        let (namespace, name) = match name.rsplit_once('.') {
            Some((namespace, name)) => (namespace.to_string(), name.to_string()),
            None => (String::new(), name.to_string()),
        };

        ClassBuilder {
            namespace,
            name,
            base: None,
            fields: Vec::new(),
            properties: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
        }
    }

    /// Derive from `base`
    #[must_use]
    pub fn extends(mut self, base: &TypeRc) -> Self {
        self.base = Some(base.clone());
        self
    }

    /// Declare a field
    #[must_use]
    pub fn field(
        mut self,
        name: impl Into<String>,
        signature: TypeSignature,
        flags: MemberAttributes,
    ) -> Self {
        self.fields.push(FieldDef {
            name: name.into(),
            signature,
            flags,
        });
        self
    }

    /// Declare a public read/write property backed by the instance field `backing_field`.
    ///
    /// Generates the accessor methods `get_<name>` and `set_<name>`.
    #[must_use]
    pub fn property(
        mut self,
        name: impl Into<String>,
        signature: TypeSignature,
        backing_field: impl Into<String>,
    ) -> Self {
        self.properties.push(PropertyDef {
            name: name.into(),
            signature,
            backing_field: backing_field.into(),
            read_only: false,
        });
        self
    }

    /// Declare a public property with only a `get_<name>` accessor
    #[must_use]
    pub fn read_only_property(
        mut self,
        name: impl Into<String>,
        signature: TypeSignature,
        backing_field: impl Into<String>,
    ) -> Self {
        self.properties.push(PropertyDef {
            name: name.into(),
            signature,
            backing_field: backing_field.into(),
            read_only: true,
        });
        self
    }

    /// Declare a method, configured by `define`
    #[must_use]
    pub fn method<F>(mut self, name: impl Into<String>, define: F) -> Self
    where
        F: FnOnce(MethodBuilder) -> MethodBuilder,
    {
        self.methods.push(define(MethodBuilder::new(name)));
        self
    }

    /// Declare an instance constructor, configured by `define`.
    ///
    /// A class without any declared constructor gets a public parameterless one.
    #[must_use]
    pub fn constructor<F>(mut self, define: F) -> Self
    where
        F: FnOnce(ConstructorBuilder) -> ConstructorBuilder,
    {
        self.constructors.push(define(ConstructorBuilder::new()));
        self
    }

    /// Create the type and register it with `module`.
    ///
    /// # Errors
    /// Returns [`crate::Error::MemberNotFound`] if a property names a backing field that is not
    /// a declared instance field, [`crate::Error::TypeInsert`] if the module already has a
    /// type of this name, and [`crate::Error::TokenExhausted`] if no token is left for one of
    /// the new members.
    pub fn build(mut self, module: &Module) -> Result<TypeRc> {
        if self.constructors.is_empty() {
            self.constructors.push(ConstructorBuilder::new());
        }

        let ty = RuntimeType::new(self.namespace, self.name, module.name.clone(), self.base)?;
        let ty = Arc::new(ty);
        let fullname = ty.fullname();

        for def in self.fields {
            let field = Field::new(
                def.name,
                def.flags,
                def.signature,
                ty.token,
                fullname.clone(),
            )?;
            ty.fields.push(Arc::new(field));
        }

        for def in self.properties {
            let field = ty
                .fields
                .iter()
                .map(|(_, field)| field)
                .find(|field| field.name == def.backing_field && !field.is_static())
                .cloned()
                .ok_or_else(|| not_found!(MemberKind::Field, fullname, def.backing_field))?;

            let getter = {
                let field = field.clone();
                MethodBuilder::new(format!("get_{}", def.name))
                    .public()
                    .special_name()
                    .returns(def.signature.clone())
                    .body(move |this, _| field.get_value(this))
                    .build(&ty)?
            };

            let setter = if def.read_only {
                None
            } else {
                let setter = MethodBuilder::new(format!("set_{}", def.name))
                    .public()
                    .special_name()
                    .param("value", def.signature.clone())
                    .body(move |this, args| {
                        let value = args.first().cloned().unwrap_or(Value::Null);
                        field.set_value(this, value)?;
                        Ok(Value::Void)
                    })
                    .build(&ty)?;
                Some(setter)
            };

            ty.methods.push(getter.clone());
            if let Some(setter) = &setter {
                ty.methods.push(setter.clone());
            }
            ty.properties.push(Arc::new(Property {
                token: Token::next(TokenKind::Property)?,
                name: def.name,
                signature: def.signature,
                declaring_type: ty.token,
                getter: Some(getter),
                setter,
            }));
        }

        for method in self.methods {
            ty.methods.push(method.build(&ty)?);
        }

        for ctor in self.constructors {
            let body = ctor.body.unwrap_or_else(|| Arc::new(|_, _| Ok(())));
            let ctor = Constructor::new(ctor.flags, ctor.params, Arc::downgrade(&ty), body)?;
            ty.constructors.push(Arc::new(ctor));
        }

        module.insert(&ty)?;
        tracing::debug!(ty = %fullname, module = %module.name, "defined type");
        Ok(ty)
    }
}
