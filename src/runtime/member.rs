//! Fields, methods, properties and constructors of runtime types.
//!
//! Members are immutable once their owning type has been built. They know the token and full
//! name of the type that declares them, but do not own it. Invocation and field access
//! validate receivers and arguments the same way a managed runtime's reflective dispatch
//! does, failing with [`crate::Error::TypeMismatch`] on violations.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, Weak};

use strum::{Display, EnumIter};

use crate::{
    runtime::{MemberAttributes, Object, ObjectRef, RuntimeType, Token, TypeSignature, Value},
    Result,
};

/// Reference to a [`Method`]
pub type MethodRc = Arc<Method>;
/// Reference to a [`Field`]
pub type FieldRc = Arc<Field>;
/// Reference to a [`Property`]
pub type PropertyRc = Arc<Property>;
/// Reference to a [`Constructor`]
pub type ConstructorRc = Arc<Constructor>;

/// Native implementation of a method. Receives the receiver (`None` for static methods) and
/// the already validated argument list.
pub type MethodBody = Arc<dyn Fn(Option<&ObjectRef>, &[Value]) -> Result<Value> + Send + Sync>;

/// Native implementation of a constructor. Receives the freshly allocated instance.
pub type ConstructorBody = Arc<dyn Fn(&ObjectRef, &[Value]) -> Result<()> + Send + Sync>;

/// The kind of entity a lookup was searching for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum MemberKind {
    /// A type within a module
    Type,
    /// A method
    Method,
    /// A field
    Field,
    /// A property
    Property,
    /// The get accessor of a property
    #[strum(to_string = "Property getter")]
    PropertyGetter,
    /// The set accessor of a property
    #[strum(to_string = "Property setter")]
    PropertySetter,
    /// An instance constructor
    Constructor,
}

/// A named, typed parameter of a method or constructor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Parameter name
    pub name: String,
    /// Declared type
    pub signature: TypeSignature,
}

fn check_receiver<'a>(
    declaring_type: Token,
    declaring_name: &str,
    receiver: Option<&'a ObjectRef>,
) -> Result<&'a ObjectRef> {
    match receiver {
        None => Err(type_mismatch!(declaring_name, "null")),
        Some(object) if object.runtime_type().inherits(declaring_type) => Ok(object),
        Some(object) => Err(type_mismatch!(
            declaring_name,
            object.runtime_type().fullname()
        )),
    }
}

pub(crate) fn check_arguments(params: &[Parameter], args: &[Value]) -> Result<()> {
    if params.len() != args.len() {
        return Err(type_mismatch!(
            format!("{} argument(s)", params.len()),
            format!("{} argument(s)", args.len())
        ));
    }

    for (param, arg) in params.iter().zip(args) {
        if !param.signature.accepts(arg) {
            return Err(type_mismatch!(param.signature, arg.type_name()));
        }
    }

    Ok(())
}

/// A method of a runtime type
pub struct Method {
    /// Token
    pub token: Token,
    /// Method name
    pub name: String,
    /// Declared access and binding
    pub flags: MemberAttributes,
    /// Parameters, in order
    pub params: Vec<Parameter>,
    /// Declared return type
    pub return_type: TypeSignature,
    /// Token of the declaring type
    pub declaring_type: Token,
    /// Full name of the declaring type
    pub declaring_name: String,
    pub(crate) body: MethodBody,
}

impl Method {
    /// Returns `true` if this is a static method
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.flags.is_static()
    }

    /// `DeclaringType.Name`
    #[must_use]
    pub fn fullname(&self) -> String {
        format!("{}.{}", self.declaring_name, self.name)
    }

    /// Call the method.
    ///
    /// Instance methods need a receiver whose type is, or derives from, the declaring type.
    /// Static methods ignore the receiver.
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeMismatch`] for a missing or incompatible receiver, or an
    /// argument list that does not fit the parameters. Errors raised by the body are passed on.
    pub fn invoke(&self, receiver: Option<&ObjectRef>, args: &[Value]) -> Result<Value> {
        let receiver = if self.is_static() {
            None
        } else {
            Some(check_receiver(
                self.declaring_type,
                &self.declaring_name,
                receiver,
            )?)
        };
        check_arguments(&self.params, args)?;

        tracing::trace!(method = %self.fullname(), args = args.len(), "invoke");
        (self.body)(receiver, args)
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method")
            .field("token", &self.token)
            .field("name", &self.fullname())
            .field("flags", &self.flags)
            .field("params", &self.params)
            .field("return_type", &self.return_type)
            .finish()
    }
}

/// A field of a runtime type
pub struct Field {
    /// Token
    pub token: Token,
    /// Field name
    pub name: String,
    /// Declared access and binding
    pub flags: MemberAttributes,
    /// Declared type
    pub signature: TypeSignature,
    /// Token of the declaring type
    pub declaring_type: Token,
    /// Full name of the declaring type
    pub declaring_name: String,
    /// Storage for static fields; instance fields live in each [`Object`]
    static_value: RwLock<Value>,
}

impl Field {
    pub(crate) fn new(
        name: String,
        flags: MemberAttributes,
        signature: TypeSignature,
        declaring_type: Token,
        declaring_name: String,
    ) -> Result<Self> {
        let static_value = RwLock::new(signature.default_value());
        Ok(Field {
            token: Token::next(crate::runtime::TokenKind::Field)?,
            name,
            flags,
            signature,
            declaring_type,
            declaring_name,
            static_value,
        })
    }

    /// Returns `true` if this is a static field
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.flags.is_static()
    }

    /// Read the current value of the field.
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeMismatch`] if an instance field is read without a receiver
    /// or from an object that is not an instance of the declaring type.
    pub fn get_value(&self, receiver: Option<&ObjectRef>) -> Result<Value> {
        if self.is_static() {
            let value = self
                .static_value
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            return Ok(value.clone());
        }

        let object = check_receiver(self.declaring_type, &self.declaring_name, receiver)?;
        object
            .load(self.token)
            .ok_or_else(|| type_mismatch!(self.declaring_name, object.runtime_type().fullname()))
    }

    /// Overwrite the value of the field.
    ///
    /// # Errors
    /// Everything [`Field::get_value`] reports, plus [`crate::Error::TypeMismatch`] if `value`
    /// does not fit the field's declared type.
    pub fn set_value(&self, receiver: Option<&ObjectRef>, value: Value) -> Result<()> {
        if !self.signature.accepts(&value) {
            return Err(type_mismatch!(self.signature, value.type_name()));
        }

        if self.is_static() {
            let mut slot = self
                .static_value
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            *slot = value;
            return Ok(());
        }

        let object = check_receiver(self.declaring_type, &self.declaring_name, receiver)?;
        if object.store(self.token, value) {
            Ok(())
        } else {
            Err(type_mismatch!(
                self.declaring_name,
                object.runtime_type().fullname()
            ))
        }
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("token", &self.token)
            .field("name", &format!("{}.{}", self.declaring_name, self.name))
            .field("flags", &self.flags)
            .field("signature", &self.signature)
            .finish()
    }
}

/// A property of a runtime type, a named pair of accessor methods
#[derive(Debug)]
pub struct Property {
    /// Token
    pub token: Token,
    /// Property name
    pub name: String,
    /// Declared type
    pub signature: TypeSignature,
    /// Token of the declaring type
    pub declaring_type: Token,
    /// The `get_<Name>` accessor, if any
    pub getter: Option<MethodRc>,
    /// The `set_<Name>` accessor, if any
    pub setter: Option<MethodRc>,
}

impl Property {
    /// The getter (`want_getter`) or setter accessor
    #[must_use]
    pub fn accessor(&self, want_getter: bool) -> Option<&MethodRc> {
        if want_getter {
            self.getter.as_ref()
        } else {
            self.setter.as_ref()
        }
    }

    /// Iterate over the accessors that exist
    pub fn accessors(&self) -> impl Iterator<Item = &MethodRc> {
        self.getter.iter().chain(self.setter.iter())
    }
}

/// An instance constructor of a runtime type
pub struct Constructor {
    /// Token
    pub token: Token,
    /// Declared access
    pub flags: MemberAttributes,
    /// Parameters, in order
    pub params: Vec<Parameter>,
    declaring: Weak<RuntimeType>,
    body: ConstructorBody,
}

impl Constructor {
    pub(crate) fn new(
        flags: MemberAttributes,
        params: Vec<Parameter>,
        declaring: Weak<RuntimeType>,
        body: ConstructorBody,
    ) -> Result<Self> {
        Ok(Constructor {
            token: Token::next(crate::runtime::TokenKind::MethodDef)?,
            flags,
            params,
            declaring,
            body,
        })
    }

    /// Allocate a new instance and run the constructor body on it.
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeMismatch`] if `args` does not fit the parameters, and
    /// [`crate::Error::MemberNotFound`] if the declaring type has been dropped. Errors raised
    /// by the body are passed on.
    pub fn invoke(&self, args: &[Value]) -> Result<ObjectRef> {
        let ty = self.declaring.upgrade().ok_or_else(|| {
            not_found!(crate::runtime::MemberKind::Type, "<dropped>", ".ctor")
        })?;
        check_arguments(&self.params, args)?;

        tracing::trace!(ty = %ty.fullname(), args = args.len(), "construct");
        let object = Object::allocate(&ty);
        (self.body)(&object, args)?;
        Ok(object)
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("token", &self.token)
            .field("flags", &self.flags)
            .field("params", &self.params)
            .finish()
    }
}
