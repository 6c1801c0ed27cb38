//! Member attribute and binding flags.
//!
//! Two groups of flags meet during every lookup:
//!
//! - [`MemberAttributes`] are *declared* on a member: its accessibility and whether it is
//!   static. The encoding follows the ECMA-335 `MethodAttributes`/`FieldAttributes` layout,
//!   with the access level in the low three bits.
//! - [`BindingFlags`] are *requested* by the caller and decide which declared members a
//!   lookup may see.

use std::fmt;

use bitflags::bitflags;

/// Bitmask for `ACCESS` state extraction
pub const MEMBER_ACCESS_MASK: u32 = 0x0007;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// Declared attributes of a field, method, property accessor or constructor
    pub struct MemberAttributes: u32 {
        /// Accessible only by the parent type
        const PRIVATE = 0x0001;
        /// Accessible by sub-types only in this module
        const FAM_AND_ASSEM = 0x0002;
        /// Accessible by anyone in the module
        const ASSEM = 0x0003;
        /// Accessible only by type and sub-types
        const FAMILY = 0x0004;
        /// Accessible by sub-types anywhere, plus anyone in the module
        const FAM_OR_ASSEM = 0x0005;
        /// Accessible by anyone who has visibility to this scope
        const PUBLIC = 0x0006;
        /// Defined on type, else per instance
        const STATIC = 0x0010;
        /// Name is special (property accessors, constructors)
        const SPECIAL_NAME = 0x0800;
    }
}

/// Accessibility extracted from [`MemberAttributes`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberAccess {
    /// Member not referenceable
    CompilerControlled,
    /// Accessible only by the parent type
    Private,
    /// Accessible by sub-types only in this module
    FamAndAssem,
    /// Accessible by anyone in the module
    Assem,
    /// Accessible only by type and sub-types
    Family,
    /// Accessible by sub-types anywhere, plus anyone in the module
    FamOrAssem,
    /// Accessible by anyone
    Public,
}

impl MemberAttributes {
    /// Extract the access level from the low three bits
    #[must_use]
    pub fn access(self) -> MemberAccess {
        match self.bits() & MEMBER_ACCESS_MASK {
            0x1 => MemberAccess::Private,
            0x2 => MemberAccess::FamAndAssem,
            0x3 => MemberAccess::Assem,
            0x4 => MemberAccess::Family,
            0x5 => MemberAccess::FamOrAssem,
            0x6 => MemberAccess::Public,
            _ => MemberAccess::CompilerControlled,
        }
    }

    /// Replace the access bits, keeping every other attribute
    #[must_use]
    pub fn with_access(self, access: MemberAttributes) -> Self {
        let rest = self.bits() & !MEMBER_ACCESS_MASK;
        Self::from_bits_retain(rest | (access.bits() & MEMBER_ACCESS_MASK))
    }

    /// Returns `true` if the member is public
    #[must_use]
    pub fn is_public(self) -> bool {
        self.access() == MemberAccess::Public
    }

    /// Returns `true` if the member is static
    #[must_use]
    pub fn is_static(self) -> bool {
        self.contains(MemberAttributes::STATIC)
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// Selects which members a lookup considers
    pub struct BindingFlags: u32 {
        /// Only members declared on the type itself, not inherited ones
        const DECLARED_ONLY = 0x0002;
        /// Instance members
        const INSTANCE = 0x0004;
        /// Static members
        const STATIC = 0x0008;
        /// Public members
        const PUBLIC = 0x0010;
        /// Private, family and assembly members
        const NON_PUBLIC = 0x0020;
        /// Include public and protected static members of base types
        const FLATTEN_HIERARCHY = 0x0040;
    }
}

impl BindingFlags {
    /// Every public and non-public, static and instance member
    pub const ALL: BindingFlags = BindingFlags::PUBLIC
        .union(BindingFlags::NON_PUBLIC)
        .union(BindingFlags::INSTANCE)
        .union(BindingFlags::STATIC);

    /// Public static members
    pub const PUBLIC_STATIC: BindingFlags = BindingFlags::PUBLIC.union(BindingFlags::STATIC);

    /// Non-public instance members
    pub const NON_PUBLIC_INSTANCE: BindingFlags =
        BindingFlags::NON_PUBLIC.union(BindingFlags::INSTANCE);

    /// Returns `true` if a member with `attributes` is visible under this filter.
    ///
    /// `inherited` marks members found on a base type of the type being searched. Those are
    /// never visible with [`BindingFlags::DECLARED_ONLY`], private ones are never visible at
    /// all, and static ones need [`BindingFlags::FLATTEN_HIERARCHY`].
    #[must_use]
    pub fn admits(self, attributes: MemberAttributes, inherited: bool) -> bool {
        let visibility = if attributes.is_public() {
            self.contains(BindingFlags::PUBLIC)
        } else {
            self.contains(BindingFlags::NON_PUBLIC)
        };

        let binding = if attributes.is_static() {
            self.contains(BindingFlags::STATIC)
        } else {
            self.contains(BindingFlags::INSTANCE)
        };

        if !(visibility && binding) {
            return false;
        }

        if inherited {
            if self.contains(BindingFlags::DECLARED_ONLY)
                || attributes.access() == MemberAccess::Private
            {
                return false;
            }
            if attributes.is_static() && !self.contains(BindingFlags::FLATTEN_HIERARCHY) {
                return false;
            }
        }

        true
    }
}

impl Default for BindingFlags {
    /// Public instance members only
    fn default() -> Self {
        BindingFlags::PUBLIC | BindingFlags::INSTANCE
    }
}

impl fmt::Display for BindingFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "None");
        }
        bitflags::parser::to_writer(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_extraction() {
        assert_eq!(MemberAttributes::PUBLIC.access(), MemberAccess::Public);
        assert_eq!(MemberAttributes::PRIVATE.access(), MemberAccess::Private);
        assert_eq!(
            (MemberAttributes::FAMILY | MemberAttributes::STATIC).access(),
            MemberAccess::Family
        );
        assert_eq!(
            MemberAttributes::empty().access(),
            MemberAccess::CompilerControlled
        );
    }

    #[test]
    fn test_with_access_keeps_static() {
        let attrs = (MemberAttributes::PRIVATE | MemberAttributes::STATIC)
            .with_access(MemberAttributes::PUBLIC);
        assert!(attrs.is_public());
        assert!(attrs.is_static());
    }

    #[test]
    fn test_default_binding_is_public_instance() {
        let flags = BindingFlags::default();
        let statics = MemberAttributes::PUBLIC | MemberAttributes::STATIC;
        assert!(flags.admits(MemberAttributes::PUBLIC, false));
        assert!(!flags.admits(MemberAttributes::PRIVATE, false));
        assert!(!flags.admits(statics, false));
    }

    #[test]
    fn test_non_public_instance() {
        let flags = BindingFlags::NON_PUBLIC_INSTANCE;
        assert!(flags.admits(MemberAttributes::PRIVATE, false));
        assert!(flags.admits(MemberAttributes::FAMILY, false));
        assert!(!flags.admits(MemberAttributes::PUBLIC, false));
    }

    #[test]
    fn test_inherited_members() {
        let flags = BindingFlags::ALL;
        assert!(flags.admits(MemberAttributes::PUBLIC, true));
        assert!(flags.admits(MemberAttributes::FAMILY, true));
        assert!(!flags.admits(MemberAttributes::PRIVATE, true));

        let statics = MemberAttributes::PUBLIC | MemberAttributes::STATIC;
        let flattened = flags | BindingFlags::FLATTEN_HIERARCHY;
        let declared_only = flags | BindingFlags::DECLARED_ONLY;
        assert!(!flags.admits(statics, true));
        assert!(flattened.admits(statics, true));
        assert!(!declared_only.admits(MemberAttributes::PUBLIC, true));
    }

    #[test]
    fn test_binding_display() {
        assert_eq!(BindingFlags::default().to_string(), "INSTANCE | PUBLIC");
        assert_eq!(BindingFlags::empty().to_string(), "None");
    }
}
