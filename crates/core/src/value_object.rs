//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**; identity does not
/// matter, only the values do. `Money { cents: 100 }` is a value object; a
/// `User` with an id is an entity.
///
/// To "modify" a value object, create a new one. This keeps values safe to
/// share and predictable to compare.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
