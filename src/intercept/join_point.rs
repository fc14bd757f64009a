//! Identity of an intercepted call site.

use std::borrow::Cow;
use std::fmt;

/// The declaring type and method of a monitored call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JoinPoint {
    declaring_type: Cow<'static, str>,
    method: Cow<'static, str>,
}

impl JoinPoint {
    pub fn new(
        declaring_type: impl Into<Cow<'static, str>>,
        method: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            declaring_type: declaring_type.into(),
            method: method.into(),
        }
    }

    /// Join point for `method` declared on `T`.
    pub fn of<T: ?Sized>(method: impl Into<Cow<'static, str>>) -> Self {
        Self::new(std::any::type_name::<T>(), method)
    }

    pub fn declaring_type(&self) -> &str {
        &self.declaring_type
    }

    pub fn method(&self) -> &str {
        &self.method
    }
}

impl fmt::Display for JoinPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.declaring_type, self.method)
    }
}

/// Build a [`JoinPoint`] for a method.
///
/// With only a method name, the enclosing module is the declaring type.
///
/// ```
/// use loggable::join_point;
///
/// struct Inventory;
///
/// let jp = join_point!(Inventory, "restock");
/// assert_eq!(jp.method(), "restock");
/// assert!(jp.declaring_type().ends_with("Inventory"));
/// ```
#[macro_export]
macro_rules! join_point {
    ($method:expr) => {
        $crate::JoinPoint::new(::std::module_path!(), $method)
    };
    ($ty:ty, $method:expr) => {
        $crate::JoinPoint::of::<$ty>($method)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Inventory;

    #[test]
    fn test_of_type() {
        let jp = JoinPoint::of::<Inventory>("restock");
        assert_eq!(jp.declaring_type(), "loggable::intercept::join_point::tests::Inventory");
        assert_eq!(jp.method(), "restock");
    }

    #[test]
    fn test_macro_uses_module_path() {
        let jp = crate::join_point!("restock");
        assert_eq!(jp.declaring_type(), "loggable::intercept::join_point::tests");
        assert_eq!(jp.to_string(), "loggable::intercept::join_point::tests::restock");
    }
}
