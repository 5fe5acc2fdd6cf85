//! The type-erased value a reagent chain threads between steps.
//!
//! The core never inspects values beyond passing them from one reagent's
//! output to the next reagent's input, so it has no business being generic
//! over a single Rust type — different reagents legitimately convert between
//! different concrete Rust types along the same chain. `AnyValue` is the
//! boxed-trait-object equivalent of the original's fully dynamic typing.

use std::any::Any;

/// A boxed, type-erased value flowing through a transmutation chain.
pub type AnyValue = Box<dyn Any + Send>;

/// Box a concrete value as an [`AnyValue`].
pub fn wrap<T: Send + 'static>(value: T) -> AnyValue {
    Box::new(value)
}

/// Recover a concrete value from an [`AnyValue`], or hand it back unchanged
/// if it isn't the requested type.
pub fn unwrap<T: 'static>(value: AnyValue) -> Result<T, AnyValue> {
    value.downcast::<T>().map(|boxed| *boxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips_through_any() {
        let v = wrap(42_i32);
        assert_eq!(unwrap::<i32>(v).unwrap(), 42);
    }

    #[test]
    fn mismatched_type_is_handed_back() {
        let v = wrap("start".to_string());
        let err = unwrap::<i32>(v).unwrap_err();
        assert_eq!(*err.downcast::<String>().unwrap(), "start");
    }
}
