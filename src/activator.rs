//! Activators: optional inspectors that derive initial variations from a value.

use crate::value::AnyValue;
use crate::variation::Variation;

/// An inspector function: given a value of some substance, yields the
/// variations it can detect. Expected to be cheap and side-effect-free — the
/// core does not guard against panics here, the same way it trusts reagent
/// functions to report their own failures rather than unwind.
pub type ActivatorFn = Box<dyn Fn(&AnyValue) -> Vec<Variation> + Send + Sync>;
