//! Per-call parameters for [`crate::lab::Lab::transmute`].
//!
//! Separate from [`crate::config::TransmuteConfig`]: the config holds knobs
//! that make sense to fix once and reuse across many calls (the retry
//! budget), while a `TransmuteRequest` is built fresh for each `transmute`
//! invocation since `dst_cat` at minimum always varies by call.

use crate::substance::Substance;
use crate::variation::{variation_set, TagState, Variation};

/// What a single `transmute` call is asking for: a destination substance and
/// tags, and optionally an override for the source substance/tags the
/// original dynamically-typed implementation would otherwise have derived
/// from `type(value)`.
///
/// Rust has no runtime equivalent of "the type of this value" once it's
/// behind a generic `T`, so unlike the original, `src_cat` has no automatic
/// fallback beyond [`Substance::of_type::<T>`] — supply it explicitly via
/// [`TransmuteRequest::src_cat`] whenever the caller's notion of "category"
/// isn't simply "whatever Rust type `T` is".
#[derive(Debug, Clone)]
pub struct TransmuteRequest {
    pub(crate) dst_cat: Substance,
    pub(crate) dst_tags: TagState,
    pub(crate) src_cat: Option<Substance>,
    pub(crate) src_tags: TagState,
    pub(crate) explicit: bool,
}

impl TransmuteRequest {
    /// Start a request targeting `dst_cat`, with no required tags, no source
    /// override, and activators enabled.
    pub fn new(dst_cat: Substance) -> Self {
        Self {
            dst_cat,
            dst_tags: TagState::new(),
            src_cat: None,
            src_tags: TagState::new(),
            explicit: false,
        }
    }

    /// Require these variations to be present in the tag state after the
    /// final reagent fires.
    pub fn dst_tags<K, I>(mut self, tags: I) -> Self
    where
        K: std::hash::Hash,
        I: IntoIterator<Item = K>,
    {
        self.dst_tags = variation_set(tags);
        self
    }

    /// Require these already-hashed variations, for callers that have a
    /// [`Variation`] in hand rather than a raw key.
    pub fn dst_variations(mut self, tags: impl IntoIterator<Item = Variation>) -> Self {
        self.dst_tags = tags.into_iter().collect();
        self
    }

    /// Override the source substance instead of deriving it from `T`.
    pub fn src_cat(mut self, cat: Substance) -> Self {
        self.src_cat = Some(cat);
        self
    }

    /// Supply extra tags alongside whatever an activator detects (or
    /// instead of detection entirely, if combined with
    /// [`TransmuteRequest::explicit`]).
    pub fn src_tags<K, I>(mut self, tags: I) -> Self
    where
        K: std::hash::Hash,
        I: IntoIterator<Item = K>,
    {
        self.src_tags = variation_set(tags);
        self
    }

    /// Suppress activator detection; only `src_tags` contributes to the
    /// initial tag state.
    pub fn explicit(mut self, explicit: bool) -> Self {
        self.explicit = explicit;
        self
    }
}
