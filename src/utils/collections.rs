//! Collection aliases used throughout the crate.
//!
//! All hot-path maps use `FxHashMap`: keys are short strings and the maps are
//! internal, so the faster non-cryptographic hasher is the right default.

use rustc_hash::FxHashMap;
use serde_json::Value;

/// Keyed metadata map stored in `SessionState::extra` and `NodePartial::extra`.
pub type ExtraMap = FxHashMap<String, Value>;

/// Creates an empty [`ExtraMap`].
///
/// `FxHashMap` has no `new()`; this reads better than `FxHashMap::default()`
/// at call sites building node updates.
#[must_use]
pub fn new_extra_map() -> ExtraMap {
    FxHashMap::default()
}
