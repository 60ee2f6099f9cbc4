//! Route registration and path matching.

mod core;
mod trie;

pub use self::core::{ParamVec, RouteMatch, Router, MAX_INLINE_PARAMS};
