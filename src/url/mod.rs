//! URL handling module for kol-board
//!
//! This module provides the small set of URL operations the entry parser
//! needs: resolving image paths against the upstream origin, pulling the
//! identifier out of a profile link, and matching link hosts against a
//! domain list.

mod domain;
mod normalize;

pub use domain::{extract_domain, host_matches_any, matches_domain};
pub use normalize::{absolutize, last_path_segment, origin_of};
