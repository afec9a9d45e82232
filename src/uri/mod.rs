//! URI handling module
//!
//! This module provides link validation against a parent page, visit-key
//! normalization used for de-duplication, and the parent-directory helper
//! used to resolve root-relative links.

mod normalize;
mod validator;

pub use normalize::{parent_directory, path_and_query, visit_key};
pub use validator::{validate_link, LinkRejection};
