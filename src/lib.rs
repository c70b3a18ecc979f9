//! # signupd
//!
//! A small teaching codebase for unit- and component-testing techniques:
//! a signup form validation workflow with debounced asynchronous
//! validators, a pair of counter components, and the mock HTTP user
//! service the validators talk to.
//!
//! The service is a mock made for illustration purposes. It keeps its
//! records in a volatile in-memory list, performs no hashing and no
//! uniqueness enforcement, and is not meant to be derived into anything
//! production-facing as-is.

pub mod api;
pub mod cli;
pub mod counter;
pub mod form;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
