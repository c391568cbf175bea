//! Core types and query logic for the Scribe blogging service.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! feed, follow-graph and comment-thread operations are written against the
//! [`store::BlogStore`] trait; storage backends implement it.

// `BlogStore` spells out `Send` futures in its signatures; implementors may
// still write `async fn`.
#![allow(async_fn_in_trait)]

pub mod authoring;
pub mod comment;
pub mod error;
pub mod feed;
pub mod follow;
pub mod group;
pub mod pagination;
pub mod post;
pub mod store;
pub mod thread;
pub mod user;
pub mod validate;

pub use error::{Error, Result};
