//! `gradpath`: academic progress and graduation eligibility tracking
//!
//! The library is used by the `gradpath` CLI and can be embedded directly:
//! load a [`Catalog`](core::models::Catalog) and a
//! [`StudentProfile`](core::models::StudentProfile), then call
//! [`core::eligibility::evaluate`].

pub mod core;

pub use crate::core::{config, get_version};
