//! Core helpers shared across subdomains.
//!
//! - [`string`] - UTF-8 safe truncation and single-line previews

pub mod string;
