//! Prompt Forge Core
//!
//! The I/O-free half of the prompt pipeline: template text goes in, input
//! field descriptors and interpolated prompt text come out.
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `placeholder` - `{name}` extraction and tokenization
//! - `fields` - Input field descriptors and the field synthesizer
//! - `interpolation` - Placeholder substitution and validity
//!
//! ## Template syntax
//!
//! A placeholder is `{` + one or more characters other than braces + `}`.
//! `{{` and `}}` are escapes for literal braces and never form part of a
//! placeholder.

pub mod error;
pub mod fields;
pub mod interpolation;
pub mod placeholder;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Template Pipeline ──────────────────────────────────────────────────
pub use fields::{derive_label, synthesize_fields, FieldType, InputField};
pub use interpolation::{
    interpolate, is_valid, missing_required, render, render_strict, Interpolation,
};
pub use placeholder::{parse_placeholders, tokenize, Token};
