//! Template engine for invitation pages.
//!
//! Templates use two constructs: `{{NAME}}` placeholders and
//! `{{#IF_NAME}}...{{/IF_NAME}}` conditional blocks. Rendering runs the
//! conditional pass first and the placeholder pass second. Every substituted
//! value is HTML-escaped unless its key is on the renderer's raw-key list.

pub mod data;
pub mod escape;
pub mod render;
pub mod template;

pub use data::{TemplateData, TemplateValue};
pub use escape::{html_escape, RawKeys};
pub use render::{is_truthy, render_conditionals, render_placeholders, Renderer};
pub use template::{Template, TemplateError};
