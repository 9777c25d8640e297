//! Static page generator for wedding invitations.
//!
//! Turns wedding data into one rendered page per theme of a layout, a theme
//! selector page and an expiry record, staged and published as one
//! directory.

pub mod assets;
pub mod builder;
pub mod calendar;
pub mod fragments;
pub mod locale;
pub mod mapping;
pub mod registry;
pub mod source;
pub mod templates;
pub mod wedding;

pub use builder::{BuildConfig, BuildError, BuildResult, InvitationBuilder, SiteInfo, SiteSettings};
pub use registry::{ExpiryKind, LayoutConfig, LayoutOverride, LayoutRegistry, ThemeConfig};
pub use source::{load_wedding, DataOrigin, LoadedWedding};
pub use wedding::{slugify, validate_slug, DataError, WeddingData};
