//! Rich embeds for markdown images.
//!
//! Images whose destination points at known external content (videos,
//! tweets, charts, widgets, audio files) are rendered as provider-specific
//! embeds instead of plain `<img>` tags. Ordinary images can still carry a
//! caption and size hints.
//!
//! # Architecture
//!
//! - [`classify`]: ordered provider rules plus generic image size/caption hints
//! - [`EntityBuilder`]: turns a [`Classification`] into an immutable [`EnclaveEntity`]
//! - [`render`]: template-driven HTML per provider, with a plain-link fallback
//!   when iframes are disabled
//! - [`EnclaveTransformer`]: `pulldown-cmark` event adapter that swaps images
//!   for rendered embeds
//!
//! # Size hints
//!
//! Width and height come from the `w`/`width` and `h`/`height` query
//! parameters, or from a `|WIDTH` / `|WIDTHxHEIGHT` suffix on the destination
//! or the alt text: `![diagram|400x300](diagram.png)`.
//!
//! # Example
//!
//! ```
//! use enclave_renderer::{EntityBuilder, RenderOptions, classify, render};
//!
//! let classification = classify("https://www.youtube.com/watch?v=abc123", None, "")
//!     .unwrap()
//!     .unwrap();
//! let entity = EntityBuilder::new(RenderOptions::default())
//!     .build(classification, "", "")
//!     .unwrap();
//! let html = render(&entity).unwrap();
//! assert!(html.contains("https://www.youtube.com/embed/abc123"));
//! ```

mod classify;
mod destination;
mod entity;
mod error;
mod render;
mod size;
mod templates;
mod transform;

pub use classify::{Classification, Params, Provider, classify, param};
pub use destination::Destination;
pub use entity::{Align, EnclaveEntity, Embed, EntityBuilder, RenderOptions, Theme};
pub use error::{ClassifyError, RenderError};
pub use render::render;
pub use size::normalize_size;
pub use templates::escape_html;
pub use transform::{
    EnclaveTransformer, TransformOptions, diagnostic_comment, reconstruct_alt, render_markdown,
};
