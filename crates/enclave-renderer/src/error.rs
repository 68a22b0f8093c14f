//! Error types for classification and rendering.

/// Error while classifying an image destination.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ClassifyError {
    /// Destination is not a valid URL or relative reference.
    #[error("failed to parse url: {url}, {source}")]
    UrlParse {
        /// Destination as written in the document.
        url: String,
        /// Underlying parse failure.
        #[source]
        source: url::ParseError,
    },

    /// Destination contains an ASCII control character.
    #[error("failed to parse url: {url}, invalid control character in URL")]
    ControlCharacter {
        /// Destination as written in the document.
        url: String,
    },
}

/// Error while synthesizing an embed fragment.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Template failed to compile or execute.
    #[error("failed to render {provider} embed: {source}")]
    Template {
        /// Provider tag of the entity being rendered.
        provider: &'static str,
        /// Underlying template error.
        #[source]
        source: minijinja::Error,
    },
}
