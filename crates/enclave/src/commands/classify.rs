//! `enclave classify` command implementation.

use std::io::{self, Write};

use clap::Args;
use enclave_renderer::{Classification, classify};

use crate::error::CliError;

/// Arguments for the classify command.
#[derive(Args)]
pub(crate) struct ClassifyArgs {
    /// Image destination URL.
    url: String,

    /// Image title.
    #[arg(long)]
    title: Option<String>,

    /// Image alt text.
    #[arg(long, default_value = "")]
    alt: String,
}

impl ClassifyArgs {
    /// Execute the classify command.
    ///
    /// Prints the classification as pretty JSON, or `null` when the
    /// destination is not an embed or captioned image.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination cannot be parsed.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let classification = classify(&self.url, self.title.as_deref(), &self.alt)?;
        let json = to_json(classification.as_ref())?;

        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{json}")?;
        Ok(())
    }
}

fn to_json(classification: Option<&Classification>) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&classification)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_to_json_none_is_null() {
        assert_eq!(to_json(None).unwrap(), "null");
    }

    #[test]
    fn test_to_json_youtube() {
        let classification = classify("https://youtu.be/abc123", None, "")
            .unwrap()
            .unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&to_json(Some(&classification)).unwrap()).unwrap();

        assert_eq!(value["provider"], "youtube");
        assert_eq!(value["object_id"], "abc123");
        assert_eq!(value["destination"], "https://youtu.be/abc123");
    }

    #[test]
    fn test_to_json_image_params() {
        let classification = classify("https://example.com/pic.jpg|200x100", None, "")
            .unwrap()
            .unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&to_json(Some(&classification)).unwrap()).unwrap();

        assert_eq!(value["provider"], "quail-image");
        assert_eq!(value["params"]["width"], "200");
        assert_eq!(value["params"]["height"], "100");
    }

    #[test]
    fn test_execute_parse_error() {
        let args = ClassifyArgs {
            url: "http://example.com:99999/a.png".to_owned(),
            title: None,
            alt: String::new(),
        };
        assert!(matches!(args.execute(), Err(CliError::Classify(_))));
    }
}
