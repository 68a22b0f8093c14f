//! `enclave render` command implementation.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;
use enclave_config::{CliSettings, Config};
use enclave_renderer::{RenderOptions, Theme, TransformOptions, render_markdown};

use crate::error::CliError;
use crate::output::Output;

/// Marker that opens every diagnostic comment in rendered output.
const DIAGNOSTIC_MARKER: &str = "<!-- goldmark-enclave:";

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markdown file to render.
    input: PathBuf,

    /// Write HTML to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover enclave.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Render embeds as plain links instead of iframes.
    #[arg(long)]
    no_iframe: bool,

    /// Theme for embeds without a theme hint: light or dark (overrides config).
    #[arg(long, env = "ENCLAVE_THEME")]
    theme: Option<String>,

    /// Disable GitHub Flavored Markdown extensions.
    #[arg(long)]
    no_gfm: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the input/output files
    /// cannot be accessed.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            iframe_disabled: self.no_iframe.then_some(true),
            default_theme: self.theme,
            gfm: self.no_gfm.then_some(false),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        if let Some(path) = &config.config_path {
            tracing::info!(path = %path.display(), "Loaded configuration");
        }

        let markdown = std::fs::read_to_string(&self.input)?;
        let html = render_markdown(&markdown, &transform_options(&config));
        tracing::info!(
            input = %self.input.display(),
            bytes = html.len(),
            "Rendered document"
        );

        let diagnostics = diagnostic_count(&html);
        if diagnostics > 0 {
            output.warning(&format!(
                "{diagnostics} image(s) in {} could not be embedded",
                self.input.display()
            ));
        }

        match &self.output {
            Some(path) => {
                std::fs::write(path, &html)?;
                output.success(&format!("Wrote {}", path.display()));
            }
            None => io::stdout().write_all(html.as_bytes())?,
        }

        Ok(())
    }
}

/// Map loaded configuration onto renderer options.
fn transform_options(config: &Config) -> TransformOptions {
    TransformOptions {
        render: RenderOptions {
            iframe_disabled: config.render.iframe_disabled,
            default_theme: Theme::from_hint(&config.render.default_theme),
        },
        gfm: config.markdown.gfm,
    }
}

/// Number of diagnostic comments in rendered HTML.
fn diagnostic_count(html: &str) -> usize {
    html.matches(DIAGNOSTIC_MARKER).count()
}
