//! Image replacement over `pulldown-cmark` event streams.
//!
//! [`EnclaveTransformer`] wraps a parser's offset iterator. Each image is
//! buffered from `Start(Image)` to its `End(Image)`, classified, and then:
//!
//! - replaced by one inline HTML event carrying the rendered embed;
//! - passed through unchanged when it is a regular image or unclassified;
//! - passed through followed by a `<!-- goldmark-enclave: ... -->` comment
//!   when its destination fails to parse or its embed fails to render.
//!
//! A failing image never affects the rest of the document.

use std::collections::VecDeque;
use std::ops::Range;

use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd, html};

use crate::classify::classify;
use crate::entity::{EntityBuilder, RenderOptions};
use crate::render::render;

/// Options for [`render_markdown`].
#[derive(Clone, Copy, Debug)]
pub struct TransformOptions {
    /// Embed rendering flags.
    pub render: RenderOptions,
    /// Enable GitHub Flavored Markdown extensions.
    pub gfm: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            render: RenderOptions::default(),
            gfm: true,
        }
    }
}

impl TransformOptions {
    /// Parser options matching the GFM setting.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        if self.gfm {
            Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_GFM
        } else {
            Options::empty()
        }
    }
}

/// Render markdown to HTML with image embeds applied.
///
/// # Example
///
/// ```
/// use enclave_renderer::{TransformOptions, render_markdown};
///
/// let html = render_markdown("![](https://youtu.be/abc123)", &TransformOptions::default());
/// assert!(html.contains("https://www.youtube.com/embed/abc123"));
/// ```
pub fn render_markdown(markdown: &str, options: &TransformOptions) -> String {
    let parser = Parser::new_ext(markdown, options.parser_options()).into_offset_iter();
    let events = EnclaveTransformer::new(markdown, parser, options.render);

    let mut out = String::with_capacity(markdown.len() + markdown.len() / 2);
    html::push_html(&mut out, events);
    out
}

/// Rebuild alt text from the source spans of an image's text and code descendants.
///
/// Spans are concatenated in order; spans outside `source` are skipped.
pub fn reconstruct_alt<I>(source: &str, text_spans: I) -> String
where
    I: IntoIterator<Item = Range<usize>>,
{
    text_spans
        .into_iter()
        .filter_map(|span| source.get(span))
        .collect()
}

/// Widen a text range over the backslash of an escaped punctuation character.
///
/// The parser reports escaped text without its backslash; alt text keeps the
/// source as written.
fn text_span(source: &str, range: Range<usize>) -> Range<usize> {
    let bytes = source.as_bytes();
    let backslashes = bytes
        .get(..range.start)
        .map_or(0, |before| before.iter().rev().take_while(|&&b| b == b'\\').count());
    let punctuation = bytes.get(range.start).is_some_and(u8::is_ascii_punctuation);
    if backslashes % 2 == 1 && punctuation {
        range.start - 1..range.end
    } else {
        range
    }
}

/// Narrow a code span range to its content, dropping the backtick fences and
/// one padding space on each side.
fn code_content_span(source: &str, range: Range<usize>) -> Range<usize> {
    let Some(raw) = source.get(range.clone()) else {
        return range;
    };
    let fence = raw.len() - raw.trim_start_matches('`').len();
    let closing = raw.len() - raw.trim_end_matches('`').len();
    if fence + closing > raw.len() {
        return range;
    }
    let (mut start, mut end) = (range.start + fence, range.end - closing);
    let inner = &source[start..end];
    if inner.len() >= 2
        && inner.starts_with(' ')
        && inner.ends_with(' ')
        && !inner.trim().is_empty()
    {
        start += 1;
        end -= 1;
    }
    start..end
}

/// Diagnostic comment inserted after an image that could not be embedded.
#[must_use]
pub fn diagnostic_comment(message: &str) -> String {
    format!("\n<!-- goldmark-enclave: {message} -->\n")
}

/// What happens to a buffered image.
enum Outcome {
    Keep,
    Replace(String),
    Annotate(String),
}

/// Event adapter that swaps classified images for rendered embeds.
pub struct EnclaveTransformer<'a, I> {
    source: &'a str,
    events: I,
    builder: EntityBuilder,
    pending: VecDeque<Event<'a>>,
}

impl<'a, I> EnclaveTransformer<'a, I>
where
    I: Iterator<Item = (Event<'a>, Range<usize>)>,
{
    /// Wrap an offset iterator over `source`.
    pub fn new(source: &'a str, events: I, options: RenderOptions) -> Self {
        Self {
            source,
            events,
            builder: EntityBuilder::new(options),
            pending: VecDeque::new(),
        }
    }

    /// Buffer an image up to its end tag and queue the resulting events.
    fn handle_image(&mut self, start: Event<'a>, dest_url: &str, title: &str) {
        let mut buffered = vec![start];
        let mut text_spans = Vec::new();
        let mut depth = 1usize;

        for (event, range) in self.events.by_ref() {
            match &event {
                Event::Start(Tag::Image { .. }) => depth += 1,
                Event::End(TagEnd::Image) => depth -= 1,
                Event::Text(_) => text_spans.push(text_span(self.source, range)),
                Event::Code(_) => text_spans.push(code_content_span(self.source, range)),
                _ => {}
            }
            buffered.push(event);
            if depth == 0 {
                break;
            }
        }

        let alt = reconstruct_alt(self.source, text_spans);
        match self.process(dest_url, title, &alt) {
            Outcome::Keep => self.pending.extend(buffered),
            Outcome::Replace(html) => self.pending.push_back(Event::InlineHtml(html.into())),
            Outcome::Annotate(message) => {
                self.pending.extend(buffered);
                self.pending
                    .push_back(Event::InlineHtml(diagnostic_comment(&message).into()));
            }
        }
    }

    fn process(&self, dest_url: &str, title: &str, alt: &str) -> Outcome {
        let optional_title = (!title.is_empty()).then_some(title);
        let classification = match classify(dest_url, optional_title, alt) {
            Ok(Some(classification)) => classification,
            Ok(None) => return Outcome::Keep,
            Err(err) => {
                tracing::warn!(destination = dest_url, error = %err, "Failed to classify image");
                return Outcome::Annotate(err.to_string());
            }
        };

        let Some(entity) = self.builder.build(classification, title, alt) else {
            return Outcome::Keep;
        };

        match render(&entity) {
            Ok(html) => Outcome::Replace(html),
            Err(err) => {
                tracing::warn!(
                    provider = %entity.provider(),
                    error = %err,
                    "Failed to render embed"
                );
                Outcome::Annotate(err.to_string())
            }
        }
    }
}

impl<'a, I> Iterator for EnclaveTransformer<'a, I>
where
    I: Iterator<Item = (Event<'a>, Range<usize>)>,
{
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(event) = self.pending.pop_front() {
            return Some(event);
        }

        let (event, _range) = self.events.next()?;
        let Event::Start(Tag::Image {
            dest_url, title, ..
        }) = &event
        else {
            return Some(event);
        };

        let (dest_url, title): (CowStr<'a>, CowStr<'a>) = (dest_url.clone(), title.clone());
        self.handle_image(event, &dest_url, &title);
        self.pending.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn events(markdown: &str) -> Vec<Event<'_>> {
        let parser = Parser::new(markdown).into_offset_iter();
        EnclaveTransformer::new(markdown, parser, RenderOptions::default()).collect()
    }

    #[test]
    fn test_reconstruct_alt() {
        let source = "![a *b* c](x)";
        assert_eq!(reconstruct_alt(source, [2..4, 5..6, 7..9]), "a b c");
    }

    #[test]
    fn test_reconstruct_alt_skips_out_of_range() {
        assert_eq!(reconstruct_alt("abc", [0..1, 5..9]), "a");
    }

    #[test]
    fn test_embed_replaces_image_events() {
        let events = events("![video](https://youtu.be/abc)");
        assert_eq!(events.len(), 3, "{events:?}");
        assert!(matches!(events[0], Event::Start(Tag::Paragraph)));
        assert!(matches!(&events[1], Event::InlineHtml(html) if html.contains("youtube.com/embed/abc")));
        assert!(matches!(events[2], Event::End(TagEnd::Paragraph)));
    }

    #[test]
    fn test_regular_image_passes_through() {
        let events = events("![pic](https://example.com/pic.jpg)");
        assert!(events.iter().any(|e| matches!(e, Event::Start(Tag::Image { .. }))));
        assert!(events.iter().all(|e| !matches!(e, Event::InlineHtml(_))));
    }

    #[test]
    fn test_parse_failure_annotates_image() {
        let events = events("![pic](http://example.com:99999/pic.jpg)");
        let comments: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                Event::InlineHtml(html) => Some(html.to_string()),
                _ => None,
            })
            .collect();
        assert_eq!(comments.len(), 1);
        assert!(comments[0].contains("<!-- goldmark-enclave: failed to parse url"));
        assert!(events.iter().any(|e| matches!(e, Event::Start(Tag::Image { .. }))));
    }

    #[test]
    fn test_emphasized_alt_feeds_size_suffix() {
        let html = render_markdown("![*wide*|300](pic.png)", &TransformOptions::default());
        assert!(html.contains("width: 300px"), "{html}");
        assert!(html.contains(r#"alt="wide|300""#), "{html}");
    }

    #[test]
    fn test_alt_keeps_escapes_and_code_spans() {
        let html = render_markdown("![a\\|300 `c`](p.png)", &TransformOptions::default());
        assert!(html.contains(r#"alt="a\|300 c""#), "{html}");
        assert!(html.contains("width: 300px"), "{html}");
    }

    #[test]
    fn test_text_span_widens_over_escape() {
        let source = r"a\|b";
        assert_eq!(text_span(source, 2..4), 1..4);
        assert_eq!(text_span(source, 0..1), 0..1);
        assert_eq!(text_span(r"\a", 1..2), 1..2);
        assert_eq!(text_span(r"\\|", 2..3), 2..3);
    }

    #[test]
    fn test_code_content_span() {
        let source = "x `c` `` d `` ` `";
        assert_eq!(&source[code_content_span(source, 2..5)], "c");
        assert_eq!(&source[code_content_span(source, 6..13)], "d");
        assert_eq!(&source[code_content_span(source, 14..17)], " ");
    }

    #[test]
    fn test_diagnostic_comment_format() {
        assert_eq!(diagnostic_comment("boom"), "\n<!-- goldmark-enclave: boom -->\n");
    }
}
