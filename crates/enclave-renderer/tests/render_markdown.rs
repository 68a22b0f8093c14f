use enclave_renderer::{RenderOptions, Theme, TransformOptions, render_markdown};
use pretty_assertions::assert_eq;

fn render(markdown: &str) -> String {
    render_markdown(markdown, &TransformOptions::default())
}

fn render_without_iframes(markdown: &str) -> String {
    let options = TransformOptions {
        render: RenderOptions {
            iframe_disabled: true,
            ..RenderOptions::default()
        },
        ..TransformOptions::default()
    };
    render_markdown(markdown, &options)
}

#[test]
fn test_plain_image_is_untouched() {
    assert_eq!(
        render("![pic](https://example.com/pic.jpg)"),
        "<p><img src=\"https://example.com/pic.jpg\" alt=\"pic\" /></p>\n"
    );
}

#[test]
fn test_youtube_embed_replaces_image() {
    let html = render("Watch this:\n\n![talk](https://www.youtube.com/watch?v=abc123)\n");
    assert!(html.contains(r#"src="https://www.youtube.com/embed/abc123""#));
    assert!(!html.contains("<img"));
    assert!(html.starts_with("<p>Watch this:</p>"));
}

#[test]
fn test_captioned_image_from_title_and_alt_size() {
    let html = render(r#"![chart|640x480](img/chart.png "Quarterly results")"#);
    assert!(html.contains(r#"<figure class="quail-image-wrapper" style="width: 640px; height: 480px;"#));
    assert!(html.contains(r#"<img src="img/chart.png" alt="chart|640x480""#));
    assert!(html.contains(">Quarterly results</figcaption>"));
}

#[test]
fn test_destination_size_suffix_is_stripped() {
    let html = render("![](https://example.com/pic.jpg|200x100)");
    assert!(html.contains(r#"src="https://example.com/pic.jpg""#));
    assert!(html.contains("width: 200px; height: 100px;"));
    assert!(!html.contains("|200x100"));
}

#[test]
fn test_parse_failure_is_local() {
    let html = render(
        "![bad](http://example.com:99999/a.png)\n\n![ok](https://youtu.be/xyz)\n",
    );
    assert_eq!(html.matches("<!-- goldmark-enclave:").count(), 1);
    assert!(html.contains("failed to parse url: http://example.com:99999/a.png"));
    assert!(html.contains(r#"<img src="http://example.com:99999/a.png" alt="bad" />"#));
    assert!(html.contains("https://www.youtube.com/embed/xyz"));
}

#[test]
fn test_control_character_destination_is_annotated() {
    let html = render("![x](<https://a.com/\u{1}.png>)");
    assert_eq!(html.matches("<!-- goldmark-enclave:").count(), 1, "{html}");
    assert!(html.contains("invalid control character in URL"), "{html}");
    assert!(html.contains("<img src=\"https://a.com/"), "{html}");
    assert!(html.contains(r#"alt="x" />"#), "{html}");
}

#[test]
fn test_alt_text_is_taken_from_source() {
    let html = render(r"![a\|300 `c`](p.png)");
    assert!(html.contains(r#"alt="a\|300 c""#), "{html}");
    assert!(html.contains("width: 300px; height: auto;"), "{html}");
}

#[test]
fn test_unresolved_provider_id_leaves_image() {
    let html = render("![song](https://open.spotify.com/album/abc)");
    assert!(html.contains(r#"<img src="https://open.spotify.com/album/abc" alt="song" />"#));
    assert!(!html.contains("goldmark-enclave"));
}

#[test]
fn test_iframes_disabled_renders_links() {
    let html = render_without_iframes(
        "![](https://youtu.be/abc)\n\n![](https://quaily.com/list?layout=subscribe_form)\n",
    );
    assert!(!html.contains("<iframe"));
    assert!(html.contains(r#"href="https://youtu.be/abc""#));
    assert!(html.contains(r#"href="https://quaily.com/list""#));
}

#[test]
fn test_default_theme_applies_without_hint() {
    let options = TransformOptions {
        render: RenderOptions {
            default_theme: Theme::Dark,
            ..RenderOptions::default()
        },
        ..TransformOptions::default()
    };
    let html = render_markdown(
        "![](https://twitter.com/u/status/1)\n\n![](https://twitter.com/u/status/2?theme=light)\n",
        &options,
    );
    assert_eq!(html.matches(r#"data-theme="dark""#).count(), 1);
    assert_eq!(html.matches(r#"data-theme="light""#).count(), 1);
}

#[test]
fn test_audio_and_reference_images() {
    let html = render("![episode][ep]\n\n[ep]: https://cdn.example.com/ep1.mp3\n");
    assert!(html.contains(r#"<audio class="enclave-object html5-audio-enclave-object" controls"#));
    assert!(html.contains(r#"src="https://cdn.example.com/ep1.mp3""#));
}

#[test]
fn test_images_inside_lists_and_tables() {
    let html = render(
        "- ![](https://www.bilibili.com/video/BV1xx)\n\n| a |\n|---|\n| ![](https://youtu.be/t) |\n",
    );
    assert!(html.contains("bvid=BV1xx"));
    assert!(html.contains("youtube.com/embed/t"));
}

#[test]
fn test_render_is_deterministic() {
    let markdown = "![a|10](p.png)\n\n![](https://quaily.com/l/p/post)\n\n![](https://x.com/u/status/9)\n";
    assert_eq!(render(markdown), render(markdown));
}
