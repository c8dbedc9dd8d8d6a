//! Markdown-to-XHTML chapter renderer

use crate::documents::{chapter_stem, escape_xml};
use crate::images;
use crate::types::ChapterArtifact;
use pulldown_cmark::{html, Options, Parser};
use std::path::Path;

/// Markdown extension toggles and document language for the renderer.
///
/// Passed in explicitly at call time; there is no process-wide format state.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Enable table syntax
    pub tables: bool,
    /// Enable footnote syntax
    pub footnotes: bool,
    /// Enable strikethrough syntax
    pub strikethrough: bool,
    /// `lang` attribute of the generated documents
    pub language: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            tables: true,
            footnotes: true,
            strikethrough: true,
            language: "en".to_string(),
        }
    }
}

/// Renders one chapter's markdown into a complete XHTML content document
pub struct XhtmlRenderer {
    config: RenderConfig,
}

impl XhtmlRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render a chapter.
    ///
    /// The source is first passed through the line-isolation preprocess, then
    /// image references are rewritten against the images directory, then the
    /// markdown is converted and wrapped in the XHTML document shell with one
    /// stylesheet link per CSS filename, in order. Rendering never drops
    /// content; unresolved images surface as diagnostics on the artifact.
    pub fn render(
        &self,
        markdown: &str,
        css_filenames: &[String],
        md_filename: &str,
        images_dir: &Path,
    ) -> ChapterArtifact {
        let corrected = isolate_lines(markdown);
        let resolution = images::extract_references(&corrected, images_dir, md_filename);

        let mut fragment = String::new();
        let parser = Parser::new_ext(&resolution.text, self.parser_options());
        html::push_html(&mut fragment, parser);

        let xhtml = self.document_shell(chapter_stem(md_filename), css_filenames, &fragment);

        ChapterArtifact {
            source: md_filename.to_string(),
            xhtml,
            images: resolution.references,
            diagnostics: resolution.diagnostics,
        }
    }

    fn parser_options(&self) -> Options {
        let mut options = Options::empty();
        if self.config.tables {
            options.insert(Options::ENABLE_TABLES);
        }
        if self.config.footnotes {
            options.insert(Options::ENABLE_FOOTNOTES);
        }
        if self.config.strikethrough {
            options.insert(Options::ENABLE_STRIKETHROUGH);
        }
        options
    }

    /// Wrap an HTML fragment in the strict XHTML5 shell with the EPUB
    /// content-document namespaces
    fn document_shell(&self, title: &str, css_filenames: &[String], fragment: &str) -> String {
        let links: String = css_filenames
            .iter()
            .map(|css| {
                format!(
                    "<link rel=\"stylesheet\" href=\"css/{}\" type=\"text/css\" media=\"all\"/>",
                    escape_xml(css)
                )
            })
            .collect();

        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops" lang="{}">
<head>
    <meta http-equiv="default-style" content="text/html; charset=utf-8"/>
    <title>{}</title>
    {}
</head>
<body>
{}
</body>
</html>"#,
            escape_xml(&self.config.language),
            escape_xml(title),
            links,
            fragment
        )
    }
}

impl Default for XhtmlRenderer {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

/// Insert a blank line between every pair of source lines.
///
/// The markdown processor only treats blank-line-separated blocks as
/// paragraphs, so this forces every original line into its own paragraph
/// element, preserving line-level breaks from the extraction stage. Any
/// multi-line paragraph structure the source encoded is collapsed; that
/// trade-off is intentional and must not be "fixed" to plain conversion.
fn isolate_lines(markdown: &str) -> String {
    markdown
        .trim()
        .split('\n')
        .collect::<Vec<_>>()
        .join("\n\n")
}
