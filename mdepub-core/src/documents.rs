//! Generators for the structural EPUB documents
//!
//! Everything here is pure string construction from already-known lists: the
//! container descriptor, the OPF package document, the title page, the EPUB 3
//! navigation document and the legacy NCX.

use crate::types::BookDescription;

/// Chapter basename: the source filename truncated at the first dot.
///
/// This is half of the numbering join key shared by manifest, spine, nav and
/// NCX generation; the other half is [`chapter_id`].
pub fn chapter_stem(md_filename: &str) -> &str {
    md_filename.split('.').next().unwrap_or(md_filename)
}

/// Manifest/spine id for chapter `index`: `s00000`, `s00001`, ...
pub fn chapter_id(index: usize) -> String {
    format!("s{:05}", index)
}

/// Archive-relative href for chapter `index`: `s{index}-{basename}.xhtml`
pub fn chapter_href(index: usize, md_filename: &str) -> String {
    format!("s{:05}-{}.xhtml", index, chapter_stem(md_filename))
}

/// Manifest id for image `index`: `image-00000`, ...
pub fn image_id(index: usize) -> String {
    format!("image-{:05}", index)
}

/// The fixed container descriptor pointing at the package document
pub fn container_xml() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8" ?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
<rootfiles>
<rootfile full-path="OPS/package.opf" media-type="application/oebps-package+xml"/>
</rootfiles>
</container>"#
}

/// Generate the OPF package document: metadata, manifest, spine and guide.
///
/// `image_filenames` must be the full available-image set, not just the
/// referenced subset; the cover designation is only emitted when the
/// configured cover image appears in it.
pub fn package_opf(
    description: &BookDescription,
    md_filenames: &[String],
    image_filenames: &[String],
    css_filenames: &[String],
) -> String {
    let mut opf = String::new();
    opf.push_str(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="3.0" xml:lang="en" unique-identifier="pub-id">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
"#,
    );

    // One element per non-empty metadata field; title, creator and identifier
    // carry fixed ids for cross-referencing
    let fields = [
        ("dc:title", Some("title"), &description.metadata.title),
        ("dc:creator", Some("creator"), &description.metadata.creator),
        ("dc:identifier", Some("book-id"), &description.metadata.identifier),
        ("dc:language", None, &description.metadata.language),
        ("dc:rights", None, &description.metadata.rights),
        ("dc:publisher", None, &description.metadata.publisher),
        ("dc:date", None, &description.metadata.date),
    ];
    for (element, id, value) in fields {
        if value.is_empty() {
            continue;
        }
        match id {
            Some(id) => opf.push_str(&format!(
                "    <{element} id=\"{id}\">{}</{element}>\n",
                escape_xml(value)
            )),
            None => opf.push_str(&format!(
                "    <{element}>{}</{element}>\n",
                escape_xml(value)
            )),
        }
    }

    // Cover compatibility meta, only for an image confirmed present
    let cover_index = description
        .cover_image
        .as_deref()
        .and_then(|cover| image_filenames.iter().position(|name| name.as_str() == cover));
    if let Some(i) = cover_index {
        opf.push_str(&format!(
            "    <meta name=\"cover\" content=\"{}\"/>\n",
            image_id(i)
        ));
    }
    opf.push_str("  </metadata>\n");

    opf.push_str("  <manifest>\n");
    opf.push_str(
        "    <item id=\"toc\" properties=\"nav\" href=\"TOC.xhtml\" media-type=\"application/xhtml+xml\"/>\n",
    );
    opf.push_str(
        "    <item id=\"ncx\" href=\"toc.ncx\" media-type=\"application/x-dtbncx+xml\"/>\n",
    );
    opf.push_str(
        "    <item id=\"titlepage\" href=\"titlepage.xhtml\" media-type=\"application/xhtml+xml\"/>\n",
    );
    for (i, md_filename) in md_filenames.iter().enumerate() {
        opf.push_str(&format!(
            "    <item id=\"{}\" href=\"{}\" media-type=\"application/xhtml+xml\"/>\n",
            chapter_id(i),
            escape_xml(&chapter_href(i, md_filename))
        ));
    }
    for (i, image_filename) in image_filenames.iter().enumerate() {
        let properties = if cover_index == Some(i) {
            " properties=\"cover-image\""
        } else {
            ""
        };
        opf.push_str(&format!(
            "    <item id=\"{}\" href=\"images/{}\" media-type=\"{}\"{}/>\n",
            image_id(i),
            escape_xml(image_filename),
            image_media_type(image_filename),
            properties
        ));
    }
    for (i, css_filename) in css_filenames.iter().enumerate() {
        opf.push_str(&format!(
            "    <item id=\"css-{:05}\" href=\"css/{}\" media-type=\"text/css\"/>\n",
            i,
            escape_xml(css_filename)
        ));
    }
    opf.push_str("  </manifest>\n");

    opf.push_str("  <spine toc=\"ncx\">\n");
    opf.push_str("    <itemref idref=\"titlepage\" linear=\"yes\"/>\n");
    for (i, _) in md_filenames.iter().enumerate() {
        opf.push_str(&format!(
            "    <itemref idref=\"{}\" linear=\"yes\"/>\n",
            chapter_id(i)
        ));
    }
    opf.push_str("  </spine>\n");

    opf.push_str("  <guide>\n");
    opf.push_str("    <reference type=\"cover\" title=\"Cover image\" href=\"titlepage.xhtml\"/>\n");
    opf.push_str("  </guide>\n");
    opf.push_str("</package>\n");

    opf
}

/// Generate the static title/cover page, interpolating escaped title and
/// creator strings
pub fn titlepage_xhtml(title: &str, creator: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<html xmlns="http://www.w3.org/1999/xhtml" xml:lang="en">
<head>
<title>Cover Page</title>
<style type="text/css">
body {{
    margin: 0;
    padding: 0;
    height: 100vh;
    display: flex;
    justify-content: center;
    align-items: center;
    font-family: serif;
}}
.cover {{
    padding: 3em;
    text-align: center;
    border: 1px solid #ccc;
    max-width: 80%;
}}
h1 {{
    font-size: 2em;
    margin-bottom: 1em;
    line-height: 1.2;
    color: #333;
}}
p {{
    font-size: 1.2em;
    font-style: italic;
    color: #666;
    line-height: 1.4;
}}
</style>
</head>
<body>
    <div class="cover">
        <h1>{}</h1>
        <p>{}</p>
    </div>
</body>
</html>"#,
        escape_xml(title),
        escape_xml(creator)
    )
}

/// Generate the EPUB 3 navigation document (`TOC.xhtml`)
pub fn toc_xhtml(default_css: &[String], md_filenames: &[String]) -> String {
    let mut toc = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops" lang="en">
<head>
<meta http-equiv="default-style" content="text/html; charset=utf-8"/>
<title>Contents</title>
"#,
    );
    for css_filename in default_css {
        toc.push_str(&format!(
            "<link rel=\"stylesheet\" href=\"css/{}\" type=\"text/css\"/>\n",
            escape_xml(css_filename)
        ));
    }
    toc.push_str(
        r#"</head>
<body>
<nav epub:type="toc" role="doc-toc" id="toc">
<h2>Contents</h2>
<ol epub:type="list">"#,
    );
    for (i, md_filename) in md_filenames.iter().enumerate() {
        toc.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>",
            escape_xml(&chapter_href(i, md_filename)),
            escape_xml(chapter_stem(md_filename))
        ));
    }
    toc.push_str(
        r#"</ol>
</nav>
</body>
</html>"#,
    );
    toc
}

/// Generate the legacy NCX navigation document (`toc.ncx`).
///
/// navPoint ids are sequential integers, deliberately distinct from the
/// zero-padded manifest ids.
pub fn toc_ncx(md_filenames: &[String]) -> String {
    let mut ncx = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<ncx xmlns="http://www.daisy.org/z3986/2005/ncx/" xml:lang="en" version="2005-1">
<head>
</head>
<navMap>
"#,
    );
    for (i, md_filename) in md_filenames.iter().enumerate() {
        ncx.push_str(&format!(
            r#"<navPoint id="navpoint-{}">
<navLabel>
<text>{}</text>
</navLabel><content src="{}"/>
</navPoint>"#,
            i,
            escape_xml(chapter_stem(md_filename)),
            escape_xml(&chapter_href(i, md_filename))
        ));
    }
    ncx.push_str(
        r#"</navMap>
</ncx>"#,
    );
    ncx
}

/// Manifest media type for an image filename, by extension
fn image_media_type(filename: &str) -> &'static str {
    let ext = std::path::Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase();
    match ext.as_str() {
        "gif" => "image/gif",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        _ => "application/octet-stream",
    }
}

/// Escape XML special characters
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
