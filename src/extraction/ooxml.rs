//! Shared plumbing for OOXML containers: bounded zip reads, numeric part
//! ordering, and streaming text-run collection.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::result::ZipError;
use zip::ZipArchive;

use super::ExtractionError;

/// Upper bound on a single decompressed XML part, as zip-bomb protection.
const MAX_PART_BYTES: u64 = 50 * 1024 * 1024;

pub(crate) type Archive<'a> = ZipArchive<Cursor<&'a [u8]>>;

pub(crate) fn open_archive(bytes: &[u8]) -> Result<Archive<'_>, ExtractionError> {
    ZipArchive::new(Cursor::new(bytes)).map_err(|e| ExtractionError::Container(e.to_string()))
}

/// Read one archive entry as UTF-8 text, refusing oversized parts.
pub(crate) fn read_part(archive: &mut Archive<'_>, name: &str) -> Result<String, ExtractionError> {
    read_part_if_present(archive, name)?
        .ok_or_else(|| ExtractionError::Container(format!("{name}: entry not found")))
}

/// Like [`read_part`], but a missing entry is `Ok(None)` rather than an
/// error. Optional container parts must not hide real read failures behind
/// their absence, so only the not-found case maps to `None`.
pub(crate) fn read_part_if_present(
    archive: &mut Archive<'_>,
    name: &str,
) -> Result<Option<String>, ExtractionError> {
    let entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(ExtractionError::Container(format!("{name}: {e}"))),
    };

    let mut raw = Vec::new();
    entry
        .take(MAX_PART_BYTES)
        .read_to_end(&mut raw)
        .map_err(|e| ExtractionError::Container(format!("{name}: {e}")))?;
    if raw.len() as u64 >= MAX_PART_BYTES {
        return Err(ExtractionError::Container(format!(
            "{name} exceeds {MAX_PART_BYTES} byte limit"
        )));
    }

    String::from_utf8(raw)
        .map(Some)
        .map_err(|e| ExtractionError::Encoding(format!("{name}: {e}")))
}

/// Entries shaped `{prefix}{N}{suffix}`, sorted by the numeric index `N`.
/// Container formats enumerate parts out of natural order, and a string sort
/// would put `slide10` before `slide2`.
pub(crate) fn numbered_parts(archive: &Archive<'_>, prefix: &str, suffix: &str) -> Vec<(u32, String)> {
    let mut parts: Vec<(u32, String)> = archive
        .file_names()
        .filter_map(|name| {
            let index: u32 = name.strip_prefix(prefix)?.strip_suffix(suffix)?.parse().ok()?;
            Some((index, name.to_string()))
        })
        .collect();
    parts.sort_by_key(|(index, _)| *index);
    parts
}

/// Collect the text content of every element whose local name matches `tag`,
/// in document order. Runs with nested markup inside keep their text because
/// collection stays open until the matching end tag.
pub(crate) fn text_runs(xml: &str, tag: &str) -> Result<Vec<String>, ExtractionError> {
    let mut reader = Reader::from_str(xml);
    let mut runs = Vec::new();
    let mut current: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == tag.as_bytes() => {
                current = Some(String::new());
            }
            Ok(Event::Empty(e)) if e.local_name().as_ref() == tag.as_bytes() => {
                runs.push(String::new());
            }
            Ok(Event::Text(t)) => {
                if let Some(run) = current.as_mut() {
                    let text = t
                        .unescape()
                        .map_err(|e| ExtractionError::Xml(e.to_string()))?;
                    run.push_str(&text);
                }
            }
            Ok(Event::End(e)) if e.local_name().as_ref() == tag.as_bytes() => {
                if let Some(run) = current.take() {
                    runs.push(run);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ExtractionError::Xml(e.to_string())),
            _ => {}
        }
    }
    Ok(runs)
}

/// Build a small in-memory zip for extractor tests.
#[cfg(test)]
pub(crate) fn build_zip(entries: &[(&str, &str)]) -> Vec<u8> {
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in entries {
        writer.start_file(*name, SimpleFileOptions::default()).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbered_parts_sort_numerically() {
        let bytes = build_zip(&[
            ("ppt/slides/slide10.xml", "<x/>"),
            ("ppt/slides/slide2.xml", "<x/>"),
            ("ppt/slides/slide1.xml", "<x/>"),
            ("ppt/slides/_rels/slide1.xml.rels", "<x/>"),
            ("ppt/notes/note1.xml", "<x/>"),
        ]);
        let archive = open_archive(&bytes).unwrap();
        let parts = numbered_parts(&archive, "ppt/slides/slide", ".xml");
        let indices: Vec<u32> = parts.iter().map(|(i, _)| *i).collect();
        assert_eq!(indices, vec![1, 2, 10]);
    }

    #[test]
    fn text_runs_collects_in_document_order() {
        let xml = r#"<root><a:t>first</a:t><other>skip</other><a:t>second</a:t></root>"#;
        assert_eq!(text_runs(xml, "t").unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn text_runs_survives_markup_nested_in_a_run() {
        let xml = r#"<p><a:t>Hello <a:b>bold</a:b> world</a:t></p>"#;
        assert_eq!(text_runs(xml, "t").unwrap(), vec!["Hello bold world"]);
    }

    #[test]
    fn text_runs_unescapes_entities() {
        let xml = r#"<d><w:t>Na &lt; 140 &amp; K &gt; 3.5</w:t></d>"#;
        assert_eq!(text_runs(xml, "t").unwrap(), vec!["Na < 140 & K > 3.5"]);
    }

    #[test]
    fn mismatched_end_tag_is_an_error() {
        assert!(text_runs("<a><t>text</b></a>", "t").is_err());
    }

    #[test]
    fn missing_entry_is_none_not_an_error() {
        let bytes = build_zip(&[("word/document.xml", "<d/>")]);
        let mut archive = open_archive(&bytes).unwrap();
        assert!(read_part_if_present(&mut archive, "xl/sharedStrings.xml")
            .unwrap()
            .is_none());
        assert_eq!(
            read_part_if_present(&mut archive, "word/document.xml").unwrap(),
            Some("<d/>".to_string())
        );
    }

    #[test]
    fn truncated_zip_is_a_container_error() {
        let mut bytes = build_zip(&[("word/document.xml", "<d/>")]);
        bytes.truncate(bytes.len() / 2);
        // either the central directory is gone (open fails) or entries are cut
        let result = open_archive(&bytes)
            .and_then(|mut a| read_part(&mut a, "word/document.xml"));
        assert!(result.is_err());
    }
}
