//! PPTX attachments: per-slide text runs, in slide order.

use super::ooxml;
use super::ExtractionError;

const SLIDE_PREFIX: &str = "ppt/slides/slide";
const SLIDE_SUFFIX: &str = ".xml";

/// Extract slide text in numeric slide order. Each non-empty slide is
/// labelled `[Slide N]` with `N` taken from the part name, and slides are
/// joined with newlines.
pub fn extract_pptx_text(pptx_bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut archive = ooxml::open_archive(pptx_bytes)?;
    let slides = ooxml::numbered_parts(&archive, SLIDE_PREFIX, SLIDE_SUFFIX);

    let mut sections = Vec::new();
    for (index, part) in slides {
        let xml = ooxml::read_part(&mut archive, &part)?;
        let runs = ooxml::text_runs(&xml, "t")?;
        let joined = runs
            .iter()
            .map(|r| r.trim())
            .filter(|r| !r.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if !joined.is_empty() {
            sections.push(format!("[Slide {index}] {joined}"));
        }
    }
    Ok(sections.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::ooxml::build_zip;

    fn slide(texts: &[&str]) -> String {
        let runs: String = texts
            .iter()
            .map(|t| format!("<a:r><a:rPr/><a:t>{t}</a:t></a:r>"))
            .collect();
        format!("<p:sld><p:txBody><a:p>{runs}</a:p></p:txBody></p:sld>")
    }

    #[test]
    fn slides_come_out_in_numeric_order() {
        // ten slides inserted so slide10 would string-sort before slide2
        let parts: Vec<(String, String)> = (1..=10)
            .rev()
            .map(|n| {
                (
                    format!("ppt/slides/slide{n}.xml"),
                    slide(&[&format!("slide body {n}")]),
                )
            })
            .collect();
        let entries: Vec<(&str, &str)> = parts
            .iter()
            .map(|(n, c)| (n.as_str(), c.as_str()))
            .collect();
        let text = extract_pptx_text(&build_zip(&entries)).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 10);
        for (i, line) in lines.iter().enumerate() {
            assert!(
                line.starts_with(&format!("[Slide {}]", i + 1)),
                "line {i} was {line}"
            );
        }
    }

    #[test]
    fn runs_on_a_slide_are_joined_with_spaces() {
        let bytes = build_zip(&[(
            "ppt/slides/slide1.xml",
            &slide(&["Symptom", "history:", "chest pain"]),
        )]);
        assert_eq!(
            extract_pptx_text(&bytes).unwrap(),
            "[Slide 1] Symptom history: chest pain"
        );
    }

    #[test]
    fn empty_slides_are_skipped() {
        let bytes = build_zip(&[
            ("ppt/slides/slide1.xml", &slide(&["visible"])),
            ("ppt/slides/slide2.xml", "<p:sld><p:txBody/></p:sld>"),
            ("ppt/slides/slide3.xml", &slide(&["also visible"])),
        ]);
        assert_eq!(
            extract_pptx_text(&bytes).unwrap(),
            "[Slide 1] visible\n[Slide 3] also visible"
        );
    }

    #[test]
    fn non_slide_parts_are_ignored() {
        let bytes = build_zip(&[
            ("ppt/slides/slide1.xml", &slide(&["deck"])),
            ("ppt/slideMasters/slideMaster1.xml", &slide(&["master boilerplate"])),
            ("ppt/slides/_rels/slide1.xml.rels", "<Relationships/>"),
        ]);
        assert_eq!(extract_pptx_text(&bytes).unwrap(), "[Slide 1] deck");
    }

    #[test]
    fn deck_without_slides_yields_empty() {
        let bytes = build_zip(&[("docProps/core.xml", "<cp/>")]);
        assert_eq!(extract_pptx_text(&bytes).unwrap(), "");
    }

    #[test]
    fn corrupt_container_is_an_error() {
        assert!(matches!(
            extract_pptx_text(b"zip? no"),
            Err(ExtractionError::Container(_))
        ));
    }
}
