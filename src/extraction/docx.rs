//! DOCX attachments: WordprocessingML to flat text via a converter
//! collaborator.

use quick_xml::events::Event;
use quick_xml::Reader;

use super::ooxml;
use super::types::DocxConverter;
use super::ExtractionError;

/// Default converter: opens the OOXML container, reads the main document
/// part and concatenates its `w:t` runs, with paragraph boundaries becoming
/// newlines. There is no page concept; the result is one flat string.
pub struct ContainerDocxConverter;

const DOCUMENT_PART: &str = "word/document.xml";

impl DocxConverter for ContainerDocxConverter {
    fn convert_to_text(&self, docx_bytes: &[u8]) -> Result<String, ExtractionError> {
        let mut archive = ooxml::open_archive(docx_bytes)?;
        let xml = ooxml::read_part(&mut archive, DOCUMENT_PART)?;

        let mut reader = Reader::from_str(&xml);
        let mut out = String::new();
        let mut in_run = false;
        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) if e.local_name().as_ref() == b"t" => in_run = true,
                Ok(Event::Text(t)) if in_run => {
                    let text = t
                        .unescape()
                        .map_err(|e| ExtractionError::Xml(e.to_string()))?;
                    out.push_str(&text);
                }
                Ok(Event::End(e)) => match e.local_name().as_ref() {
                    b"t" => in_run = false,
                    b"p" => out.push('\n'),
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(ExtractionError::Xml(e.to_string())),
                _ => {}
            }
        }
        Ok(out.trim_end().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::ooxml::build_zip;

    fn docx_with(document_xml: &str) -> Vec<u8> {
        build_zip(&[
            ("[Content_Types].xml", "<Types/>"),
            ("word/document.xml", document_xml),
        ])
    }

    #[test]
    fn concatenates_text_runs_with_paragraph_breaks() {
        let bytes = docx_with(
            r#"<w:document><w:body>
                <w:p><w:r><w:t>Referral letter</w:t></w:r></w:p>
                <w:p><w:r><w:t>Patient: </w:t></w:r><w:r><w:t>J. Doe</w:t></w:r></w:p>
            </w:body></w:document>"#,
        );
        let text = ContainerDocxConverter.convert_to_text(&bytes).unwrap();
        assert_eq!(text, "Referral letter\nPatient: J. Doe");
    }

    #[test]
    fn formatted_runs_keep_their_text() {
        let bytes = docx_with(
            r#"<w:document><w:body><w:p>
                <w:r><w:rPr><w:b/></w:rPr><w:t>Allergies:</w:t></w:r>
                <w:r><w:t xml:space="preserve"> penicillin</w:t></w:r>
            </w:p></w:body></w:document>"#,
        );
        let text = ContainerDocxConverter.convert_to_text(&bytes).unwrap();
        assert_eq!(text, "Allergies: penicillin");
    }

    #[test]
    fn missing_document_part_is_an_error() {
        let bytes = build_zip(&[("word/styles.xml", "<s/>")]);
        let result = ContainerDocxConverter.convert_to_text(&bytes);
        assert!(matches!(result, Err(ExtractionError::Container(_))));
    }

    #[test]
    fn not_a_zip_is_an_error() {
        let result = ContainerDocxConverter.convert_to_text(b"plain bytes, no container");
        assert!(matches!(result, Err(ExtractionError::Container(_))));
    }
}
