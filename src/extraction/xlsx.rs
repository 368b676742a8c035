//! XLSX attachments: worksheet cells with shared-string resolution.

use quick_xml::events::Event;
use quick_xml::Reader;

use super::ooxml;
use super::ExtractionError;

const SHARED_STRINGS_PART: &str = "xl/sharedStrings.xml";
const SHEET_PREFIX: &str = "xl/worksheets/sheet";
const SHEET_SUFFIX: &str = ".xml";

/// Extract worksheet text in numeric sheet order. Cell values within a row
/// are tab-separated and rows are newline-separated; values that name an
/// index into the shared-string table are replaced with the shared string.
pub fn extract_xlsx_text(xlsx_bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut archive = ooxml::open_archive(xlsx_bytes)?;

    // workbooks with only inline or numeric values omit the part entirely;
    // a part that is present but unreadable still fails the file
    let shared = match ooxml::read_part_if_present(&mut archive, SHARED_STRINGS_PART)? {
        Some(xml) => parse_shared_strings(&xml)?,
        None => Vec::new(),
    };

    let sheets = ooxml::numbered_parts(&archive, SHEET_PREFIX, SHEET_SUFFIX);

    let mut rows_seen = 0usize;
    let mut out = String::new();
    for (_, part) in sheets {
        let xml = ooxml::read_part(&mut archive, &part)?;
        rows_seen += append_sheet_rows(&xml, &shared, &mut out)?;
    }

    // a workbook can carry all its text in the string table alone
    if rows_seen == 0 && !shared.is_empty() {
        return Ok(shared.join(" "));
    }
    Ok(out.trim_end().to_string())
}

/// One entry per `si` element, concatenating its text runs so rich-text
/// strings come back whole.
fn parse_shared_strings(xml: &str) -> Result<Vec<String>, ExtractionError> {
    let mut reader = Reader::from_str(xml);
    let mut table = Vec::new();
    let mut current: Option<String> = None;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"si" => current = Some(String::new()),
                b"t" => in_text = true,
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => {
                if let Some(entry) = current.as_mut() {
                    let text = t
                        .unescape()
                        .map_err(|e| ExtractionError::Xml(e.to_string()))?;
                    entry.push_str(&text);
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"si" => {
                    if let Some(entry) = current.take() {
                        table.push(entry);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(ExtractionError::Xml(e.to_string())),
            _ => {}
        }
    }
    Ok(table)
}

/// Walk one worksheet's rows, resolving each `v` value through the shared
/// table when it parses as an in-range index. Returns the row count.
fn append_sheet_rows(
    xml: &str,
    shared: &[String],
    out: &mut String,
) -> Result<usize, ExtractionError> {
    let mut reader = Reader::from_str(xml);
    let mut rows = 0usize;
    let mut row_cells: Option<Vec<String>> = None;
    let mut in_value = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"row" => row_cells = Some(Vec::new()),
                b"v" => in_value = true,
                _ => {}
            },
            Ok(Event::Text(t)) if in_value => {
                if let Some(cells) = row_cells.as_mut() {
                    let raw = t
                        .unescape()
                        .map_err(|e| ExtractionError::Xml(e.to_string()))?;
                    cells.push(resolve_cell_value(&raw, shared));
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"v" => in_value = false,
                b"row" => {
                    if let Some(cells) = row_cells.take() {
                        rows += 1;
                        if !cells.is_empty() {
                            out.push_str(&cells.join("\t"));
                            out.push('\n');
                        }
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(ExtractionError::Xml(e.to_string())),
            _ => {}
        }
    }
    Ok(rows)
}

fn resolve_cell_value(raw: &str, shared: &[String]) -> String {
    match raw.trim().parse::<usize>() {
        Ok(index) if index < shared.len() => shared[index].clone(),
        _ => raw.to_string(),
    }
}
