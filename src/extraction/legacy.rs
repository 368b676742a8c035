//! Legacy binary formats (.doc, .ppt, .xls): printable-text salvage.
//!
//! The OLE compound-file layout is not parsed. Instead the bytes are scanned
//! for runs of printable ASCII, which recovers most human-entered text from
//! these containers while dropping the binary structure around it.

const PRINTABLE_LOW: u8 = 32;
const PRINTABLE_HIGH: u8 = 126;

/// Runs of this length or shorter are treated as structural noise.
const MIN_RUN_CHARS: usize = 3;

/// Cap on salvaged output, in characters.
pub const LEGACY_TEXT_CAP: usize = 15_000;

/// Scan `bytes` for printable ASCII runs longer than three characters,
/// normalize whitespace, and cap the result. Infallible: any input produces
/// a (possibly empty) string.
pub fn extract_legacy_text(bytes: &[u8]) -> String {
    let mut chunks: Vec<String> = Vec::new();
    let mut run = String::new();

    for &b in bytes {
        match b {
            PRINTABLE_LOW..=PRINTABLE_HIGH => run.push(b as char),
            b'\n' | b'\r' => run.push(' '),
            _ => flush_run(&mut run, &mut chunks),
        }
    }
    flush_run(&mut run, &mut chunks);

    let joined = chunks.join(" ");
    let mut text = joined.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.chars().count() > LEGACY_TEXT_CAP {
        text = text.chars().take(LEGACY_TEXT_CAP).collect();
    }
    text
}

fn flush_run(run: &mut String, chunks: &mut Vec<String>) {
    if run.trim().len() > MIN_RUN_CHARS {
        chunks.push(std::mem::take(run));
    } else {
        run.clear();
    }
}
