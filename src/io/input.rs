use std::path::Path;

use anyhow::{bail, Context, Result};

/// File extensions accepted as transcripts
pub const TRANSCRIPT_EXTENSIONS: &[&str] = &["txt", "md"];

/// Read a `.txt` or `.md` transcript fully into memory.
///
/// The content is not inspected; an empty file is a valid transcript.
pub fn read_transcript(path: &Path) -> Result<String> {
    if !has_transcript_extension(path) {
        bail!(
            "Unsupported transcript file {:?}: expected one of {:?}",
            path,
            TRANSCRIPT_EXTENSIONS
        );
    }

    let bytes = std::fs::read(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    String::from_utf8(bytes).with_context(|| format!("Transcript {:?} is not valid UTF-8", path))
}

fn has_transcript_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            TRANSCRIPT_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
}
