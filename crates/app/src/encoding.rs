/// Output text encodings the tool knows how to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputEncoding {
    Utf8,
    Latin1,
}

fn canonical(name: &str) -> Option<OutputEncoding> {
    match name.to_ascii_lowercase().as_str() {
        "utf8" | "utf-8" => Some(OutputEncoding::Utf8),
        "latin1" | "iso-8859-1" | "iso8859-1" => Some(OutputEncoding::Latin1),
        _ => None,
    }
}

pub fn is_supported(name: &str) -> bool {
    canonical(name).is_some()
}

/// Encode `text` for writing. Latin-1 is a direct codepoint mapping up to
/// U+00FF; anything beyond becomes '?'.
pub fn encode(text: &str, name: &str) -> Option<Vec<u8>> {
    match canonical(name)? {
        OutputEncoding::Utf8 => Some(text.as_bytes().to_vec()),
        OutputEncoding::Latin1 => Some(
            text.chars()
                .map(|c| if (c as u32) < 256 { c as u8 } else { b'?' })
                .collect(),
        ),
    }
}
