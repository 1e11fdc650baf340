#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Latin1,
}

/// The order in which encodings are tried. Latin-1 maps every byte, so it never fails.
pub const FALLBACK_ORDER: [TextEncoding; 2] = [TextEncoding::Utf8, TextEncoding::Latin1];

impl TextEncoding {
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            TextEncoding::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_string),
            TextEncoding::Latin1 => Some(bytes.iter().map(|&b| b as char).collect()),
        }
    }
}

/// Tries the encodings of [`FALLBACK_ORDER`], first success wins.
pub fn decode_text(bytes: &[u8]) -> Option<(String, TextEncoding)> {
    FALLBACK_ORDER
        .iter()
        .find_map(|&encoding| encoding.decode(bytes).map(|text| (text, encoding)))
}
