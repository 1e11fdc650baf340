use std::path::Path;

use log::trace;

use crate::ParserError;
use crate::audio::types::{is_wwise_id, TranslationTable};
use crate::common::text::decode_text;

const SECTION_START: &str = "In Memory Audio";
const SECTION_ENDS: [&str; 4] = ["Event\t", "Switch Group\t", "Switch\t", "State Group\t"];

pub struct TranslationTableReader {}

impl TranslationTableReader {
    pub fn parse_file(path: &Path) -> Result<TranslationTable, ParserError> {
        let bytes = std::fs::read(path)?;
        let (content, encoding) = decode_text(&bytes).ok_or(ParserError::FormatError {
            reason: "the translation table is not valid text",
        })?;

        trace!("Decoded {} as {:?}", path.display(), encoding);
        Ok(Self::parse_str(&content))
    }

    pub fn parse_str(content: &str) -> TranslationTable {
        let mut table = TranslationTable::default();
        let mut in_section = false;

        for line in content.split('\n') {
            if line.starts_with(SECTION_START) {
                in_section = true;
                continue;
            }

            if SECTION_ENDS.iter().any(|end| line.starts_with(end)) {
                in_section = false;
                continue;
            }

            if !in_section || !line.contains('\t') {
                continue;
            }

            let mut columns = line.trim().split('\t');
            let (Some(id), Some(name)) = (columns.next(), columns.next()) else {
                continue;
            };

            let (id, name) = (id.trim(), name.trim());
            if is_wwise_id(id) && !name.is_empty() {
                table.names.insert(id.to_string(), name.to_string());
            }
        }

        table
    }
}
