use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::warn;
use serde_json::Value;

use crate::ParserError;
use crate::entity::types::Entity;

pub struct EntityReader {}

impl EntityReader {
    pub fn parse_file(path: &Path) -> Result<Vec<Entity>, ParserError> {
        let file = File::open(path)?;
        Self::parse_reader(BufReader::new(file))
    }

    pub fn parse_str(content: &str) -> Result<Vec<Entity>, ParserError> {
        Self::parse_reader(content.as_bytes())
    }

    /// The export is an array of entities. Elements that aren't entities (e.g. bare strings) are skipped
    /// instead of failing the whole file.
    pub fn parse_reader<R: Read>(mut reader: R) -> Result<Vec<Entity>, ParserError> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;

        if buf.iter().all(u8::is_ascii_whitespace) {
            return Err(ParserError::EmptySource);
        }

        let root: Value = serde_json::from_slice(&buf)?;
        let Value::Array(items) = root else {
            return Err(ParserError::FormatError {
                reason: "the root of an export has to be an array of entities",
            });
        };

        let entities = items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| match serde_json::from_value::<Entity>(item) {
                Ok(entity) => Some(entity),
                Err(err) => {
                    warn!("Skipping element #{} of the export: {}", index, err);
                    None
                }
            })
            .collect();

        Ok(entities)
    }
}
