use std::path::Path;

use crate::ParserError;
use crate::common::text::decode_text;
use crate::mat::types::LegacyMaterial;

const ROUGHNESS_SUFFIX: char = 'R';

pub struct MatReader {}

impl MatReader {
    pub fn parse_file(path: &Path) -> Result<LegacyMaterial, ParserError> {
        let bytes = std::fs::read(path)?;
        let (content, _) = decode_text(&bytes).ok_or(ParserError::FormatError {
            reason: "the material file is not valid text",
        })?;

        Ok(Self::parse_str(&content))
    }

    /// Parses the `Key=Value` lines. Only `Diffuse`, `Normal`, `SpecPower` and `Other[..]` are relevant,
    /// the last occurrence of a key wins.
    pub fn parse_str(content: &str) -> LegacyMaterial {
        let mut material = LegacyMaterial::default();

        for line in content.lines() {
            if !["Diffuse", "Normal", "SpecPower", "Other["]
                .iter()
                .any(|prefix| line.starts_with(prefix))
            {
                continue;
            }

            let mut split = line.split('=');
            let key = split.next().unwrap_or_default();
            let Some(value) = split.next().map(str::trim) else {
                continue;
            };

            match key {
                "Diffuse" => material.diffuse = value.to_string(),
                "Normal" => material.normal = value.to_string(),
                "SpecPower" => material.spec = value.to_string(),
                _ if key.starts_with("Other[") && value.ends_with(ROUGHNESS_SUFFIX) => {
                    material.roughness = value.to_string()
                }
                _ => {}
            }
        }

        // No explicit roughness map: the exporter names it like the diffuse one, with an R suffix.
        if material.roughness.is_empty() && !material.diffuse.is_empty() {
            let mut chars = material.diffuse.chars();
            chars.next_back();
            material.roughness = format!("{}{}", chars.as_str(), ROUGHNESS_SUFFIX);
        }

        material
    }
}
