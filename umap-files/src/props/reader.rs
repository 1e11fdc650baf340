use std::path::Path;
use std::sync::LazyLock;

use log::{debug, trace};
use regex::{Captures, Regex};

use crate::common::text::decode_text;
use crate::props::types::{BlendMode, LinearColor, MaterialProperties};

static BLEND_MODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"BlendMode\s*=\s*BLEND_\w+\s*\((\d+)\)").expect("valid regex"));

static TWO_SIDED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)TwoSided\s*=\s*(true|false)").expect("valid regex"));

static OPACITY_CLIP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"OpacityMaskClipValue\s*=\s*([\d.]+)").expect("valid regex"));

static SCALAR_PARAMETER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)ParameterInfo\s*=\s*\{\s*Name\s*=\s*(\w+)\s*\}[^}]*?ParameterValue\s*=\s*([-\d.]+)")
        .expect("valid regex")
});

// The color block has its own braces, so the value can't be captured by the scalar pattern.
static VECTOR_PARAMETER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?s)ParameterInfo\s*=\s*\{\s*Name\s*=\s*(\w+)\s*\}[^}]*?ParameterValue\s*=\s*",
        r"\{\s*R\s*=\s*([-\d.]+)\s*,\s*G\s*=\s*([-\d.]+)\s*,\s*B\s*=\s*([-\d.]+)\s*,\s*A\s*=\s*([-\d.]+)\s*\}"
    ))
    .expect("valid regex")
});

// Older dumps list the color before the parameter name.
static VECTOR_PARAMETER_VALUE_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?s)Value\s*=\s*\{\s*R\s*=\s*([-\d.]+)\s*,\s*G\s*=\s*([-\d.]+)\s*,\s*B\s*=\s*([-\d.]+)\s*,\s*A\s*=\s*([-\d.]+)\s*\}",
        r"[^}]*?Name\s*=\s*(\w+)"
    ))
    .expect("valid regex")
});

static TEXTURE_PARAMETER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"ParameterInfo\s*=\s*\{\s*Name\s*=\s*([^\}]+?)\s*\}",
        r"\s+",
        r"ParameterValue\s*=\s*Texture2D'[^']*?/([^/']+)\.[^']*'"
    ))
    .expect("valid regex")
});

pub struct PropsReader {}

impl PropsReader {
    /// Never fails: an unreadable file results in the default properties.
    pub fn parse_file(path: &Path) -> MaterialProperties {
        let content = std::fs::read(path)
            .map_err(|err| debug!("Failed to read {}: {}", path.display(), err))
            .ok()
            .and_then(|bytes| decode_text(&bytes));

        match content {
            Some((text, _)) => Self::parse_str(&text),
            None => MaterialProperties::default(),
        }
    }

    pub fn parse_str(content: &str) -> MaterialProperties {
        let mut result = MaterialProperties::default();

        if let Some(mode) = BLEND_MODE
            .captures(content)
            .and_then(|captures| captures[1].parse::<u32>().ok())
        {
            match BlendMode::from_index(mode) {
                Some(blend_mode) => result.blend_mode = blend_mode,
                None => debug!("Unknown blend mode {}, keeping {:?}", mode, result.blend_mode),
            }
        }

        if let Some(captures) = TWO_SIDED.captures(content) {
            result.two_sided = captures[1].eq_ignore_ascii_case("true");
        }

        if let Some(clip) = OPACITY_CLIP
            .captures(content)
            .and_then(|captures| captures[1].parse::<f32>().ok())
        {
            result.opacity_clip = clip;
        }

        for captures in SCALAR_PARAMETER.captures_iter(content) {
            match captures[2].parse::<f32>() {
                Ok(value) => {
                    result.scalar_params.insert(captures[1].to_string(), value);
                }
                Err(_) => trace!("Skipping scalar {} with value {}", &captures[1], &captures[2]),
            }
        }

        for captures in VECTOR_PARAMETER.captures_iter(content) {
            if let Some(color) = parse_color(&captures, 2) {
                result.vector_params.insert(captures[1].to_string(), color);
            }
        }

        // Only fall back to the other layout, it would pair a color with the following entry's name otherwise.
        if result.vector_params.is_empty() {
            for captures in VECTOR_PARAMETER_VALUE_FIRST.captures_iter(content) {
                if let Some(color) = parse_color(&captures, 1) {
                    result.vector_params.insert(captures[5].to_string(), color);
                }
            }
        }

        for captures in TEXTURE_PARAMETER.captures_iter(content) {
            result
                .texture_params
                .insert(captures[1].trim().to_string(), captures[2].trim().to_string());
        }

        result
    }
}

fn parse_color(captures: &Captures, first_group: usize) -> Option<LinearColor> {
    let component = |offset: usize| captures[first_group + offset].parse::<f32>().ok();

    Some(LinearColor {
        r: component(0)?,
        g: component(1)?,
        b: component(2)?,
        a: component(3)?,
    })
}
