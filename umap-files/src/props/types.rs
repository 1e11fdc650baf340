use std::collections::BTreeMap;

use serde::Serialize;

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize)]
pub enum BlendMode {
    #[default]
    Opaque,
    Masked,
    Translucent,
    Additive,
}

impl BlendMode {
    /// Maps the numeric value of `BLEND_X (N)`, unknown values yield `None`.
    pub fn from_index(index: u32) -> Option<Self> {
        match index {
            0 => Some(BlendMode::Opaque),
            1 => Some(BlendMode::Masked),
            2 => Some(BlendMode::Translucent),
            3 => Some(BlendMode::Additive),
            _ => None,
        }
    }
}

/// Parameter color, in the order the exporter writes them.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct LinearColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialProperties {
    pub blend_mode: BlendMode,
    pub two_sided: bool,
    pub opacity_clip: f32,
    pub scalar_params: BTreeMap<String, f32>,
    pub vector_params: BTreeMap<String, LinearColor>,
    /// Parameter name -> texture base name (without directory and extension)
    pub texture_params: BTreeMap<String, String>,
}

impl Default for MaterialProperties {
    fn default() -> Self {
        Self {
            blend_mode: BlendMode::Opaque,
            two_sided: false,
            opacity_clip: 0.5,
            scalar_params: BTreeMap::new(),
            vector_params: BTreeMap::new(),
            texture_params: BTreeMap::new(),
        }
    }
}

impl MaterialProperties {
    pub fn scalar(&self, name: &str) -> Option<f32> {
        self.scalar_params.get(name).copied()
    }

    pub fn texture(&self, name: &str) -> Option<&str> {
        self.texture_params.get(name).map(String::as_str)
    }
}
