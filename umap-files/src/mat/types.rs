use serde::Serialize;

/// Texture names of a `.mat` file, each possibly empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LegacyMaterial {
    pub diffuse: String,
    pub normal: String,
    pub spec: String,
    pub roughness: String,
}

impl LegacyMaterial {
    pub fn has_surface(&self) -> bool {
        !self.diffuse.is_empty() || !self.normal.is_empty()
    }
}
