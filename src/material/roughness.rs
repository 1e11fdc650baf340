use std::path::{Path, PathBuf};

use log::{debug, trace};
use umap_files::props::types::MaterialProperties;

use crate::io::file_index::FileIndex;
use crate::material::texture_path;

/// Only the start of the image is looked at, that's enough to tell a blank channel from roughness data.
pub const ALPHA_SAMPLE_COUNT: usize = 1000;
pub const ALPHA_VARIATION_THRESHOLD: f32 = 0.1;

/// Texture parameter of a dedicated roughness map.
pub const ROUGHNESS_MAP_PARAM: &str = "RoughnessMap";
/// Texture parameter of a normal map that stores roughness in its alpha channel.
pub const NORMAL_ROUGHNESS_PARAM: &str = "NormalMap+Roughness";

pub trait AlphaSampler {
    /// Whether the alpha of the first [`ALPHA_SAMPLE_COUNT`] pixels varies by more than
    /// [`ALPHA_VARIATION_THRESHOLD`]. Unreadable images have no variation.
    fn has_alpha_variation(&self, path: &Path) -> bool;
}

/// Samples in blender's pixel order, which starts with the bottom row.
#[derive(Debug, Default)]
pub struct ImageAlphaSampler {}

impl AlphaSampler for ImageAlphaSampler {
    fn has_alpha_variation(&self, path: &Path) -> bool {
        let image = match image::open(path) {
            Ok(image) => image.to_rgba8(),
            Err(err) => {
                debug!("Can't sample alpha of {}: {}", path.display(), err);
                return false;
            }
        };

        let (width, height) = image.dimensions();
        let samples = (0..height)
            .rev()
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .take(ALPHA_SAMPLE_COUNT)
            .map(|(x, y)| image.get_pixel(x, y)[3] as f32 / 255.0);

        alpha_range(samples).is_some_and(|range| range > ALPHA_VARIATION_THRESHOLD)
    }
}

/// `max - min` of the samples, `None` without samples.
pub fn alpha_range(samples: impl IntoIterator<Item = f32>) -> Option<f32> {
    samples
        .into_iter()
        .fold(None, |range: Option<(f32, f32)>, sample| match range {
            None => Some((sample, sample)),
            Some((min, max)) => Some((min.min(sample), max.max(sample))),
        })
        .map(|(min, max)| max - min)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoughnessResolution {
    /// Dedicated roughness texture, if any
    pub roughness: Option<PathBuf>,
    pub normal: Option<PathBuf>,
    /// Roughness is read from the normal map's alpha channel
    pub normal_alpha_roughness: bool,
}

/// Picks the roughness source, in order of preference:
/// 1. the `RoughnessMap` texture parameter
/// 2. the alpha of the `NormalMap+Roughness` texture (or the `.mat` normal map), when it isn't blank
/// 3. the roughness texture named by the `.mat` file
pub fn resolve_roughness(
    props: Option<&MaterialProperties>,
    index: &FileIndex,
    legacy_roughness: Option<PathBuf>,
    normal: Option<PathBuf>,
    sampler: &dyn AlphaSampler,
) -> RoughnessResolution {
    if let Some(props) = props {
        if let Some(roughness) = props
            .texture(ROUGHNESS_MAP_PARAM)
            .and_then(|name| texture_path(index, name))
        {
            trace!("Roughness from {}", roughness.display());
            return RoughnessResolution {
                roughness: Some(roughness),
                normal,
                normal_alpha_roughness: false,
            };
        }

        if let Some(name) = props.texture(NORMAL_ROUGHNESS_PARAM) {
            let props_normal = texture_path(index, name);
            let candidate = props_normal.as_ref().or(normal.as_ref());

            if candidate.is_some_and(|path| sampler.has_alpha_variation(path)) {
                return RoughnessResolution {
                    roughness: None,
                    normal: props_normal.or(normal),
                    normal_alpha_roughness: true,
                };
            }
        }
    }

    RoughnessResolution {
        roughness: legacy_roughness,
        normal,
        normal_alpha_roughness: false,
    }
}
