use std::ops::RangeInclusive;
use std::path::PathBuf;

use clap::{Parser, value_parser};

const SCALE_RANGE: RangeInclusive<f32> = 0.01..=100.0;

#[derive(Parser, Debug)]
#[command(name = "umap-importer")]
#[command(version = concat!(env!("VERGEN_GIT_BRANCH"), "/", env!("VERGEN_GIT_SHA"), " dirty: ", env!("VERGEN_GIT_DIRTY")))]
#[command(about = "Imports exported LiS:R level entity dumps into a 3D scene")]
pub struct CliArgs {
    /// Directory that contains the unpacked assets (LiS/Content/...)
    #[arg(long, env = "UMAP_BASE_DIR", default_value_t = default_base_dir())]
    pub base_dir: String,

    /// The exported .umap JSON files, imported in the given order
    #[arg(required = true)]
    pub json_files: Vec<PathBuf>,

    /// Skip static and skeletal meshes
    #[arg(long)]
    pub no_meshes: bool,

    #[arg(long, overrides_with = "no_lights")]
    pub lights: bool,

    #[arg(long, overrides_with = "lights")]
    pub no_lights: bool,

    /// Import the PSA animations referenced by skeletal meshes and matinee tracks
    #[arg(long)]
    pub animations: bool,

    /// Import SD3DSound actors as speakers
    #[arg(long)]
    pub sounds: bool,

    #[arg(long, default_value_t = 1.0, value_parser = parse_scale)]
    pub scale: f32,

    /// Entities processed per tick
    #[arg(long, default_value_t = 5, value_parser = value_parser!(u16).range(1..))]
    pub batch_size: u16,

    /// Writes the resulting scene as JSON
    #[arg(long)]
    pub report: Option<PathBuf>,
}

pub fn default_base_dir() -> String {
    std::env::current_dir()
        .map(|dir| dir.to_string_lossy().to_string())
        .unwrap_or_else(|_| ".".to_string())
}

fn parse_scale(value: &str) -> Result<f32, String> {
    let scale = value
        .parse::<f32>()
        .map_err(|err| format!("{} is not a number: {}", value, err))?;

    if !SCALE_RANGE.contains(&scale) {
        return Err(format!(
            "{} is outside of {}..={}",
            scale,
            SCALE_RANGE.start(),
            SCALE_RANGE.end()
        ));
    }

    Ok(scale)
}

/// What to import and how, independent of where the values came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSettings {
    pub base_dir: PathBuf,
    pub import_meshes: bool,
    pub import_lights: bool,
    pub import_animations: bool,
    pub import_sounds: bool,
    pub scale_factor: f32,
    pub batch_size: usize,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from(default_base_dir()),
            import_meshes: true,
            import_lights: true,
            import_animations: false,
            import_sounds: false,
            scale_factor: 1.0,
            batch_size: 5,
        }
    }
}

impl From<&CliArgs> for ImportSettings {
    fn from(args: &CliArgs) -> Self {
        Self {
            base_dir: PathBuf::from(&args.base_dir),
            import_meshes: !args.no_meshes,
            import_lights: !args.no_lights,
            import_animations: args.animations,
            import_sounds: args.sounds,
            scale_factor: args.scale,
            batch_size: args.batch_size as usize,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<CliArgs, clap::Error> {
        CliArgs::try_parse_from(
            ["umap-importer", "--base-dir", "/assets"]
                .iter()
                .chain(args.iter()),
        )
    }

    #[test]
    fn defaults() -> Result<(), anyhow::Error> {
        let settings = ImportSettings::from(&parse(&["E1_2A_Classroom.json"])?);

        assert_eq!(settings.base_dir, PathBuf::from("/assets"));
        assert!(settings.import_meshes);
        assert!(settings.import_lights);
        assert!(!settings.import_animations);
        assert!(!settings.import_sounds);
        assert_eq!(settings.scale_factor, 1.0);
        assert_eq!(settings.batch_size, 5);
        Ok(())
    }

    #[test]
    fn toggles() -> Result<(), anyhow::Error> {
        let args = parse(&[
            "--no-meshes",
            "--no-lights",
            "--animations",
            "--sounds",
            "--scale",
            "2.5",
            "a.json",
            "b.json",
        ])?;
        assert_eq!(args.json_files.len(), 2);

        let settings = ImportSettings::from(&args);
        assert!(!settings.import_meshes);
        assert!(!settings.import_lights);
        assert!(settings.import_animations);
        assert!(settings.import_sounds);
        assert_eq!(settings.scale_factor, 2.5);

        let settings = ImportSettings::from(&parse(&["--no-lights", "--lights", "a.json"])?);
        assert!(settings.import_lights);
        Ok(())
    }

    #[test]
    fn invalid_values() {
        assert!(parse(&["--scale", "0.001", "a.json"]).is_err());
        assert!(parse(&["--scale", "abc", "a.json"]).is_err());
        assert!(parse(&["--batch-size", "0", "a.json"]).is_err());
        assert!(parse(&[]).is_err());
    }
}
