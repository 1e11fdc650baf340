/// Scene, importer and progress traits of the host tool, plus an in-memory host.
pub mod host;
pub mod import;
pub mod importer;
pub mod io;
/// Rebuilds shading graphs from the game's material definitions.
pub mod material;
pub mod resolver;
pub mod settings;

#[cfg(test)]
mod test_support;
