pub mod audio_index;
/// Filename based lookups into the unpacked asset directory.
pub mod file_index;
