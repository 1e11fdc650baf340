/// Helpers for the engine style `ObjectPath`/`ObjectName` reference strings.
pub mod object_path;
/// Decoding of text tables that are not guaranteed to be utf-8.
pub mod text;

#[cfg(test)]
mod tests;
