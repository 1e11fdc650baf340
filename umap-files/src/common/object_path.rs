use regex::Regex;
use std::sync::LazyLock;

static ACTOR_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.(\w+)'$").expect("valid actor regex"));

/// ObjectPaths end with a period and an export index (`Foo/Bar/Mesh.0`), this cuts that off.
/// Note: Paths that contain multiple periods are cut at the first one.
pub fn split_object_path(object_path: &str) -> &str {
    match object_path.split_once('.') {
        Some((path, _)) => path,
        None => object_path,
    }
}

/// Same as [`split_object_path`], but cuts at the last period, so only the export index is removed.
pub fn strip_export_index(object_path: &str) -> &str {
    match object_path.rsplit_once('.') {
        Some((path, _)) => path,
        None => object_path,
    }
}

/// `LiS/Content/Audio/Play_A_BlowTrees.0` -> `Play_A_BlowTrees`
pub fn short_object_name(object_path: &str) -> &str {
    let last_segment = object_path.rsplit('/').next().unwrap_or(object_path);
    split_object_path(last_segment)
}

/// Extracts the name inside the quotes of a typed reference, e.g.
/// `SkeletalMesh'CH_L_Hayden01'` with the tag `SkeletalMesh` yields `CH_L_Hayden01`.
pub fn quoted_reference<'a>(object_name: &'a str, type_tag: &str) -> Option<&'a str> {
    let prefix = format!("{}'", type_tag);
    let start = object_name.find(&prefix)? + prefix.len();
    let length = object_name[start..].find('\'')?;

    if length == 0 {
        return None;
    }

    Some(&object_name[start..start + length])
}

/// Extracts the actor's short name from `SkeletalMeshActorMAT'E1_2A:PersistentLevel.SkeletalMeshActorMAT_9'`,
/// which is the last path segment before the trailing quote.
pub fn actor_short_name(object_name: &str) -> Option<&str> {
    ACTOR_NAME
        .captures(object_name)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}
