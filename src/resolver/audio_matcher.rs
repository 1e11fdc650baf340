use std::path::PathBuf;

use itertools::Itertools;
use log::trace;
use umap_files::common::object_path::short_object_name;

use crate::io::audio_index::AudioIndex;

/// Segments that appear in nearly every sound name.
const STOP_WORDS: [&str; 5] = ["a", "play", "s", "sfx", "amb"];
const WHOLE_SEGMENT_BONUS: f32 = 0.5;

/// The lowercase underscore separated segments that are worth matching on.
pub fn keywords(candidate: &str) -> Vec<String> {
    candidate
        .split('_')
        .filter(|segment| segment.len() > 1)
        .map(str::to_lowercase)
        .filter(|keyword| !STOP_WORDS.contains(&keyword.as_str()))
        .collect_vec()
}

/// One point per keyword contained in `name`, plus a bonus for each keyword that is a whole segment of it.
pub fn score(keywords: &[String], name: &str) -> f32 {
    let name = name.to_lowercase();
    let hits = keywords
        .iter()
        .filter(|keyword| name.contains(keyword.as_str()))
        .count();

    if hits == 0 {
        return 0.0;
    }

    let segments = name.split('_').collect_vec();
    let whole_segments = keywords
        .iter()
        .filter(|keyword| segments.contains(&keyword.as_str()))
        .count();

    hits as f32 + whole_segments as f32 * WHOLE_SEGMENT_BONUS
}

/// Finds the best scoring entry of `index`. At least half of the keywords (and at least one) have to hit.
/// Ties keep the entry that comes first in the index.
pub fn fuzzy_match(candidate: &str, index: &AudioIndex) -> Option<PathBuf> {
    let keywords = keywords(candidate);
    if keywords.is_empty() || index.is_empty() {
        return None;
    }

    let mut best: Option<(f32, &str, PathBuf)> = None;
    for (name, path) in index.iter() {
        let score = score(&keywords, name);
        if score > best.as_ref().map_or(0.0, |(best_score, _, _)| *best_score) {
            best = Some((score, name, path.to_path_buf()));
        }
    }

    let min_required = (keywords.len() / 2).max(1) as f32;
    let (score, name, path) = best?;
    trace!("Best fuzzy match for {}: {} ({})", candidate, name, score);

    (score >= min_required).then_some(path)
}

/// The names a sound may be indexed under, most specific first.
pub fn sound_name_candidates(audio_id: &str, ak_event_path: &str) -> Vec<String> {
    let mut candidates = Vec::new();

    if !audio_id.is_empty() {
        candidates.push(audio_id.to_string());
        if let Some(stripped) = audio_id.strip_prefix("A_") {
            candidates.push(stripped.to_string());
        }
    }

    let event_name = short_object_name(ak_event_path);
    if !event_name.is_empty() {
        candidates.push(event_name.to_string());
        if let Some(stripped) = event_name.strip_prefix("Play_") {
            candidates.push(stripped.to_string());
        }
        if let Some(stripped) = event_name.strip_prefix("Play_A_") {
            candidates.push(stripped.to_string());
        }
    }

    candidates
}

/// Exact lookups in candidate order, then a fuzzy match on the first candidate.
pub fn resolve_sound(candidates: &[String], index: &AudioIndex) -> Option<PathBuf> {
    candidates
        .iter()
        .find_map(|name| index.get(name).map(|path| path.to_path_buf()))
        .or_else(|| {
            candidates
                .first()
                .and_then(|first| fuzzy_match(first, index))
        })
}
