use std::collections::HashSet;

use crate::candidate::VideoCandidate;

/// Hard cap on a returned result set.
pub const MAX_RESULTS: usize = 48;

/// Merges phase outputs keeping each video id once; the first occurrence
/// wins, so primary-phase candidates shadow fallback duplicates.
pub fn merge_unique(phases: Vec<Vec<VideoCandidate>>) -> Vec<VideoCandidate> {
	let mut seen = HashSet::new();
	let mut merged = Vec::new();

	for phase in phases {
		for candidate in phase {
			if seen.insert(candidate.id.clone()) {
				merged.push(candidate);
			}
		}
	}

	merged
}

/// Sorts descending by growth ratio and truncates. The sort is stable, so
/// equal ratios keep their encounter order and primary-phase results outrank
/// fallback results at a tie.
pub fn rank(mut candidates: Vec<VideoCandidate>) -> Vec<VideoCandidate> {
	candidates.sort_by(|a, b| b.growth_ratio.total_cmp(&a.growth_ratio));
	candidates.truncate(MAX_RESULTS);
	candidates
}
