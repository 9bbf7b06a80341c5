use tracing::debug;

use crate::models::ScoredCandidate;

/// Pick the stream URL to use from scored candidates
///
/// Highest score wins, earliest candidate on ties. When nothing scored above
/// zero the first `.m3u8` candidate is returned anyway. `None` means no
/// usable candidate, which is a normal outcome.
pub fn select_best(scored: &[ScoredCandidate]) -> Option<String> {
    let mut best: Option<&ScoredCandidate> = None;
    for item in scored {
        match best {
            Some(current) if item.score <= current.score => {}
            _ => best = Some(item),
        }
    }

    let best = best?;
    if best.score > 0 {
        debug!(
            "Selected {} with score {}",
            best.candidate.url, best.score
        );
        return Some(best.candidate.url.clone());
    }

    let fallback = scored
        .iter()
        .find(|item| item.candidate.url.to_lowercase().contains(".m3u8"))
        .map(|item| item.candidate.url.clone());
    if let Some(url) = &fallback {
        debug!("No candidate scored above zero, falling back to {}", url);
    }
    fallback
}
