// Find and return the highest scoring element of the iterator.
// If multiple elements share the highest score, the first one wins.
// Constraints:
//   - Don't call the scoring function more than once per element.
//   - Ties resolve by iteration order, so callers that iterate in
//       ascending key order get the lowest key.
pub(super) fn first_best<T, I, F>(items: I, score_fn: F) -> Option<T>
where
    I: IntoIterator<Item = T>,
    F: Fn(&T) -> f64,
{
    let mut best_score = f64::NEG_INFINITY;
    let mut best = None;
    for item in items {
        let score = score_fn(&item);
        debug_assert!(!score.is_nan());
        // Strictly greater, so a later equal score never replaces the first.
        if best.is_none() || score > best_score {
            best_score = score;
            best = Some(item);
        }
    }
    best
}
