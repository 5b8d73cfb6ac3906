use super::types::{ResolvedEntry, SortResult};
use std::cmp::Ordering;

/// Orders entries by barycenter, breaking ties by original index (descending when
/// `bias_right`). Entries without a barycenter keep their original index: they are slotted
/// back in as soon as that many nodes have been placed before them.
pub fn sort(entries: Vec<ResolvedEntry>, bias_right: bool) -> SortResult {
    let (mut sortable, mut unsortable): (Vec<_>, Vec<_>) =
        entries.into_iter().partition(|e| e.barycenter.is_some());
    // Popped from the back, so the smallest index comes out first.
    unsortable.sort_by(|a, b| b.i.cmp(&a.i));
    sortable.sort_by(|a, b| compare_with_bias(a, b, bias_right));

    let mut vs: Vec<String> = Vec::new();
    let mut sum = 0.0;
    let mut weight = 0.0;
    let mut index = consume_unsortable(&mut vs, &mut unsortable, 0);

    for entry in sortable {
        index += entry.vs.len();
        vs.extend(entry.vs);
        let w = entry.weight.unwrap_or(0.0);
        sum += entry.barycenter.unwrap_or(0.0) * w;
        weight += w;
        index = consume_unsortable(&mut vs, &mut unsortable, index);
    }
    // Anything left sits past the end.
    while let Some(entry) = unsortable.pop() {
        vs.extend(entry.vs);
    }

    if weight != 0.0 {
        SortResult {
            vs,
            barycenter: Some(sum / weight),
            weight: Some(weight),
        }
    } else {
        SortResult {
            vs,
            barycenter: None,
            weight: None,
        }
    }
}

fn consume_unsortable(
    vs: &mut Vec<String>,
    unsortable: &mut Vec<ResolvedEntry>,
    mut index: usize,
) -> usize {
    while unsortable.last().is_some_and(|last| last.i <= index) {
        if let Some(entry) = unsortable.pop() {
            vs.extend(entry.vs);
            index += 1;
        }
    }
    index
}

fn compare_with_bias(a: &ResolvedEntry, b: &ResolvedEntry, bias_right: bool) -> Ordering {
    let by_barycenter = a
        .barycenter
        .partial_cmp(&b.barycenter)
        .unwrap_or(Ordering::Equal);
    by_barycenter.then_with(|| {
        if bias_right {
            b.i.cmp(&a.i)
        } else {
            a.i.cmp(&b.i)
        }
    })
}
