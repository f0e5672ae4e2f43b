/// Count the chunks of an alignment.
///
/// Pairs are sorted by hypothesis index, then reference index. A chunk starts
/// at the first pair and at every pair that does not continue the previous
/// one by exactly one position in both sentences. Input order does not matter.
#[must_use]
pub fn count_chunks(alignment: &[(usize, usize)]) -> usize {
    let mut sorted = alignment.to_vec();
    sorted.sort_unstable();

    let mut chunks = 0;
    let mut previous: Option<(usize, usize)> = None;
    for &(h, r) in &sorted {
        let continues = previous.is_some_and(|(ph, pr)| h == ph + 1 && r == pr + 1);
        if !continues {
            chunks += 1;
        }
        previous = Some((h, r));
    }

    chunks
}
