//! Property tests for overlapping text chunking.

use kt_rag::chunks;
use proptest::prelude::*;

/// Valid chunking parameters: `chunk_size > 0` and `overlap < chunk_size`.
fn arb_params() -> impl Strategy<Value = (usize, usize)> {
    (1usize..64).prop_flat_map(|chunk_size| (Just(chunk_size), 0..chunk_size))
}

/// Arbitrary unicode text, counted in characters.
fn arb_text() -> impl Strategy<Value = String> {
    proptest::collection::vec(proptest::char::any(), 0..300).prop_map(String::from_iter)
}

/// **Chunk coverage**: concatenating the first `chunk_size - overlap`
/// characters of every chunk reconstructs the source text exactly — no
/// gaps, no duplication beyond the overlap band.
mod prop_chunk_coverage {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn concatenated_chunk_heads_reconstruct_the_text(
            text in arb_text(),
            (chunk_size, overlap) in arb_params(),
        ) {
            let step = chunk_size - overlap;
            let reconstructed: String = chunks(&text, chunk_size, overlap)
                .flat_map(|chunk| chunk.chars().take(step))
                .collect();
            prop_assert_eq!(reconstructed, text);
        }
    }
}

/// **Chunk count bound**: text of `L` characters yields exactly
/// `ceil(L / (chunk_size - overlap))` chunks (0 for empty text), each of
/// at most `chunk_size` characters.
mod prop_chunk_count {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn count_matches_ceil_of_len_over_step(
            text in arb_text(),
            (chunk_size, overlap) in arb_params(),
        ) {
            let step = chunk_size - overlap;
            let char_len = text.chars().count();
            let expected = char_len.div_ceil(step);

            let collected: Vec<&str> = chunks(&text, chunk_size, overlap).collect();
            prop_assert_eq!(collected.len(), expected);

            for chunk in &collected {
                let len = chunk.chars().count();
                prop_assert!(len > 0, "empty chunk produced");
                prop_assert!(len <= chunk_size, "chunk of {} chars exceeds {}", len, chunk_size);
            }
        }
    }
}

/// Production parameters, concrete: chunk_size=1000, overlap=200, 2500
/// characters of text.
#[test]
fn production_parameters_on_2500_chars() {
    let text: String = ('a'..='z').cycle().take(2500).collect();
    let collected: Vec<&str> = chunks(&text, 1000, 200).collect();

    let lengths: Vec<usize> = collected.iter().map(|c| c.chars().count()).collect();
    assert_eq!(lengths, vec![1000, 1000, 900, 100]);

    // Consecutive chunks start 800 characters apart, so each shares its
    // first 200 characters with the previous chunk's tail.
    for pair in collected.windows(2) {
        let tail: String = pair[0].chars().skip(800).collect();
        let head: String = pair[1].chars().take(tail.chars().count()).collect();
        assert_eq!(tail, head);
    }
}

#[test]
fn text_of_exactly_one_step_yields_one_chunk() {
    let text = "x".repeat(800);
    assert_eq!(chunks(&text, 1000, 200).count(), 1);
}
