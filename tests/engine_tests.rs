// Palette assignment tests
// End-to-end checks of the engine against hand-built and generated manifests

mod common;

use common::{assert_palette_covers, manifest, needs, random_manifest, TestRng};
use makechr::engine::{canonicalize, deduplicate, minimize, select_background};
use makechr::{make_palette, ColorIndex, ColorSet, EngineError, PaletteEngine, BLACK};
use std::collections::BTreeSet;

/// Subset elimination checking every pair, for comparison with `minimize`
fn minimize_pairwise(unique: &[ColorSet]) -> Vec<ColorSet> {
    unique
        .iter()
        .filter(|set| {
            !unique
                .iter()
                .any(|other| other != *set && set.is_subset_of(other))
        })
        .cloned()
        .collect()
}

#[test]
fn test_duplicate_full_sets() {
    let blocks = manifest(&[&[1, 2, 3, 4], &[1, 2, 3, 4]]);
    let minimal = minimize(&deduplicate(&blocks));
    assert_eq!(minimal, vec![ColorSet::from_colors([1, 2, 3, 4])]);

    let palette = make_palette(&blocks).expect("one palette");
    assert_eq!(palette.background(), Some(1));
    assert_eq!(palette.len(), 1);
    assert_eq!(palette.get(0), Some(&[1, 2, 3, 4][..]));
}

#[test]
fn test_shared_black_pairs_merge() {
    let blocks = manifest(&[&[BLACK, 0x01], &[BLACK, 0x02], &[BLACK, 0x03], &[BLACK, 0x04]]);
    assert_eq!(minimize(&deduplicate(&blocks)).len(), 4);

    let palette = make_palette(&blocks).expect("pairs merge");
    assert_eq!(palette.background(), Some(BLACK));
    assert_palette_covers(&palette, &blocks);
}

#[test]
fn test_shared_non_black_color_is_background() {
    let blocks = manifest(&[&[0x00, 0x01], &[0x00, 0x02], &[0x00, 0x03], &[0x00, 0x04]]);
    let palette = make_palette(&blocks).expect("pairs merge");
    assert_eq!(palette.background(), Some(0x00));
    assert_palette_covers(&palette, &blocks);
}

#[test]
fn test_five_disjoint_full_sets_fail() {
    let blocks = manifest(&[
        &[0x01, 0x02, 0x03, 0x04],
        &[0x05, 0x06, 0x07, 0x08],
        &[0x11, 0x12, 0x13, 0x14],
        &[0x15, 0x16, 0x17, 0x18],
        &[0x21, 0x22, 0x23, 0x24],
    ]);
    assert!(matches!(
        make_palette(&blocks),
        Err(EngineError::TooManyPalettes { .. })
    ));
}

#[test]
fn test_unmergeable_partial_sets_fail_with_remaining() {
    // Three colors each plus no shared color anywhere
    let blocks = manifest(&[&[0x01, 0x02, 0x03], &[0x11, 0x12, 0x13]]);
    match make_palette(&blocks) {
        Err(EngineError::TooManyPalettes {
            finalized,
            remaining: Some(remaining),
        }) => {
            assert!(finalized.is_empty());
            assert_eq!(remaining.len(), 2);
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_black_preferred_over_smaller_color() {
    let blocks = manifest(&[&[0x00, BLACK, 0x10], &[0x00, BLACK, 0x20, 0x30]]);
    let palette = make_palette(&blocks).expect("fits");
    assert_eq!(palette.background(), Some(BLACK));
}

#[test]
fn test_error_message_lists_sets() {
    let blocks = manifest(&[&[0x01, 0x02, 0x03], &[0x11, 0x12, 0x13]]);
    let message = make_palette(&blocks).unwrap_err().to_string();
    assert_eq!(
        message,
        "Too many palettes: finalized none, to merge [03-02-01] [13-12-11]"
    );
}

#[test]
fn test_canonicalize_properties() {
    let mut rng = TestRng::new(7);
    for block in random_manifest(&mut rng, 200, &[0x00, 0x0F, 0x16, 0x21, 0x30, 0x3A], None) {
        let once = canonicalize(&block);
        let twice = ColorSet::from_colors(once.as_slice().iter().copied());
        assert_eq!(once, twice);

        let mut reversed: Vec<ColorIndex> = block.colors().collect();
        reversed.reverse();
        assert_eq!(canonicalize(&needs(&reversed)), once);
    }
}

#[test]
fn test_minimize_matches_pairwise_elimination() {
    let mut rng = TestRng::new(42);
    let pool = [0x01, 0x02, 0x05, 0x0F, 0x11, 0x16, 0x27, 0x30];
    for _ in 0..300 {
        let blocks = random_manifest(&mut rng, 12, &pool, None);
        let unique = deduplicate(&blocks);
        let minimal = minimize(&unique);
        assert_eq!(minimal, minimize_pairwise(&unique));

        // Soundness: nothing left is covered by anything else
        for (i, a) in minimal.iter().enumerate() {
            for (j, b) in minimal.iter().enumerate() {
                if i != j {
                    assert!(!a.is_subset_of(b), "{} is covered by {}", a, b);
                }
            }
        }

        // Coverage: every non-empty block fits some minimal set
        for block in &blocks {
            let set = canonicalize(block);
            if !set.is_empty() {
                assert!(minimal.iter().any(|m| set.is_subset_of(m)));
            }
        }
    }
}

#[test]
fn test_generated_palettes_cover_their_manifests() {
    let mut rng = TestRng::new(2024);
    let pool = [0x01, 0x11, 0x21, 0x16, 0x26, 0x30];
    let mut solved = 0;
    for _ in 0..200 {
        let blocks = random_manifest(&mut rng, 8, &pool, Some(BLACK));
        match make_palette(&blocks) {
            Ok(palette) => {
                solved += 1;
                assert_palette_covers(&palette, &blocks);
                let rows: Vec<BTreeSet<ColorIndex>> =
                    palette.rows().map(|row| row.iter().copied().collect()).collect();
                assert_eq!(select_background(&rows), palette.background());
            }
            Err(EngineError::TooManyPalettes { .. }) => {}
            Err(e) => panic!("unexpected error: {}", e),
        }
    }
    assert!(solved > 0);
}

#[test]
fn test_result_independent_of_block_order() {
    let mut rng = TestRng::new(99);
    let pool = [0x02, 0x12, 0x22, 0x07, 0x17];
    for _ in 0..50 {
        let mut blocks = random_manifest(&mut rng, 10, &pool, Some(BLACK));
        let forward = make_palette(&blocks);
        blocks.reverse();
        assert_eq!(make_palette(&blocks), forward);
    }
}

#[test]
fn test_tight_budget_fails_fast() {
    // Eight pairs sharing black need at least three palettes, so the search
    // has to walk well past the first few strategies.
    let blocks: Vec<_> = (1..=8u8).map(|c| needs(&[BLACK, c])).collect();
    let engine = PaletteEngine::new().with_search_budget(Some(10));
    assert_eq!(
        engine.make_palette(&blocks),
        Err(EngineError::SearchBudgetExceeded { budget: 10 })
    );

    let palette = PaletteEngine::new()
        .make_palette(&blocks)
        .expect("eight pairs fit in three palettes");
    assert_palette_covers(&palette, &blocks);
}
