use energy_mix::mix::{CategorySet, MixConfig};
use energy_mix::models::{Category, FOUR_CATEGORIES};
use proptest::prelude::*;

fn four() -> CategorySet {
    CategorySet::new(
        [
            (Category::Fossil, 40.0),
            (Category::Nuclear, 30.0),
            (Category::Renewable, 25.0),
            (Category::Hydro, 5.0),
        ],
        MixConfig::default(),
    )
    .expect("valid mix")
}

proptest! {
    #[test]
    fn unlocked_moves_keep_total_and_floor(
        steps in prop::collection::vec((0usize..4, 0.1f64..95.0), 1..24)
    ) {
        let mut mix = four();
        for (i, value) in steps {
            let target = FOUR_CATEGORIES[i];
            let applied = mix.set_share(target, value).expect("known category").is_applied();
            prop_assert!(applied);
            prop_assert!((mix.total() - 100.0).abs() < 0.05, "total {}", mix.total());
            for slot in mix.iter() {
                prop_assert!(slot.share >= 0.1 - 1e-12, "{} at {}", slot.category, slot.share);
            }
        }
    }

    #[test]
    fn locked_share_never_moves(
        steps in prop::collection::vec((0usize..3, 0.1f64..50.0), 1..24)
    ) {
        let movable = [Category::Fossil, Category::Renewable, Category::Hydro];
        let mut mix = four();
        let _ = mix.set_locked(Category::Nuclear, true).expect("known category");
        for (i, value) in steps {
            let _ = mix.set_share(movable[i], value).expect("known category");
            prop_assert_eq!(mix.share(Category::Nuclear).expect("known category"), 30.0);
            prop_assert!((mix.total() - 100.0).abs() < 0.05, "total {}", mix.total());
        }
    }

    #[test]
    fn refused_requests_leave_state_untouched(value in 69.81f64..500.0) {
        let mut mix = four();
        let _ = mix.set_locked(Category::Nuclear, true).expect("known category");
        let before = mix.clone();
        let applied = mix.set_share(Category::Fossil, value).expect("known category").is_applied();
        prop_assert!(!applied);
        prop_assert_eq!(mix, before);
    }
}
