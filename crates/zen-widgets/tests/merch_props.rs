//! Merch progress properties

use proptest::prelude::*;
use zen_ui::MemoryStorage;
use zen_widgets::{MerchConfig, MerchProduct, MerchProgress, MerchTracker};

proptest! {
    #[test]
    fn prop_percent_is_bounded_and_monotone(display in 0u32..500, goal in 1u32..200) {
        let p = MerchProgress::compute("p", display, goal, false);
        prop_assert!(p.percent <= 100);
        let next = MerchProgress::compute("p", display + 1, goal, false);
        prop_assert!(next.percent >= p.percent);
    }

    #[test]
    fn prop_remaining_completes_goal(display in 0u32..500, goal in 1u32..200) {
        let p = MerchProgress::compute("p", display, goal, false);
        match p.remaining {
            Some(n) => prop_assert_eq!(display + n, goal),
            None => prop_assert!(display >= goal),
        }
    }

    #[test]
    fn prop_even_toggles_restore_display(base in 0u32..100, toggles in 0usize..10) {
        let storage = MemoryStorage::new();
        let config = MerchConfig::default()
            .with_products(vec![MerchProduct::new("jaket", "Jaket").with_base(base)]);
        let mut merch = MerchTracker::load(config, &storage);
        let before = merch.progress("jaket").unwrap();

        for _ in 0..toggles * 2 {
            merch.toggle("jaket", &storage).unwrap();
        }

        let after = merch.progress("jaket").unwrap();
        prop_assert_eq!(after.display, before.display);
        prop_assert!(!after.interested);
    }
}
