use chrono::NaiveDate;
use medstock::csv::{from_csv, to_csv_file};
use medstock::model::{Category, Product, ProductDraft, ProductId};
use medstock::store::mem_backend::MemBackend;
use medstock::store::ProductStore;
use medstock::view::{project, CategoryFilter};
use proptest::prelude::*;
use std::collections::HashSet;

fn category() -> impl Strategy<Value = Category> {
    prop_oneof![
        Just(Category::Child),
        Just(Category::Adult),
        Just(Category::Both),
    ]
}

fn expiry() -> impl Strategy<Value = Option<NaiveDate>> {
    prop::option::of((0i64..20_000).prop_map(|days| {
        NaiveDate::from_ymd_opt(2000, 1, 1).unwrap() + chrono::Duration::days(days)
    }))
}

prop_compose! {
    fn product()(
        n in 0u32..10_000,
        name in "[A-Za-z][A-Za-z0-9 \"-]{0,20}",
        category in category(),
        kind in "[A-Za-z]{1,10}",
        quantity in any::<u32>(),
        expiry in expiry(),
    ) -> Product {
        let draft = ProductDraft::new(name, category, kind, quantity);
        let draft = match expiry {
            Some(date) => draft.with_expiry(date),
            None => draft,
        };
        draft.into_product(ProductId::new(format!("med_{}", n)))
    }
}

fn without_ids(products: &[Product]) -> Vec<(String, Category, String, u32, Option<NaiveDate>)> {
    products
        .iter()
        .map(|p| (p.name.clone(), p.category, p.kind.clone(), p.quantity, p.expiry_date))
        .collect()
}

proptest! {
    #[test]
    fn csv_round_trip_keeps_everything_but_ids(products in prop::collection::vec(product(), 0..12)) {
        let decoded = from_csv(&to_csv_file(&products)).unwrap();
        prop_assert_eq!(without_ids(&decoded), without_ids(&products));
    }

    #[test]
    fn projection_is_idempotent(
        products in prop::collection::vec(product(), 0..12),
        category in category(),
        search in "[a-z]{0,3}",
    ) {
        let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let filter = CategoryFilter::Only(category);
        let once = project(&products, &filter, &search, today);
        let twice = project(&once.products(), &filter, &search, today);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn quantity_never_goes_negative(start in 0u32..1_000, deltas in prop::collection::vec(-2_000i64..2_000, 1..10)) {
        let mut store = ProductStore::open(MemBackend::new()).unwrap();
        let added = store.add(ProductDraft::new("X", Category::Both, "Tablet", start)).unwrap();

        let mut expected = i64::from(start);
        for delta in deltas {
            let adjusted = store.adjust_quantity(&added.id, delta).unwrap();
            expected = (expected + delta).max(0);
            prop_assert_eq!(i64::from(adjusted.quantity), expected);
        }
    }

    #[test]
    fn ids_stay_unique(count in 1usize..20, duplicates in prop::collection::vec(0usize..20, 0..10)) {
        let mut store = ProductStore::open(MemBackend::new()).unwrap();
        for i in 0..count {
            store.add(ProductDraft::new(format!("P{}", i), Category::Both, "Tablet", 1)).unwrap();
        }

        let mut incoming = store.all().to_vec();
        for d in duplicates {
            let copy = incoming[d % count].clone();
            incoming.push(copy);
        }
        let expected_len = incoming.len();
        store.replace_all(incoming).unwrap();

        let ids: HashSet<&ProductId> = store.all().iter().map(|p| &p.id).collect();
        prop_assert_eq!(ids.len(), expected_len);
        prop_assert_eq!(store.len(), expected_len);
    }
}
