//! In-memory search and grouping over inventory lists
//!
//! A query is a list of free-text terms with AND semantics: every term must
//! match at least one of the item's searchable fields. A term that parses
//! as a non-negative number additionally matches when the item's price is
//! at or below that ceiling. Both functions are pure and operate on
//! already-fetched lists.

use rust_decimal::Decimal;
use serde::Serialize;

/// Inventory items that can be searched and grouped for display
pub trait Searchable {
    /// Text fields a search term may match against (name, category,
    /// location, room types, amenities, ...)
    fn search_texts(&self) -> Vec<String>;

    /// Price compared against numeric terms; for accommodations this is
    /// the minimum room price
    fn search_price(&self) -> Option<Decimal>;

    /// Category key used for grouped browsing
    fn category_key(&self) -> String;
}

/// Keep the items for which every query term finds a match
pub fn filter_inventory<T: Searchable>(items: Vec<T>, terms: &[String]) -> Vec<T> {
    if terms.is_empty() {
        return items;
    }
    items
        .into_iter()
        .filter(|item| terms.iter().all(|term| term_matches(item, term)))
        .collect()
}

fn term_matches<T: Searchable>(item: &T, term: &str) -> bool {
    let term = term.trim();
    if term.is_empty() {
        return true;
    }

    // Numeric terms act as a price ceiling
    if let Ok(ceiling) = term.parse::<Decimal>() {
        if ceiling >= Decimal::ZERO {
            if let Some(price) = item.search_price() {
                if price <= ceiling {
                    return true;
                }
            }
        }
    }

    let needle = term.to_lowercase();
    item.search_texts()
        .iter()
        .any(|text| text.to_lowercase().contains(&needle))
}

/// A display bucket of items sharing one category
#[derive(Debug, Clone, Serialize)]
pub struct CategoryGroup<T> {
    pub category: String,
    pub items: Vec<T>,
}

/// Bucket items by category, preserving the insertion order of first-seen
/// categories
pub fn group_by_category<T: Searchable>(items: Vec<T>) -> Vec<CategoryGroup<T>> {
    let mut groups: Vec<CategoryGroup<T>> = Vec::new();
    for item in items {
        let key = item.category_key();
        match groups.iter_mut().find(|group| group.category == key) {
            Some(group) => group.items.push(item),
            None => groups.push(CategoryGroup {
                category: key,
                items: vec![item],
            }),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Listing {
        name: String,
        category: String,
        location: String,
        price: Decimal,
    }

    impl Listing {
        fn new(name: &str, category: &str, location: &str, price: i64) -> Self {
            Self {
                name: name.to_string(),
                category: category.to_string(),
                location: location.to_string(),
                price: Decimal::from(price),
            }
        }
    }

    impl Searchable for Listing {
        fn search_texts(&self) -> Vec<String> {
            vec![
                self.name.clone(),
                self.category.clone(),
                self.location.clone(),
            ]
        }

        fn search_price(&self) -> Option<Decimal> {
            Some(self.price)
        }

        fn category_key(&self) -> String {
            self.category.clone()
        }
    }

    fn sample() -> Vec<Listing> {
        vec![
            Listing::new("Sea View Hotel", "Hotels", "Galle", 3000),
            Listing::new("Hilltop Resort", "Resorts", "Kandy", 5500),
            Listing::new("City Homestay", "Homestays", "Colombo", 1500),
            Listing::new("Garden Villa", "Villas", "Galle", 9000),
        ]
    }

    #[test]
    fn empty_query_returns_items_unchanged() {
        let items = sample();
        let filtered = filter_inventory(items.clone(), &[]);
        assert_eq!(filtered, items);
    }

    #[test]
    fn single_term_matches_any_field() {
        let by_name = filter_inventory(sample(), &["sea view".to_string()]);
        assert_eq!(by_name.len(), 1);

        let by_location = filter_inventory(sample(), &["galle".to_string()]);
        assert_eq!(by_location.len(), 2);

        let by_category = filter_inventory(sample(), &["homestays".to_string()]);
        assert_eq!(by_category.len(), 1);
    }

    #[test]
    fn numeric_term_is_a_price_ceiling() {
        let affordable = filter_inventory(sample(), &["3000".to_string()]);
        let names: Vec<_> = affordable.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Sea View Hotel", "City Homestay"]);
    }

    #[test]
    fn terms_combine_with_and_semantics() {
        let terms = vec!["galle".to_string(), "3000".to_string()];
        let matched = filter_inventory(sample(), &terms);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].name, "Sea View Hotel");
    }

    #[test]
    fn sequential_filtering_equals_combined_query() {
        let t1 = "galle".to_string();
        let t2 = "3000".to_string();
        let combined = filter_inventory(sample(), &[t1.clone(), t2.clone()]);
        let sequential = filter_inventory(filter_inventory(sample(), &[t1]), &[t2]);
        assert_eq!(combined, sequential);
    }

    #[test]
    fn grouping_preserves_first_seen_order() {
        let mut items = sample();
        items.push(Listing::new("Beach Hotel", "Hotels", "Trincomalee", 2500));

        let groups = group_by_category(items);
        let order: Vec<_> = groups.iter().map(|g| g.category.as_str()).collect();
        assert_eq!(order, vec!["Hotels", "Resorts", "Homestays", "Villas"]);
        assert_eq!(groups[0].items.len(), 2);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn arb_terms() -> impl Strategy<Value = Vec<String>> {
            prop::collection::vec(
                prop_oneof![
                    "[a-z]{1,8}".prop_map(String::from),
                    (0i64..10_000).prop_map(|n| n.to_string()),
                ],
                0..4,
            )
        }

        proptest! {
            #[test]
            fn filtering_is_order_independent(terms in arb_terms()) {
                let forward = filter_inventory(sample(), &terms);
                let mut reversed = terms.clone();
                reversed.reverse();
                let backward = filter_inventory(sample(), &reversed);
                prop_assert_eq!(forward, backward);
            }

            #[test]
            fn filtering_twice_is_idempotent(terms in arb_terms()) {
                let once = filter_inventory(sample(), &terms);
                let twice = filter_inventory(once.clone(), &terms);
                prop_assert_eq!(once, twice);
            }

            #[test]
            fn split_query_equals_combined(t1 in "[a-z]{1,8}", t2 in 0i64..10_000) {
                let t2 = t2.to_string();
                let combined =
                    filter_inventory(sample(), &[t1.clone(), t2.clone()]);
                let sequential =
                    filter_inventory(filter_inventory(sample(), &[t1]), &[t2]);
                prop_assert_eq!(combined, sequential);
            }
        }
    }
}
