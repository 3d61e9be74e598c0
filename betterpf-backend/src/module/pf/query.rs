///! Listing query engine
///!
///! Filtering, sorting, and pagination over one snapshot's listings. Pure
///! functions of their inputs; bad filter or sort values degrade to "that
///! predicate disabled" instead of erroring, so best-effort queries always
///! answer.

use chrono::{DateTime, NaiveDateTime, Utc};
use std::cmp::Ordering;
use std::collections::HashSet;

use super::types::Listing;

pub const DEFAULT_SORT: &str = "duty";
pub const DEFAULT_LIMIT: usize = 200;
pub const MAX_LIMIT: usize = 1000;

/// One query over a snapshot: every supplied predicate must hold (AND).
/// Set members and the search needle are lowercased at construction.
#[derive(Debug, Clone, Default)]
pub struct ListingQuery {
    pub search: Option<String>,
    pub data_centres: Option<HashSet<String>>,
    pub categories: Option<HashSet<String>>,
    pub min_parties: Option<i64>,
    pub max_parties: Option<i64>,
    pub joinable_roles: Option<HashSet<String>>,
    pub since: Option<DateTime<Utc>>,
    pub sort: String,
    pub descending: bool,
    pub offset: usize,
    pub limit: usize,
}

impl ListingQuery {
    pub fn new() -> Self {
        Self {
            sort: DEFAULT_SORT.to_string(),
            limit: DEFAULT_LIMIT,
            ..Default::default()
        }
    }
}

/// Filtered page plus the pre-pagination match count
#[derive(Debug, Clone)]
pub struct QueryResult {
    pub total: usize,
    pub items: Vec<Listing>,
}

/// Split a comma-list parameter into a lowercased set. Empty input (or one
/// that is all commas/whitespace) disables the predicate.
pub fn parse_list_param(value: Option<&str>) -> Option<HashSet<String>> {
    let value = value?;
    let set: HashSet<String> = value
        .split(',')
        .map(|item| item.trim().to_lowercase())
        .filter(|item| !item.is_empty())
        .collect();
    if set.is_empty() { None } else { Some(set) }
}

/// Parse a `since` cutoff. Accepts RFC 3339 (with `Z` as UTC) and naive
/// ISO-8601 timestamps assumed UTC; anything else disables the cutoff.
pub fn parse_since(value: Option<&str>) -> Option<DateTime<Utc>> {
    let value = value?.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Run one query over a snapshot's listings.
pub fn run_query(listings: Vec<Listing>, query: &ListingQuery) -> QueryResult {
    let mut filtered: Vec<Listing> = listings
        .into_iter()
        .filter(|listing| matches(listing, query))
        .collect();

    apply_sort(&mut filtered, &query.sort, query.descending);

    let total = filtered.len();
    let items: Vec<Listing> = filtered
        .into_iter()
        .skip(query.offset)
        .take(query.limit)
        .collect();

    QueryResult { total, items }
}

fn matches(listing: &Listing, query: &ListingQuery) -> bool {
    if let Some(accepted) = &query.data_centres {
        let dc = listing.data_centre.as_deref().unwrap_or("").to_lowercase();
        if !accepted.contains(&dc) {
            return false;
        }
    }

    if let Some(accepted) = &query.categories {
        if !accepted.contains(&listing.pf_category.to_lowercase()) {
            return false;
        }
    }

    // Absent num_parties passes both bounds; only a known count is compared
    if let (Some(min), Some(n)) = (query.min_parties, listing.num_parties) {
        if n < min {
            return false;
        }
    }
    if let (Some(max), Some(n)) = (query.max_parties, listing.num_parties) {
        if n > max {
            return false;
        }
    }

    if let Some(wanted) = &query.joinable_roles {
        let has_overlap = listing
            .joinable_roles
            .iter()
            .any(|role| wanted.contains(&role.to_lowercase()));
        if !has_overlap {
            return false;
        }
    }

    if let Some(needle) = &query.search {
        let haystack = format!(
            "{} {} {}",
            listing.duty, listing.creator, listing.description
        )
        .to_lowercase();
        if !haystack.contains(needle.as_str()) {
            return false;
        }
    }

    // A listing with no fetched_at is never excluded by the cutoff
    if let (Some(cutoff), Some(fetched_at)) = (query.since, listing.fetched_at) {
        if fetched_at <= cutoff {
            return false;
        }
    }

    true
}

/// Stable sort by a named field. Unrecognized field names leave the input
/// order untouched. Direction flips the comparator, not the slice, so
/// equal keys keep their relative input order either way.
fn apply_sort(items: &mut [Listing], sort: &str, descending: bool) {
    fn directed(ord: Ordering, descending: bool) -> Ordering {
        if descending { ord.reverse() } else { ord }
    }

    match sort.to_lowercase().as_str() {
        "duty" => items.sort_by(|a, b| {
            directed(
                a.duty.to_lowercase().cmp(&b.duty.to_lowercase()),
                descending,
            )
        }),
        "creator" => items.sort_by(|a, b| {
            directed(
                a.creator.to_lowercase().cmp(&b.creator.to_lowercase()),
                descending,
            )
        }),
        "num_parties" => items.sort_by(|a, b| {
            directed(
                a.num_parties.unwrap_or(0).cmp(&b.num_parties.unwrap_or(0)),
                descending,
            )
        }),
        "data_centre" => items.sort_by(|a, b| {
            let ka = a.data_centre.as_deref().unwrap_or("").to_lowercase();
            let kb = b.data_centre.as_deref().unwrap_or("").to_lowercase();
            directed(ka.cmp(&kb), descending)
        }),
        "pf_category" => items.sort_by(|a, b| {
            directed(
                a.pf_category
                    .to_lowercase()
                    .cmp(&b.pf_category.to_lowercase()),
                descending,
            )
        }),
        "fetched_at" => items.sort_by(|a, b| {
            // None sorts before any timestamp
            directed(a.fetched_at.cmp(&b.fetched_at), descending)
        }),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::pf::types::PartyComposition;
    use chrono::TimeZone;

    fn listing(duty: &str, num_parties: Option<i64>, data_centre: &str) -> Listing {
        Listing {
            data_centre: if data_centre.is_empty() {
                None
            } else {
                Some(data_centre.to_string())
            },
            data_centre_raw: None,
            pf_category: "Raids".to_string(),
            pf_category_raw: Some("Raids".to_string()),
            num_parties,
            joinable_roles: vec!["Tank".to_string(), "DPS".to_string()],
            joinable_roles_raw: String::new(),
            party_composition: PartyComposition::default(),
            party_slots: Vec::new(),
            duty: duty.to_string(),
            creator: format!("{duty} creator"),
            description: String::new(),
            world: String::new(),
            fetched_at: None,
        }
    }

    fn query() -> ListingQuery {
        ListingQuery::new()
    }

    #[test]
    fn test_no_filters_returns_everything_in_input_order_for_equal_keys() {
        let items = vec![
            listing("Same", Some(1), "Aether"),
            listing("Same", Some(2), "Primal"),
            listing("Same", Some(3), "Chaos"),
        ];
        let result = run_query(items, &query());
        assert_eq!(result.total, 3);
        let counts: Vec<_> = result.items.iter().map(|l| l.num_parties).collect();
        assert_eq!(counts, vec![Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn test_absent_party_count_passes_both_bounds() {
        let items = vec![
            listing("Alpha", Some(2), "Aether"),
            listing("Beta", None, "Primal"),
        ];
        let mut q = query();
        q.min_parties = Some(3);
        let result = run_query(items.clone(), &q);
        assert_eq!(result.total, 1);
        assert_eq!(result.items[0].duty, "Beta");

        let mut q = query();
        q.max_parties = Some(1);
        let result = run_query(items, &q);
        assert_eq!(result.total, 1);
        assert_eq!(result.items[0].duty, "Beta");
    }

    #[test]
    fn test_search_matches_joined_text_case_insensitively() {
        let mut a = listing("The Omega Protocol", None, "Aether");
        a.description = "Week 1 PROG".to_string();
        let b = listing("Dungeon Run", None, "Aether");

        let mut q = query();
        q.search = Some("week 1".to_string());
        let result = run_query(vec![a, b], &q);
        assert_eq!(result.total, 1);
        assert_eq!(result.items[0].duty, "The Omega Protocol");
    }

    #[test]
    fn test_membership_filters_are_case_insensitive() {
        let items = vec![
            listing("Alpha", None, "Aether"),
            listing("Beta", None, "Primal"),
        ];
        let mut q = query();
        q.data_centres = parse_list_param(Some("AETHER , chaos"));
        let result = run_query(items, &q);
        assert_eq!(result.total, 1);
        assert_eq!(result.items[0].duty, "Alpha");
    }

    #[test]
    fn test_role_filter_needs_any_overlap() {
        let mut healer_only = listing("Healer Duty", None, "Aether");
        healer_only.joinable_roles = vec!["Healer".to_string()];
        let tank_dps = listing("Tank Duty", None, "Aether");

        let mut q = query();
        q.joinable_roles = parse_list_param(Some("tank"));
        let result = run_query(vec![healer_only, tank_dps], &q);
        assert_eq!(result.total, 1);
        assert_eq!(result.items[0].duty, "Tank Duty");
    }

    #[test]
    fn test_since_cutoff_is_strict_and_skips_unstamped() {
        let cutoff = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
        let mut old = listing("Old", None, "Aether");
        old.fetched_at = Some(cutoff);
        let mut fresh = listing("Fresh", None, "Aether");
        fresh.fetched_at = Some(cutoff + chrono::Duration::seconds(1));
        let unstamped = listing("Unstamped", None, "Aether");

        let mut q = query();
        q.since = Some(cutoff);
        q.sort = "bogus".to_string();
        let result = run_query(vec![old, fresh, unstamped], &q);
        let duties: Vec<_> = result.items.iter().map(|l| l.duty.as_str()).collect();
        assert_eq!(duties, vec!["Fresh", "Unstamped"]);
    }

    #[test]
    fn test_parse_since_accepts_z_suffix_and_rejects_garbage() {
        let parsed = parse_since(Some("2026-01-01T00:00:00Z")).unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(
            parse_since(Some("2026-01-01T00:00:00+02:00")).unwrap(),
            Utc.with_ymd_and_hms(2025, 12, 31, 22, 0, 0).unwrap()
        );
        // Naive timestamps are taken as UTC
        assert_eq!(
            parse_since(Some("2026-01-01T05:00:00")).unwrap(),
            Utc.with_ymd_and_hms(2026, 1, 1, 5, 0, 0).unwrap()
        );
        assert_eq!(parse_since(Some("yesterday-ish")), None);
        assert_eq!(parse_since(None), None);
    }

    #[test]
    fn test_sort_is_stable_in_both_directions() {
        let mut items = Vec::new();
        for (duty, n) in [("Same", 1), ("Other", 2), ("Same", 3), ("Other", 4)] {
            items.push(listing(duty, Some(n), "Aether"));
        }

        let mut q = query();
        q.sort = "duty".to_string();
        let asc = run_query(items.clone(), &q);
        let asc_counts: Vec<_> = asc.items.iter().map(|l| l.num_parties.unwrap()).collect();
        assert_eq!(asc_counts, vec![2, 4, 1, 3]);

        q.descending = true;
        let desc = run_query(items, &q);
        let desc_counts: Vec<_> = desc.items.iter().map(|l| l.num_parties.unwrap()).collect();
        // Equal keys keep input order even when descending
        assert_eq!(desc_counts, vec![1, 3, 2, 4]);
    }

    #[test]
    fn test_sort_num_parties_treats_absent_as_zero() {
        let items = vec![
            listing("Two", Some(2), "Aether"),
            listing("Missing", None, "Aether"),
            listing("One", Some(1), "Aether"),
        ];
        let mut q = query();
        q.sort = "num_parties".to_string();
        let result = run_query(items, &q);
        let duties: Vec<_> = result.items.iter().map(|l| l.duty.as_str()).collect();
        assert_eq!(duties, vec!["Missing", "One", "Two"]);
    }

    #[test]
    fn test_unknown_sort_field_keeps_input_order() {
        let items = vec![
            listing("Zeta", None, "Aether"),
            listing("Alpha", None, "Aether"),
        ];
        let mut q = query();
        q.sort = "bogus_field".to_string();
        let result = run_query(items, &q);
        let duties: Vec<_> = result.items.iter().map(|l| l.duty.as_str()).collect();
        assert_eq!(duties, vec!["Zeta", "Alpha"]);
    }

    #[test]
    fn test_pagination_reports_pre_page_total() {
        let items: Vec<_> = (0..10)
            .map(|i| listing(&format!("Duty {i:02}"), Some(i), "Aether"))
            .collect();

        let mut q = query();
        q.offset = 6;
        q.limit = 3;
        let result = run_query(items.clone(), &q);
        assert_eq!(result.total, 10);
        assert_eq!(result.items.len(), 3);
        assert_eq!(result.items[0].duty, "Duty 06");

        // Tail page comes back short, total unchanged
        q.offset = 9;
        let result = run_query(items.clone(), &q);
        assert_eq!(result.total, 10);
        assert_eq!(result.items.len(), 1);

        q.offset = 50;
        let result = run_query(items, &q);
        assert_eq!(result.total, 10);
        assert!(result.items.is_empty());
    }

    #[test]
    fn test_query_is_idempotent() {
        let items = vec![
            listing("Beta", Some(2), "Primal"),
            listing("Alpha", Some(1), "Aether"),
        ];
        let mut q = query();
        q.sort = "duty".to_string();
        let first = run_query(items.clone(), &q);
        let second = run_query(items, &q);
        let d1: Vec<_> = first.items.iter().map(|l| l.duty.clone()).collect();
        let d2: Vec<_> = second.items.iter().map(|l| l.duty.clone()).collect();
        assert_eq!(first.total, second.total);
        assert_eq!(d1, d2);
    }

    #[test]
    fn test_parse_list_param() {
        assert_eq!(parse_list_param(None), None);
        assert_eq!(parse_list_param(Some("")), None);
        assert_eq!(parse_list_param(Some(" , ,")), None);
        let set = parse_list_param(Some("Aether, PRIMAL ,")).unwrap();
        assert!(set.contains("aether"));
        assert!(set.contains("primal"));
        assert_eq!(set.len(), 2);
    }
}
