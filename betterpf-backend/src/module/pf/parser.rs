///! Listings page HTML parser
///!
///! Turns the raw listings page HTML into structured [`Listing`] records.
///! Per-listing extraction is total: a malformed fragment degrades to
///! empty/absent fields instead of failing the batch.

use anyhow::Result;
use scraper::{ElementRef, Html, Selector};

use super::tables;
use super::types::{Listing, PartyComposition, PartySlot, SlotRole};

/// Pre-parsed CSS selectors for the listings page structure
struct Selectors {
    listing: Selector,
    slot: Selector,
    duty: Selector,
    creator: Selector,
    description: Selector,
    world_text: Selector,
    world: Selector,
}

impl Selectors {
    fn new() -> Result<Self> {
        fn parse(css: &str) -> Result<Selector> {
            Selector::parse(css).map_err(|e| anyhow::anyhow!("selector error: {}", e))
        }
        Ok(Self {
            listing: parse("#listings > .listing")?,
            slot: parse(".party .slot")?,
            duty: parse(".duty")?,
            creator: parse(".creator")?,
            description: parse(".description")?,
            world_text: parse(".world .text")?,
            world: parse(".world")?,
        })
    }
}

/// Parse the full listings page HTML into listing records.
///
/// Records come back without a `fetched_at` stamp; the updater assigns one
/// uniform timestamp per scrape batch.
pub fn parse_listings(html: &str) -> Result<Vec<Listing>> {
    let document = Html::parse_document(html);
    let sel = Selectors::new()?;

    let mut items = Vec::new();
    for node in document.select(&sel.listing) {
        items.push(parse_listing(&node, &sel));
    }
    Ok(items)
}

/// Extract one listing record from a `.listing` node. Never fails; every
/// field falls back to an empty/absent value.
fn parse_listing(node: &ElementRef, sel: &Selectors) -> Listing {
    let data_centre_raw = node
        .value()
        .attr("data-centre")
        .or_else(|| node.value().attr("data-center"))
        .map(String::from);
    let pf_category_raw = node.value().attr("data-pf-category").map(String::from);
    let joinable_roles_raw = node
        .value()
        .attr("data-joinable-roles")
        .unwrap_or_default()
        .to_string();

    // Prefer the inner .text span; some page revisions put the world name
    // directly in the .world element
    let world = node
        .select(&sel.world_text)
        .next()
        .or_else(|| node.select(&sel.world).next())
        .map(|el| element_text(&el))
        .unwrap_or_default();

    let data_centre = tables::world_data_centre(&world)
        .map(String::from)
        .or_else(|| data_centre_raw.clone());

    let party_slots = parse_party_slots(node, &sel.slot);
    let party_composition = composition_from_slots(&party_slots);

    Listing {
        data_centre,
        data_centre_raw,
        pf_category: normalize_category(pf_category_raw.as_deref()),
        pf_category_raw,
        num_parties: parse_num_parties(node.value().attr("data-num-parties")),
        joinable_roles: parse_roles(&joinable_roles_raw),
        joinable_roles_raw,
        party_composition,
        party_slots,
        duty: text_of(node, &sel.duty),
        creator: text_of(node, &sel.creator),
        description: text_of(node, &sel.description),
        world,
        fetched_at: None,
    }
}

/// Visible text of the first sub-element matching `sel`, or empty.
fn text_of(node: &ElementRef, sel: &Selector) -> String {
    node.select(sel)
        .next()
        .map(|el| element_text(&el))
        .unwrap_or_default()
}

/// Concatenate an element's text nodes with surrounding whitespace stripped.
fn element_text(el: &ElementRef) -> String {
    el.text().map(str::trim).collect()
}

/// Parse the `data-num-parties` attribute. Missing or non-numeric values
/// are absent, not zero, so filters can tell "unknown" from "zero".
fn parse_num_parties(raw: Option<&str>) -> Option<i64> {
    raw?.trim().parse().ok()
}

/// Decode the raw joinable-roles value.
///
/// A pure-digit value is a job bitmask and decodes to the fixed
/// Tank/Healer/DPS order; anything else is a literal comma list of role
/// names kept in the given order and casing.
fn parse_roles(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    if trimmed.chars().all(|c| c.is_ascii_digit()) {
        return roles_from_mask(trimmed);
    }
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(String::from)
        .collect()
}

/// Decode a job bitmask into role names by testing the combined role masks.
fn roles_from_mask(raw: &str) -> Vec<String> {
    // Accumulate mod 2^64: the role masks only test low bits, so values
    // wider than u64 still decode instead of dropping to no roles
    let mut mask = 0u64;
    for digit in raw.bytes() {
        mask = mask
            .wrapping_mul(10)
            .wrapping_add(u64::from(digit - b'0'));
    }
    let mut roles = Vec::new();
    if mask & tables::TANK_MASK != 0 {
        roles.push("Tank".to_string());
    }
    if mask & tables::HEALER_MASK != 0 {
        roles.push("Healer".to_string());
    }
    if mask & tables::DPS_MASK != 0 {
        roles.push("DPS".to_string());
    }
    roles
}

/// Map a raw category code through the category table; unmapped codes pass
/// through as their own label, a missing attribute becomes empty.
fn normalize_category(raw: Option<&str>) -> String {
    match raw {
        Some(code) => tables::category_label(code).unwrap_or(code).to_string(),
        None => String::new(),
    }
}

/// Walk the party slot elements in document order.
///
/// The trailing "total" placeholder is not a real member slot and is
/// skipped entirely.
fn parse_party_slots(node: &ElementRef, slot_sel: &Selector) -> Vec<PartySlot> {
    let mut slots = Vec::new();
    for slot in node.select(slot_sel) {
        let classes: Vec<&str> = slot.value().classes().collect();
        if classes.contains(&"total") {
            continue;
        }
        let title = slot.value().attr("title").unwrap_or_default();
        slots.push(PartySlot {
            role: classify_role(&classes),
            filled: classes.contains(&"filled"),
            jobs: title.split_whitespace().map(String::from).collect(),
        });
    }
    slots
}

/// Classify a slot by its marker classes: exactly one of tank/healer/dps
/// wins, everything else is flex.
fn classify_role(classes: &[&str]) -> SlotRole {
    let mut found = SlotRole::Flex;
    let mut matches = 0;
    for (marker, role) in [
        ("tank", SlotRole::Tank),
        ("healer", SlotRole::Healer),
        ("dps", SlotRole::Dps),
    ] {
        if classes.contains(&marker) {
            matches += 1;
            found = role;
        }
    }
    if matches == 1 { found } else { SlotRole::Flex }
}

/// Derive per-role filled/total counts from the parsed slots. Counts are
/// always computed from the same slot set the record carries.
fn composition_from_slots(slots: &[PartySlot]) -> PartyComposition {
    let mut comp = PartyComposition::default();
    for slot in slots {
        let bucket = match slot.role {
            SlotRole::Tank => &mut comp.tank,
            SlotRole::Healer => &mut comp.healer,
            SlotRole::Dps => &mut comp.dps,
            SlotRole::Flex => &mut comp.flex,
        };
        bucket.total += 1;
        if slot.filled {
            bucket.filled += 1;
        }
    }
    comp
}
