///! Party finder listing data types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Filled/total slot counts for one role bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCount {
    pub filled: u32,
    pub total: u32,
}

/// Slot counts bucketed by role classification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyComposition {
    pub tank: RoleCount,
    pub healer: RoleCount,
    pub dps: RoleCount,
    pub flex: RoleCount,
}

impl PartyComposition {
    /// Total number of counted slots across all role buckets
    pub fn total_slots(&self) -> u32 {
        self.tank.total + self.healer.total + self.dps.total + self.flex.total
    }
}

/// Role classification of a single party slot.
///
/// A slot carrying exactly one of the tank/healer/dps marker classes gets
/// that role; zero or multiple markers classify it as flex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotRole {
    Tank,
    Healer,
    Dps,
    Flex,
}

/// One slot in a listing's party display, in source document order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartySlot {
    pub role: SlotRole,
    pub filled: bool,
    /// Whitespace-split tokens of the slot's title text, e.g. job codes
    pub jobs: Vec<String>,
}

/// One normalized party-finder listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    /// Data centre after world lookup; falls back to the raw attribute
    /// when the world is unknown
    pub data_centre: Option<String>,
    /// Original `data-centre` attribute, unmodified
    pub data_centre_raw: Option<String>,
    /// Human-readable category label; unmapped codes pass through
    pub pf_category: String,
    /// Original `data-pf-category` attribute
    pub pf_category_raw: Option<String>,
    /// None when the source attribute is missing or non-numeric
    pub num_parties: Option<i64>,
    /// Role names this listing recruits for, decoded from the raw value
    pub joinable_roles: Vec<String>,
    /// Original `data-joinable-roles` attribute (bitmask digits or a
    /// comma list of role names)
    pub joinable_roles_raw: String,
    pub party_composition: PartyComposition,
    pub party_slots: Vec<PartySlot>,
    pub duty: String,
    pub creator: String,
    pub description: String,
    pub world: String,
    /// Stamped uniformly across a scrape batch; None until stamped
    #[serde(default)]
    pub fetched_at: Option<DateTime<Utc>>,
}

/// A full snapshot of the listings page: every listing from the most
/// recent successful scrape plus the scrape timestamp. Replaced wholesale,
/// never partially updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingSnapshot {
    pub updated_at: DateTime<Utc>,
    pub listings: Vec<Listing>,
}
