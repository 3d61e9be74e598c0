///! Party finder module
///!
///! Scrapes the public party finder listings page on a schedule, normalizes
///! the HTML into structured listings, and serves the latest snapshot to the
///! query engine.

pub mod tables;
pub mod types;
pub mod parser;
pub mod scraper;
pub mod store;
pub mod query;
pub mod updater;

pub use scraper::ListingScraper;
pub use store::SnapshotStore;
pub use types::{Listing, ListingSnapshot, PartyComposition, PartySlot, RoleCount, SlotRole};
pub use updater::ListingUpdater;
