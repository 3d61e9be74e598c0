///! Static normalization tables
///!
///! Category code labels, world-to-data-centre mapping, and the job flag
///! bitmask constants used to decode joinable roles. Immutable process-wide
///! data; no logic beyond lookups.

/// Job flag bits as used by the listings page `data-joinable-roles` bitmask.
pub mod job {
    pub const PLD: u64 = 1 << 8;
    pub const MNK: u64 = 1 << 9;
    pub const WAR: u64 = 1 << 10;
    pub const DRG: u64 = 1 << 11;
    pub const BRD: u64 = 1 << 12;
    pub const WHM: u64 = 1 << 13;
    pub const BLM: u64 = 1 << 14;
    pub const SMN: u64 = 1 << 16;
    pub const SCH: u64 = 1 << 17;
    pub const NIN: u64 = 1 << 19;
    pub const MCH: u64 = 1 << 20;
    pub const DRK: u64 = 1 << 21;
    pub const AST: u64 = 1 << 22;
    pub const SAM: u64 = 1 << 23;
    pub const RDM: u64 = 1 << 24;
    pub const BLU: u64 = 1 << 25;
    pub const GNB: u64 = 1 << 26;
    pub const DNC: u64 = 1 << 27;
    pub const RPR: u64 = 1 << 28;
    pub const SGE: u64 = 1 << 29;
    pub const VPR: u64 = 1 << 30;
    pub const PCT: u64 = 1 << 31;
}

/// All tank job flags OR-ed together
pub const TANK_MASK: u64 = job::PLD | job::WAR | job::DRK | job::GNB;

/// All healer job flags OR-ed together
pub const HEALER_MASK: u64 = job::WHM | job::SCH | job::AST | job::SGE;

/// All DPS job flags OR-ed together
pub const DPS_MASK: u64 = job::MNK
    | job::DRG
    | job::NIN
    | job::SAM
    | job::RPR
    | job::VPR
    | job::BRD
    | job::MCH
    | job::DNC
    | job::BLM
    | job::SMN
    | job::RDM
    | job::PCT
    | job::BLU;

/// Look up the bitmask flag for a job abbreviation.
pub fn job_flag(abbrev: &str) -> Option<u64> {
    let flag = match abbrev {
        "PLD" => job::PLD,
        "MNK" => job::MNK,
        "WAR" => job::WAR,
        "DRG" => job::DRG,
        "BRD" => job::BRD,
        "WHM" => job::WHM,
        "BLM" => job::BLM,
        "SMN" => job::SMN,
        "SCH" => job::SCH,
        "NIN" => job::NIN,
        "MCH" => job::MCH,
        "DRK" => job::DRK,
        "AST" => job::AST,
        "SAM" => job::SAM,
        "RDM" => job::RDM,
        "BLU" => job::BLU,
        "GNB" => job::GNB,
        "DNC" => job::DNC,
        "RPR" => job::RPR,
        "SGE" => job::SGE,
        "VPR" => job::VPR,
        "PCT" => job::PCT,
        _ => return None,
    };
    Some(flag)
}

/// Map a source category code to its display label.
///
/// Returns None for codes without a known label; callers fall back to the
/// raw code itself.
pub fn category_label(code: &str) -> Option<&'static str> {
    let label = match code {
        "DutyRoulette" => "Duty Roulette",
        "Dungeons" => "Dungeons",
        "Guildhests" => "Guildhests",
        "Trials" => "Trials",
        "Raids" => "Raids",
        "HighEndDuty" => "High-end Duty",
        "Pvp" => "PvP",
        "GoldSaucer" => "Gold Saucer",
        "Fates" => "FATEs",
        "TreasureHunt" => "Treasure Hunt",
        "TheHunt" => "The Hunt",
        "GatheringForays" => "Gathering Forays",
        "DeepDungeons" => "Deep Dungeons",
        "AdventuringForays" => "Field Operations",
        "V&C Dungeon Finder" => "V&C Dungeon Finder",
        "None" => "Other",
        _ => return None,
    };
    Some(label)
}

/// Map a world name to its data centre.
///
/// Returns None for unknown worlds; callers fall back to the raw
/// `data-centre` attribute from the source page.
pub fn world_data_centre(world: &str) -> Option<&'static str> {
    let dc = match world {
        // North America
        "Adamantoise" | "Cactuar" | "Faerie" | "Gilgamesh" | "Jenova"
        | "Midgardsormr" | "Sargatanas" | "Siren" => "Aether",
        "Balmung" | "Brynhildr" | "Coeurl" | "Diabolos" | "Goblin"
        | "Malboro" | "Mateus" | "Zalera" => "Crystal",
        "Behemoth" | "Excalibur" | "Exodus" | "Famfrit" | "Hyperion"
        | "Lamia" | "Leviathan" | "Ultros" => "Primal",
        "Halicarnassus" | "Maduin" | "Marilith" | "Seraph" | "Cuchulainn"
        | "Golem" | "Kraken" | "Rafflesia" => "Dynamis",
        // Europe
        "Cerberus" | "Louisoix" | "Moogle" | "Omega" | "Phantom"
        | "Ragnarok" | "Sagittarius" | "Spriggan" => "Chaos",
        "Alpha" | "Lich" | "Odin" | "Phoenix" | "Raiden" | "Shiva"
        | "Twintania" | "Zodiark" => "Light",
        "Innocence" | "Pixie" | "Titania" | "Tycoon" => "Shadow",
        // Japan
        "Aegis" | "Atomos" | "Carbuncle" | "Garuda" | "Gungnir"
        | "Kujata" | "Tonberry" | "Typhon" => "Elemental",
        "Alexander" | "Bahamut" | "Durandal" | "Fenrir" | "Ifrit"
        | "Ridill" | "Tiamat" | "Ultima" => "Gaia",
        "Anima" | "Asura" | "Chocobo" | "Hades" | "Ixion" | "Masamune"
        | "Pandaemonium" | "Titan" => "Mana",
        "Belias" | "Mandragora" | "Ramuh" | "Shinryu" | "Unicorn"
        | "Valefor" | "Yojimbo" | "Zeromus" => "Meteor",
        // Oceania
        "Bismarck" | "Ravana" | "Sephirot" | "Sophia" | "Zurvan" => "Materia",
        _ => return None,
    };
    Some(dc)
}
