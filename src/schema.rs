/// Column-name constants for the trajectory CSV schema.
/// Defaults only - every header can be overridden through `[columns]` in the config.

// ── Point columns ───────────────────────────────────────────────────────────
pub mod point {
    pub const VESSEL_KEY: &str = "cfr";
    pub const TIMESTAMP: &str = "datetime";
    pub const LATITUDE: &str = "latitude";
    pub const LONGITUDE: &str = "longitude";
    pub const SPEED_OVER_GROUND: &str = "sog";
    pub const HEADING: &str = "heading";
    pub const LABEL: &str = "label";
}

// ── Timestamp formats ───────────────────────────────────────────────────────
/// Tried in order after RFC 3339.
pub mod timestamp {
    pub const FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];
}

// ── Map colours ─────────────────────────────────────────────────────────────
pub mod color {
    pub const BLACK: &str = "black";
    pub const RED: &str = "red";
    pub const BLUE: &str = "blue";
    pub const GREEN: &str = "green";
}

// ── Motion thresholds (knots) ───────────────────────────────────────────────
pub mod motion {
    pub const SLOW_MIN_SOG: f64 = 0.1;
    pub const SLOW_MAX_SOG: f64 = 5.0;
}

// ── Label options ───────────────────────────────────────────────────────────
/// Canonical activity states followed by gear-type codes. Duplicates are
/// tolerated here and removed by `LabelOptions`.
pub mod labels {
    pub const DEFAULT_OPTIONS: &[&str] = &[
        "In port",
        "In transit from port",
        "In transit to port",
        "Searching",
        "Unknown",
        "PS - Purse seines",
        "SX - Seine nets (nei)",
        "TBB - Beam trawls",
        "OTB - Single boat bottom otter trawls",
        "PTB - Bottom pair trawls",
        "TBN - Bottom trawls nephrops trawls",
        "TBS - Bottom trawls shrimp trawls",
        "TB - Bottom trawls (nei)",
        "OTM - Single boat midwater otter trawls",
        "PTM - Midwater pair trawls",
        "TM - Midwater otter trawls (nei)",
        "OT - Otter trawls (nei)",
        "TX - Trawls (nei)",
        "SSC - Scottish seines",
        "SDN - Danish seines",
        "SPR - Pair seines",
        "SV - Boat seines",
        "SX - Seines (nei)",
        "GN - Gillnets (nei)",
        "GNS - Set gillnets (anchored)",
        "GNM - Driftnets",
        "GND - Encircling gillnets",
        "GNC - Combined gillnets-trammel nets",
        "GTR - Trammel nets",
        "GTN - Fixed gillnets (on stakes)",
        "FX - Gillnets and entangling nets (nei)",
        "GL - Gillnets (nei)",
        "FWR - weir",
        "FYK - Fyke nets",
        "FPN - Pound nets",
        "FIX - Traps (nei)",
        "FIR - Large ring nets",
        "FIC - Cast nets",
        "FIF - Lift nets",
        "FDX - Drifting (nei)",
        "FSN - Stationary uncovered pound nets",
        "FS - Traps (nei)",
        "FW - Weir traps",
        "FY - Fyke nets (nei)",
        "FWR - weir",
        "HLN - Handlines and pole-lines (hand-operated)",
        "LHP - Handlines and pole-lines (mechanized)",
        "LLS - Set longlines",
        "LLD - Drifting longlines",
        "LL - Longlines (nei)",
        "LTL - Trolling lines",
        "LX - Hooks and lines (nei)",
        "HAR - Harpoons",
        "HMP - Pumps",
        "HMD - Mechanized dredges",
        "HMX - Harvesting machines (nei)",
        "MIS - Gear nei",
        "SV - Boat seines",
        "RG - RECREATIONAL FISHING GEAR",
        "NK - GEAR NOT KNOW",
        "NO - No gear",
        "PUK - Bottom trawls - electric beam trawls (Pulse Beam)",
        "PUL - Bottom trawls - electric sumwing trawls (Pulse Wing)",
        "SUX - Surrounding nets (nei)",
        "OTP - Multiple bottom otter trawls",
        "TSP - Semipelagic trawls",
        "DRM - Mechanized dredges",
        "DRX - Dredges (nei)",
        "SDN - Danish seines",
        "FCO - Cover pots/Lantern nets",
        "LVT - Vertical lines",
        "MHI - Hand implements (Wrenching gear, Clamps, Tongs, Rakes, Spears)",
        "MPM - Pumps",
        "MEL - Electric fishing",
        "MPN - Pushnets",
        "MSP - Scoopnets",
        "MDR - Drive-in nets",
        "MDV - Diving",
        "SSC - Scottish seines",
        "SPR - pair seines",
    ];
}
