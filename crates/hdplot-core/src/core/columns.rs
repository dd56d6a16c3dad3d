use phf::{Set, phf_set};

pub const CLUSTER: &str = "cluster";
pub const STRUCTURE: &str = "#Structure";
pub const EVDW: &str = "Evdw";
pub const EELEC: &str = "Eelec";
pub const EAIR: &str = "Eair";
pub const BSA: &str = "BSA";
pub const EDESOLV: &str = "Edesolv";
pub const HADDOCK_SCORE: &str = "HADDOCK_score";

/// Structure identifier column of the `<cluster>_Edesolv` tables.
pub const DESOLV_STRUCTURE: &str = "#struc";

/// Columns of a `.stat` table that every extraction needs.
pub const REQUIRED_STAT_COLUMNS: [&str; 5] = [STRUCTURE, EVDW, EELEC, BSA, EAIR];

/// Columns removed from every `.stat` table, in the order they are checked.
pub const DROPPED_COLUMNS: [&str; 15] = [
    "rmsd_all",
    "rmsd_Emin",
    "Einter",
    "Enb",
    "Evdw+0.1Eelec",
    "Ecdih",
    "Ecoup",
    "Esani",
    "Evean",
    "Edani",
    "#NOEviol",
    "#Dihedviol",
    "#Coupviol",
    "#Veanviol",
    "#Daniviol",
];

static DROPPED_COLUMN_SET: Set<&'static str> = phf_set! {
    "rmsd_all", "rmsd_Emin", "Einter", "Enb", "Evdw+0.1Eelec",
    "Ecdih", "Ecoup", "Esani", "Evean", "Edani",
    "#NOEviol", "#Dihedviol", "#Coupviol", "#Veanviol", "#Daniviol",
};

pub fn is_dropped(column: &str) -> bool {
    DROPPED_COLUMN_SET.contains(column)
}
