// Constants

// Symmetry operations
pub const TRANSLATION_DENOMINATOR: i32 = 24; // Translations are stored in units of 1/24

// Miller indices: |h|, |k|, |l| up to this bound keep h·R inside i32
pub const MAX_MILLER_INDEX: i32 = i32::MAX / 3;

// M/ISYM packing
pub const M_ISYM_STRIDE: i32 = 256; // code = isym + 256 * partial
pub const MAX_ISYM: i32 = 255;

// Phases (degrees)
pub const PHASE_PERIOD: f64 = 360.0;
pub const PHASE_HALF_PERIOD: f64 = 180.0;

// Column labels written by the engine
pub const M_ISYM_LABEL: &str = "M/ISYM";
pub const PARTIAL_LABEL: &str = "PARTIAL";
pub const CENTRIC_LABEL: &str = "CENTRIC";
pub const ABSENT_LABEL: &str = "ABSENT";
pub const DHKL_LABEL: &str = "dHKL";
pub const EPSILON_LABEL: &str = "EPSILON";
pub const BIN_LABEL: &str = "bin";

// Friedel column suffixes
pub const FRIEDEL_PLUS_SUFFIX: &str = "(+)";
pub const FRIEDEL_MINUS_SUFFIX: &str = "(-)";

// Tolerances
pub const CELL_TOLERANCE: f64 = 1e-10; // For cell volume / metric inversion
pub const ISOMORPHISM_CELL_THRESHOLD: f64 = 0.05; // Default for is_isomorphous
