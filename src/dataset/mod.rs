// Dataset module: reflection tables and the table-level symmetry operations
// This module carries columns through ASU reduction, expansion and the Friedel layouts

// ======================== MODULE DECLARATIONS ========================
pub mod column;
pub mod friedel;
pub mod reflection_batch;
pub mod reflection_dataset;
pub mod transforms;


// ======================== COLUMNS ========================
pub use column::{
    Column,     // struct - labelled column with an MTZ kind and typed values
    ColumnData, // enum - Float (NaN missing), Int / Flag (None missing)
    ColumnKind, // enum - MTZ column type (H, J, K, F, G, D, Q, L, M, P, W, A, B, Y, I, R) plus Flag
    Storage,    // enum - physical storage of a kind
};

// ======================== BATCH ========================
pub use reflection_batch::ReflectionBatch; // struct - Miller indices plus row-aligned columns
// ReflectionBatch impl methods:
//   new(hkls: Vec<MillerIndex>) -> Self                            - batch without columns
//   with_column(self, column: Column) -> Result<Self>              - builder, length checked
//   column(&self, label: &str) -> Option<&Column>                  - lookup by label
//   phase_keys(&self) / m_isym_keys(&self) -> Vec<String>          - columns of kind P / Y
//   take_rows(&self, rows: &[usize]) -> Self                       - row selection
//   concat(&self, other: &Self) -> Result<Self>                    - stack rows, NA fill
//   outer_join_on_hkl(&self, right: &Self, suffixes) -> Self       - join on Miller index

// ======================== TRANSFORMS ========================
pub use transforms::{
    apply_symop,         // fn(batch, op) -> Result<ReflectionBatch> - move indices, shift phases
    canonicalize_phases, // fn(batch) -> ReflectionBatch - wrap phase columns into (-180, 180]
    hkl_to_asu,          // fn(batch, spacegroup) -> Result<ReflectionBatch> - reduce to ASU, add M/ISYM
    hkl_to_observed,     // fn(batch, spacegroup, merge_state, m_isym) -> Result<ReflectionBatch>
};

// ======================== FRIEDEL PAIRS ========================
pub use friedel::{
    stack_anomalous,   // fn(batch, spacegroup, merge_state, labels, suffixes) -> Result<ReflectionBatch>
    unstack_anomalous, // fn(batch, spacegroup, merge_state, columns, suffixes) -> Result<ReflectionBatch>
};

// ======================== DATASET ========================
pub use reflection_dataset::ReflectionDataset; // struct - batch + space group + cell + merge state
