//! Space group adapter contract and a table-driven reference implementation
//!
//! The engine only needs four things from a space group: its ordered list of
//! symmetry operations (identity first), the reciprocal-space ASU predicate,
//! the centering vectors and a systematic-absence test. [`SpaceGroupAdapter`]
//! captures exactly that; [`SpaceGroup`] implements it for a fixed table of
//! conventional settings written as coordinate triplets.

use nalgebra::{Matrix3, Vector3};
use std::fmt;

use crate::config::TRANSLATION_DENOMINATOR;
use crate::errors::{ErrorInfo, ReflectionError};
use crate::reflections::MillerIndex;
use crate::symmetries::symmetry_operations::{hkl_dot, SymOp};
use crate::Result;

/// What the reflection engine consumes from a space group.
pub trait SpaceGroupAdapter: fmt::Debug + Send + Sync {
    /// Hermann–Mauguin name, used for isomorphism checks.
    fn name(&self) -> &str;

    /// Primitive symmetry operations in canonical order. Operation 0 is the identity.
    fn operations(&self) -> &[SymOp];

    /// Centering translations in units of 1/24, the zero vector first.
    fn centering_vectors(&self) -> &[Vector3<i32>];

    /// Whether `hkl` lies inside the canonical reciprocal-space ASU.
    fn is_in_asu(&self, hkl: &MillerIndex) -> bool;

    /// Whether translational symmetry forces `F(hkl)` to vanish.
    ///
    /// An index is absent when some operation (including centering) fixes it,
    /// `h·R == h`, while its translation gives a non-integral `h·t`.
    fn is_systematically_absent(&self, hkl: &MillerIndex) -> bool {
        self.operations().iter().any(|op| {
            op.apply_to_hkl(hkl) == *hkl
                && self.centering_vectors().iter().any(|c| {
                    (op.hkl_dot_translation(hkl) + hkl_dot(hkl, c)) % i64::from(TRANSLATION_DENOMINATOR)
                        != 0
                })
        })
    }

    /// All operations combined with every centering vector.
    fn all_operations(&self) -> Vec<SymOp> {
        self.centering_vectors()
            .iter()
            .flat_map(|c| self.operations().iter().map(move |op| op.translated_by(c)))
            .collect()
    }

    fn is_same_group(&self, other: &dyn SpaceGroupAdapter) -> bool {
        self.name() == other.name()
    }
}

/// Laue classes with their CCP4 reciprocal asymmetric unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaueClass {
    /// -1: l>0 or (l=0 and (h>0 or (h=0 and k>=0)))
    Triclinic,
    /// 2/m (b unique): k>=0 and (l>0 or (l=0 and h>=0))
    Monoclinic,
    /// mmm: h>=0, k>=0, l>=0
    Orthorhombic,
    /// 4/m: l>=0 and ((h>=0 and k>0) or h=k=0)
    TetragonalLow,
    /// 4/mmm: h>=k>=0, l>=0
    TetragonalHigh,
    /// m-3: h>=0 and ((l>=h and k>h) or l=k=h)
    Cubic,
}

impl LaueClass {
    pub fn contains(&self, hkl: &MillerIndex) -> bool {
        let [h, k, l] = *hkl;
        match self {
            LaueClass::Triclinic => l > 0 || (l == 0 && (h > 0 || (h == 0 && k >= 0))),
            LaueClass::Monoclinic => k >= 0 && (l > 0 || (l == 0 && h >= 0)),
            LaueClass::Orthorhombic => h >= 0 && k >= 0 && l >= 0,
            LaueClass::TetragonalLow => l >= 0 && ((h >= 0 && k > 0) || (h == 0 && k == 0)),
            LaueClass::TetragonalHigh => h >= k && k >= 0 && l >= 0,
            LaueClass::Cubic => h >= 0 && ((l >= h && k > h) || (l == h && k == h)),
        }
    }
}

// ======================== SPACE GROUP TABLE ========================

struct SpaceGroupEntry {
    number: u16,
    name: &'static str,
    aliases: &'static [&'static str],
    operations: &'static [&'static str],
    centering: &'static [[i32; 3]],
    laue: LaueClass,
}

const C_CENTERING: [i32; 3] = [12, 12, 0];
const I_CENTERING: [i32; 3] = [12, 12, 12];

static SPACE_GROUP_TABLE: &[SpaceGroupEntry] = &[
    SpaceGroupEntry {
        number: 1,
        name: "P 1",
        aliases: &[],
        operations: &["x,y,z"],
        centering: &[],
        laue: LaueClass::Triclinic,
    },
    SpaceGroupEntry {
        number: 2,
        name: "P -1",
        aliases: &[],
        operations: &["x,y,z", "-x,-y,-z"],
        centering: &[],
        laue: LaueClass::Triclinic,
    },
    SpaceGroupEntry {
        number: 3,
        name: "P 1 2 1",
        aliases: &["P2"],
        operations: &["x,y,z", "-x,y,-z"],
        centering: &[],
        laue: LaueClass::Monoclinic,
    },
    SpaceGroupEntry {
        number: 4,
        name: "P 1 21 1",
        aliases: &["P21"],
        operations: &["x,y,z", "-x,y+1/2,-z"],
        centering: &[],
        laue: LaueClass::Monoclinic,
    },
    SpaceGroupEntry {
        number: 5,
        name: "C 1 2 1",
        aliases: &["C2"],
        operations: &["x,y,z", "-x,y,-z"],
        centering: &[C_CENTERING],
        laue: LaueClass::Monoclinic,
    },
    SpaceGroupEntry {
        number: 16,
        name: "P 2 2 2",
        aliases: &[],
        operations: &["x,y,z", "-x,-y,z", "-x,y,-z", "x,-y,-z"],
        centering: &[],
        laue: LaueClass::Orthorhombic,
    },
    SpaceGroupEntry {
        number: 18,
        name: "P 21 21 2",
        aliases: &[],
        operations: &["x,y,z", "-x,-y,z", "-x+1/2,y+1/2,-z", "x+1/2,-y+1/2,-z"],
        centering: &[],
        laue: LaueClass::Orthorhombic,
    },
    SpaceGroupEntry {
        number: 19,
        name: "P 21 21 21",
        aliases: &[],
        operations: &[
            "x,y,z",
            "-x+1/2,-y,z+1/2",
            "-x,y+1/2,-z+1/2",
            "x+1/2,-y+1/2,-z",
        ],
        centering: &[],
        laue: LaueClass::Orthorhombic,
    },
    SpaceGroupEntry {
        number: 23,
        name: "I 2 2 2",
        aliases: &[],
        operations: &["x,y,z", "-x,-y,z", "-x,y,-z", "x,-y,-z"],
        centering: &[I_CENTERING],
        laue: LaueClass::Orthorhombic,
    },
    SpaceGroupEntry {
        number: 75,
        name: "P 4",
        aliases: &[],
        operations: &["x,y,z", "-x,-y,z", "-y,x,z", "y,-x,z"],
        centering: &[],
        laue: LaueClass::TetragonalLow,
    },
    SpaceGroupEntry {
        number: 89,
        name: "P 4 2 2",
        aliases: &[],
        operations: &[
            "x,y,z", "-x,-y,z", "-y,x,z", "y,-x,z", "-x,y,-z", "x,-y,-z", "y,x,-z", "-y,-x,-z",
        ],
        centering: &[],
        laue: LaueClass::TetragonalHigh,
    },
    SpaceGroupEntry {
        number: 92,
        name: "P 41 21 2",
        aliases: &[],
        operations: &[
            "x,y,z",
            "-x,-y,z+1/2",
            "-y+1/2,x+1/2,z+1/4",
            "y+1/2,-x+1/2,z+3/4",
            "-x+1/2,y+1/2,-z+1/4",
            "x+1/2,-y+1/2,-z+3/4",
            "y,x,-z",
            "-y,-x,-z+1/2",
        ],
        centering: &[],
        laue: LaueClass::TetragonalHigh,
    },
    SpaceGroupEntry {
        number: 96,
        name: "P 43 21 2",
        aliases: &[],
        operations: &[
            "x,y,z",
            "-x,-y,z+1/2",
            "-y+1/2,x+1/2,z+3/4",
            "y+1/2,-x+1/2,z+1/4",
            "-x+1/2,y+1/2,-z+3/4",
            "x+1/2,-y+1/2,-z+1/4",
            "y,x,-z",
            "-y,-x,-z+1/2",
        ],
        centering: &[],
        laue: LaueClass::TetragonalHigh,
    },
    SpaceGroupEntry {
        number: 195,
        name: "P 2 3",
        aliases: &[],
        operations: &[
            "x,y,z", "-x,-y,z", "-x,y,-z", "x,-y,-z", "z,x,y", "z,-x,-y", "-z,-x,y", "-z,x,-y",
            "y,z,x", "-y,z,-x", "y,-z,-x", "-y,-z,x",
        ],
        centering: &[],
        laue: LaueClass::Cubic,
    },
];

/// Table-driven space group in a conventional setting.
///
/// [`LaueClass`] covers -1, 2/m, mmm, 4/m, 4/mmm and m-3 only. Trigonal,
/// hexagonal and m-3m data need their own [`SpaceGroupAdapter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpaceGroup {
    number: u16,
    name: String,
    operations: Vec<SymOp>,
    centering: Vec<Vector3<i32>>,
    laue: LaueClass,
}

impl SpaceGroup {
    /// Build a space group from explicit operations.
    ///
    /// `operations[0]` must be the identity; `centering` lists the non-zero
    /// centering translations (1/24 units).
    pub fn new(
        number: u16,
        name: impl Into<String>,
        operations: Vec<SymOp>,
        centering: &[Vector3<i32>],
        laue: LaueClass,
    ) -> Result<Self> {
        let name = name.into();
        match operations.first() {
            Some(op) if op.is_identity() => {}
            first => {
                return Err(ReflectionError::validation(
                    ErrorInfo::new("first symmetry operation must be the identity")
                        .with_context("spacegroup", &name)
                        .with_context(
                            "first",
                            first.map(SymOp::triplet).unwrap_or_else(|| "none".to_string()),
                        ),
                ))
            }
        }
        let mut all_centering = vec![Vector3::zeros()];
        all_centering.extend(
            centering
                .iter()
                .map(|c| c.map(|t| t.rem_euclid(TRANSLATION_DENOMINATOR)))
                .filter(|c| *c != Vector3::zeros()),
        );
        Ok(Self {
            number,
            name,
            operations,
            centering: all_centering,
            laue,
        })
    }

    /// Look up a space group by Hermann–Mauguin symbol.
    ///
    /// Case and whitespace are ignored, so `"p212121"` and `"P 21 21 21"` agree.
    pub fn from_name(name: &str) -> Result<Self> {
        let key = compact_symbol(name);
        SPACE_GROUP_TABLE
            .iter()
            .find(|entry| {
                compact_symbol(entry.name) == key
                    || entry.aliases.iter().any(|alias| compact_symbol(alias) == key)
            })
            .ok_or_else(|| ReflectionError::UnknownSpaceGroup(name.to_string()))
            .and_then(Self::from_entry)
    }

    /// Look up a space group by International Tables number.
    pub fn from_number(number: u16) -> Result<Self> {
        SPACE_GROUP_TABLE
            .iter()
            .find(|entry| entry.number == number)
            .ok_or_else(|| ReflectionError::UnknownSpaceGroup(number.to_string()))
            .and_then(Self::from_entry)
    }

    fn from_entry(entry: &SpaceGroupEntry) -> Result<Self> {
        let operations = entry
            .operations
            .iter()
            .map(|triplet| SymOp::from_triplet(triplet))
            .collect::<Result<Vec<_>>>()?;
        let centering: Vec<Vector3<i32>> = entry
            .centering
            .iter()
            .map(|c| Vector3::new(c[0], c[1], c[2]))
            .collect();
        Self::new(entry.number, entry.name, operations, &centering, entry.laue)
    }

    pub fn number(&self) -> u16 {
        self.number
    }

    pub fn laue_class(&self) -> LaueClass {
        self.laue
    }

    /// Whether the group contains the inversion `-x,-y,-z` (with any translation).
    pub fn is_centrosymmetric(&self) -> bool {
        self.operations
            .iter()
            .any(|op| op.rotation == -Matrix3::<i32>::identity())
    }
}

impl SpaceGroupAdapter for SpaceGroup {
    fn name(&self) -> &str {
        &self.name
    }

    fn operations(&self) -> &[SymOp] {
        &self.operations
    }

    fn centering_vectors(&self) -> &[Vector3<i32>] {
        &self.centering
    }

    fn is_in_asu(&self, hkl: &MillerIndex) -> bool {
        self.laue.contains(hkl)
    }
}

impl fmt::Display for SpaceGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (#{})", self.name, self.number)
    }
}

/// Names of all space groups in the built-in table.
pub fn builtin_space_group_names() -> Vec<&'static str> {
    SPACE_GROUP_TABLE.iter().map(|entry| entry.name).collect()
}

fn compact_symbol(symbol: &str) -> String {
    symbol
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}
