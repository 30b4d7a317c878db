//! Integer-coded enums shared by the wire schemas.
//!
//! Every enum here travels as a bare integer on the wire. Conversion goes
//! through `u8` (`#[serde(into, try_from)]`) so unknown codes are rejected
//! at deserialization time instead of producing a half-valid value.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An integer code that does not name a member of the target enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownCode {
    pub kind: &'static str,
    pub code: i64,
}

impl fmt::Display for UnknownCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} code {}", self.kind, self.code)
    }
}

impl std::error::Error for UnknownCode {}

// ── SettingType ─────────────────────────────────────────────────────

/// The kind of value a setting serves.
///
/// There is deliberately no `Invalid` member: a value that does not map to
/// one of these four kinds is represented as `None` by the classifier and
/// can never reach a serialized document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum SettingType {
    Bool = 0,
    String = 1,
    Int = 2,
    Float = 3,
}

impl SettingType {
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Lower-case kind name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            SettingType::Bool => "bool",
            SettingType::String => "string",
            SettingType::Int => "int",
            SettingType::Float => "float",
        }
    }
}

impl fmt::Display for SettingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<SettingType> for u8 {
    fn from(t: SettingType) -> u8 {
        t.code()
    }
}

impl TryFrom<u8> for SettingType {
    type Error = UnknownCode;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(SettingType::Bool),
            1 => Ok(SettingType::String),
            2 => Ok(SettingType::Int),
            3 => Ok(SettingType::Float),
            _ => Err(UnknownCode {
                kind: "setting type",
                code: code.into(),
            }),
        }
    }
}

// ── Comparator ──────────────────────────────────────────────────────

/// Which value field a user condition populates for a given comparator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparatorClass {
    /// Comma-separated membership or containment; populates `l`.
    List,
    /// Ordering over decimal numbers; populates `d`.
    Numeric,
    /// Everything else, compared as an opaque string; populates `s`.
    Plain,
}

macro_rules! comparators {
    ($( $variant:ident = $code:literal, $ident:literal, $display:literal, $class:ident; )*) => {
        /// User-attribute comparison operator.
        ///
        /// Codes are stable and shared with the evaluation engine; they must
        /// never be renumbered.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(into = "u8", try_from = "u8")]
        pub enum Comparator {
            $( $variant = $code, )*
        }

        impl Comparator {
            /// All comparators in code order.
            pub const ALL: &'static [Comparator] = &[ $( Comparator::$variant, )* ];

            /// Camel-case identifier accepted in flag definition files.
            pub fn ident(self) -> &'static str {
                match self {
                    $( Comparator::$variant => $ident, )*
                }
            }

            /// Human-readable operator text, e.g. `"IS ONE OF"`.
            pub fn display_name(self) -> &'static str {
                match self {
                    $( Comparator::$variant => $display, )*
                }
            }

            pub fn class(self) -> ComparatorClass {
                match self {
                    $( Comparator::$variant => ComparatorClass::$class, )*
                }
            }
        }
    };
}

comparators! {
    IsOneOf = 0, "isOneOf", "IS ONE OF", List;
    IsNotOneOf = 1, "isNotOneOf", "IS NOT ONE OF", List;
    ContainsAnyOf = 2, "containsAnyOf", "CONTAINS ANY OF", List;
    NotContainsAnyOf = 3, "notContainsAnyOf", "NOT CONTAINS ANY OF", List;
    IsOneOfSemver = 4, "isOneOfSemver", "IS ONE OF (semver)", List;
    IsNotOneOfSemver = 5, "isNotOneOfSemver", "IS NOT ONE OF (semver)", List;
    LessSemver = 6, "lessSemver", "< (semver)", Plain;
    LessEqSemver = 7, "lessEqSemver", "<= (semver)", Plain;
    GreaterSemver = 8, "greaterSemver", "> (semver)", Plain;
    GreaterEqSemver = 9, "greaterEqSemver", ">= (semver)", Plain;
    EqNum = 10, "eqNum", "= (number)", Numeric;
    NotEqNum = 11, "notEqNum", "!= (number)", Numeric;
    LessNum = 12, "lessNum", "< (number)", Numeric;
    LessEqNum = 13, "lessEqNum", "<= (number)", Numeric;
    GreaterNum = 14, "greaterNum", "> (number)", Numeric;
    GreaterEqNum = 15, "greaterEqNum", ">= (number)", Numeric;
    IsOneOfHashed = 16, "isOneOfHashed", "IS ONE OF (hashed)", List;
    IsNotOneOfHashed = 17, "isNotOneOfHashed", "IS NOT ONE OF (hashed)", List;
    BeforeDateTime = 18, "beforeDateTime", "BEFORE (UTC datetime)", Plain;
    AfterDateTime = 19, "afterDateTime", "AFTER (UTC datetime)", Plain;
    EqHashed = 20, "eqHashed", "EQUALS (hashed)", Plain;
    NotEqHashed = 21, "notEqHashed", "NOT EQUALS (hashed)", Plain;
    StartsWithAnyOfHashed = 22, "startsWithAnyOfHashed", "STARTS WITH ANY OF (hashed)", List;
    NotStartsWithAnyOfHashed = 23, "notStartsWithAnyOfHashed", "NOT STARTS WITH ANY OF (hashed)", List;
    EndsWithAnyOfHashed = 24, "endsWithAnyOfHashed", "ENDS WITH ANY OF (hashed)", List;
    NotEndsWithAnyOfHashed = 25, "notEndsWithAnyOfHashed", "NOT ENDS WITH ANY OF (hashed)", List;
    ArrayContainsAnyOfHashed = 26, "arrayContainsAnyOfHashed", "ARRAY CONTAINS ANY OF (hashed)", List;
    ArrayNotContainsAnyOfHashed = 27, "arrayNotContainsAnyOfHashed", "ARRAY NOT CONTAINS ANY OF (hashed)", List;
    Eq = 28, "eq", "EQUALS", Plain;
    NotEq = 29, "notEq", "NOT EQUALS", Plain;
    StartsWithAnyOf = 30, "startsWithAnyOf", "STARTS WITH ANY OF", List;
    NotStartsWithAnyOf = 31, "notStartsWithAnyOf", "NOT STARTS WITH ANY OF", List;
    EndsWithAnyOf = 32, "endsWithAnyOf", "ENDS WITH ANY OF", List;
    NotEndsWithAnyOf = 33, "notEndsWithAnyOf", "NOT ENDS WITH ANY OF", List;
    ArrayContainsAnyOf = 34, "arrayContainsAnyOf", "ARRAY CONTAINS ANY OF", List;
    ArrayNotContainsAnyOf = 35, "arrayNotContainsAnyOf", "ARRAY NOT CONTAINS ANY OF", List;
}

impl Comparator {
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Look up a comparator by wire code. Out-of-range codes yield `None`.
    pub fn from_code(code: i64) -> Option<Comparator> {
        usize::try_from(code)
            .ok()
            .and_then(|i| Self::ALL.get(i))
            .copied()
    }

    /// Display text for an arbitrary code; empty when the code is unknown.
    pub fn display_name_of(code: i64) -> &'static str {
        Self::from_code(code).map_or("", Comparator::display_name)
    }

    /// Look up a comparator by identifier (case-insensitive) or exact
    /// display text.
    pub fn from_name(name: &str) -> Option<Comparator> {
        Self::ALL
            .iter()
            .find(|c| c.ident().eq_ignore_ascii_case(name) || c.display_name() == name)
            .copied()
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl From<Comparator> for u8 {
    fn from(c: Comparator) -> u8 {
        c.code()
    }
}

impl TryFrom<u8> for Comparator {
    type Error = UnknownCode;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Comparator::from_code(code.into()).ok_or(UnknownCode {
            kind: "comparator",
            code: code.into(),
        })
    }
}

// ── Pass-through comparators ────────────────────────────────────────

/// Segment membership operator. Never produced by the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum SegmentComparator {
    IsIn = 0,
    IsNotIn = 1,
}

impl From<SegmentComparator> for u8 {
    fn from(c: SegmentComparator) -> u8 {
        c as u8
    }
}

impl TryFrom<u8> for SegmentComparator {
    type Error = UnknownCode;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(SegmentComparator::IsIn),
            1 => Ok(SegmentComparator::IsNotIn),
            _ => Err(UnknownCode {
                kind: "segment comparator",
                code: code.into(),
            }),
        }
    }
}

/// Prerequisite-flag operator. Never produced by the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum PrerequisiteComparator {
    Equals = 0,
    NotEquals = 1,
}

impl From<PrerequisiteComparator> for u8 {
    fn from(c: PrerequisiteComparator) -> u8 {
        c as u8
    }
}

impl TryFrom<u8> for PrerequisiteComparator {
    type Error = UnknownCode;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(PrerequisiteComparator::Equals),
            1 => Ok(PrerequisiteComparator::NotEquals),
            _ => Err(UnknownCode {
                kind: "prerequisite comparator",
                code: code.into(),
            }),
        }
    }
}
