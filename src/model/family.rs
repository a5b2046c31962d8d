// src/model/family.rs

use crate::error::PlanError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Logical product family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Family {
    Get,
    Rodaje,
    Donaldson,
    Turbo,
    Ktn,
    Repuestos,
    Otros,
}

impl Family {
    pub const ALL: [Family; 7] = [
        Family::Get,
        Family::Rodaje,
        Family::Donaldson,
        Family::Turbo,
        Family::Ktn,
        Family::Repuestos,
        Family::Otros,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Family::Get => "GET",
            Family::Rodaje => "RODAJE",
            Family::Donaldson => "DONALDSON",
            Family::Turbo => "TURBO",
            Family::Ktn => "KTN",
            Family::Repuestos => "REPUESTOS",
            Family::Otros => "OTROS",
        }
    }

    /// Filter families ship in boxes that may be broken; everything else
    /// ships in indivisible kits.
    pub fn ships_in_boxes(self) -> bool {
        matches!(self, Family::Donaldson | Family::Turbo | Family::Ktn)
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for Family {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase();
        Family::ALL
            .into_iter()
            .find(|f| f.label() == wanted)
            .ok_or(PlanError::UnknownFamily(wanted))
    }
}

#[derive(Clone, Copy)]
enum Field {
    Subfamily,
    Subfamily2,
}

type Needle = (Field, &'static str);

enum Condition {
    AnyOf(&'static [Needle]),
    AllOf(&'static [Needle]),
}

/// Classification cascade, evaluated top to bottom.
const RULES: &[(Condition, Family)] = &[
    (
        Condition::AnyOf(&[(Field::Subfamily2, "GET KTN"), (Field::Subfamily2, "FIJACION GET")]),
        Family::Get,
    ),
    (
        Condition::AnyOf(&[
            (Field::Subfamily2, "RODAJE KTN"),
            (Field::Subfamily2, "FIJACION RODAJE"),
        ]),
        Family::Rodaje,
    ),
    (Condition::AnyOf(&[(Field::Subfamily, "DONALDSON")]), Family::Donaldson),
    (Condition::AnyOf(&[(Field::Subfamily, "TURBO")]), Family::Turbo),
    (
        Condition::AllOf(&[(Field::Subfamily, "IMPORTADOS"), (Field::Subfamily2, "FILTROS KTN")]),
        Family::Ktn,
    ),
    (
        Condition::AnyOf(&[
            (Field::Subfamily2, "CAT ALTERNATIVO"),
            (Field::Subfamily, "NORDIC LIGHTS"),
        ]),
        Family::Repuestos,
    ),
];

/// Assigns the logical family from the two raw category fields.
///
/// First matching rule wins; matching is a case-insensitive substring test.
/// Empty or missing fields fall through to `OTROS`.
pub fn classify(subfamily: &str, subfamily2: &str) -> Family {
    let sf = subfamily.to_uppercase();
    let sf2 = subfamily2.to_uppercase();

    let contains = |&(field, needle): &Needle| match field {
        Field::Subfamily => sf.contains(needle),
        Field::Subfamily2 => sf2.contains(needle),
    };

    RULES
        .iter()
        .find(|(condition, _)| match condition {
            Condition::AnyOf(needles) => needles.iter().any(contains),
            Condition::AllOf(needles) => needles.iter().all(contains),
        })
        .map(|(_, family)| *family)
        .unwrap_or(Family::Otros)
}
