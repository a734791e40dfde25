//! Static debt fund sub-category reference data

use crate::types::SchemeCode;

/// A debt fund sub-category and the schemes listed under it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebtSubcategory {
    pub id: u32,
    pub name: &'static str,
    pub description: &'static str,
    scheme_codes: &'static [u32],
}

impl DebtSubcategory {
    /// Schemes in this sub-category
    pub fn scheme_codes(&self) -> impl Iterator<Item = SchemeCode> + '_ {
        self.scheme_codes.iter().copied().map(SchemeCode::new)
    }

    /// Look up a sub-category by id
    #[must_use]
    pub fn by_id(id: u32) -> Option<&'static Self> {
        DEBT_SUBCATEGORIES.iter().find(|sub| sub.id == id)
    }
}

pub const DEBT_SUBCATEGORIES: &[DebtSubcategory] = &[
    DebtSubcategory {
        id: 1,
        name: "Low Duration",
        description: "Funds with portfolio duration between 6 months to 1 year",
        scheme_codes: &[143612, 120398, 119523, 118942, 133810, 120513, 118709],
    },
    DebtSubcategory {
        id: 2,
        name: "Overnight Fund",
        description: "Funds investing in overnight securities",
        scheme_codes: &[145810, 147951, 146675],
    },
    DebtSubcategory {
        id: 3,
        name: "Liquid Fund",
        description: "Funds investing in money market instruments",
        scheme_codes: &[120837, 118701, 139538, 119568, 120197, 119766],
    },
    DebtSubcategory {
        id: 4,
        name: "Ultra Short Duration",
        description: "Funds with portfolio duration between 3-6 months",
        scheme_codes: &[120746, 143494, 119205],
    },
    DebtSubcategory {
        id: 5,
        name: "Floating Rate",
        description: "Funds investing in floating rate instruments",
        scheme_codes: &[120425, 149049],
    },
];
