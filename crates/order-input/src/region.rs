//! State to Region Table

use crate::order::{normalize, State};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Geographic region used by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    East,
    West,
    Central,
    South,
    North,
}

impl Region {
    /// All regions in feature column order
    pub const ALL: [Region; 5] = [
        Region::East,
        Region::West,
        Region::Central,
        Region::South,
        Region::North,
    ];

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::East => "East",
            Region::West => "West",
            Region::Central => "Central",
            Region::South => "South",
            Region::North => "North",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const EAST_STATES: &[&str] = &[
    "Arunachal Pradesh",
    "Assam",
    "Manipur",
    "Meghalaya",
    "Mizoram",
    "Nagaland",
    "Tripura",
    "West Bengal",
];

const WEST_STATES: &[&str] = &["Goa", "Gujarat", "Maharashtra"];

const CENTRAL_STATES: &[&str] = &["Chhattisgarh", "Madhya Pradesh"];

// Andhra Pradesh never appeared in the training data and is not listed.
const SOUTH_STATES: &[&str] = &["Karnataka", "Kerala", "Tamil Nadu", "Telangana"];

const NORTH_STATES: &[&str] = &[
    "Bihar",
    "Haryana",
    "Himachal Pradesh",
    "Jharkhand",
    "Odisha",
    "Punjab",
    "Rajasthan",
    "Sikkim",
    "Uttar Pradesh",
    "Uttarakhand",
];

/// Static state-to-region membership table.
///
/// Each region owns a fixed list of states and no state is listed twice.
/// Lookups are exact: a name missing from every list has no region.
#[derive(Debug, Clone)]
pub struct RegionTable {
    groups: [(Region, &'static [&'static str]); 5],
}

impl RegionTable {
    /// The table the classifier was trained with
    pub fn standard() -> Self {
        Self {
            groups: [
                (Region::East, EAST_STATES),
                (Region::West, WEST_STATES),
                (Region::Central, CENTRAL_STATES),
                (Region::South, SOUTH_STATES),
                (Region::North, NORTH_STATES),
            ],
        }
    }

    /// Region a state belongs to, if any
    pub fn region_of(&self, state: &str) -> Option<Region> {
        self.groups
            .iter()
            .find(|(_, states)| states.contains(&state))
            .map(|(region, _)| *region)
    }

    /// Whether `state` is a member of `region`
    pub fn is_member(&self, region: Region, state: &str) -> bool {
        self.groups
            .iter()
            .any(|(r, states)| *r == region && states.contains(&state))
    }

    /// States listed for one region
    pub fn states_in(&self, region: Region) -> &'static [&'static str] {
        self.groups
            .iter()
            .find(|(r, _)| *r == region)
            .map(|(_, states)| *states)
            .unwrap_or(&[])
    }

    /// Every listed state, sorted alphabetically (the form's option list)
    pub fn states(&self) -> Vec<&'static str> {
        let mut all: Vec<&'static str> = self
            .groups
            .iter()
            .flat_map(|(_, states)| states.iter().copied())
            .collect();
        all.sort_unstable();
        all.dedup();
        all
    }

    /// Canonical spelling of a listed state, matched loosely
    pub fn canonical(&self, name: &str) -> Option<&'static str> {
        let wanted = normalize(name);
        self.groups
            .iter()
            .flat_map(|(_, states)| states.iter().copied())
            .find(|state| normalize(state) == wanted)
    }

    /// Turn free text into a [`State`], preferring the table's spelling.
    ///
    /// Names that match no listed state are kept as typed.
    pub fn resolve(&self, name: &str) -> State {
        match self.canonical(name) {
            Some(state) => State::new(state),
            None => State::new(name.trim()),
        }
    }
}

impl Default for RegionTable {
    fn default() -> Self {
        Self::standard()
    }
}
