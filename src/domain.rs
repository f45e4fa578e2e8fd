use std::fmt;

/// Identifier columns every normalized table starts with, in this order.
pub const IDENTIFIER_COLUMNS: [&str; 6] = [
    "geo_id",
    "state",
    "State_Name",
    "county",
    "County_Name",
    "tract",
];

pub const NAME_COLUMN: &str = "NAME";
pub const STATE_COLUMN: &str = "state";
pub const COUNTY_COLUMN: &str = "county";
pub const TRACT_COLUMN: &str = "tract";
pub const GEO_ID_COLUMN: &str = "geo_id";
pub const STATE_NAME_COLUMN: &str = "State_Name";
pub const COUNTY_NAME_COLUMN: &str = "County_Name";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Illinois,
    Louisiana,
    Washington,
    Florida,
    California,
}

impl Region {
    pub const ALL: [Region; 5] = [
        Region::Illinois,
        Region::Louisiana,
        Region::Washington,
        Region::Florida,
        Region::California,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Region::Illinois => "17",
            Region::Louisiana => "22",
            Region::Washington => "53",
            Region::Florida => "12",
            Region::California => "06",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Region::Illinois => "Illinois",
            Region::Louisiana => "Louisiana",
            Region::Washington => "Washington",
            Region::Florida => "Florida",
            Region::California => "California",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}

/// Coded variable name to descriptive column name.
pub type RenameMap = &'static [(&'static str, &'static str)];

pub const POPULATION_DISTRIBUTION_RENAMES: RenameMap = &[
    ("DP1_0078C", "white_population"),
    ("DP1_0079C", "black_african_american_population"),
    ("DP1_0080C", "american_indian_alaskan_native_population"),
    ("DP1_0081C", "asian_population"),
    (
        "DP1_0082C",
        "native_hawaiian_and_other_pacific_islander_population",
    ),
    ("DP1_0083C", "Other_race_population"),
];

pub const HOUSING_CHARACTERISTICS_RENAMES: RenameMap = &[
    ("H12A_002N", "owner_occuppied_white"),
    ("H12A_010N", "renter_occupied_white"),
    ("H12B_002N", "owner_occupied_black_or_african_american"),
    ("H12B_010N", "renter_occupied_black_or_african_american"),
    ("H12C_002N", "owner_occuppied_american_indian_alaska_native"),
    ("H12C_010N", "renter_occupied_american_indian_alaska_native"),
    ("H12D_002N", "owner_occupied_asian"),
    ("H12D_010N", "renter_occupied_asian"),
    ("H12E_002N", "owner_occupied_native_hawaiian"),
    ("H12E_010N", "renter_occupied_native_hawaiian"),
    ("H12F_002N", "owner_occuppied_other_race"),
    ("H12F_010N", "renter_occuppied_other_race"),
];

pub const COMMUNITY_RESILIENCE_RENAMES: RenameMap = &[
    (
        "PRED0_E",
        "estimated_number_of_individuals_with_zero_components_of_social_vulnerability",
    ),
    (
        "PRED0_PE",
        "rate_of_individuals_with_zero_components_of_social_vulnerability",
    ),
    (
        "PRED12_E",
        "estimated_number_of_individuals_with_one_two_components_of_social_vulnerability",
    ),
    (
        "PRED12_PE",
        "rate_of_individuals_with_one_two_components_of_social_vulnerability",
    ),
    (
        "PRED3_E",
        "estimated_number_of_individuals_with_three_or_more_components_of_social_vulnerability",
    ),
    (
        "PRED3_PE",
        "rate_of_individuals_with_three_or_more_components_of_social_vulnerability",
    ),
];

pub fn lookup_rename(map: RenameMap, code: &str) -> Option<&'static str> {
    map.iter()
        .find(|(coded, _)| *coded == code)
        .map(|(_, descriptive)| *descriptive)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    PopulationDistribution,
    HousingCharacteristics,
    CommunityResilience,
}

impl Dataset {
    pub const ALL: [Dataset; 3] = [
        Dataset::PopulationDistribution,
        Dataset::HousingCharacteristics,
        Dataset::CommunityResilience,
    ];

    pub fn base_url(&self) -> &'static str {
        match self {
            Dataset::PopulationDistribution => "https://api.census.gov/data/2020/dec/dp",
            Dataset::HousingCharacteristics => "https://api.census.gov/data/2020/dec/dhc",
            Dataset::CommunityResilience => "https://api.census.gov/data/2022/cre",
        }
    }

    /// Comma-separated `get` parameter. Always leads with `NAME`.
    pub fn fields(&self) -> &'static str {
        match self {
            Dataset::PopulationDistribution => {
                "NAME,DP1_0078C,DP1_0079C,DP1_0080C,DP1_0081C,DP1_0082C,DP1_0083C"
            }
            Dataset::HousingCharacteristics => {
                "NAME,H12A_002N,H12A_010N,H12B_002N,H12B_010N,H12C_002N,H12C_010N,H12D_002N,H12D_010N,H12E_002N,H12E_010N,H12F_002N,H12F_010N"
            }
            Dataset::CommunityResilience => {
                "NAME,PRED0_E,PRED0_PE,PRED12_E,PRED12_PE,PRED3_E,PRED3_PE"
            }
        }
    }

    pub fn renames(&self) -> RenameMap {
        match self {
            Dataset::PopulationDistribution => POPULATION_DISTRIBUTION_RENAMES,
            Dataset::HousingCharacteristics => HOUSING_CHARACTERISTICS_RENAMES,
            Dataset::CommunityResilience => COMMUNITY_RESILIENCE_RENAMES,
        }
    }

    /// File stem of the per-dataset CSV export.
    pub fn file_stem(&self) -> &'static str {
        match self {
            Dataset::PopulationDistribution => "population_distribution",
            Dataset::HousingCharacteristics => "housing_characteristics",
            Dataset::CommunityResilience => "community_resilience",
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file_stem())
    }
}
