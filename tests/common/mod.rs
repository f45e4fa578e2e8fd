#![allow(dead_code)]

use std::sync::Mutex;

use census_tract_etl::census::{CensusClient, parse_response};
use census_tract_etl::domain::{Dataset, Region};
use census_tract_etl::error::EtlError;
use census_tract_etl::table::Table;

/// Serves canned JSON bodies and records every request it sees.
#[derive(Default)]
pub struct MockCensus {
    pub calls: Mutex<Vec<(Dataset, Region)>>,
}

impl CensusClient for MockCensus {
    fn fetch(&self, dataset: Dataset, region: Region) -> Result<Table, EtlError> {
        self.calls.lock().unwrap().push((dataset, region));
        parse_response(&body(dataset, region))
    }
}

fn body(dataset: Dataset, region: Region) -> String {
    let code = region.code();
    let state = region.name();
    let name = |tract: &str| format!("Census Tract {tract}; Test County; {state}");
    match dataset {
        Dataset::PopulationDistribution => format!(
            r#"[["NAME","DP1_0078C","DP1_0079C","state","county","tract"],
                ["{}","523","12","{code}","001","000100"],
                ["{}","88","4","{code}","001","000200"]]"#,
            name("1"),
            name("2"),
        ),
        Dataset::HousingCharacteristics => format!(
            r#"[["NAME","H12A_002N","H12A_010N","state","county","tract"],
                ["{}","140","60","{code}","001","000100"]]"#,
            name("1"),
        ),
        Dataset::CommunityResilience => format!(
            r#"[["NAME","PRED0_E","PRED0_PE","state","county","tract"],
                ["{}","300","41.2","{code}","001","000100"],
                ["{}","7","12.5","{code}","005","990000"]]"#,
            name("1"),
            name("99"),
        ),
    }
}

/// Client whose every request fails the way a dead endpoint would.
pub struct FailingCensus;

impl CensusClient for FailingCensus {
    fn fetch(&self, _dataset: Dataset, _region: Region) -> Result<Table, EtlError> {
        Err(EtlError::CensusStatus {
            status: 503,
            message: "unavailable".to_string(),
        })
    }
}
