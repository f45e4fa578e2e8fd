mod common;

use assert_matches::assert_matches;
use camino::Utf8PathBuf;

use census_tract_etl::config::Settings;
use census_tract_etl::domain::{Dataset, IDENTIFIER_COLUMNS, Region};
use census_tract_etl::error::EtlError;
use census_tract_etl::pipeline::Pipeline;
use census_tract_etl::store::Store;

use common::{FailingCensus, MockCensus};

const RESILIENCE_ZERO: &str =
    "estimated_number_of_individuals_with_zero_components_of_social_vulnerability";

fn settings(root: &std::path::Path) -> Settings {
    Settings {
        output_dir: Utf8PathBuf::from_path_buf(root.join("output_data")).unwrap(),
        ..Settings::default()
    }
}

fn read_csv(path: &std::path::Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let header = reader.headers().unwrap().iter().map(str::to_string).collect();
    let rows = reader
        .records()
        .map(|record| record.unwrap().iter().map(str::to_string).collect())
        .collect();
    (header, rows)
}

#[test]
fn requests_every_dataset_for_every_region_in_order() {
    let temp = tempfile::tempdir().unwrap();
    let census = MockCensus::default();
    Pipeline::new(Store::new(&settings(temp.path())), &census, false)
        .run()
        .unwrap();

    let calls = census.calls.lock().unwrap();
    let expected: Vec<(Dataset, Region)> = Dataset::ALL
        .iter()
        .flat_map(|&dataset| Region::ALL.iter().map(move |&region| (dataset, region)))
        .collect();
    assert_eq!(*calls, expected);
}

#[test]
fn fetch_failure_aborts_before_writing() {
    let temp = tempfile::tempdir().unwrap();
    let store = Store::new(&settings(temp.path()));
    let err = Pipeline::new(store.clone(), FailingCensus, true)
        .run()
        .unwrap_err();
    assert_matches!(err, EtlError::CensusStatus { status: 503, .. });
    assert!(!store.merged_path().as_std_path().exists());
}

#[test]
fn writes_intermediate_dataset_exports() {
    let temp = tempfile::tempdir().unwrap();
    let store = Store::new(&settings(temp.path()));
    let report = Pipeline::new(store.clone(), MockCensus::default(), true)
        .run()
        .unwrap();

    assert_eq!(report.dataset_paths.len(), 3);
    let housing = store.dataset_path(Dataset::HousingCharacteristics);
    let (header, rows) = read_csv(housing.as_std_path());
    assert_eq!(&header[..6], IDENTIFIER_COLUMNS);
    assert_eq!(&header[6..], ["owner_occuppied_white", "renter_occupied_white"]);
    assert_eq!(rows.len(), Region::ALL.len());
}

#[test]
fn writes_merged_csv_with_identifier_columns_first() {
    let temp = tempfile::tempdir().unwrap();
    let settings = settings(temp.path());
    let store = Store::new(&settings);
    let report = Pipeline::new(store.clone(), MockCensus::default(), false)
        .run()
        .unwrap();

    assert_eq!(report.merged_path, store.merged_path());
    assert!(report.dataset_paths.is_empty());

    let (header, rows) = read_csv(report.merged_path.as_std_path());
    assert_eq!(&header[..6], IDENTIFIER_COLUMNS);
    assert!(header.contains(&"white_population".to_string()));
    assert!(header.contains(&"owner_occuppied_white".to_string()));
    assert!(header.contains(&RESILIENCE_ZERO.to_string()));

    // Three tracts per region: 000100 in every dataset, 000200 only in
    // population, 990000 only in resilience.
    assert_eq!(rows.len(), Region::ALL.len() * 3);
    assert_eq!(report.merged_rows, rows.len());

    let column = |name: &str| header.iter().position(|h| h == name).unwrap();
    let la = rows
        .iter()
        .find(|row| row[column("geo_id")] == "22001000100")
        .unwrap();
    assert_eq!(la[column("State_Name")], "Louisiana");
    assert_eq!(la[column("County_Name")], "Test County");
    assert_eq!(la[column("white_population")], "523");
    assert_eq!(la[column("owner_occuppied_white")], "140");
}

#[test]
fn unmatched_tracts_keep_other_datasets_empty() {
    let temp = tempfile::tempdir().unwrap();
    let report = Pipeline::new(
        Store::new(&settings(temp.path())),
        MockCensus::default(),
        false,
    )
    .run()
    .unwrap();

    let (header, rows) = read_csv(report.merged_path.as_std_path());
    let column = |name: &str| header.iter().position(|h| h == name).unwrap();

    let population_only = rows
        .iter()
        .find(|row| row[column("geo_id")] == "06001000200")
        .unwrap();
    assert_eq!(population_only[column("white_population")], "88");
    assert_eq!(population_only[column("owner_occuppied_white")], "");
    assert_eq!(population_only[column(RESILIENCE_ZERO)], "");

    let resilience_only = rows
        .iter()
        .find(|row| row[column("geo_id")] == "12005990000")
        .unwrap();
    assert_eq!(resilience_only[column("white_population")], "");
    assert_eq!(resilience_only[column(RESILIENCE_ZERO)], "7");
}
