use camino::Utf8PathBuf;
use tracing::info;

use crate::census::{CensusClient, fetch_dataset};
use crate::domain::Dataset;
use crate::error::EtlError;
use crate::merge::merge;
use crate::normalize::normalize;
use crate::store::{Store, write_csv};
use crate::table::Table;

#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub merged_path: Utf8PathBuf,
    pub merged_rows: usize,
    pub dataset_paths: Vec<Utf8PathBuf>,
}

pub struct Pipeline<C: CensusClient> {
    store: Store,
    client: C,
    write_intermediate: bool,
}

impl<C: CensusClient> Pipeline<C> {
    pub fn new(store: Store, client: C, write_intermediate: bool) -> Self {
        Self {
            store,
            client,
            write_intermediate,
        }
    }

    /// Fetched and normalized table for one dataset across every region.
    pub fn dataset(&self, dataset: Dataset) -> Result<Table, EtlError> {
        let raw = fetch_dataset(&self.client, dataset)?;
        let table = normalize(raw, dataset.renames())?;
        info!(%dataset, rows = table.len(), "normalized dataset");
        Ok(table)
    }

    /// Fetch, normalize and merge all three datasets, then write the CSV
    /// exports.
    pub fn run(&self) -> Result<PipelineReport, EtlError> {
        let population = self.dataset(Dataset::PopulationDistribution)?;
        let housing = self.dataset(Dataset::HousingCharacteristics)?;
        let resilience = self.dataset(Dataset::CommunityResilience)?;

        self.store.ensure_output_dir()?;

        let mut dataset_paths = Vec::new();
        if self.write_intermediate {
            for (dataset, table) in [
                (Dataset::PopulationDistribution, &population),
                (Dataset::HousingCharacteristics, &housing),
                (Dataset::CommunityResilience, &resilience),
            ] {
                let path = self.store.dataset_path(dataset);
                write_csv(table, &path)?;
                dataset_paths.push(path);
            }
        }

        let merged = merge(&population, &housing, &resilience)?;
        let merged_path = self.store.merged_path();
        write_csv(&merged, &merged_path)?;
        info!(path = %merged_path, rows = merged.len(), "wrote merged census data");

        Ok(PipelineReport {
            merged_path,
            merged_rows: merged.len(),
            dataset_paths,
        })
    }
}
