//! The model: every input table, as read from a model directory.
use crate::commodity::CommodityMap;
use crate::dsm::DsmMap;
use crate::global::GlobalProperties;
use crate::price::PriceSeries;
use crate::process::{ProcessCommodityMap, ProcessMap};
use crate::storage::StorageMap;
use crate::time_frame::TimeFrames;
use crate::transmission::TransmissionMap;
use itertools::Itertools;
use std::path::PathBuf;

pub mod index;
pub use index::{CostFactors, EntityIndex, ModelIndex, Solution, Solver};
pub mod parameters;
pub use parameters::{ModelParameters, Timesteps};

/// Model definition
pub struct Model {
    /// Path to model folder
    pub model_path: PathBuf,
    /// Parameters from the model TOML file
    pub parameters: ModelParameters,
    /// The support time frames of the horizon
    pub time_frames: TimeFrames,
    /// Named scalar constraints for each support time frame
    pub global_properties: GlobalProperties,
    /// Commodities at each site
    pub commodities: CommodityMap,
    /// Processes, by the time frame in which they are built
    pub processes: ProcessMap,
    /// Input and output ratios of processes
    pub process_commodities: ProcessCommodityMap,
    /// Transmission lines between sites
    pub transmissions: TransmissionMap,
    /// Storages
    pub storages: StorageMap,
    /// Demand-side management parameters
    pub dsm: DsmMap,
    /// External price series for bought and sold commodities
    pub price_series: PriceSeries,
}

impl Model {
    /// The modelled timesteps, in order
    pub fn timesteps(&self) -> Vec<u32> {
        self.parameters.timesteps.modelled().collect_vec()
    }
}
