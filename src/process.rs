//! Processes convert input commodities into output commodities at a site.
use crate::commodity::CommodityID;
use crate::entity::{EntityKey, EntityTable, Lifespan, SiteID, UnitLabels};
use crate::id::define_id_type;
use indexmap::IndexMap;
use serde_string_enum::DeserializeLabeledStringEnum;
use std::collections::HashMap;

define_id_type! {ProcessID}

/// A map of [`Process`]es, keyed by support time frame, site and process ID
pub type ProcessMap = EntityTable<ProcessKey, Process>;

/// Input/output ratios of processes, keyed by support time frame, process, commodity and direction
pub type ProcessCommodityMap = IndexMap<(u32, ProcessID, CommodityID, FlowDirection), f64>;

/// Identifies a process built at a site in a support time frame
#[derive(PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Debug)]
pub struct ProcessKey {
    /// Support time frame in which the process is built
    pub stf: u32,
    /// Site of the process
    pub site: SiteID,
    /// The process
    pub process: ProcessID,
}

impl ProcessKey {
    /// Create a new [`ProcessKey`]
    pub fn new(stf: u32, site: &str, process: &str) -> Self {
        Self {
            stf,
            site: site.into(),
            process: process.into(),
        }
    }
}

/// A process at a site, independent of when it was built
#[derive(PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Debug)]
pub struct ProcessUnit {
    /// Site of the process
    pub site: SiteID,
    /// The process
    pub process: ProcessID,
}

impl EntityKey for ProcessKey {
    type Unit = ProcessUnit;
    const TABLE: &'static str = "process";

    fn support_time_frame(&self) -> u32 {
        self.stf
    }

    fn unit(&self) -> ProcessUnit {
        ProcessUnit {
            site: self.site.clone(),
            process: self.process.clone(),
        }
    }
}

impl UnitLabels for ProcessUnit {
    const COLUMNS: &'static [&'static str] = &["site", "process"];

    fn labels(&self) -> Vec<String> {
        vec![self.site.to_string(), self.process.to_string()]
    }
}

/// Technical and economic parameters of a process
#[derive(PartialEq, Debug, Clone)]
pub struct Process {
    /// Capacity installed before the modelled horizon
    pub inst_cap: f64,
    /// Lower bound on total capacity
    pub cap_lo: f64,
    /// Upper bound on total capacity
    pub cap_up: f64,
    /// Investment cost per unit of new capacity
    pub inv_cost: f64,
    /// Fixed cost per unit of capacity per year
    pub fix_cost: f64,
    /// Variable cost per unit of throughput
    pub var_cost: f64,
    /// Weighted average cost of capital
    pub wacc: f64,
    /// Years for which new capacity is valid
    pub depreciation: u32,
    /// Service life of capacity installed before the horizon
    pub lifetime: u32,
}

impl Lifespan for Process {
    fn depreciation(&self) -> u32 {
        self.depreciation
    }

    fn lifetime(&self) -> u32 {
        self.lifetime
    }

    fn installed_capacity(&self) -> f64 {
        self.inst_cap
    }

    fn wacc(&self) -> f64 {
        self.wacc
    }
}

/// Whether a commodity flows into or out of a process
#[derive(PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Copy, Debug, DeserializeLabeledStringEnum)]
pub enum FlowDirection {
    /// The commodity is consumed by the process
    #[string = "In"]
    In,
    /// The commodity is produced by the process
    #[string = "Out"]
    Out,
}

/// A commodity flowing into or out of a process at a site in a support time frame
#[derive(PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Debug)]
pub struct ProcessCommodityKey {
    /// Support time frame
    pub stf: u32,
    /// Site of the process
    pub site: SiteID,
    /// The process
    pub process: ProcessID,
    /// The commodity
    pub commodity: CommodityID,
}

impl ProcessCommodityKey {
    /// Create a new [`ProcessCommodityKey`]
    pub fn new(stf: u32, site: &str, process: &str, commodity: &str) -> Self {
        Self {
            stf,
            site: site.into(),
            process: process.into(),
            commodity: commodity.into(),
        }
    }
}

/// Every (support time frame, site, process, commodity) combination with a flow in the given
/// direction.
///
/// Processes are visited in table order and, for each, commodities in the order of `ratios`.
pub fn process_commodity_tuples(
    processes: &ProcessMap,
    ratios: &ProcessCommodityMap,
    direction: FlowDirection,
) -> Vec<ProcessCommodityKey> {
    let mut commodities_by_process: HashMap<(u32, &ProcessID), Vec<&CommodityID>> = HashMap::new();
    for (stf, process, commodity, _) in ratios.keys().filter(|key| key.3 == direction) {
        commodities_by_process
            .entry((*stf, process))
            .or_default()
            .push(commodity);
    }

    processes
        .keys()
        .filter_map(|key| {
            commodities_by_process
                .get(&(key.stf, &key.process))
                .map(|commodities| (key, commodities))
        })
        .flat_map(|(key, commodities)| {
            commodities.iter().map(|commodity| ProcessCommodityKey {
                stf: key.stf,
                site: key.site.clone(),
                process: key.process.clone(),
                commodity: (*commodity).clone(),
            })
        })
        .collect()
}
