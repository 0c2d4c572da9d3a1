//! Storages hold a commodity at a site for use in later timesteps.
use crate::commodity::CommodityID;
use crate::entity::{EntityKey, EntityTable, Lifespan, SiteID, UnitLabels};
use crate::id::define_id_type;

define_id_type! {StorageID}

/// A map of [`Storage`]s, keyed by support time frame, site, storage ID and commodity
pub type StorageMap = EntityTable<StorageKey, Storage>;

/// Identifies a storage built at a site in a support time frame
#[derive(PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Debug)]
pub struct StorageKey {
    /// Support time frame in which the storage is built
    pub stf: u32,
    /// Site of the storage
    pub site: SiteID,
    /// The storage
    pub storage: StorageID,
    /// The commodity stored
    pub commodity: CommodityID,
}

impl StorageKey {
    /// Create a new [`StorageKey`]
    pub fn new(stf: u32, site: &str, storage: &str, commodity: &str) -> Self {
        Self {
            stf,
            site: site.into(),
            storage: storage.into(),
            commodity: commodity.into(),
        }
    }
}

/// A storage at a site, independent of when it was built
#[derive(PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Debug)]
pub struct StorageUnit {
    /// Site of the storage
    pub site: SiteID,
    /// The storage
    pub storage: StorageID,
    /// The commodity stored
    pub commodity: CommodityID,
}

impl EntityKey for StorageKey {
    type Unit = StorageUnit;
    const TABLE: &'static str = "storage";

    fn support_time_frame(&self) -> u32 {
        self.stf
    }

    fn unit(&self) -> StorageUnit {
        StorageUnit {
            site: self.site.clone(),
            storage: self.storage.clone(),
            commodity: self.commodity.clone(),
        }
    }
}

impl UnitLabels for StorageUnit {
    const COLUMNS: &'static [&'static str] = &["site", "storage", "commodity"];

    fn labels(&self) -> Vec<String> {
        vec![
            self.site.to_string(),
            self.storage.to_string(),
            self.commodity.to_string(),
        ]
    }
}

/// Technical and economic parameters of a storage.
///
/// Storages have separate capacities for the energy they hold (`_c`) and the rate at which they
/// charge and discharge (`_p`).
#[derive(PartialEq, Debug, Clone)]
pub struct Storage {
    /// Energy capacity installed before the modelled horizon
    pub inst_cap_c: f64,
    /// Upper bound on total energy capacity
    pub cap_up_c: f64,
    /// Power capacity installed before the modelled horizon
    pub inst_cap_p: f64,
    /// Upper bound on total power capacity
    pub cap_up_p: f64,
    /// Charging efficiency
    pub eff_in: f64,
    /// Discharging efficiency
    pub eff_out: f64,
    /// Investment cost per unit of new energy capacity
    pub inv_cost_c: f64,
    /// Investment cost per unit of new power capacity
    pub inv_cost_p: f64,
    /// Weighted average cost of capital
    pub wacc: f64,
    /// Years for which new capacity is valid
    pub depreciation: u32,
    /// Service life of capacity installed before the horizon
    pub lifetime: u32,
}

impl Lifespan for Storage {
    fn depreciation(&self) -> u32 {
        self.depreciation
    }

    fn lifetime(&self) -> u32 {
        self.lifetime
    }

    fn installed_capacity(&self) -> f64 {
        self.inst_cap_c.max(self.inst_cap_p)
    }

    fn wacc(&self) -> f64 {
        self.wacc
    }
}
