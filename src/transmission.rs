//! Transmission lines carry a commodity from one site to another.
use crate::commodity::CommodityID;
use crate::entity::{EntityKey, EntityTable, Lifespan, SiteID, UnitLabels};
use crate::id::define_id_type;

define_id_type! {TransmissionID}

/// A map of [`Transmission`]s, keyed by support time frame, sites, transmission ID and commodity
pub type TransmissionMap = EntityTable<TransmissionKey, Transmission>;

/// Identifies a transmission line built in a support time frame
#[derive(PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Debug)]
pub struct TransmissionKey {
    /// Support time frame in which the line is built
    pub stf: u32,
    /// Site the commodity leaves
    pub site_in: SiteID,
    /// Site the commodity arrives at
    pub site_out: SiteID,
    /// The transmission line
    pub transmission: TransmissionID,
    /// The commodity carried
    pub commodity: CommodityID,
}

impl TransmissionKey {
    /// Create a new [`TransmissionKey`]
    pub fn new(
        stf: u32,
        site_in: &str,
        site_out: &str,
        transmission: &str,
        commodity: &str,
    ) -> Self {
        Self {
            stf,
            site_in: site_in.into(),
            site_out: site_out.into(),
            transmission: transmission.into(),
            commodity: commodity.into(),
        }
    }
}

/// A transmission line, independent of when it was built
#[derive(PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Debug)]
pub struct TransmissionUnit {
    /// Site the commodity leaves
    pub site_in: SiteID,
    /// Site the commodity arrives at
    pub site_out: SiteID,
    /// The transmission line
    pub transmission: TransmissionID,
    /// The commodity carried
    pub commodity: CommodityID,
}

impl EntityKey for TransmissionKey {
    type Unit = TransmissionUnit;
    const TABLE: &'static str = "transmission";

    fn support_time_frame(&self) -> u32 {
        self.stf
    }

    fn unit(&self) -> TransmissionUnit {
        TransmissionUnit {
            site_in: self.site_in.clone(),
            site_out: self.site_out.clone(),
            transmission: self.transmission.clone(),
            commodity: self.commodity.clone(),
        }
    }
}

impl UnitLabels for TransmissionUnit {
    const COLUMNS: &'static [&'static str] = &["site_in", "site_out", "transmission", "commodity"];

    fn labels(&self) -> Vec<String> {
        vec![
            self.site_in.to_string(),
            self.site_out.to_string(),
            self.transmission.to_string(),
            self.commodity.to_string(),
        ]
    }
}

/// Technical and economic parameters of a transmission line
#[derive(PartialEq, Debug, Clone)]
pub struct Transmission {
    /// Fraction of the commodity which arrives
    pub eff: f64,
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
    /// Variable cost per unit transported
    pub var_cost: f64,
    /// Weighted average cost of capital
    pub wacc: f64,
    /// Years for which new capacity is valid
    pub depreciation: u32,
    /// Service life of capacity installed before the horizon
    pub lifetime: u32,
}

impl Lifespan for Transmission {
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
