//! Demand-side management (DSM) lets demand for a commodity at a site shift in time.
use crate::commodity::CommodityID;
use crate::entity::SiteID;
use indexmap::IndexMap;

/// A map of [`Dsm`] parameters, keyed by site and commodity
pub type DsmMap = IndexMap<(SiteID, CommodityID), Dsm>;

/// Limits on how demand may be shifted
#[derive(PartialEq, Debug, Clone)]
pub struct Dsm {
    /// Maximum number of timesteps by which demand may be moved earlier or later
    pub delay: u32,
    /// Number of timesteps after a shift during which demand may not be shifted again
    pub recovery: u32,
    /// Fraction of shifted demand which is recovered
    pub eff: f64,
    /// Maximum downwards shift per timestep
    pub cap_max_do: f64,
    /// Maximum upwards shift per timestep
    pub cap_max_up: f64,
}
