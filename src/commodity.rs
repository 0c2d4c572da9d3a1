//! Commodities are substances or forms of energy that can be produced, consumed, bought or sold at
//! a site.
use crate::entity::SiteID;
use crate::id::define_id_type;
use crate::price::PriceSpec;
use indexmap::{IndexMap, IndexSet};
use serde_string_enum::DeserializeLabeledStringEnum;
use std::fmt;
use std::rc::Rc;

define_id_type! {CommodityID}

/// A map of [`Commodity`]s, keyed by site, commodity ID and type
pub type CommodityMap = IndexMap<CommodityKey, Rc<Commodity>>;

/// The role a commodity plays at a site
#[derive(
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Clone,
    Copy,
    Debug,
    DeserializeLabeledStringEnum,
    strum::Display,
)]
pub enum CommodityType {
    /// Intermittent supply (e.g. solar irradiation), given as a time series
    #[string = "SupIm"]
    SupIm,
    /// Can be bought from outside the model at a fixed price
    #[string = "Stock"]
    Stock,
    /// Has an exogenous demand which must be met
    #[string = "Demand"]
    Demand,
    /// Environmental commodity (e.g. CO2) which can only be emitted
    #[string = "Env"]
    Env,
    /// Can be bought from a market at a time-varying price
    #[string = "Buy"]
    Buy,
    /// Can be sold to a market at a time-varying price
    #[string = "Sell"]
    Sell,
}

/// Identifies a commodity at a particular site
#[derive(PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Debug)]
pub struct CommodityKey {
    /// The site at which the commodity is available
    pub site: SiteID,
    /// The commodity
    pub commodity: CommodityID,
    /// What kind of commodity this is at this site
    pub kind: CommodityType,
}

impl CommodityKey {
    /// Create a new [`CommodityKey`]
    pub fn new(site: &str, commodity: &str, kind: CommodityType) -> Self {
        Self {
            site: site.into(),
            commodity: commodity.into(),
            kind,
        }
    }
}

impl fmt::Display for CommodityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.site, self.commodity, self.kind)
    }
}

/// Parameters of a commodity at a site
#[derive(PartialEq, Debug, Clone)]
pub struct Commodity {
    /// Price per unit of commodity
    pub price: PriceSpec,
    /// Maximum total amount which can be bought or emitted over the horizon
    pub max: f64,
    /// Maximum amount which can be bought or emitted per timestep
    pub max_per_hour: f64,
}

/// The unique names of commodities of the given type.
pub fn commodity_subset<'a, I>(keys: I, kind: CommodityType) -> IndexSet<CommodityID>
where
    I: IntoIterator<Item = &'a CommodityKey>,
{
    keys.into_iter()
        .filter(|key| key.kind == kind)
        .map(|key| key.commodity.clone())
        .collect()
}

/// The keys whose commodity name is in `names`, of any type and at any site.
pub fn commodity_keys_of<'a, I>(keys: I, names: &IndexSet<CommodityID>) -> Vec<CommodityKey>
where
    I: IntoIterator<Item = &'a CommodityKey>,
{
    keys.into_iter()
        .filter(|key| names.contains(&key.commodity))
        .cloned()
        .collect()
}
