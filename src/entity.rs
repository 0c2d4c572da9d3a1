//! Traits shared by the unit types which can be built and decommissioned: processes,
//! transmissions and storages.
use crate::id::define_id_type;
use indexmap::IndexMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::rc::Rc;

define_id_type! {SiteID}

/// A table of entity records, keyed by the entity's composite key
pub type EntityTable<K, V> = IndexMap<K, Rc<V>>;

/// A composite key identifying an entity record built in a given support time frame
pub trait EntityKey: Clone + Eq + Hash + Debug {
    /// The key with the support time frame removed, i.e. the physical unit
    type Unit: UnitLabels + Clone + Eq + Hash + Debug;

    /// Name of the table holding records for this kind of key, used in error messages
    const TABLE: &'static str;

    /// The support time frame in which this entity is built
    fn support_time_frame(&self) -> u32;

    /// The physical unit this key refers to
    fn unit(&self) -> Self::Unit;
}

/// Lifespan attributes of an entity record
pub trait Lifespan {
    /// Years after the build time frame during which new capacity counts as valid
    fn depreciation(&self) -> u32;

    /// Total service life of capacity installed before the modelled horizon
    fn lifetime(&self) -> u32;

    /// Capacity already installed at the start of the horizon
    fn installed_capacity(&self) -> f64;

    /// Weighted average cost of capital over the depreciation period
    fn wacc(&self) -> f64;
}

/// Column labels for writing units to tabular output
pub trait UnitLabels {
    /// Names of the columns
    const COLUMNS: &'static [&'static str];

    /// Values of the columns, in the same order as [`UnitLabels::COLUMNS`]
    fn labels(&self) -> Vec<String>;
}
