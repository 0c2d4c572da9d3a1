//! The sets and parameters derived from a [`Model`], ready for a solver to declare variables and
//! constraints over.
use super::Model;
use crate::balance::{CommodityBalance, Flows};
use crate::commodity::{CommodityID, CommodityType, commodity_keys_of, commodity_subset};
use crate::entity::{EntityKey, EntityTable, Lifespan, SiteID};
use crate::error::ModelError;
use crate::finance::{annuity_factor, discount_factor, rest_value_fraction};
use crate::global::DISCOUNT_RATE;
use crate::index::{
    DsmWindowTuple, InstalledTuple, OperationalTuple, RestValueTuple, dsm_window_tuples,
    installed_keys, installed_tuples, operational_tuples, rest_value_tuples,
};
use crate::pairing::{BuySellPair, buy_sell_pairs};
use crate::price::{PriceTable, resolve_prices};
use crate::process::{FlowDirection, ProcessCommodityKey, ProcessKey, process_commodity_tuples};
use crate::storage::StorageKey;
use crate::time_frame::TimeFrames;
use crate::transmission::TransmissionKey;
use anyhow::Result;
use indexmap::IndexMap;
use itertools::{Itertools, iproduct};

/// Cost parameters of an entity record
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct CostFactors {
    /// Converts an investment into equal annual payments over the depreciation period
    pub annuity: f64,
    /// Share of the investment which remains after the end of the horizon
    pub rest_value_fraction: f64,
}

/// The tuple sets and cost parameters for one kind of entity
#[derive(PartialEq, Debug, Clone)]
pub struct EntityIndex<K: EntityKey> {
    /// Units which are operational in each support time frame, by build time frame
    pub operational: Vec<OperationalTuple<K::Unit>>,
    /// Units whose value extends past the end of the horizon
    pub rest_value: Vec<RestValueTuple<K::Unit>>,
    /// Units installed before the horizon which are still operational
    pub installed: Vec<InstalledTuple<K::Unit>>,
    /// Cost parameters for every record
    pub cost_factors: IndexMap<K, CostFactors>,
}

impl<K: EntityKey> EntityIndex<K> {
    /// Derive the tuple sets for every record of `table`
    fn build<V: Lifespan>(
        table: &EntityTable<K, V>,
        time_frames: &TimeFrames,
    ) -> Result<Self, ModelError> {
        let horizon_end = time_frames.max();
        let cost_factors = table
            .iter()
            .map(|(key, entity)| {
                let factors = CostFactors {
                    annuity: annuity_factor(entity.depreciation(), entity.wacc()),
                    rest_value_fraction: rest_value_fraction(
                        key.support_time_frame(),
                        entity.depreciation(),
                        horizon_end,
                    ),
                };
                (key.clone(), factors)
            })
            .collect();

        Ok(Self {
            operational: operational_tuples(table.keys(), table, time_frames).try_collect()?,
            rest_value: rest_value_tuples(table.keys(), table, time_frames).try_collect()?,
            installed: installed_tuples(installed_keys(table, time_frames), table, time_frames)
                .try_collect()?,
            cost_factors,
        })
    }
}

/// Every set and parameter derived from a model
#[derive(PartialEq, Debug, Clone)]
pub struct ModelIndex {
    /// The modelled timesteps
    pub timesteps: Vec<u32>,
    /// Tuple sets for processes
    pub processes: EntityIndex<ProcessKey>,
    /// Tuple sets for transmission lines
    pub transmissions: EntityIndex<TransmissionKey>,
    /// Tuple sets for storages
    pub storages: EntityIndex<StorageKey>,
    /// Commodities consumed by each process
    pub process_inputs: Vec<ProcessCommodityKey>,
    /// Commodities produced by each process
    pub process_outputs: Vec<ProcessCommodityKey>,
    /// Pairs of timesteps between which demand may be shifted
    pub dsm_windows: Vec<DsmWindowTuple>,
    /// Prices of bought and sold commodities for each timestep
    pub prices: PriceTable,
    /// Buy processes with the sell processes they supply
    pub buy_sell_pairs: Vec<BuySellPair>,
    /// Weighting of costs in each support time frame
    pub discount_factors: IndexMap<u32, f64>,
}

impl ModelIndex {
    /// Derive every set and parameter of `model`.
    ///
    /// The first error aborts the build: a partial index cannot be solved.
    pub fn build(model: &Model) -> Result<Self, ModelError> {
        let time_frames = &model.time_frames;
        let timesteps = model.timesteps();

        let process_inputs = process_commodity_tuples(
            &model.processes,
            &model.process_commodities,
            FlowDirection::In,
        );
        let process_outputs = process_commodity_tuples(
            &model.processes,
            &model.process_commodities,
            FlowDirection::Out,
        );

        let site_commodities: Vec<(u32, SiteID, CommodityID)> =
            iproduct!(time_frames.iter(), model.dsm.keys())
                .map(|(stf, (site, commodity))| (stf, site.clone(), commodity.clone()))
                .collect();
        let dsm_windows =
            dsm_window_tuples(&timesteps, &site_commodities, &model.dsm).try_collect()?;

        let buy = commodity_subset(model.commodities.keys(), CommodityType::Buy);
        let sell = commodity_subset(model.commodities.keys(), CommodityType::Sell);
        let traded = commodity_keys_of(
            model.commodities.keys(),
            &buy.union(&sell).cloned().collect(),
        );
        let prices = resolve_prices(&model.commodities, &traded, &timesteps, &model.price_series)?;
        let buy_sell_pairs = buy_sell_pairs(&process_outputs, &process_inputs, &buy, &sell);

        let stf_min = time_frames.min();
        let discount_rate = model
            .global_properties
            .get(stf_min, DISCOUNT_RATE)
            .unwrap_or(0.0);
        let discount_factors = time_frames
            .iter()
            .map(|stf| (stf, discount_factor(stf, stf_min, discount_rate)))
            .collect();

        Ok(Self {
            processes: EntityIndex::build(&model.processes, time_frames)?,
            transmissions: EntityIndex::build(&model.transmissions, time_frames)?,
            storages: EntityIndex::build(&model.storages, time_frames)?,
            timesteps,
            process_inputs,
            process_outputs,
            dsm_windows,
            prices,
            buy_sell_pairs,
            discount_factors,
        })
    }
}

/// The result of solving a model
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Value of the objective function
    pub objective: f64,
    /// Optimal flows
    pub flows: Flows<f64>,
}

impl Solution {
    /// Commodity balances of the optimal flows
    pub fn commodity_balances(&self) -> CommodityBalance<f64> {
        CommodityBalance::new(&self.flows)
    }
}

/// An optimisation backend which can solve a model
pub trait Solver {
    /// Solve `model`, whose sets and parameters are given by `index`
    fn solve(&self, model: &Model, index: &ModelIndex) -> Result<Solution>;
}
