//! Pairing of processes which buy a commodity from a market with those which sell it back.
use crate::commodity::CommodityID;
use crate::entity::SiteID;
use crate::process::{ProcessCommodityKey, ProcessID};
use indexmap::IndexSet;
use std::collections::HashSet;

/// A buy process together with the sell process consuming what it supplies
#[derive(PartialEq, Eq, Hash, Clone, Debug)]
pub struct BuySellPair {
    /// Process which buys from the market
    pub buy: ProcessID,
    /// Process which sells to the market
    pub sell: ProcessID,
}

/// The (support time frame, site, commodity) triples of a process's flows in one direction
fn interface<'a>(
    process: &ProcessID,
    flows: &'a [ProcessCommodityKey],
) -> HashSet<(u32, &'a SiteID, &'a CommodityID)> {
    flows
        .iter()
        .filter(|key| key.process == *process)
        .map(|key| (key.stf, &key.site, &key.commodity))
        .collect()
}

/// Find the sell process matching a buy process.
///
/// Candidates are the processes with an output in `sell_commodities`, visited in the order of
/// `outputs`. The first candidate which consumes a commodity that `buy` produces, at the same site
/// and in the same support time frame, is returned. `buy` itself is never returned.
///
/// # Arguments
///
/// * `buy` - The buy process
/// * `outputs` - Output tuples of all processes
/// * `inputs` - Input tuples of all processes
/// * `sell_commodities` - Names of commodities of type `Sell`
pub fn find_paired_sell_process<'a>(
    buy: &ProcessID,
    outputs: &'a [ProcessCommodityKey],
    inputs: &[ProcessCommodityKey],
    sell_commodities: &IndexSet<CommodityID>,
) -> Option<&'a ProcessID> {
    let buy_out = interface(buy, outputs);

    outputs
        .iter()
        .filter(|key| key.process != *buy && sell_commodities.contains(&key.commodity))
        .map(|key| &key.process)
        .find(|candidate| !interface(candidate, inputs).is_disjoint(&buy_out))
}

/// Pair every buy process with its sell process.
///
/// Buy processes are those consuming a commodity in `buy_commodities`. Each appears at most
/// once, in the order of `inputs`; those without a matching sell process are skipped.
pub fn buy_sell_pairs(
    outputs: &[ProcessCommodityKey],
    inputs: &[ProcessCommodityKey],
    buy_commodities: &IndexSet<CommodityID>,
    sell_commodities: &IndexSet<CommodityID>,
) -> Vec<BuySellPair> {
    let buy_processes: IndexSet<&ProcessID> = inputs
        .iter()
        .filter(|key| buy_commodities.contains(&key.commodity))
        .map(|key| &key.process)
        .collect();

    buy_processes
        .into_iter()
        .filter_map(|buy| {
            find_paired_sell_process(buy, outputs, inputs, sell_commodities).map(|sell| {
                BuySellPair {
                    buy: buy.clone(),
                    sell: sell.clone(),
                }
            })
        })
        .collect()
}
