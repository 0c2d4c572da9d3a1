//! Net commodity balances from the flows into and out of processes, transmissions and storages.
//!
//! Consumption counts positive and production negative, so a site with unmet demand has a
//! positive balance.
use crate::commodity::CommodityID;
use crate::entity::SiteID;
use crate::process::ProcessID;
use crate::storage::StorageID;
use crate::transmission::TransmissionID;
use std::collections::HashMap;
use std::ops::{Add, Sub};

/// A quantity which can be summed into a balance
pub trait FlowValue: Copy + Default + Add<Output = Self> + Sub<Output = Self> {}

impl<T> FlowValue for T where T: Copy + Default + Add<Output = T> + Sub<Output = T> {}

/// Index of a flow into or out of a process
#[derive(PartialEq, Eq, Hash, Clone, Debug)]
pub struct ProcessFlowKey {
    /// The timestep
    pub timestep: u32,
    /// Support time frame
    pub stf: u32,
    /// Site of the process
    pub site: SiteID,
    /// The process
    pub process: ProcessID,
    /// The commodity flowing
    pub commodity: CommodityID,
}

/// Index of a flow into or out of a transmission line
#[derive(PartialEq, Eq, Hash, Clone, Debug)]
pub struct TransmissionFlowKey {
    /// The timestep
    pub timestep: u32,
    /// Support time frame
    pub stf: u32,
    /// Site at which the line starts
    pub site_in: SiteID,
    /// Site at which the line ends
    pub site_out: SiteID,
    /// The transmission line
    pub transmission: TransmissionID,
    /// The commodity flowing
    pub commodity: CommodityID,
}

/// Index of a flow into or out of a storage
#[derive(PartialEq, Eq, Hash, Clone, Debug)]
pub struct StorageFlowKey {
    /// The timestep
    pub timestep: u32,
    /// Support time frame
    pub stf: u32,
    /// Site of the storage
    pub site: SiteID,
    /// The storage
    pub storage: StorageID,
    /// The commodity flowing
    pub commodity: CommodityID,
}

/// The key by which balances are evaluated
#[derive(PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Debug)]
pub struct BalanceKey {
    /// The timestep
    pub timestep: u32,
    /// Support time frame
    pub stf: u32,
    /// The site
    pub site: SiteID,
    /// The commodity
    pub commodity: CommodityID,
}

impl BalanceKey {
    /// Create a new [`BalanceKey`]
    pub fn new(timestep: u32, stf: u32, site: &str, commodity: &str) -> Self {
        Self {
            timestep,
            stf,
            site: site.into(),
            commodity: commodity.into(),
        }
    }
}

/// Flow quantities of every kind, keyed by flow index
#[derive(Debug, Clone, PartialEq)]
pub struct Flows<T> {
    /// Flows of commodities into processes
    pub process_in: HashMap<ProcessFlowKey, T>,
    /// Flows of commodities out of processes
    pub process_out: HashMap<ProcessFlowKey, T>,
    /// Flows entering transmission lines (at `site_in`)
    pub transmission_in: HashMap<TransmissionFlowKey, T>,
    /// Flows leaving transmission lines (at `site_out`)
    pub transmission_out: HashMap<TransmissionFlowKey, T>,
    /// Flows into storages
    pub storage_in: HashMap<StorageFlowKey, T>,
    /// Flows out of storages
    pub storage_out: HashMap<StorageFlowKey, T>,
}

impl<T> Default for Flows<T> {
    fn default() -> Self {
        Self {
            process_in: HashMap::new(),
            process_out: HashMap::new(),
            transmission_in: HashMap::new(),
            transmission_out: HashMap::new(),
            storage_in: HashMap::new(),
            storage_out: HashMap::new(),
        }
    }
}

impl ProcessFlowKey {
    fn balance_key(&self) -> BalanceKey {
        BalanceKey {
            timestep: self.timestep,
            stf: self.stf,
            site: self.site.clone(),
            commodity: self.commodity.clone(),
        }
    }
}

impl StorageFlowKey {
    fn balance_key(&self) -> BalanceKey {
        BalanceKey {
            timestep: self.timestep,
            stf: self.stf,
            site: self.site.clone(),
            commodity: self.commodity.clone(),
        }
    }
}

impl TransmissionFlowKey {
    /// The balance key at the given end of the line
    fn balance_key(&self, site: &SiteID) -> BalanceKey {
        BalanceKey {
            timestep: self.timestep,
            stf: self.stf,
            site: site.clone(),
            commodity: self.commodity.clone(),
        }
    }
}

/// Commodity balances, grouped once so that each evaluation is a single lookup
#[derive(Debug, Clone, PartialEq)]
pub struct CommodityBalance<T>(HashMap<BalanceKey, T>);

impl<T: FlowValue> CommodityBalance<T> {
    /// Group all of the given flows by timestep, support time frame, site and commodity
    pub fn new(flows: &Flows<T>) -> Self {
        let mut balances: HashMap<BalanceKey, T> = HashMap::new();
        let mut add = |key: BalanceKey, value: T| {
            let entry = balances.entry(key).or_default();
            *entry = *entry + value;
        };

        for (key, &value) in &flows.process_in {
            add(key.balance_key(), value);
        }
        for (key, &value) in &flows.process_out {
            add(key.balance_key(), T::default() - value);
        }
        for (key, &value) in &flows.transmission_in {
            add(key.balance_key(&key.site_in), value);
        }
        for (key, &value) in &flows.transmission_out {
            add(key.balance_key(&key.site_out), T::default() - value);
        }
        for (key, &value) in &flows.storage_in {
            add(key.balance_key(), value);
        }
        for (key, &value) in &flows.storage_out {
            add(key.balance_key(), T::default() - value);
        }

        Self(balances)
    }

    /// The net balance of a commodity at a site, or zero if no flow touches it
    pub fn balance(&self, key: &BalanceKey) -> T {
        self.0.get(key).copied().unwrap_or_default()
    }

    /// Iterate over all non-trivial balances
    pub fn iter(&self) -> impl Iterator<Item = (&BalanceKey, T)> {
        self.0.iter().map(|(key, &value)| (key, value))
    }
}

/// Sum the values of flows whose balance key is `key`
fn sum_matching<T, I>(key: &BalanceKey, flows: I) -> T
where
    T: FlowValue,
    I: Iterator<Item = (BalanceKey, T)>,
{
    flows
        .filter(|(flow_key, _)| flow_key == key)
        .fold(T::default(), |sum, (_, value)| sum + value)
}

/// Evaluate a single commodity balance directly from the flows.
///
/// Each call scans every flow. When evaluating many balances, use [`CommodityBalance`].
pub fn commodity_balance<T: FlowValue>(key: &BalanceKey, flows: &Flows<T>) -> T {
    let process_in = flows.process_in.iter().map(|(k, &v)| (k.balance_key(), v));
    let process_out = flows.process_out.iter().map(|(k, &v)| (k.balance_key(), v));
    let transmission_in =
        flows.transmission_in.iter().map(|(k, &v)| (k.balance_key(&k.site_in), v));
    let transmission_out =
        flows.transmission_out.iter().map(|(k, &v)| (k.balance_key(&k.site_out), v));
    let storage_in = flows.storage_in.iter().map(|(k, &v)| (k.balance_key(), v));
    let storage_out = flows.storage_out.iter().map(|(k, &v)| (k.balance_key(), v));

    sum_matching(key, process_in) - sum_matching(key, process_out)
        + sum_matching(key, transmission_in)
        - sum_matching(key, transmission_out)
        + sum_matching(key, storage_in)
        - sum_matching(key, storage_out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::flows;
    use map_macro::hash_map;
    use rstest::rstest;

    fn process_key(process: &str) -> ProcessFlowKey {
        ProcessFlowKey {
            timestep: 1,
            stf: 2020,
            site: "Campus".into(),
            process: process.into(),
            commodity: "Elec".into(),
        }
    }

    #[test]
    fn consume_and_produce() {
        let flows = Flows {
            process_in: hash_map! { process_key("Heat pump") => 10 },
            process_out: hash_map! { process_key("Gas plant") => 7 },
            ..Default::default()
        };

        let key = BalanceKey::new(1, 2020, "Campus", "Elec");
        assert_eq!(CommodityBalance::new(&flows).balance(&key), 3);
        assert_eq!(commodity_balance(&key, &flows), 3);
    }

    #[test]
    fn independent_of_insertion_order() {
        let mut forward = Flows::default();
        let mut backward = Flows::default();
        let entries = [("A", 4), ("B", 3), ("C", 3)];
        for (process, value) in entries {
            forward.process_in.insert(process_key(process), value);
        }
        for (process, value) in entries.into_iter().rev() {
            backward.process_in.insert(process_key(process), value);
        }
        forward.process_out.insert(process_key("Gas plant"), 7);
        backward.process_out.insert(process_key("Gas plant"), 7);

        let key = BalanceKey::new(1, 2020, "Campus", "Elec");
        assert_eq!(
            CommodityBalance::new(&forward).balance(&key),
            CommodityBalance::new(&backward).balance(&key)
        );
        assert_eq!(commodity_balance(&key, &forward), 3);
    }

    #[rstest]
    #[case(BalanceKey::new(1, 2020, "Campus", "Elec"), 2.0)]
    #[case(BalanceKey::new(1, 2020, "North", "Elec"), -3.0)]
    #[case(BalanceKey::new(2, 2020, "Campus", "Elec"), -8.0)]
    #[case(BalanceKey::new(1, 2030, "Campus", "Elec"), 0.0)]
    #[case(BalanceKey::new(1, 2020, "Campus", "Gas"), 5.0)]
    fn balance_all_flow_kinds(flows: Flows<f64>, #[case] key: BalanceKey, #[case] expected: f64) {
        assert_eq!(CommodityBalance::new(&flows).balance(&key), expected);
        assert_eq!(commodity_balance(&key, &flows), expected);
    }
}
