//! Fixtures for tests

use crate::balance::{Flows, ProcessFlowKey, StorageFlowKey, TransmissionFlowKey};
use crate::commodity::{Commodity, CommodityKey, CommodityMap, CommodityType};
use crate::dsm::{Dsm, DsmMap};
use crate::global::{DISCOUNT_RATE, GlobalProperties};
use crate::model::{Model, ModelParameters, Timesteps};
use crate::price::{PriceSeries, PriceSpec};
use crate::process::{FlowDirection, Process, ProcessCommodityMap, ProcessKey, ProcessMap};
use crate::storage::StorageMap;
use crate::time_frame::TimeFrames;
use crate::transmission::TransmissionMap;
use indexmap::indexmap;
use rstest::fixture;
use std::path::PathBuf;
use std::rc::Rc;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

/// A process with the given lifespan and otherwise arbitrary parameters
pub fn process_with_lifespan(depreciation: u32, lifetime: u32, inst_cap: f64) -> Process {
    Process {
        inst_cap,
        cap_lo: 0.0,
        cap_up: f64::INFINITY,
        inv_cost: 1000.0,
        fix_cost: 10.0,
        var_cost: 0.1,
        wacc: 0.07,
        depreciation,
        lifetime,
    }
}

#[fixture]
pub fn processes() -> ProcessMap {
    indexmap! {
        ProcessKey::new(2020, "Campus", "Gas plant") => process_with_lifespan(20, 30, 50.0).into(),
        ProcessKey::new(2020, "Campus", "Import") => process_with_lifespan(1, 1, 0.0).into(),
        ProcessKey::new(2020, "Campus", "Export") => process_with_lifespan(1, 1, 0.0).into(),
        ProcessKey::new(2030, "Campus", "Gas plant") => process_with_lifespan(20, 20, 0.0).into(),
    }
}

#[fixture]
pub fn process_commodity_ratios() -> ProcessCommodityMap {
    let mut ratios = ProcessCommodityMap::new();
    for stf in [2020, 2030] {
        ratios.insert(
            (stf, "Gas plant".into(), "Gas".into(), FlowDirection::In),
            1.0,
        );
        ratios.insert(
            (stf, "Gas plant".into(), "Elec".into(), FlowDirection::Out),
            0.6,
        );
        ratios.insert(
            (stf, "Gas plant".into(), "CO2".into(), FlowDirection::Out),
            0.2,
        );
    }
    ratios.insert(
        (2020, "Import".into(), "Elec buy".into(), FlowDirection::In),
        1.0,
    );
    ratios.insert(
        (2020, "Import".into(), "Elec".into(), FlowDirection::Out),
        1.0,
    );
    ratios.insert(
        (2020, "Export".into(), "Elec".into(), FlowDirection::In),
        1.0,
    );
    ratios.insert(
        (2020, "Export".into(), "Elec sell".into(), FlowDirection::Out),
        1.0,
    );

    ratios
}

fn commodity(price: PriceSpec) -> Rc<Commodity> {
    Rc::new(Commodity {
        price,
        max: f64::INFINITY,
        max_per_hour: f64::INFINITY,
    })
}

#[fixture]
pub fn commodities() -> CommodityMap {
    let series = |factor, name: &str| PriceSpec::Scaled {
        factor,
        series: Some(name.to_string()),
    };

    indexmap! {
        CommodityKey::new("Campus", "Elec", CommodityType::Demand) =>
            commodity(PriceSpec::Constant(0.0)),
        CommodityKey::new("Campus", "Gas", CommodityType::Stock) =>
            commodity(PriceSpec::Constant(0.03)),
        CommodityKey::new("Campus", "CO2", CommodityType::Env) =>
            commodity(PriceSpec::Constant(0.0)),
        CommodityKey::new("Campus", "Elec buy", CommodityType::Buy) =>
            commodity(series(1.0, "Buy")),
        CommodityKey::new("Campus", "Elec sell", CommodityType::Sell) =>
            commodity(series(0.8, "Sell")),
        CommodityKey::new("North", "Elec", CommodityType::Demand) =>
            commodity(PriceSpec::Constant(0.0)),
    }
}

#[fixture]
pub fn dsm() -> DsmMap {
    indexmap! {
        ("Campus".into(), "Elec".into()) => Dsm {
            delay: 5,
            recovery: 3,
            eff: 1.0,
            cap_max_do: 10.0,
            cap_max_up: 10.0,
        }
    }
}

#[fixture]
pub fn flows() -> Flows<f64> {
    let process = |timestep, process: &str, commodity: &str| ProcessFlowKey {
        timestep,
        stf: 2020,
        site: "Campus".into(),
        process: process.into(),
        commodity: commodity.into(),
    };
    let cable = TransmissionFlowKey {
        timestep: 1,
        stf: 2020,
        site_in: "Campus".into(),
        site_out: "North".into(),
        transmission: "Cable".into(),
        commodity: "Elec".into(),
    };
    let battery = StorageFlowKey {
        timestep: 1,
        stf: 2020,
        site: "Campus".into(),
        storage: "Battery".into(),
        commodity: "Elec".into(),
    };

    let mut flows = Flows::default();
    flows.process_in.insert(process(1, "Heat pump", "Elec"), 4.0);
    flows.process_in.insert(process(1, "Gas plant", "Gas"), 5.0);
    flows.process_out.insert(process(1, "Gas plant", "Elec"), 3.0);
    flows.process_out.insert(process(2, "Gas plant", "Elec"), 8.0);
    flows.transmission_in.insert(cable.clone(), 2.0);
    flows.transmission_out.insert(cable, 3.0);
    flows.storage_in.insert(battery.clone(), 1.0);
    flows.storage_out.insert(battery, 2.0);

    flows
}

#[fixture]
pub fn model(
    processes: ProcessMap,
    process_commodity_ratios: ProcessCommodityMap,
    commodities: CommodityMap,
    dsm: DsmMap,
) -> Model {
    let mut global_properties = GlobalProperties::new();
    global_properties.set(2020, DISCOUNT_RATE, 0.03);
    global_properties.set(2030, DISCOUNT_RATE, 0.03);

    let mut price_series = PriceSeries::new();
    for timestep in 0..=4 {
        price_series.insert("Buy", timestep, 0.2 + 0.01 * f64::from(timestep));
        price_series.insert("Sell", timestep, 0.1);
    }

    Model {
        model_path: PathBuf::from("model"),
        parameters: ModelParameters {
            timesteps: Timesteps {
                offset: 0,
                length: 4,
                hours: 1.0,
            },
        },
        time_frames: TimeFrames::new([2020, 2030]).unwrap(),
        global_properties,
        commodities,
        processes,
        process_commodities: process_commodity_ratios,
        transmissions: TransmissionMap::new(),
        storages: StorageMap::new(),
        dsm,
        price_series,
    }
}
