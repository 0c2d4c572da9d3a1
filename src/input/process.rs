//! Code for reading processes and their input/output ratios from CSV files.
use super::*;
use crate::commodity::{CommodityID, CommodityMap};
use crate::id::DeclaredIDs;
use crate::process::{
    FlowDirection, Process, ProcessCommodityMap, ProcessID, ProcessKey, ProcessMap,
};
use indexmap::IndexSet;
use serde::Deserialize;
use std::rc::Rc;

const PROCESSES_FILE_NAME: &str = "processes.csv";
const PROCESS_COMMODITIES_FILE_NAME: &str = "process_commodities.csv";

#[derive(PartialEq, Debug, Deserialize)]
struct ProcessRaw {
    stf: u32,
    site: String,
    process: String,
    inst_cap: f64,
    cap_lo: f64,
    cap_up: f64,
    inv_cost: f64,
    fix_cost: f64,
    var_cost: f64,
    wacc: f64,
    depreciation: u32,
    lifetime: Option<u32>,
}

impl ProcessRaw {
    fn validate(&self) -> Result<()> {
        check_non_negative("inst_cap", self.inst_cap)?;
        check_bounds("capacity", self.cap_lo, self.cap_up)?;
        check_non_negative("inv_cost", self.inv_cost)?;
        check_non_negative("fix_cost", self.fix_cost)?;
        check_non_negative("var_cost", self.var_cost)?;
        check_non_negative("wacc", self.wacc)?;

        Ok(())
    }
}

/// Read processes from the specified model directory.
///
/// # Arguments
///
/// * `model_dir` - Folder containing model configuration files
/// * `time_frames` - The support time frames of the model
pub fn read_processes(model_dir: &Path, time_frames: &TimeFrames) -> Result<ProcessMap> {
    let file_path = model_dir.join(PROCESSES_FILE_NAME);
    let processes_csv = read_csv(&file_path)?;
    read_processes_from_iter(processes_csv, time_frames).with_context(|| input_err_msg(&file_path))
}

fn read_processes_from_iter<I>(iter: I, time_frames: &TimeFrames) -> Result<ProcessMap>
where
    I: Iterator<Item = ProcessRaw>,
{
    let mut processes = ProcessMap::new();
    for record in iter {
        let key = ProcessKey::new(record.stf, &record.site, &record.process);
        record
            .validate()
            .with_context(|| format!("Invalid parameters for process {key:?}"))?;
        ensure!(
            time_frames.contains(record.stf),
            "Process {} at {} is built in {}, which is not a support time frame",
            record.process,
            record.site,
            record.stf
        );

        let process = Process {
            inst_cap: record.inst_cap,
            cap_lo: record.cap_lo,
            cap_up: record.cap_up,
            inv_cost: record.inv_cost,
            fix_cost: record.fix_cost,
            var_cost: record.var_cost,
            wacc: record.wacc,
            depreciation: record.depreciation,
            // Units installed before the horizon last as long as new ones unless told otherwise
            lifetime: record.lifetime.unwrap_or(record.depreciation),
        };

        ensure!(
            processes.insert(key.clone(), Rc::new(process)).is_none(),
            "Duplicate entry for process {key:?}"
        );
    }

    Ok(processes)
}

#[derive(PartialEq, Debug, Deserialize)]
struct ProcessCommodityRaw {
    stf: u32,
    process: String,
    commodity: String,
    direction: FlowDirection,
    ratio: f64,
}

/// Read process input and output ratios from the specified model directory.
///
/// # Arguments
///
/// * `model_dir` - Folder containing model configuration files
/// * `processes` - All processes
/// * `commodities` - All commodities
pub fn read_process_commodities(
    model_dir: &Path,
    processes: &ProcessMap,
    commodities: &CommodityMap,
) -> Result<ProcessCommodityMap> {
    let file_path = model_dir.join(PROCESS_COMMODITIES_FILE_NAME);
    let ratios_csv = read_csv(&file_path)?;
    read_process_commodities_from_iter(ratios_csv, processes, commodities)
        .with_context(|| input_err_msg(&file_path))
}

fn read_process_commodities_from_iter<I>(
    iter: I,
    processes: &ProcessMap,
    commodities: &CommodityMap,
) -> Result<ProcessCommodityMap>
where
    I: Iterator<Item = ProcessCommodityRaw>,
{
    let process_ids: IndexSet<ProcessID> =
        processes.keys().map(|key| key.process.clone()).collect();
    let commodity_ids: IndexSet<CommodityID> =
        commodities.keys().map(|key| key.commodity.clone()).collect();

    let mut ratios = ProcessCommodityMap::new();
    for record in iter {
        let process = process_ids.resolve(&record.process)?;
        let commodity = commodity_ids.resolve(&record.commodity)?;
        ensure!(
            record.ratio.is_normal() && record.ratio > 0.0,
            "Invalid value for ratio ({}) of {} for process {}",
            record.ratio,
            commodity,
            process
        );

        let key = (record.stf, process, commodity, record.direction);
        ensure!(
            !ratios.contains_key(&key),
            "Duplicate ratio for process {} and commodity {} in {}",
            key.1,
            key.2,
            key.0
        );
        ratios.insert(key, record.ratio);
    }

    Ok(ratios)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commodity::{Commodity, CommodityKey, CommodityType};
    use crate::fixture::assert_error;
    use crate::price::PriceSpec;
    use rstest::{fixture, rstest};

    fn process_raw(stf: u32, process: &str) -> ProcessRaw {
        ProcessRaw {
            stf,
            site: "Campus".into(),
            process: process.into(),
            inst_cap: 0.0,
            cap_lo: 0.0,
            cap_up: f64::INFINITY,
            inv_cost: 600_000.0,
            fix_cost: 12_000.0,
            var_cost: 1.6,
            wacc: 0.07,
            depreciation: 30,
            lifetime: None,
        }
    }

    #[fixture]
    fn time_frames() -> TimeFrames {
        TimeFrames::new([2020, 2030]).unwrap()
    }

    #[rstest]
    fn test_read_processes_from_iter(time_frames: TimeFrames) {
        let mut with_lifetime = process_raw(2030, "Gas plant");
        with_lifetime.lifetime = Some(40);
        let processes = read_processes_from_iter(
            [process_raw(2020, "Gas plant"), with_lifetime].into_iter(),
            &time_frames,
        )
        .unwrap();

        assert_eq!(
            processes[&ProcessKey::new(2020, "Campus", "Gas plant")].lifetime,
            30
        );
        assert_eq!(
            processes[&ProcessKey::new(2030, "Campus", "Gas plant")].lifetime,
            40
        );
    }

    #[rstest]
    fn test_read_processes_from_iter_bad_time_frame(time_frames: TimeFrames) {
        assert_error!(
            read_processes_from_iter([process_raw(2025, "Gas plant")].into_iter(), &time_frames),
            "Process Gas plant at Campus is built in 2025, which is not a support time frame"
        );
    }

    #[rstest]
    fn test_read_processes_from_iter_duplicate(time_frames: TimeFrames) {
        assert!(
            read_processes_from_iter(
                [process_raw(2020, "Gas plant"), process_raw(2020, "Gas plant")].into_iter(),
                &time_frames
            )
            .is_err()
        );
    }

    #[rstest]
    fn test_read_processes_from_iter_bad_bounds(time_frames: TimeFrames) {
        let mut record = process_raw(2020, "Gas plant");
        record.cap_lo = 10.0;
        record.cap_up = 5.0;
        assert!(read_processes_from_iter([record].into_iter(), &time_frames).is_err());
    }

    fn ratio_raw(process: &str, commodity: &str, ratio: f64) -> ProcessCommodityRaw {
        ProcessCommodityRaw {
            stf: 2020,
            process: process.into(),
            commodity: commodity.into(),
            direction: FlowDirection::In,
            ratio,
        }
    }

    #[fixture]
    fn tables(time_frames: TimeFrames) -> (ProcessMap, CommodityMap) {
        let processes =
            read_processes_from_iter([process_raw(2020, "Gas plant")].into_iter(), &time_frames)
                .unwrap();
        let commodities = [(
            CommodityKey::new("Campus", "Gas", CommodityType::Stock),
            Rc::new(Commodity {
                price: PriceSpec::Constant(27.0),
                max: f64::INFINITY,
                max_per_hour: f64::INFINITY,
            }),
        )]
        .into_iter()
        .collect();
        (processes, commodities)
    }

    #[rstest]
    fn test_read_process_commodities_from_iter(tables: (ProcessMap, CommodityMap)) {
        let (processes, commodities) = tables;
        let ratios = read_process_commodities_from_iter(
            [ratio_raw("Gas plant", "Gas", 2.0)].into_iter(),
            &processes,
            &commodities,
        )
        .unwrap();
        assert_eq!(
            ratios[&(
                2020,
                ProcessID::new("Gas plant"),
                CommodityID::new("Gas"),
                FlowDirection::In
            )],
            2.0
        );
    }

    #[rstest]
    #[case(ratio_raw("Coal plant", "Gas", 1.0), "Coal plant has not been declared")]
    #[case(ratio_raw("Gas plant", "Coal", 1.0), "Coal has not been declared")]
    #[case(
        ratio_raw("Gas plant", "Gas", 0.0),
        "Invalid value for ratio (0) of Gas for process Gas plant"
    )]
    #[case(
        ratio_raw("Gas plant", "Gas", f64::INFINITY),
        "Invalid value for ratio (inf) of Gas for process Gas plant"
    )]
    fn test_read_process_commodities_from_iter_bad(
        tables: (ProcessMap, CommodityMap),
        #[case] record: ProcessCommodityRaw,
        #[case] msg: &str,
    ) {
        let (processes, commodities) = tables;
        assert_error!(
            read_process_commodities_from_iter([record].into_iter(), &processes, &commodities),
            msg
        );
    }
}
