//! Code for reading transmission lines from a CSV file.
use super::*;
use crate::commodity::CommodityMap;
use crate::transmission::{Transmission, TransmissionKey, TransmissionMap};
use serde::Deserialize;
use std::rc::Rc;

const TRANSMISSIONS_FILE_NAME: &str = "transmissions.csv";

#[derive(PartialEq, Debug, Deserialize)]
struct TransmissionRaw {
    stf: u32,
    site_in: String,
    site_out: String,
    transmission: String,
    commodity: String,
    #[serde(deserialize_with = "deserialise_proportion_nonzero")]
    eff: f64,
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

impl TransmissionRaw {
    fn validate(&self) -> Result<()> {
        ensure!(
            self.site_in != self.site_out,
            "Transmission lines must connect two different sites"
        );
        check_non_negative("inst_cap", self.inst_cap)?;
        check_bounds("capacity", self.cap_lo, self.cap_up)?;
        check_non_negative("inv_cost", self.inv_cost)?;
        check_non_negative("fix_cost", self.fix_cost)?;
        check_non_negative("var_cost", self.var_cost)?;
        check_non_negative("wacc", self.wacc)?;

        Ok(())
    }
}

/// Read transmission lines from the specified model directory.
///
/// The file is optional. A model without it has no transmission lines.
pub fn read_transmissions(
    model_dir: &Path,
    time_frames: &TimeFrames,
    commodities: &CommodityMap,
) -> Result<TransmissionMap> {
    let file_path = model_dir.join(TRANSMISSIONS_FILE_NAME);
    let transmissions_csv = read_csv_optional(&file_path)?;
    read_transmissions_from_iter(transmissions_csv, time_frames, commodities)
        .with_context(|| input_err_msg(&file_path))
}

fn read_transmissions_from_iter<I>(
    iter: I,
    time_frames: &TimeFrames,
    commodities: &CommodityMap,
) -> Result<TransmissionMap>
where
    I: Iterator<Item = TransmissionRaw>,
{
    let mut transmissions = TransmissionMap::new();
    for record in iter {
        let key = TransmissionKey::new(
            record.stf,
            &record.site_in,
            &record.site_out,
            &record.transmission,
            &record.commodity,
        );
        record
            .validate()
            .with_context(|| format!("Invalid parameters for transmission {key:?}"))?;
        ensure!(
            time_frames.contains(record.stf),
            "Transmission {} is built in {}, which is not a support time frame",
            record.transmission,
            record.stf
        );
        for site in [&record.site_in, &record.site_out] {
            ensure!(
                commodities
                    .keys()
                    .any(|com| &*com.site.0 == site.as_str() && &*com.commodity.0 == record.commodity),
                "Transmission {} carries {}, which is not a commodity at {}",
                record.transmission,
                record.commodity,
                site
            );
        }

        let transmission = Transmission {
            eff: record.eff,
            inst_cap: record.inst_cap,
            cap_lo: record.cap_lo,
            cap_up: record.cap_up,
            inv_cost: record.inv_cost,
            fix_cost: record.fix_cost,
            var_cost: record.var_cost,
            wacc: record.wacc,
            depreciation: record.depreciation,
            lifetime: record.lifetime.unwrap_or(record.depreciation),
        };

        ensure!(
            transmissions
                .insert(key.clone(), Rc::new(transmission))
                .is_none(),
            "Duplicate entry for transmission {key:?}"
        );
    }

    Ok(transmissions)
}
