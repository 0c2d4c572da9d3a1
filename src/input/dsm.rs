//! Code for reading demand-side management parameters from a CSV file.
use super::*;
use crate::commodity::{CommodityID, CommodityMap, CommodityType};
use crate::dsm::{Dsm, DsmMap};
use crate::entity::SiteID;
use serde::Deserialize;

const DSM_FILE_NAME: &str = "dsm.csv";

#[derive(PartialEq, Debug, Deserialize)]
struct DsmRaw {
    site: String,
    commodity: String,
    delay: u32,
    recovery: u32,
    #[serde(deserialize_with = "deserialise_proportion_nonzero")]
    eff: f64,
    cap_max_do: f64,
    cap_max_up: f64,
}

/// Read DSM parameters from the specified model directory.
///
/// The file is optional and models without DSM are common.
pub fn read_dsm(model_dir: &Path, commodities: &CommodityMap) -> Result<DsmMap> {
    let file_path = model_dir.join(DSM_FILE_NAME);
    let dsm_csv = read_csv_optional(&file_path)?;
    read_dsm_from_iter(dsm_csv, commodities).with_context(|| input_err_msg(&file_path))
}

fn read_dsm_from_iter<I>(iter: I, commodities: &CommodityMap) -> Result<DsmMap>
where
    I: Iterator<Item = DsmRaw>,
{
    let mut dsm = DsmMap::new();
    for record in iter {
        let site = SiteID::new(&record.site);
        let commodity = CommodityID::new(&record.commodity);
        ensure!(
            commodities.keys().any(|key| key.site == site
                && key.commodity == commodity
                && key.kind == CommodityType::Demand),
            "DSM is only possible for demand commodities, but {} at {} is not one",
            commodity,
            site
        );
        check_non_negative("cap_max_do", record.cap_max_do)?;
        check_non_negative("cap_max_up", record.cap_max_up)?;

        let parameters = Dsm {
            delay: record.delay,
            recovery: record.recovery,
            eff: record.eff,
            cap_max_do: record.cap_max_do,
            cap_max_up: record.cap_max_up,
        };
        ensure!(
            dsm.insert((site, commodity), parameters).is_none(),
            "Duplicate DSM entry for {} at {}",
            record.commodity,
            record.site
        );
    }

    Ok(dsm)
}
