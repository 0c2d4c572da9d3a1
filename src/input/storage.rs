//! Code for reading storages from a CSV file.
use super::*;
use crate::commodity::CommodityMap;
use crate::storage::{Storage, StorageKey, StorageMap};
use serde::Deserialize;
use std::rc::Rc;

const STORAGES_FILE_NAME: &str = "storages.csv";

#[derive(PartialEq, Debug, Deserialize)]
struct StorageRaw {
    stf: u32,
    site: String,
    storage: String,
    commodity: String,
    inst_cap_c: f64,
    cap_up_c: f64,
    inst_cap_p: f64,
    cap_up_p: f64,
    #[serde(deserialize_with = "deserialise_proportion_nonzero")]
    eff_in: f64,
    #[serde(deserialize_with = "deserialise_proportion_nonzero")]
    eff_out: f64,
    inv_cost_c: f64,
    inv_cost_p: f64,
    wacc: f64,
    depreciation: u32,
    lifetime: Option<u32>,
}

impl StorageRaw {
    fn validate(&self) -> Result<()> {
        check_bounds("energy capacity", self.inst_cap_c, self.cap_up_c)?;
        check_bounds("power capacity", self.inst_cap_p, self.cap_up_p)?;
        check_non_negative("inv_cost_c", self.inv_cost_c)?;
        check_non_negative("inv_cost_p", self.inv_cost_p)?;
        check_non_negative("wacc", self.wacc)?;

        Ok(())
    }
}

/// Read storages from the specified model directory.
///
/// The file is optional. A model without it has no storages.
pub fn read_storages(
    model_dir: &Path,
    time_frames: &TimeFrames,
    commodities: &CommodityMap,
) -> Result<StorageMap> {
    let file_path = model_dir.join(STORAGES_FILE_NAME);
    let storages_csv = read_csv_optional(&file_path)?;
    read_storages_from_iter(storages_csv, time_frames, commodities)
        .with_context(|| input_err_msg(&file_path))
}

fn read_storages_from_iter<I>(
    iter: I,
    time_frames: &TimeFrames,
    commodities: &CommodityMap,
) -> Result<StorageMap>
where
    I: Iterator<Item = StorageRaw>,
{
    let mut storages = StorageMap::new();
    for record in iter {
        let key = StorageKey::new(record.stf, &record.site, &record.storage, &record.commodity);
        record
            .validate()
            .with_context(|| format!("Invalid parameters for storage {key:?}"))?;
        ensure!(
            time_frames.contains(record.stf),
            "Storage {} at {} is built in {}, which is not a support time frame",
            record.storage,
            record.site,
            record.stf
        );
        ensure!(
            commodities
                .keys()
                .any(|com| com.site == key.site && com.commodity == key.commodity),
            "Storage {} at {} stores {}, which is not a commodity there",
            record.storage,
            record.site,
            record.commodity
        );

        let storage = Storage {
            inst_cap_c: record.inst_cap_c,
            cap_up_c: record.cap_up_c,
            inst_cap_p: record.inst_cap_p,
            cap_up_p: record.cap_up_p,
            eff_in: record.eff_in,
            eff_out: record.eff_out,
            inv_cost_c: record.inv_cost_c,
            inv_cost_p: record.inv_cost_p,
            wacc: record.wacc,
            depreciation: record.depreciation,
            lifetime: record.lifetime.unwrap_or(record.depreciation),
        };

        ensure!(
            storages.insert(key.clone(), Rc::new(storage)).is_none(),
            "Duplicate entry for storage {key:?}"
        );
    }

    Ok(storages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{assert_error, commodities};
    use rstest::rstest;

    fn raw(stf: u32, commodity: &str) -> StorageRaw {
        StorageRaw {
            stf,
            site: "Campus".into(),
            storage: "Battery".into(),
            commodity: commodity.into(),
            inst_cap_c: 100.0,
            cap_up_c: 1000.0,
            inst_cap_p: 25.0,
            cap_up_p: 250.0,
            eff_in: 0.95,
            eff_out: 0.95,
            inv_cost_c: 150_000.0,
            inv_cost_p: 100_000.0,
            wacc: 0.07,
            depreciation: 15,
            lifetime: None,
        }
    }

    #[rstest]
    fn test_read_storages_from_iter(commodities: CommodityMap) {
        let time_frames = TimeFrames::new([2020, 2030]).unwrap();
        let storages = read_storages_from_iter(
            [raw(2020, "Elec"), raw(2030, "Elec")].into_iter(),
            &time_frames,
            &commodities,
        )
        .unwrap();
        assert_eq!(storages.len(), 2);
        assert_eq!(
            storages[&StorageKey::new(2020, "Campus", "Battery", "Elec")].lifetime,
            15
        );
    }

    #[rstest]
    fn test_read_storages_from_iter_unknown_commodity(commodities: CommodityMap) {
        let time_frames = TimeFrames::new([2020]).unwrap();
        assert_error!(
            read_storages_from_iter([raw(2020, "Heat")].into_iter(), &time_frames, &commodities),
            "Storage Battery at Campus stores Heat, which is not a commodity there"
        );
    }

    #[rstest]
    fn test_read_storages_from_iter_installed_above_limit(commodities: CommodityMap) {
        let time_frames = TimeFrames::new([2020]).unwrap();
        let mut record = raw(2020, "Elec");
        record.cap_up_p = 10.0;
        assert!(read_storages_from_iter([record].into_iter(), &time_frames, &commodities).is_err());
    }
}
