//! The module responsible for writing output data to disk.
use crate::balance::CommodityBalance;
use crate::commodity::CommodityID;
use crate::entity::{EntityKey, SiteID, UnitLabels};
use crate::index::DsmWindowTuple;
use crate::model::{EntityIndex, ModelIndex};
use crate::pairing::BuySellPair;
use crate::price::PriceTable;
use crate::process::{ProcessCommodityKey, ProcessID};
use anyhow::{Context, Result, ensure};
use itertools::Itertools;
use serde::Serialize;
use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};

/// The root folder in which model-specific output folders will be created
const OUTPUT_DIRECTORY_ROOT: &str = "urbs2_results";

/// The output file name for commodity prices
const PRICES_FILE_NAME: &str = "prices.csv";

/// The output file name for process inputs
const PROCESS_INPUTS_FILE_NAME: &str = "process_inputs.csv";

/// The output file name for process outputs
const PROCESS_OUTPUTS_FILE_NAME: &str = "process_outputs.csv";

/// The output file name for DSM windows
const DSM_WINDOWS_FILE_NAME: &str = "dsm_windows.csv";

/// The output file name for buy/sell process pairs
const BUY_SELL_PAIRS_FILE_NAME: &str = "buy_sell_pairs.csv";

/// The output file name for discount factors
const DISCOUNT_FACTORS_FILE_NAME: &str = "discount_factors.csv";

/// The output file name for commodity balances
const COMMODITY_BALANCES_FILE_NAME: &str = "commodity_balances.csv";

/// Get the model name from the specified directory path
pub fn get_output_dir(model_dir: &Path) -> Result<PathBuf> {
    // Get the model name from the dir path. This ends up being convoluted because we need to check
    // for all possible errors. Ugh.
    let model_dir = model_dir
        .canonicalize() // canonicalise in case the user has specified "."
        .context("Could not resolve path to model")?;

    let model_name = model_dir
        .file_name()
        .context("Model cannot be in root folder")?
        .to_str()
        .context("Invalid chars in model dir name")?;

    // Construct path
    Ok([OUTPUT_DIRECTORY_ROOT, model_name].iter().collect())
}

/// Create a new output directory for the model, if it doesn't already exist.
///
/// An existing directory which isn't empty is only reused if `allow_overwrite` is set, in which
/// case its contents are deleted.
///
/// # Returns
///
/// Whether an existing directory's contents are being overwritten
pub fn create_output_directory(output_dir: &Path, allow_overwrite: bool) -> Result<bool> {
    let overwrite = if let Ok(mut it) = fs::read_dir(output_dir) {
        if it.next().is_none() {
            // Directory exists and is empty
            return Ok(false);
        }

        ensure!(
            allow_overwrite,
            "Output folder already exists and is not empty. \
            Please delete the folder or pass the --overwrite command-line option."
        );

        fs::remove_dir_all(output_dir)?;
        true
    } else {
        false
    };

    // Try to create the directory, with parents
    fs::create_dir_all(output_dir)?;

    Ok(overwrite)
}

/// Represents a row in the process inputs and outputs CSV files
#[derive(Serialize, Debug, PartialEq)]
struct ProcessCommodityRow<'a> {
    stf: u32,
    site: &'a SiteID,
    process: &'a ProcessID,
    commodity: &'a CommodityID,
}

/// Represents a row in the DSM windows CSV file
#[derive(Serialize, Debug, PartialEq)]
struct DsmWindowRow<'a> {
    stf: u32,
    timestep: u32,
    paired: u32,
    site: &'a SiteID,
    commodity: &'a CommodityID,
}

/// Represents a row in the buy/sell pairs CSV file
#[derive(Serialize, Debug, PartialEq)]
struct BuySellPairRow<'a> {
    buy: &'a ProcessID,
    sell: &'a ProcessID,
}

/// Represents a row in the discount factors CSV file
#[derive(Serialize, Debug, PartialEq)]
struct DiscountFactorRow {
    stf: u32,
    factor: f64,
}

/// Represents a row in the commodity balances CSV file
#[derive(Serialize, Debug, PartialEq)]
struct CommodityBalanceRow<'a> {
    timestep: u32,
    stf: u32,
    site: &'a SiteID,
    commodity: &'a CommodityID,
    balance: f64,
}

/// An object for writing the derived sets of a model to file
pub struct DataWriter {
    output_path: PathBuf,
}

impl DataWriter {
    /// Create a writer for the given output folder, creating it if needed
    ///
    /// # Arguments
    ///
    /// * `output_path` - Folder where files will be saved
    pub fn create(output_path: &Path) -> Result<Self> {
        fs::create_dir_all(output_path).with_context(|| {
            format!(
                "Failed to create output directory: {}",
                output_path.display()
            )
        })?;

        Ok(Self {
            output_path: output_path.to_path_buf(),
        })
    }

    fn new_writer(&self, file_name: &str) -> Result<csv::Writer<File>> {
        let file_path = self.output_path.join(file_name);
        csv::Writer::from_path(&file_path)
            .with_context(|| format!("Could not create {}", file_path.display()))
    }

    /// Write every set and parameter of a model index to CSV files
    pub fn write_model_index(&self, index: &ModelIndex) -> Result<()> {
        self.write_entity_index("process", &index.processes)?;
        self.write_entity_index("transmission", &index.transmissions)?;
        self.write_entity_index("storage", &index.storages)?;
        self.write_process_commodities(PROCESS_INPUTS_FILE_NAME, &index.process_inputs)?;
        self.write_process_commodities(PROCESS_OUTPUTS_FILE_NAME, &index.process_outputs)?;
        self.write_dsm_windows(&index.dsm_windows)?;
        self.write_prices(&index.prices)?;
        self.write_buy_sell_pairs(&index.buy_sell_pairs)?;
        self.write_discount_factors(index.discount_factors.iter())?;

        Ok(())
    }

    /// Write the tuple sets and cost factors for one kind of entity.
    ///
    /// Files are named after `kind`, e.g. `process_operational.csv`.
    pub fn write_entity_index<K: EntityKey>(
        &self,
        kind: &str,
        index: &EntityIndex<K>,
    ) -> Result<()> {
        let header = |extra: &[&'static str]| {
            K::Unit::COLUMNS
                .iter()
                .chain(extra)
                .copied()
                .collect_vec()
        };

        let mut writer = self.new_writer(&format!("{kind}_operational.csv"))?;
        writer.write_record(header(&["built", "operating"]))?;
        for tuple in &index.operational {
            let mut record = tuple.unit.labels();
            record.extend([tuple.built.to_string(), tuple.operating.to_string()]);
            writer.write_record(record)?;
        }
        writer.flush()?;

        let mut writer = self.new_writer(&format!("{kind}_rest_value.csv"))?;
        writer.write_record(header(&["built"]))?;
        for tuple in &index.rest_value {
            let mut record = tuple.unit.labels();
            record.push(tuple.built.to_string());
            writer.write_record(record)?;
        }
        writer.flush()?;

        let mut writer = self.new_writer(&format!("{kind}_installed.csv"))?;
        writer.write_record(header(&["operating"]))?;
        for tuple in &index.installed {
            let mut record = tuple.unit.labels();
            record.push(tuple.operating.to_string());
            writer.write_record(record)?;
        }
        writer.flush()?;

        let mut writer = self.new_writer(&format!("{kind}_cost_factors.csv"))?;
        writer.write_record(header(&["built", "annuity", "rest_value_fraction"]))?;
        for (key, factors) in &index.cost_factors {
            let mut record = key.unit().labels();
            record.extend([
                key.support_time_frame().to_string(),
                factors.annuity.to_string(),
                factors.rest_value_fraction.to_string(),
            ]);
            writer.write_record(record)?;
        }
        writer.flush()?;

        Ok(())
    }

    fn write_process_commodities(
        &self,
        file_name: &str,
        tuples: &[ProcessCommodityKey],
    ) -> Result<()> {
        let mut writer = self.new_writer(file_name)?;
        for tuple in tuples {
            writer.serialize(ProcessCommodityRow {
                stf: tuple.stf,
                site: &tuple.site,
                process: &tuple.process,
                commodity: &tuple.commodity,
            })?;
        }
        writer.flush()?;

        Ok(())
    }

    /// Write DSM windows to a CSV file
    pub fn write_dsm_windows(&self, windows: &[DsmWindowTuple]) -> Result<()> {
        let mut writer = self.new_writer(DSM_WINDOWS_FILE_NAME)?;
        for window in windows {
            writer.serialize(DsmWindowRow {
                stf: window.stf,
                timestep: window.timestep,
                paired: window.paired,
                site: &window.site,
                commodity: &window.commodity,
            })?;
        }
        writer.flush()?;

        Ok(())
    }

    /// Write commodity prices to a CSV file.
    ///
    /// There is one row per timestep and one column per commodity, named `site.commodity.type`.
    pub fn write_prices(&self, prices: &PriceTable) -> Result<()> {
        let mut writer = self.new_writer(PRICES_FILE_NAME)?;
        let header = ["timestep".to_string()]
            .into_iter()
            .chain(prices.iter_columns().map(|(key, _)| key.to_string()));
        writer.write_record(header)?;
        for (timestep, row) in prices.iter_rows() {
            let record = [timestep.to_string()]
                .into_iter()
                .chain(row.iter().map(ToString::to_string));
            writer.write_record(record)?;
        }
        writer.flush()?;

        Ok(())
    }

    /// Write buy/sell process pairs to a CSV file
    pub fn write_buy_sell_pairs(&self, pairs: &[BuySellPair]) -> Result<()> {
        let mut writer = self.new_writer(BUY_SELL_PAIRS_FILE_NAME)?;
        for pair in pairs {
            writer.serialize(BuySellPairRow {
                buy: &pair.buy,
                sell: &pair.sell,
            })?;
        }
        writer.flush()?;

        Ok(())
    }

    fn write_discount_factors<'a, I>(&self, factors: I) -> Result<()>
    where
        I: Iterator<Item = (&'a u32, &'a f64)>,
    {
        let mut writer = self.new_writer(DISCOUNT_FACTORS_FILE_NAME)?;
        for (&stf, &factor) in factors {
            writer.serialize(DiscountFactorRow { stf, factor })?;
        }
        writer.flush()?;

        Ok(())
    }

    /// Write commodity balances to a CSV file, sorted by timestep, time frame, site and commodity
    pub fn write_commodity_balances(&self, balances: &CommodityBalance<f64>) -> Result<()> {
        let mut writer = self.new_writer(COMMODITY_BALANCES_FILE_NAME)?;
        for (key, balance) in balances.iter().sorted_by(|a, b| a.0.cmp(b.0)) {
            writer.serialize(CommodityBalanceRow {
                timestep: key.timestep,
                stf: key.stf,
                site: &key.site,
                commodity: &key.commodity,
                balance,
            })?;
        }
        writer.flush()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balance::{Flows, ProcessFlowKey};
    use crate::fixture::model;
    use crate::model::Model;
    use rstest::rstest;
    use std::fs::read_to_string;
    use tempfile::tempdir;

    #[rstest]
    fn test_write_model_index(model: Model) {
        let index = ModelIndex::build(&model).unwrap();
        let dir = tempdir().unwrap();
        let writer = DataWriter::create(dir.path()).unwrap();
        writer.write_model_index(&index).unwrap();

        let operational = read_to_string(dir.path().join("process_operational.csv")).unwrap();
        let mut lines = operational.lines();
        assert_eq!(lines.next(), Some("site,process,built,operating"));
        assert!(operational.contains("Campus,Gas plant,2020,2020\n"));

        let prices = read_to_string(dir.path().join(PRICES_FILE_NAME)).unwrap();
        assert_eq!(
            prices.lines().next(),
            Some("timestep,Campus.Elec buy.Buy,Campus.Elec sell.Sell")
        );
        assert_eq!(prices.lines().count(), 1 + index.timesteps.len());

        let pairs = read_to_string(dir.path().join(BUY_SELL_PAIRS_FILE_NAME)).unwrap();
        assert_eq!(pairs, "buy,sell\nImport,Export\n");

        for kind in ["process", "transmission", "storage"] {
            for family in ["operational", "rest_value", "installed", "cost_factors"] {
                assert!(dir.path().join(format!("{kind}_{family}.csv")).is_file());
            }
        }
    }

    #[test]
    fn test_write_commodity_balances() {
        let mut flows = Flows::default();
        for (timestep, value) in [(2, 7.0), (1, 3.0)] {
            flows.process_out.insert(
                ProcessFlowKey {
                    timestep,
                    stf: 2020,
                    site: "Campus".into(),
                    process: "Gas plant".into(),
                    commodity: "Elec".into(),
                },
                value,
            );
        }

        let dir = tempdir().unwrap();
        let writer = DataWriter::create(dir.path()).unwrap();
        writer
            .write_commodity_balances(&CommodityBalance::new(&flows))
            .unwrap();

        let contents = read_to_string(dir.path().join(COMMODITY_BALANCES_FILE_NAME)).unwrap();
        assert_eq!(
            contents,
            "timestep,stf,site,commodity,balance\n\
             1,2020,Campus,Elec,-3.0\n\
             2,2020,Campus,Elec,-7.0\n"
        );
    }

    #[test]
    fn test_create_output_directory_nested() {
        let dir = tempdir().unwrap();
        let output_dir = dir.path().join("a").join("b");
        assert!(!create_output_directory(&output_dir, false).unwrap());
        assert!(output_dir.is_dir());

        // An empty directory is reused
        assert!(!create_output_directory(&output_dir, false).unwrap());
    }

    #[test]
    fn test_create_output_directory_not_empty() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("old.csv"), "x").unwrap();
        assert!(create_output_directory(dir.path(), false).is_err());

        assert!(create_output_directory(dir.path(), true).unwrap());
        assert!(!dir.path().join("old.csv").exists());
        assert!(dir.path().is_dir());
    }
}
