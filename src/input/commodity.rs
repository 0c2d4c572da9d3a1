//! Code for reading commodities from a CSV file.
use super::*;
use crate::commodity::{Commodity, CommodityKey, CommodityMap, CommodityType};
use crate::price::PriceSpec;
use serde::Deserialize;
use std::rc::Rc;

const COMMODITIES_FILE_NAME: &str = "commodities.csv";

#[derive(PartialEq, Debug, Deserialize)]
struct CommodityRaw {
    site: String,
    commodity: String,
    #[serde(rename = "type")]
    kind: CommodityType,
    price: String,
    max: Option<f64>,
    max_per_hour: Option<f64>,
}

impl CommodityRaw {
    fn into_commodity(self) -> Result<(CommodityKey, Commodity)> {
        let key = CommodityKey::new(&self.site, &self.commodity, self.kind);
        ensure!(!self.price.trim().is_empty(), "No price given for {key}");
        let price =
            PriceSpec::parse(&self.price).with_context(|| format!("Invalid price for {key}"))?;

        let max = self.max.unwrap_or(f64::INFINITY);
        let max_per_hour = self.max_per_hour.unwrap_or(f64::INFINITY);
        check_bounds(&format!("max for {key}"), 0.0, max)?;
        check_bounds(&format!("max_per_hour for {key}"), 0.0, max_per_hour)?;

        let commodity = Commodity {
            price,
            max,
            max_per_hour,
        };
        Ok((key, commodity))
    }
}

/// Read commodities from the specified model directory.
///
/// # Arguments
///
/// * `model_dir` - Folder containing model configuration files
///
/// # Returns
///
/// A map of commodities keyed by site, commodity and type, or an error.
pub fn read_commodities(model_dir: &Path) -> Result<CommodityMap> {
    let file_path = model_dir.join(COMMODITIES_FILE_NAME);
    let commodities_csv = read_csv(&file_path)?;
    read_commodities_from_iter(commodities_csv).with_context(|| input_err_msg(&file_path))
}

fn read_commodities_from_iter<I>(iter: I) -> Result<CommodityMap>
where
    I: Iterator<Item = CommodityRaw>,
{
    let mut commodities = CommodityMap::new();
    for record in iter {
        let (key, commodity) = record.into_commodity()?;
        ensure!(
            !commodities.contains_key(&key),
            "Duplicate entry for commodity {key}"
        );
        commodities.insert(key, Rc::new(commodity));
    }

    Ok(commodities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::assert_error;
    use rstest::rstest;

    fn raw(commodity: &str, kind: CommodityType, price: &str) -> CommodityRaw {
        CommodityRaw {
            site: "Campus".into(),
            commodity: commodity.into(),
            kind,
            price: price.into(),
            max: None,
            max_per_hour: None,
        }
    }

    #[test]
    fn test_read_commodities_from_iter() {
        let commodities = read_commodities_from_iter(
            [
                raw("Gas", CommodityType::Stock, "27.0"),
                raw("Elec buy", CommodityType::Buy, "1.5xBuy"),
            ]
            .into_iter(),
        )
        .unwrap();

        let gas = &commodities[&CommodityKey::new("Campus", "Gas", CommodityType::Stock)];
        assert_eq!(gas.price, PriceSpec::Constant(27.0));
        assert_eq!(gas.max, f64::INFINITY);

        let elec = &commodities[&CommodityKey::new("Campus", "Elec buy", CommodityType::Buy)];
        assert_eq!(
            elec.price,
            PriceSpec::Scaled {
                factor: 1.5,
                series: Some("Buy".into())
            }
        );
    }

    #[rstest]
    #[case("", "No price given for Campus.Gas.Stock")]
    #[case("  ", "No price given for Campus.Gas.Stock")]
    #[case("1..5xBuy", "Invalid price for Campus.Gas.Stock")]
    fn test_read_commodities_from_iter_bad_price(#[case] price: &str, #[case] msg: &str) {
        assert_error!(
            read_commodities_from_iter([raw("Gas", CommodityType::Stock, price)].into_iter()),
            msg
        );
    }

    #[test]
    fn test_read_commodities_from_iter_duplicate() {
        assert_error!(
            read_commodities_from_iter(
                [
                    raw("Gas", CommodityType::Stock, "27.0"),
                    raw("Gas", CommodityType::Stock, "28.0")
                ]
                .into_iter()
            ),
            "Duplicate entry for commodity Campus.Gas.Stock"
        );
    }

    #[test]
    fn test_read_commodities_from_iter_negative_max() {
        let mut record = raw("CO2", CommodityType::Env, "0");
        record.max = Some(-1.0);
        assert!(read_commodities_from_iter([record].into_iter()).is_err());
    }
}
