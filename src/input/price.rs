//! Code for reading external buy and sell price series from a CSV file.
use super::*;
use crate::model::Timesteps;
use crate::price::PriceSeries;
use serde::Deserialize;

const PRICE_SERIES_FILE_NAME: &str = "buy_sell_prices.csv";

#[derive(PartialEq, Debug, Deserialize)]
struct PriceSeriesRaw {
    timestep: u32,
    series: String,
    price: f64,
}

/// Read external price series from the specified model directory.
///
/// The file is optional, but scaled commodity prices cannot be resolved without it.
pub fn read_price_series(model_dir: &Path, timesteps: &Timesteps) -> Result<PriceSeries> {
    let file_path = model_dir.join(PRICE_SERIES_FILE_NAME);
    let series_csv = read_csv_optional(&file_path)?;
    read_price_series_from_iter(series_csv, timesteps).with_context(|| input_err_msg(&file_path))
}

fn read_price_series_from_iter<I>(iter: I, timesteps: &Timesteps) -> Result<PriceSeries>
where
    I: Iterator<Item = PriceSeriesRaw>,
{
    let mut series = PriceSeries::new();
    for record in iter {
        if !timesteps.all().contains(&record.timestep) {
            // Outside the modelled period
            continue;
        }
        ensure!(
            record.price.is_finite(),
            "Invalid price ({}) for series {} at timestep {}",
            record.price,
            record.series,
            record.timestep
        );
        ensure!(
            series
                .insert(&record.series, record.timestep, record.price)
                .is_none(),
            "Duplicate price for series {} at timestep {}",
            record.series,
            record.timestep
        );
    }

    Ok(series)
}
