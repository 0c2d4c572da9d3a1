//! Commodity prices for each modelled timestep.
//!
//! A commodity price is either a constant or a multiple of an external per-timestep price series.
//! In input files the latter is written as a number followed by the name of a series, e.g.
//! `1.25xBuy`, with the number written in any of several locale formats. The string is parsed
//! into a [`PriceSpec`] once when the input is loaded.
use crate::commodity::{CommodityKey, CommodityMap};
use crate::error::ModelError;
use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap};

/// Characters other than letters which end the numeric part of a price string
const NUMBER_TERMINATORS: &[char] = &['*', ':', '!', '%', '$', '&', '?'];

/// Letters which may separate the multiplier from the series name (as in `1.25xBuy`)
const MULTIPLY_MARKERS: &[char] = &['x', 'X'];

/// How the price of a commodity is determined
#[derive(PartialEq, Debug, Clone)]
pub enum PriceSpec {
    /// The same price in every timestep
    Constant(f64),
    /// A multiple of an external price series
    Scaled {
        /// Multiplier applied to the series
        factor: f64,
        /// Name of the series. If `None`, the series named after the commodity is used.
        series: Option<String>,
    },
}

impl PriceSpec {
    /// Parse a price as given in an input file.
    ///
    /// Numbers are constant prices, in any of the formats accepted by [`extract_leading_number`].
    /// Anything else is a scaled price, whose multiplier is read with [`extract_leading_number`]
    /// and whose series name is the remainder of the string.
    ///
    /// A `*` directly after the multiplier is dropped from the series name. So is an `x` or `X`,
    /// unless a lowercase letter follows it: `1.25xBuy` refers to the series `Buy`, but
    /// `1.5Xmarket` refers to `Xmarket`. Infinite and NaN prices are rejected.
    pub fn parse(raw: &str) -> Result<Self, ModelError> {
        let raw = raw.trim();
        let format_error = || ModelError::Format {
            input: raw.to_string(),
        };

        if let Ok(value) = raw.parse::<f64>() {
            return if value.is_finite() {
                Ok(Self::Constant(value))
            } else {
                Err(format_error())
            };
        }

        let (number, suffix) = split_number_prefix(raw);
        let has_number = number.chars().any(|c| c.is_ascii_digit());
        if suffix.trim().is_empty() {
            // Locale-formatted number, e.g. `0,15` or `1.000,5`
            if !has_number {
                return Err(format_error());
            }
            return Ok(Self::Constant(extract_leading_number(raw)?));
        }

        let factor = extract_leading_number(raw)?;
        let suffix = if number.trim().is_empty() {
            suffix
        } else {
            strip_multiply_marker(suffix)
        };
        let series = suffix.trim();
        let series = (!series.is_empty()).then(|| series.to_string());

        Ok(Self::Scaled { factor, series })
    }
}

/// Remove the marker between a multiplier and a series name, if there is one
fn strip_multiply_marker(suffix: &str) -> &str {
    if let Some(rest) = suffix.strip_prefix('*') {
        return rest;
    }
    match suffix.strip_prefix(MULTIPLY_MARKERS) {
        Some(rest) if !rest.starts_with(|c: char| c.is_ascii_lowercase()) => rest,
        _ => suffix,
    }
}

/// Split off the part of `text` before the first letter or terminator character
fn split_number_prefix(text: &str) -> (&str, &str) {
    let end = text
        .find(|c: char| c.is_ascii_alphabetic() || NUMBER_TERMINATORS.contains(&c))
        .unwrap_or(text.len());
    text.split_at(end)
}

/// Extract the number at the start of a string, e.g. `1.2` from `1,20BUY`.
///
/// The number ends at the first letter or one of `*:!%$&?`. The following formats are accepted,
/// tried in this order:
///
/// 1. No digits at all: the multiplier defaults to `1.0`
/// 2. Comma-grouped thousands with an optional dot decimal part (`1,000.25`, `2.5`, `2`)
/// 3. Dot-grouped thousands with an optional comma decimal part (`1.000,25`, `2,5`)
/// 4. A dot decimal without an integer part (`.25`)
/// 5. A comma decimal without an integer part (`,25`)
///
/// Scientific notation, complex numbers and negative numbers are not supported.
pub fn extract_leading_number(text: &str) -> Result<f64, ModelError> {
    let (candidate, _) = split_number_prefix(text);
    let candidate = candidate.trim();
    let format_error = || ModelError::Format {
        input: text.to_string(),
    };

    if !candidate.chars().any(|c| c.is_ascii_digit()) {
        return Ok(1.0);
    }

    let normalised = if is_grouped_number(candidate, ',', '.') {
        candidate.replace(',', "")
    } else if is_grouped_number(candidate, '.', ',') {
        candidate.replace('.', "").replace(',', ".")
    } else if is_plain_decimal(candidate, '.') {
        format!("0{candidate}")
    } else if is_plain_decimal(candidate, ',') {
        format!("0{}", candidate.replace(',', "."))
    } else {
        return Err(format_error());
    };

    normalised.parse().map_err(|_| format_error())
}

/// Whether `s` is non-empty and consists only of ASCII digits
fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Whether `s` is an integer with thousands optionally grouped by `group_sep`, followed by an
/// optional fractional part introduced by `decimal_sep`
fn is_grouped_number(s: &str, group_sep: char, decimal_sep: char) -> bool {
    let (integer, fraction) = match s.split_once(decimal_sep) {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (s, None),
    };
    if fraction.is_some_and(|fraction| !is_digits(fraction)) {
        return false;
    }

    if is_digits(integer) {
        return true;
    }

    let mut groups = integer.split(group_sep);
    let first_ok = groups
        .next()
        .is_some_and(|first| is_digits(first) && first.len() <= 3);
    first_ok && groups.all(|group| is_digits(group) && group.len() == 3)
}

/// Whether `s` is a run of digits containing at most one `decimal_sep`, with at least one digit
/// after it
fn is_plain_decimal(s: &str, decimal_sep: char) -> bool {
    match s.split_once(decimal_sep) {
        Some((integer, fraction)) => {
            (integer.is_empty() || is_digits(integer)) && is_digits(fraction)
        }
        None => is_digits(s),
    }
}

/// External price series, keyed by series name and timestep
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PriceSeries(HashMap<String, BTreeMap<u32, f64>>);

impl PriceSeries {
    /// Create a new, empty [`PriceSeries`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value for the given series and timestep, returning the previous value if present
    pub fn insert(&mut self, series: &str, timestep: u32, value: f64) -> Option<f64> {
        self.0
            .entry(series.to_string())
            .or_default()
            .insert(timestep, value)
    }

    /// Get the values of a series, keyed by timestep
    pub fn get(&self, series: &str) -> Option<&BTreeMap<u32, f64>> {
        self.0.get(series)
    }
}

/// Commodity prices with one column per commodity and one row per timestep
#[derive(Debug, Clone, PartialEq)]
pub struct PriceTable {
    timesteps: Vec<u32>,
    columns: IndexMap<CommodityKey, Vec<f64>>,
}

impl PriceTable {
    /// The timesteps which make up the rows of the table
    pub fn timesteps(&self) -> &[u32] {
        &self.timesteps
    }

    /// Get the price of a commodity at a given timestep
    pub fn get(&self, key: &CommodityKey, timestep: u32) -> Option<f64> {
        let idx = self.timesteps.binary_search(&timestep).ok()?;
        self.columns.get(key).map(|column| column[idx])
    }

    /// Get all prices of a commodity, in timestep order
    pub fn column(&self, key: &CommodityKey) -> Option<&[f64]> {
        self.columns.get(key).map(Vec::as_slice)
    }

    /// Iterate over the columns of the table
    pub fn iter_columns(&self) -> impl Iterator<Item = (&CommodityKey, &[f64])> {
        self.columns.iter().map(|(key, column)| (key, column.as_slice()))
    }

    /// Iterate over the rows of the table, as a timestep and a price for each column
    pub fn iter_rows(&self) -> impl Iterator<Item = (u32, Vec<f64>)> + '_ {
        self.timesteps.iter().enumerate().map(|(idx, &timestep)| {
            let row = self.columns.values().map(|column| column[idx]).collect();
            (timestep, row)
        })
    }
}

/// Calculate the price of each of the given commodities for each timestep.
///
/// # Arguments
///
/// * `commodities` - All commodities
/// * `keys` - The commodities for which prices are wanted
/// * `timesteps` - The modelled timesteps
/// * `series` - External price series referred to by scaled prices
///
/// # Returns
///
/// A [`PriceTable`] with a column for each key, or an error if a commodity, series or timestep
/// is missing.
pub fn resolve_prices<'a, I>(
    commodities: &CommodityMap,
    keys: I,
    timesteps: &[u32],
    series: &PriceSeries,
) -> Result<PriceTable, ModelError>
where
    I: IntoIterator<Item = &'a CommodityKey>,
{
    let mut timesteps = timesteps.to_vec();
    timesteps.sort_unstable();
    timesteps.dedup();

    let mut columns = IndexMap::new();
    for key in keys {
        let commodity = commodities
            .get(key)
            .ok_or_else(|| ModelError::lookup("commodity", key))?;

        let column = match &commodity.price {
            PriceSpec::Constant(price) => vec![*price; timesteps.len()],
            PriceSpec::Scaled {
                factor,
                series: name,
            } => {
                let commodity_series: &str = key.commodity.0.as_ref();
                let values = name
                    .as_deref()
                    .and_then(|name| series.get(name))
                    .or_else(|| series.get(commodity_series))
                    .ok_or_else(|| {
                        ModelError::lookup(
                            "price series",
                            &name.as_deref().unwrap_or(commodity_series),
                        )
                    })?;

                timesteps
                    .iter()
                    .map(|timestep| {
                        values
                            .get(timestep)
                            .map(|value| factor * value)
                            .ok_or_else(|| ModelError::lookup("price series", &(key, timestep)))
                    })
                    .collect::<Result<_, _>>()?
            }
        };
        columns.insert(key.clone(), column);
    }

    Ok(PriceTable { timesteps, columns })
}
