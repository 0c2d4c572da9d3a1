//! Code for reading global properties from a CSV file.
use super::*;
use crate::global::GlobalProperties;
use serde::Deserialize;

pub const GLOBAL_PROPERTIES_FILE_NAME: &str = "global_properties.csv";

#[derive(PartialEq, Debug, Deserialize)]
struct GlobalPropertyRaw {
    stf: u32,
    property: String,
    value: f64,
}

/// Read global properties from the specified model directory.
///
/// The support time frames of the model are those for which global properties are given.
pub fn read_global_properties(model_dir: &Path) -> Result<GlobalProperties> {
    let file_path = model_dir.join(GLOBAL_PROPERTIES_FILE_NAME);
    let properties_csv = read_csv(&file_path)?;
    read_global_properties_from_iter(properties_csv).with_context(|| input_err_msg(&file_path))
}

fn read_global_properties_from_iter<I>(iter: I) -> Result<GlobalProperties>
where
    I: Iterator<Item = GlobalPropertyRaw>,
{
    let mut properties = GlobalProperties::new();
    for record in iter {
        ensure!(
            !record.value.is_nan(),
            "Invalid value for {} in {}",
            record.property,
            record.stf
        );

        let existing = properties
            .set(record.stf, &record.property, record.value)
            .is_some();
        ensure!(
            !existing,
            "Duplicate entry for {} in {}",
            record.property,
            record.stf
        );
    }

    Ok(properties)
}
