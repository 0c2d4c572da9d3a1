//! Defines the `ModelParameters` struct, which represents the contents of `model.toml`.
use crate::input::{input_err_msg, read_toml};
use anyhow::{Context, Result, ensure};
use serde::Deserialize;
use std::ops::RangeInclusive;
use std::path::Path;

const MODEL_PARAMETERS_FILE_NAME: &str = "model.toml";

macro_rules! define_param_default {
    ($name:ident, $type: ty, $value: expr) => {
        fn $name() -> $type {
            $value
        }
    };
}

define_param_default!(default_timestep_hours, f64, 1.0);

/// Represents the contents of the entire model file.
#[derive(Debug, Deserialize, PartialEq)]
pub struct ModelParameters {
    /// The timesteps to model
    pub timesteps: Timesteps,
}

/// Represents the "timesteps" section of the model file.
#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
pub struct Timesteps {
    /// The initial timestep, which fixes storage state and is not itself modelled
    #[serde(default)]
    pub offset: u32,
    /// The number of modelled timesteps
    pub length: u32,
    /// Duration of a timestep in hours
    #[serde(default = "default_timestep_hours")]
    pub hours: f64,
}

impl Timesteps {
    /// All timesteps, including the initial one
    pub fn all(&self) -> RangeInclusive<u32> {
        self.offset..=self.offset + self.length
    }

    /// The timesteps for which flows are modelled, i.e. all but the initial one
    pub fn modelled(&self) -> RangeInclusive<u32> {
        self.offset + 1..=self.offset + self.length
    }

    /// Check that the timesteps are valid
    fn validate(&self) -> Result<()> {
        ensure!(self.length > 0, "timesteps.length must be greater than zero");
        ensure!(
            self.offset.checked_add(self.length).is_some(),
            "timesteps.offset + timesteps.length is too large"
        );
        ensure!(
            self.hours.is_finite() && self.hours > 0.0,
            "timesteps.hours must be a finite number greater than zero"
        );

        Ok(())
    }
}

impl ModelParameters {
    /// Read a model file from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `model_dir` - Folder containing model configuration files
    ///
    /// # Returns
    ///
    /// The model file contents as a [`ModelParameters`] struct or an error if the file is invalid
    pub fn from_path<P: AsRef<Path>>(model_dir: P) -> Result<ModelParameters> {
        let file_path = model_dir.as_ref().join(MODEL_PARAMETERS_FILE_NAME);
        let model_params: ModelParameters = read_toml(&file_path)?;

        model_params
            .validate()
            .with_context(|| input_err_msg(file_path))?;

        Ok(model_params)
    }

    /// Validate parameters after reading in file
    fn validate(&self) -> Result<()> {
        self.timesteps.validate()
    }
}
