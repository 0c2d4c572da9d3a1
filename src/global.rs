//! Global properties are named scalar constraints which apply to a whole support time frame.
use indexmap::IndexMap;

/// Upper bound on total CO2 emissions
pub const CO2_LIMIT: &str = "CO2 limit";

/// Upper bound on total system cost
pub const COST_LIMIT: &str = "Cost limit";

/// Rate used to discount costs in later support time frames
pub const DISCOUNT_RATE: &str = "Discount rate";

/// Named scalar values, keyed by support time frame and property name
#[derive(PartialEq, Debug, Clone, Default)]
pub struct GlobalProperties(IndexMap<(u32, String), f64>);

impl GlobalProperties {
    /// Create a new, empty [`GlobalProperties`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the value of a property in the given support time frame
    pub fn get(&self, stf: u32, name: &str) -> Option<f64> {
        self.0.get(&(stf, name.to_string())).copied()
    }

    /// Set the value of a property, returning the previous value if there was one.
    ///
    /// Scenarios use this to override input values before the model is built.
    pub fn set(&mut self, stf: u32, name: &str, value: f64) -> Option<f64> {
        self.0.insert((stf, name.to_string()), value)
    }

    /// Set the value of a property in every support time frame in which it is defined
    pub fn set_all(&mut self, name: &str, value: f64) {
        for ((_, key), old) in &mut self.0 {
            if key == name {
                *old = value;
            }
        }
    }

    /// The support time frames mentioned in the table
    pub fn support_time_frames(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.keys().map(|(stf, _)| *stf)
    }
}
