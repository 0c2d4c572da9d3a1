//! Index tuples derived from the input tables, from which solver constraints are declared.
pub mod dsm;
pub mod time_frame;

pub use dsm::{DsmWindowTuple, dsm_recovery_window, dsm_time_window, dsm_window_tuples};
pub use time_frame::{
    InstalledTuple, OperationalTuple, RestValueTuple, installed_keys, installed_tuples,
    operational_tuples, rest_value_tuples,
};
