//! Names of model entities.
//!
//! Sites, commodities, processes, transmission lines and storages are referred to by name
//! throughout the input files. Each kind of name gets its own newtype so that, e.g., a site name
//! can't be used where a commodity name is expected.
use anyhow::{Context, Result};
use indexmap::IndexSet;
use std::borrow::Borrow;
use std::hash::Hash;

macro_rules! define_id_type {
    ($name:ident) => {
        /// The name of a model entity, as written in the input files
        #[derive(
            Clone,
            Debug,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            serde::Deserialize,
            serde::Serialize,
            derive_more::Display,
        )]
        pub struct $name(pub std::rc::Rc<str>);

        impl $name {
            /// Create a new ID from a name
            pub fn new(name: &str) -> Self {
                Self(name.into())
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(name: &str) -> Self {
                Self::new(name)
            }
        }

        impl From<String> for $name {
            fn from(name: String) -> Self {
                Self(name.into())
            }
        }
    };
}
pub(crate) use define_id_type;

/// The names declared in one input table, against which references from other tables are checked
pub trait DeclaredIDs<ID> {
    /// Get the declared ID called `name`.
    ///
    /// The returned ID shares its storage with the declared one. It is an error for `name` not to
    /// have been declared.
    fn resolve(&self, name: &str) -> Result<ID>;
}

impl<ID> DeclaredIDs<ID> for IndexSet<ID>
where
    ID: Borrow<str> + Clone + Eq + Hash,
{
    fn resolve(&self, name: &str) -> Result<ID> {
        self.get(name)
            .cloned()
            .with_context(|| format!("{name} has not been declared"))
    }
}
