//! Code for handling IDs
use anyhow::{Context, Result};
use indexmap::IndexSet;

/// Define a newtype for an ID, backed by a reference-counted string
macro_rules! define_id_type {
    ($name:ident) => {
        #[doc = concat!("Unique identifier of type `", stringify!($name), "`")]
        #[derive(
            Clone, std::hash::Hash, PartialEq, Eq, PartialOrd, Ord, Debug, serde::Deserialize,
        )]
        pub struct $name(pub std::rc::Rc<str>);

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                $name(std::rc::Rc::from(s))
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                $name(std::rc::Rc::from(s))
            }
        }

        impl $name {
            /// Get the ID as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }
    };
}
pub(crate) use define_id_type;

/// A collection of IDs which can be used to look up a known ID from a string
pub trait IDCollection<T> {
    /// Get the ID matching `id`, returning an error if it is not in the collection
    fn get_id(&self, id: &str) -> Result<T>;
}

impl<T> IDCollection<T> for IndexSet<T>
where
    T: Clone + std::hash::Hash + Eq + std::borrow::Borrow<str>,
{
    fn get_id(&self, id: &str) -> Result<T> {
        self.get(id)
            .cloned()
            .with_context(|| format!("Unknown ID {id} found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    define_id_type! {TestID}

    #[test]
    fn get_id_known() {
        let ids: IndexSet<TestID> = ["a".into(), "b".into()].into_iter().collect();
        assert_eq!(ids.get_id("b").unwrap(), "b".into());
    }

    #[test]
    fn get_id_unknown() {
        let ids: IndexSet<TestID> = ["a".into()].into_iter().collect();
        assert_eq!(
            ids.get_id("c").unwrap_err().to_string(),
            "Unknown ID c found"
        );
    }
}
