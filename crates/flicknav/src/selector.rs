//! Selectors for tree lookups.
//!
//! A selector mirrors the introspection query shape `select_single(type,
//! **filters)`: an optional type name plus property filters that must all
//! match. Most lookups in list navigation only filter on `objectName`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Property used by toolkit code to name objects
pub const OBJECT_NAME: &str = "objectName";

/// Query describing which element to select
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selector {
    /// Type name to match, if any
    pub type_name: Option<String>,
    /// Property filters, all of which must match
    pub filters: BTreeMap<String, String>,
}

impl Selector {
    /// Select by `objectName`
    #[must_use]
    pub fn object_name(name: impl Into<String>) -> Self {
        Self::default().with(OBJECT_NAME, name)
    }

    /// Select by type name
    #[must_use]
    pub fn of_type(type_name: impl Into<String>) -> Self {
        Self {
            type_name: Some(type_name.into()),
            filters: BTreeMap::new(),
        }
    }

    /// Add a property filter
    #[must_use]
    pub fn with(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(property.into(), value.into());
        self
    }

    /// The `objectName` filter, if present
    #[must_use]
    pub fn object_name_filter(&self) -> Option<&str> {
        self.filters.get(OBJECT_NAME).map(String::as_str)
    }

    /// Check a node against this selector.
    ///
    /// `property` looks up a property value on the candidate; a missing
    /// property never matches.
    pub fn matches<F>(&self, type_name: &str, property: F) -> bool
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(ref wanted) = self.type_name {
            if wanted != type_name {
                return false;
            }
        }
        self.filters
            .iter()
            .all(|(key, value)| property(key).as_deref() == Some(value.as_str()))
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.type_name, self.filters.len()) {
            (None, 1) if self.object_name_filter().is_some() => {
                write!(f, "objectName {:?}", self.object_name_filter().unwrap_or_default())
            }
            (type_name, _) => {
                write!(f, "{}", type_name.as_deref().unwrap_or("*"))?;
                for (key, value) in &self.filters {
                    write!(f, "[{key}={value:?}]")?;
                }
                Ok(())
            }
        }
    }
}
