//! Attribute filter predicates.
//!
//! A filter is a conjunction of conditions over entry attributes:
//! equality and exclusion on categorical fields, range containment on
//! numeric fields. Filters run BEFORE ranking, so excluded entries
//! never occupy candidate slots and a query returns fewer than `k` results
//! only when fewer than `k` entries survive the filter.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::data::{AttrValue, Attributes};

/// Inclusive-lower, exclusive-upper numeric range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct NumericRange {
    /// Inclusive lower bound; unbounded when `None`.
    #[serde(default)]
    pub min: Option<f64>,
    /// Exclusive upper bound; unbounded when `None`.
    #[serde(default)]
    pub max: Option<f64>,
}

impl NumericRange {
    /// Range `[min, max)`.
    pub fn between(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Range `[min, +inf)`.
    pub fn at_least(min: f64) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    /// Range `(-inf, max)`.
    pub fn below(max: f64) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    fn contains(&self, value: f64) -> bool {
        if let Some(min) = self.min {
            if value < min {
                return false;
            }
        }
        if let Some(max) = self.max {
            if value >= max {
                return false;
            }
        }
        true
    }
}

/// A boolean predicate over entry attributes. All conditions must hold.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AttributeFilter {
    /// Attribute must exist and equal the given value.
    #[serde(default)]
    pub equals: HashMap<String, AttrValue>,
    /// Attribute must be absent or differ from the given value.
    #[serde(default)]
    pub not_equals: HashMap<String, AttrValue>,
    /// Attribute must exist, be numeric, and fall inside the range.
    #[serde(default)]
    pub ranges: HashMap<String, NumericRange>,
}

impl AttributeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require equality on an attribute.
    pub fn equals(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.equals.insert(name.into(), value.into());
        self
    }

    /// Exclude entries whose attribute equals the given value.
    pub fn not_equals(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.not_equals.insert(name.into(), value.into());
        self
    }

    /// Require a numeric attribute to fall inside a range.
    pub fn range(mut self, name: impl Into<String>, range: NumericRange) -> Self {
        self.ranges.insert(name.into(), range);
        self
    }

    /// True when the attribute map satisfies every condition.
    pub fn matches(&self, attributes: &Attributes) -> bool {
        for (name, expected) in &self.equals {
            match attributes.get(name) {
                Some(actual) if actual == expected => {}
                _ => return false,
            }
        }

        for (name, excluded) in &self.not_equals {
            if let Some(actual) = attributes.get(name) {
                if actual == excluded {
                    return false;
                }
            }
        }

        for (name, range) in &self.ranges {
            match attributes.get(name).and_then(|v| v.as_number()) {
                Some(value) if range.contains(value) => {}
                _ => return false,
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, AttrValue)]) -> Attributes {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn equality_requires_presence_and_match() {
        let filter = AttributeFilter::new().equals("category", "boots");
        assert!(filter.matches(&attrs(&[("category", "boots".into())])));
        assert!(!filter.matches(&attrs(&[("category", "shoes".into())])));
        assert!(!filter.matches(&Attributes::new()));
    }

    #[test]
    fn exclusion_passes_when_attribute_missing() {
        let filter = AttributeFilter::new().not_equals("category", "shoes");
        assert!(filter.matches(&Attributes::new()));
        assert!(filter.matches(&attrs(&[("category", "boots".into())])));
        assert!(!filter.matches(&attrs(&[("category", "shoes".into())])));
    }

    #[test]
    fn range_is_inclusive_lower_exclusive_upper() {
        let filter = AttributeFilter::new().range("price", NumericRange::between(10.0, 20.0));
        assert!(filter.matches(&attrs(&[("price", 10.0.into())])));
        assert!(filter.matches(&attrs(&[("price", 19.99.into())])));
        assert!(!filter.matches(&attrs(&[("price", 20.0.into())])));
        assert!(!filter.matches(&attrs(&[("price", AttrValue::Text("n/a".into()))])));
        assert!(!filter.matches(&Attributes::new()));
    }

    #[test]
    fn range_accepts_integer_attributes() {
        let filter = AttributeFilter::new().range("stock", NumericRange::at_least(1.0));
        assert!(filter.matches(&attrs(&[("stock", 5i64.into())])));
        assert!(!filter.matches(&attrs(&[("stock", 0i64.into())])));
    }

    #[test]
    fn conditions_are_a_conjunction() {
        let filter = AttributeFilter::new()
            .equals("brand", "acme")
            .range("price", NumericRange::below(50.0));
        assert!(filter.matches(&attrs(&[("brand", "acme".into()), ("price", 49.0.into())])));
        assert!(!filter.matches(&attrs(&[("brand", "acme".into()), ("price", 51.0.into())])));
        assert!(!filter.matches(&attrs(&[("brand", "other".into()), ("price", 1.0.into())])));
    }
}
