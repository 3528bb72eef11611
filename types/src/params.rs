//! Pagination, sort, and filter state for list queries.
//!
//! [`ParamState`] is the canonical form of a list view's query. It round-trips
//! through the query string of the navigable location:
//!
//! ```rust
//! use hubview_types::ParamState;
//!
//! let state = ParamState::parse("?page=2&page_size=20&sort=name", &["page", "page_size", "sort"]);
//! assert_eq!(state.page(), Some(2));
//! assert_eq!(state.serialize(), "page=2&page_size=20&sort=name");
//! ```
//!
//! # Invariants
//!
//! - Unset keys are absent. A key is never stored with an empty value, so
//!   "filter is active" is the same as "key is present".
//! - `page` and `page_size` are positive integers whenever present.

use std::collections::BTreeMap;
use std::fmt;

use url::form_urlencoded;

pub const PAGE: &str = "page";
pub const PAGE_SIZE: &str = "page_size";
pub const SORT: &str = "sort";

/// Keys that never count as filters.
pub const PAGING_KEYS: [&str; 3] = [PAGE, PAGE_SIZE, SORT];

/// Keys whose values are integers by contract.
const NUMERIC_KEYS: [&str; 2] = [PAGE, PAGE_SIZE];

const DESCENDING_PREFIX: char = '-';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Int(i64),
    Text(String),
    /// A key repeated in the query string (`tag=a&tag=b`).
    List(Vec<String>),
}

impl ParamValue {
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            Self::Text(value) => value.parse().ok(),
            Self::List(_) => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            Self::Int(_) | Self::List(_) => None,
        }
    }

    fn is_blank(&self) -> bool {
        match self {
            Self::Int(_) => false,
            Self::Text(value) => value.is_empty(),
            Self::List(values) => values.iter().all(String::is_empty),
        }
    }

    fn query_values(&self) -> Vec<String> {
        match self {
            Self::Int(value) => vec![value.to_string()],
            Self::Text(value) => vec![value.clone()],
            Self::List(values) => values.iter().filter(|v| !v.is_empty()).cloned().collect(),
        }
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
            Self::List(values) => f.write_str(&values.join(", ")),
        }
    }
}

/// Sort order parsed from the `sort` key (`name` or `-name`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub descending: bool,
}

impl SortKey {
    #[must_use]
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: false,
        }
    }

    #[must_use]
    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: true,
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let (field, descending) = match raw.strip_prefix(DESCENDING_PREFIX) {
            Some(rest) => (rest, true),
            None => (raw, false),
        };
        if field.is_empty() {
            return None;
        }
        Some(Self {
            field: field.to_string(),
            descending,
        })
    }

    /// The same field in the opposite direction.
    #[must_use]
    pub fn toggled(&self) -> Self {
        Self {
            field: self.field.clone(),
            descending: !self.descending,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.descending {
            write!(f, "{DESCENDING_PREFIX}{}", self.field)
        } else {
            f.write_str(&self.field)
        }
    }
}

/// Defaults applied to a freshly parsed state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDefaults {
    pub page_size: u32,
    pub sort: Option<SortKey>,
}

impl Default for ParamDefaults {
    fn default() -> Self {
        Self {
            page_size: 10,
            sort: None,
        }
    }
}

/// A partial update. `None` removes the key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamPatch {
    changes: BTreeMap<String, Option<ParamValue>>,
}

impl ParamPatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn set(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.changes.insert(key.into(), Some(value.into()));
        self
    }

    #[must_use]
    pub fn remove(mut self, key: impl Into<String>) -> Self {
        self.changes.insert(key.into(), None);
        self
    }

    #[must_use]
    pub fn page(self, page: u32) -> Self {
        self.set(PAGE, page)
    }

    #[must_use]
    pub fn page_size(self, page_size: u32) -> Self {
        self.set(PAGE_SIZE, page_size)
    }

    #[must_use]
    pub fn sort(self, sort: &SortKey) -> Self {
        self.set(SORT, sort.to_string())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&ParamValue>)> {
        self.changes.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    fn touches(&self, key: &str) -> bool {
        self.changes.contains_key(key)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamState {
    values: BTreeMap<String, ParamValue>,
}

impl ParamState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a query string, keeping only `recognized` keys.
    ///
    /// Unknown keys and empty values are dropped without error. `page` and
    /// `page_size` must be positive integers; anything else is dropped so the
    /// defaults apply.
    #[must_use]
    pub fn parse(query: &str, recognized: &[&str]) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut state = Self::new();

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            if !recognized.contains(&key.as_ref()) || value.is_empty() {
                continue;
            }

            if NUMERIC_KEYS.contains(&key.as_ref()) {
                if let Some(n) = positive_int(&ParamValue::text(value.as_ref())) {
                    state.values.insert(key.into_owned(), n);
                }
                continue;
            }

            let value = value.into_owned();
            match state.values.get_mut(key.as_ref()) {
                Some(ParamValue::List(values)) => values.push(value),
                Some(existing) => {
                    let first = existing.to_string();
                    *existing = ParamValue::List(vec![first, value]);
                }
                None => {
                    state.values.insert(key.into_owned(), ParamValue::Text(value));
                }
            }
        }

        state
    }

    /// Render as a query string without the leading `?`.
    #[must_use]
    pub fn serialize(&self) -> String {
        let mut out = form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.query_pairs() {
            out.append_pair(&key, &value);
        }
        out.finish()
    }

    /// Flattened `(key, value)` pairs, with list values repeated.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.values
            .iter()
            .flat_map(|(key, value)| {
                value
                    .query_values()
                    .into_iter()
                    .map(move |v| (key.clone(), v))
            })
            .collect()
    }

    #[must_use]
    pub fn with_defaults(mut self, defaults: &ParamDefaults) -> Self {
        self.values
            .entry(PAGE.to_string())
            .or_insert(ParamValue::Int(1));
        self.values
            .entry(PAGE_SIZE.to_string())
            .or_insert(ParamValue::Int(i64::from(defaults.page_size.max(1))));
        if let Some(sort) = &defaults.sort {
            self.values
                .entry(SORT.to_string())
                .or_insert_with(|| ParamValue::Text(sort.to_string()));
        }
        self
    }

    /// Set a key. Blank values remove the key instead of storing a placeholder.
    ///
    /// `page` and `page_size` only accept positive integers. Anything else
    /// removes the key, the same way [`parse`](Self::parse) drops it.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        let key = key.into();
        let value = value.into();
        let value = if NUMERIC_KEYS.contains(&key.as_str()) {
            positive_int(&value)
        } else {
            Some(value).filter(|v| !v.is_blank())
        };
        match value {
            Some(value) => {
                self.values.insert(key, value);
            }
            None => {
                self.values.remove(&key);
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        self.values.remove(key)
    }

    /// Merge a patch into a copy of this state.
    ///
    /// A patch that changes anything without naming `page` returns to the
    /// first page, since the old page index no longer describes the result.
    #[must_use]
    pub fn apply(&self, patch: &ParamPatch) -> Self {
        let mut next = self.clone();
        for (key, value) in patch.iter() {
            match value {
                Some(value) => next.set(key, value.clone()),
                None => {
                    next.values.remove(key);
                }
            }
        }

        if !patch.touches(PAGE) && next != *self && next.values.contains_key(PAGE) {
            next.values.insert(PAGE.to_string(), ParamValue::Int(1));
        }
        next
    }

    /// Overlay this state onto `base`. Keys present here win.
    #[must_use]
    pub fn merged_over(&self, base: &ParamState) -> Self {
        let mut merged = base.clone();
        for (key, value) in &self.values {
            merged.values.insert(key.clone(), value.clone());
        }
        merged
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.values.get(key)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    #[must_use]
    pub fn page(&self) -> Option<u32> {
        self.positive(PAGE)
    }

    #[must_use]
    pub fn page_size(&self) -> Option<u32> {
        self.positive(PAGE_SIZE)
    }

    #[must_use]
    pub fn sort(&self) -> Option<SortKey> {
        self.values
            .get(SORT)
            .and_then(ParamValue::as_text)
            .and_then(SortKey::parse)
    }

    /// True when any of `keys` is present.
    #[must_use]
    pub fn filter_is_set(&self, keys: &[&str]) -> bool {
        keys.iter().any(|key| self.values.contains_key(*key))
    }

    /// Active filters, skipping paging and sort keys.
    pub fn applied_filters(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values
            .iter()
            .filter(|(key, _)| !PAGING_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.as_str(), value))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn positive(&self, key: &str) -> Option<u32> {
        self.values
            .get(key)
            .and_then(ParamValue::as_int)
            .and_then(|n| u32::try_from(n).ok())
            .filter(|n| *n > 0)
    }
}

fn positive_int(value: &ParamValue) -> Option<ParamValue> {
    value
        .as_int()
        .filter(|n| *n > 0)
        .map(ParamValue::Int)
}

impl<K, V> FromIterator<(K, V)> for ParamState
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut state = Self::new();
        for (key, value) in iter {
            state.set(key, value);
        }
        state
    }
}
