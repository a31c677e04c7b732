use std::collections::BTreeMap;
use std::fmt;

/// Query constraints understood by the list endpoints.
///
/// `Custom` carries anything the backend accepts that has no dedicated key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterKey {
    Group,
    Search,
    Distributor,
    DisconnectionType,
    LastStatus,
    ReportDate,
    Geofence,
    Custom(String),
}

impl FilterKey {
    /// Name of the query-string parameter.
    pub fn param(&self) -> &str {
        match self {
            FilterKey::Group => "group",
            FilterKey::Search => "search",
            FilterKey::Distributor => "distribuidor",
            FilterKey::DisconnectionType => "type",
            FilterKey::LastStatus => "last_status",
            FilterKey::ReportDate => "report_date",
            FilterKey::Geofence => "geofence",
            FilterKey::Custom(name) => name,
        }
    }
}

impl From<&str> for FilterKey {
    fn from(name: &str) -> Self {
        match name {
            "group" => FilterKey::Group,
            "search" => FilterKey::Search,
            "distribuidor" => FilterKey::Distributor,
            "type" => FilterKey::DisconnectionType,
            "last_status" => FilterKey::LastStatus,
            "report_date" => FilterKey::ReportDate,
            "geofence" => FilterKey::Geofence,
            other => FilterKey::Custom(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Number(i64),
    Null,
}

impl FilterValue {
    /// Query-string form; `None` means the constraint is not applied.
    pub fn as_param(&self) -> Option<String> {
        match self {
            FilterValue::Text(text) if text.trim().is_empty() => None,
            FilterValue::Text(text) => Some(text.clone()),
            FilterValue::Number(n) => Some(n.to_string()),
            FilterValue::Null => None,
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Text(text) => f.write_str(text),
            FilterValue::Number(n) => write!(f, "{n}"),
            FilterValue::Null => f.write_str("-"),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(text: &str) -> Self {
        FilterValue::Text(text.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(text: String) -> Self {
        FilterValue::Text(text)
    }
}

impl From<i64> for FilterValue {
    fn from(n: i64) -> Self {
        FilterValue::Number(n)
    }
}

impl<T: Into<FilterValue>> From<Option<T>> for FilterValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FilterValue::Null)
    }
}

/// Unique keys, no ordering; an absent key applies no constraint.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterMap {
    entries: BTreeMap<FilterKey, FilterValue>,
}

impl FilterMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<FilterKey>, value: impl Into<FilterValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<FilterKey>, value: impl Into<FilterValue>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &FilterKey) -> Option<&FilterValue> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parameters to append to a list request, skipping inactive values.
    pub fn to_query(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .filter_map(|(key, value)| value.as_param().map(|v| (key.param().to_string(), v)))
            .collect()
    }
}

/// Owns the filters of one view, independent of the resource being listed.
#[derive(Debug, Clone)]
pub struct FilterState {
    initial: FilterMap,
    current: FilterMap,
}

impl FilterState {
    pub fn new(initial: FilterMap) -> Self {
        Self {
            current: initial.clone(),
            initial,
        }
    }

    pub fn filters(&self) -> &FilterMap {
        &self.current
    }

    /// Creates or overwrites one key, leaving the others alone.
    pub fn update(&mut self, key: impl Into<FilterKey>, value: impl Into<FilterValue>) {
        self.current.insert(key, value);
    }

    pub fn set_many(&mut self, partial: FilterMap) {
        for (key, value) in partial.entries {
            self.current.entries.insert(key, value);
        }
    }

    /// Back to the map given at construction, which need not be empty.
    pub fn clear(&mut self) {
        self.current = self.initial.clone();
    }
}

impl Default for FilterState {
    fn default() -> Self {
        Self::new(FilterMap::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_merges_keys() {
        let mut state = FilterState::default();
        state.update("group", "2");
        state.update("search", "abc");

        let expected = FilterMap::new().with("group", "2").with("search", "abc");
        assert_eq!(state.filters(), &expected);
    }

    #[test]
    fn test_update_overwrites_single_key() {
        let mut state = FilterState::new(FilterMap::new().with(FilterKey::Group, 1i64));
        state.update(FilterKey::Search, "3N1");
        state.update(FilterKey::Group, 3i64);

        assert_eq!(state.filters().get(&FilterKey::Group), Some(&FilterValue::Number(3)));
        assert_eq!(state.filters().len(), 2);
    }

    #[test]
    fn test_set_many_keeps_unrelated_keys() {
        let mut state = FilterState::new(FilterMap::new().with("search", "abc"));
        state.set_many(FilterMap::new().with("group", "2").with("last_status", "OFFLINE"));

        assert_eq!(state.filters().len(), 3);
        assert_eq!(
            state.filters().get(&FilterKey::Search),
            Some(&FilterValue::Text("abc".into()))
        );
    }

    #[test]
    fn test_clear_restores_initial_map() {
        let initial = FilterMap::new().with("group", "1");
        let mut state = FilterState::new(initial.clone());
        state.update("group", "2");
        state.update("search", "abc");

        state.clear();

        assert_eq!(state.filters(), &initial);
    }

    #[test]
    fn test_query_skips_inactive_values() {
        let filters = FilterMap::new()
            .with("group", 2i64)
            .with("search", "")
            .with("distribuidor", FilterValue::Null)
            .with("zone", "norte");

        let mut query = filters.to_query();
        query.sort();
        assert_eq!(
            query,
            vec![
                ("group".to_string(), "2".to_string()),
                ("zone".to_string(), "norte".to_string()),
            ]
        );
    }

    #[test]
    fn test_known_keys_parse_from_names() {
        assert_eq!(FilterKey::from("group"), FilterKey::Group);
        assert_eq!(FilterKey::from("type"), FilterKey::DisconnectionType);
        assert_eq!(FilterKey::from("plate"), FilterKey::Custom("plate".into()));
        assert_eq!(FilterKey::Custom("plate".into()).param(), "plate");
    }
}
