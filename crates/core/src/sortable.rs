//! Generic user-driven sort over a row collection.
//!
//! A `SortableCollection` keeps rows in their input order and a derived
//! display order. Requesting a key sorts by it ascending; requesting the same
//! key again flips the direction. There is no way back to the unsorted view
//! once a key has been chosen.
//!
//! Ordering rules:
//! - Sorting is stable against the *input* order, in both directions.
//! - Missing values (and NaN) sort below every present value and stay at the
//!   front in both directions. Direction only reorders present values.
//! - Numbers compare by value: `-0.0` and `0.0` are a tie.

use std::cmp::Ordering;

use serde::Serialize;

/// The value a row exposes for one sort key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortValue<'a> {
    Missing,
    Number(f64),
    Text(&'a str),
}

impl<'a> SortValue<'a> {
    /// `None` and NaN both map to `Missing`.
    pub fn number(value: Option<f64>) -> Self {
        match value {
            Some(v) if !v.is_nan() => SortValue::Number(v),
            _ => SortValue::Missing,
        }
    }

    pub fn text(value: &'a str) -> Self {
        SortValue::Text(value)
    }
}

/// Rows that can be sorted by key `K`.
pub trait SortField<K> {
    fn sort_value(&self, key: K) -> SortValue<'_>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    fn apply(self, ord: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortDirection::Ascending => write!(f, "ascending"),
            SortDirection::Descending => write!(f, "descending"),
        }
    }
}

/// Active sort. Starts `Unsorted`; rows then show in input order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortState<K> {
    Unsorted,
    SortedBy { key: K, direction: SortDirection },
}

impl<K> Default for SortState<K> {
    fn default() -> Self {
        SortState::Unsorted
    }
}

impl<K: Copy + PartialEq> SortState<K> {
    /// State after the user requests `key`.
    pub fn next(self, key: K) -> Self {
        match self {
            SortState::SortedBy {
                key: active,
                direction,
            } if active == key => SortState::SortedBy {
                key,
                direction: direction.toggled(),
            },
            _ => SortState::SortedBy {
                key,
                direction: SortDirection::Ascending,
            },
        }
    }

    pub fn active_key(&self) -> Option<K> {
        match self {
            SortState::Unsorted => None,
            SortState::SortedBy { key, .. } => Some(*key),
        }
    }

    pub fn direction(&self) -> Option<SortDirection> {
        match self {
            SortState::Unsorted => None,
            SortState::SortedBy { direction, .. } => Some(*direction),
        }
    }

    /// Direction shown on `key`'s header, if it is the active one.
    pub fn direction_for(&self, key: K) -> Option<SortDirection> {
        match self {
            SortState::SortedBy {
                key: active,
                direction,
            } if *active == key => Some(*direction),
            _ => None,
        }
    }
}

/// Compare two sort values under `direction`.
pub fn compare(a: SortValue<'_>, b: SortValue<'_>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (SortValue::Missing, SortValue::Missing) => Ordering::Equal,
        (SortValue::Missing, _) => Ordering::Less,
        (_, SortValue::Missing) => Ordering::Greater,
        // NaN never reaches here: `SortValue::number` maps it to `Missing`.
        (SortValue::Number(x), SortValue::Number(y)) => {
            direction.apply(x.partial_cmp(&y).unwrap_or(Ordering::Equal))
        }
        (SortValue::Text(x), SortValue::Text(y)) => direction.apply(x.cmp(y)),
        // A key never mixes value types; keep numbers before text if it does.
        (SortValue::Number(_), SortValue::Text(_)) => direction.apply(Ordering::Less),
        (SortValue::Text(_), SortValue::Number(_)) => direction.apply(Ordering::Greater),
    }
}

/// Rows plus the user's sort request.
#[derive(Debug, Clone)]
pub struct SortableCollection<T, K> {
    rows: Vec<T>,
    order: Vec<usize>,
    state: SortState<K>,
}

impl<T, K> SortableCollection<T, K>
where
    T: SortField<K>,
    K: Copy + PartialEq,
{
    pub fn new(rows: Vec<T>) -> Self {
        let mut collection = Self {
            rows,
            order: Vec::new(),
            state: SortState::Unsorted,
        };
        collection.reorder();
        collection
    }

    /// Rows in display order.
    pub fn items(&self) -> impl ExactSizeIterator<Item = &T> + '_ {
        self.order.iter().map(move |&i| &self.rows[i])
    }

    pub fn sort_state(&self) -> SortState<K> {
        self.state
    }

    /// Apply the user's request for `key` and re-sort.
    pub fn request_sort(&mut self, key: K) -> SortState<K> {
        self.state = self.state.next(key);
        self.reorder();
        self.state
    }

    /// Swap in a new snapshot of rows. The active sort carries over and is
    /// recomputed against the new data.
    pub fn replace_rows(&mut self, rows: Vec<T>) {
        self.rows = rows;
        self.reorder();
    }

    fn reorder(&mut self) {
        let mut order: Vec<usize> = (0..self.rows.len()).collect();
        if let SortState::SortedBy { key, direction } = self.state {
            let rows = &self.rows;
            // `sort_by` is stable: ties keep input order.
            order.sort_by(|&a, &b| {
                compare(rows[a].sort_value(key), rows[b].sort_value(key), direction)
            });
        }
        self.order = order;
    }
}
