//! Per-call restriction of the declared attribute and association keys.

use alloc::string::String;
use alloc::vec::Vec;

use foldhash::fast::FixedState;
use hashbrown::HashSet;

// -----------------------------------------------------------------------------
// FieldFilter

/// The `only`/`except` constraint of one serialization call.
///
/// When both are given, `only` wins. Names that are not declared on the
/// schema have no effect.
///
/// # Examples
///
/// ```
/// use vc_serializer::filter::FieldFilter;
///
/// let declared = ["name", "description", "comments"];
///
/// let only = FieldFilter::new(Some(["comments", "name", "missing"]), None::<[&str; 0]>);
/// assert_eq!(only.effective_keys(declared), ["name", "comments"]);
///
/// let except = FieldFilter::except(["description"]);
/// assert_eq!(except.effective_keys(declared), ["name", "comments"]);
/// ```
#[derive(Clone, Debug, Default)]
pub enum FieldFilter {
    /// Every declared key.
    #[default]
    All,
    /// Declared keys that are also in the set.
    Only(HashSet<String, FixedState>),
    /// Declared keys that are not in the set.
    Except(HashSet<String, FixedState>),
}

fn collect_names<S: Into<String>>(names: impl IntoIterator<Item = S>) -> HashSet<String, FixedState> {
    names.into_iter().map(Into::into).collect()
}

impl FieldFilter {
    /// Builds the filter from optional `only` and `except` lists.
    pub fn new<O, E>(only: Option<O>, except: Option<E>) -> Self
    where
        O: IntoIterator,
        O::Item: Into<String>,
        E: IntoIterator,
        E::Item: Into<String>,
    {
        match (only, except) {
            (Some(only), _) => Self::Only(collect_names(only)),
            (None, Some(except)) => Self::Except(collect_names(except)),
            (None, None) => Self::All,
        }
    }

    /// Keeps only `names`.
    #[inline]
    pub fn only<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Self::Only(collect_names(names))
    }

    /// Drops `names`.
    #[inline]
    pub fn except<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Self::Except(collect_names(names))
    }

    /// Whether the declared key `name` survives the filter.
    #[inline]
    pub fn includes(&self, name: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(only) => only.contains(name),
            Self::Except(except) => !except.contains(name),
        }
    }

    /// Filters `declared`, preserving its order.
    pub fn effective_keys<'k>(&self, declared: impl IntoIterator<Item = &'k str>) -> Vec<&'k str> {
        declared
            .into_iter()
            .filter(|name| self.includes(name))
            .collect()
    }
}

// -----------------------------------------------------------------------------
// Tests
