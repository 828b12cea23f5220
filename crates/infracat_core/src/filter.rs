//! Node label filtering and list sorting.

use infracat_entities::Node;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Selects nodes by label.
///
/// A node matches when its labels are a superset of the filter's labels. An
/// empty filter matches every node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeFilter {
    /// Labels a node must carry.
    #[serde(default)]
    pub labels: BTreeSet<String>,
}

impl NodeFilter {
    /// Creates a filter that matches every node.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a filter requiring every label in `labels`.
    pub fn labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    /// Adds a required label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.labels.insert(label.into());
        self
    }

    /// Returns true if the filter has no labels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Returns true if `node` carries every required label.
    #[must_use]
    pub fn matches(&self, node: &Node) -> bool {
        node.has_labels(&self.labels)
    }
}

/// Keeps the nodes matched by `filter`, in their original order.
#[must_use]
pub fn filter_nodes(nodes: Vec<Node>, filter: &NodeFilter) -> Vec<Node> {
    if filter.is_empty() {
        return nodes;
    }
    nodes.into_iter().filter(|n| filter.matches(n)).collect()
}

/// Sorts `items` by the name returned by `name`. Equal names keep their order.
pub fn sort_by_name<T, F>(items: &mut [T], name: F)
where
    F: Fn(&T) -> &str,
{
    items.sort_by(|a, b| name(a).cmp(name(b)));
}
