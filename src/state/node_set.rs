//! Indexed node set with O(1) insert, remove, membership and positional access.

const ABSENT: usize = usize::MAX;

/// Set of node ids drawn from `0..capacity`.
///
/// Members are kept in a dense vector so that uniform sampling and iteration
/// are cheap and, for a fixed sequence of operations, deterministic. Removal
/// swaps the last member into the freed slot.
#[derive(Debug, Clone)]
pub struct NodeSet {
    members: Vec<usize>,
    position: Vec<usize>,
}

impl NodeSet {
    /// Empty set able to hold ids in `0..capacity`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            members: Vec::new(),
            position: vec![ABSENT; capacity],
        }
    }

    /// Set holding every id in `0..capacity`.
    pub fn full(capacity: usize) -> Self {
        Self {
            members: (0..capacity).collect(),
            position: (0..capacity).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, node: usize) -> bool {
        self.position.get(node).is_some_and(|&p| p != ABSENT)
    }

    /// Inserts `node`; returns false if it was already present.
    pub fn insert(&mut self, node: usize) -> bool {
        if self.contains(node) {
            return false;
        }
        self.position[node] = self.members.len();
        self.members.push(node);
        true
    }

    /// Removes `node`; returns false if it was absent.
    pub fn remove(&mut self, node: usize) -> bool {
        if !self.contains(node) {
            return false;
        }
        let slot = self.position[node];
        self.members.swap_remove(slot);
        if let Some(&moved) = self.members.get(slot) {
            self.position[moved] = slot;
        }
        self.position[node] = ABSENT;
        true
    }

    pub fn clear(&mut self) {
        for &node in &self.members {
            self.position[node] = ABSENT;
        }
        self.members.clear();
    }

    /// Members in internal order.
    pub fn as_slice(&self) -> &[usize] {
        &self.members
    }

    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, usize>> {
        self.members.iter().copied()
    }

    /// Members in ascending order, for order-independent comparisons.
    pub fn sorted(&self) -> Vec<usize> {
        let mut nodes = self.members.clone();
        nodes.sort_unstable();
        nodes
    }
}

impl PartialEq for NodeSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|v| other.contains(v))
    }
}

impl Eq for NodeSet {}

impl<'a> IntoIterator for &'a NodeSet {
    type Item = usize;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, usize>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
