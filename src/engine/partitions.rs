// Set partition enumeration
//
// Partitions of {0, .., n-1} are generated as restricted growth strings in
// lexicographic order: a[0] = 0 and a[i] <= max(a[0..i]) + 1, where a[i] is
// the group element i belongs to. The first partition puts everything in one
// group, the last puts every element in its own group.

/// One partition: groups of element indices, each group in ascending order
pub type Partition = Vec<Vec<usize>>;

/// Iterator over all partitions of an n-element index set
///
/// Partitions with more than `max_groups` groups are never produced. The
/// order is fixed, so restarting with the same arguments yields the same
/// sequence.
#[derive(Debug, Clone)]
pub struct Partitions {
    /// Current restricted growth string
    rgs: Vec<usize>,

    /// Upper bound on the number of groups
    max_groups: usize,

    /// Set once the last partition has been yielded
    done: bool,
}

impl Partitions {
    /// Enumerate every partition of `n` elements
    pub fn new(n: usize) -> Self {
        Self::with_max_groups(n, n.max(1))
    }

    /// Enumerate partitions of `n` elements into at most `max_groups` groups
    pub fn with_max_groups(n: usize, max_groups: usize) -> Self {
        Partitions {
            rgs: vec![0; n],
            max_groups,
            done: n > 0 && max_groups == 0,
        }
    }

    /// Group the current restricted growth string
    fn current(&self) -> Partition {
        let count = self.rgs.iter().max().map_or(0, |&m| m + 1);
        let mut groups = vec![Vec::new(); count];
        for (element, &group) in self.rgs.iter().enumerate() {
            groups[group].push(element);
        }
        groups
    }

    /// Step to the next restricted growth string
    ///
    /// # Returns
    ///
    /// `false` once the sequence is exhausted
    fn advance(&mut self) -> bool {
        for i in (1..self.rgs.len()).rev() {
            let prefix_max = self.rgs[..i].iter().copied().max().unwrap_or(0);
            if self.rgs[i] <= prefix_max && self.rgs[i] + 1 < self.max_groups {
                self.rgs[i] += 1;
                for later in self.rgs[i + 1..].iter_mut() {
                    *later = 0;
                }
                return true;
            }
        }
        false
    }
}

impl Iterator for Partitions {
    type Item = Partition;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let partition = self.current();
        self.done = !self.advance();
        Some(partition)
    }
}
