//! Sparse-table range-minimum queries over an Euler tour.

/// Constant-time range-minimum queries after O(n log n) preprocessing.
///
/// For every power-of-two window length the table stores the index of the
/// minimum element in that window; a query combines the two largest
/// pre-tabulated windows covering the range. Built once per reference tree
/// over its Euler tour of preorder IDs: the minimum preorder ID between the
/// first occurrences of two nodes identifies their lowest common ancestor.
///
/// Indices are stored as `u32`; Euler tours beyond 2^32 entries are not
/// supported.
#[derive(Debug, Clone)]
pub struct SparseRmq {
    data: Vec<u32>,
    /// level-major: row `k` holds the argmin of the windows `[j, j + 2^k)`
    table: Vec<u32>,
    levels: usize,
}

impl SparseRmq {
    /// Builds the query structure for the given data.
    #[must_use]
    pub fn new(data: Vec<u32>) -> Self {
        let len = data.len();
        if len == 0 {
            return SparseRmq {
                data,
                table: Vec::new(),
                levels: 0,
            };
        }

        // number of levels = floor(log2(len)) + 1, i.e. the bit length
        let levels = (usize::BITS - len.leading_zeros()) as usize;
        let mut table = vec![0u32; levels * len];
        for (j, slot) in table[..len].iter_mut().enumerate() {
            *slot = j as u32;
        }

        // dynamic programming over window sizes: a window of length 2^k is
        // the better of its two halves of length 2^(k-1)
        for k in 1..levels {
            let half = 1usize << (k - 1);
            for j in 0..len {
                let left = table[(k - 1) * len + j];
                let right_start = if j + half < len { j + half } else { j };
                let right = table[(k - 1) * len + right_start];
                table[k * len + j] = if data[left as usize] <= data[right as usize] {
                    left
                } else {
                    right
                };
            }
        }

        SparseRmq {
            data,
            table,
            levels,
        }
    }

    /// Returns the index of the minimum element in the inclusive range
    /// `[i, j]`, in constant time. For `i == j` this is trivially `i`.
    ///
    /// # Panics
    /// Panics if `i > j` or `j` is out of bounds.
    #[must_use]
    pub fn range_min(&self, i: usize, j: usize) -> usize {
        assert!(i <= j, "range_min requires i <= j, got {} > {}", i, j);
        assert!(j < self.data.len(), "range_min index {} out of bounds", j);

        let len = self.data.len();
        let span = j - i + 1;
        let level = (usize::BITS - span.leading_zeros()) as usize - 1;
        debug_assert!(level < self.levels);

        let a = self.table[level * len + i] as usize;
        let b = self.table[level * len + (j + 1 - (1 << level))] as usize;
        if self.data[a] <= self.data[b] { a } else { b }
    }

    /// Returns the number of elements the structure was built over.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the structure was built over no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the underlying values.
    pub fn values(&self) -> &[u32] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::SparseRmq;
    use rand::RngCore;

    #[test]
    fn small_test() {
        let rmq = SparseRmq::new(vec![9, 6, 10, 4, 0, 8, 3, 7, 1, 2, 5]);
        assert_eq!(rmq.len(), 11);
        assert!(!rmq.is_empty());

        assert_eq!(rmq.range_min(0, 0), 0);
        assert_eq!(rmq.range_min(0, 1), 1);
        assert_eq!(rmq.range_min(0, 2), 1);
        assert_eq!(rmq.range_min(0, 3), 3);
        assert_eq!(rmq.range_min(5, 8), 8);
        assert_eq!(rmq.range_min(5, 9), 8);
        assert_eq!(rmq.range_min(9, 10), 9);
        assert_eq!(rmq.range_min(0, 10), 4);
    }

    #[test]
    fn single_element() {
        let rmq = SparseRmq::new(vec![42]);
        assert_eq!(rmq.range_min(0, 0), 0);
    }

    #[test]
    fn randomized_test() {
        let mut rng = rand::thread_rng();
        const L: usize = 100;

        let mut numbers = Vec::with_capacity(L);
        for _ in 0..L {
            numbers.push(rng.next_u32() % 1000);
        }

        let rmq = SparseRmq::new(numbers.clone());

        for i in 0..L {
            for j in i..L {
                let min = numbers[i..=j].iter().min().unwrap();
                assert_eq!(
                    numbers[rmq.range_min(i, j)],
                    *min,
                    "i = {}, j = {}",
                    i,
                    j
                );
            }
        }
    }

    #[test]
    fn ties_resolve_to_some_minimum() {
        let rmq = SparseRmq::new(vec![5, 1, 1, 5, 1]);
        for (i, j) in [(0, 4), (1, 2), (0, 2), (2, 4)] {
            assert_eq!(rmq.values()[rmq.range_min(i, j)], 1);
        }
    }
}
