//! Category co-occurrence across orders.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

/// Symmetric category x category counts.
///
/// `count(a, b)` is the number of orders containing both categories;
/// `count(a, a)` is the number of orders containing `a` at all.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CooccurrenceMatrix {
    categories: Vec<String>,
    counts: Vec<Vec<i64>>,
}

impl CooccurrenceMatrix {
    /// Build from `(order_id, category)` line-item rows in any order.
    /// Several items of the same category in one order count once.
    pub fn from_order_categories<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (i64, String)>,
    {
        let mut per_order: BTreeMap<i64, BTreeSet<String>> = BTreeMap::new();
        for (order_id, category) in rows {
            per_order.entry(order_id).or_default().insert(category);
        }

        let categories: Vec<String> = per_order
            .values()
            .flatten()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let index: BTreeMap<&str, usize> = categories
            .iter()
            .enumerate()
            .map(|(i, c)| (c.as_str(), i))
            .collect();

        let n = categories.len();
        let mut counts = vec![vec![0i64; n]; n];

        for cats in per_order.values() {
            let idx: Vec<usize> = cats.iter().map(|c| index[c.as_str()]).collect();
            for (pos, &a) in idx.iter().enumerate() {
                counts[a][a] += 1;
                for &b in &idx[pos + 1..] {
                    counts[a][b] += 1;
                    counts[b][a] += 1;
                }
            }
        }

        Self { categories, counts }
    }

    /// Categories on both axes, alphabetically.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Matrix rows aligned with [`categories`](Self::categories).
    pub fn rows(&self) -> &[Vec<i64>] {
        &self.counts
    }

    /// Zero when either category never appears.
    pub fn count(&self, a: &str, b: &str) -> i64 {
        match (self.position(a), self.position(b)) {
            (Some(i), Some(j)) => self.counts[i][j],
            _ => 0,
        }
    }

    /// Off-diagonal pairs sorted by count descending, then by name.
    pub fn top_pairs(&self, limit: usize) -> Vec<(&str, &str, i64)> {
        let mut pairs = Vec::new();
        for i in 0..self.categories.len() {
            for j in i + 1..self.categories.len() {
                if self.counts[i][j] > 0 {
                    pairs.push((
                        self.categories[i].as_str(),
                        self.categories[j].as_str(),
                        self.counts[i][j],
                    ));
                }
            }
        }
        pairs.sort_by(|x, y| y.2.cmp(&x.2).then_with(|| (x.0, x.1).cmp(&(y.0, y.1))));
        pairs.truncate(limit);
        pairs
    }

    fn position(&self, category: &str) -> Option<usize> {
        self.categories
            .binary_search_by(|c| c.as_str().cmp(category))
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<(i64, String)> {
        vec![
            (1, "Bakery".into()),
            (1, "Dairy".into()),
            (1, "Dairy".into()),
            (2, "Dairy".into()),
            (2, "Produce".into()),
            (3, "Bakery".into()),
            (3, "Dairy".into()),
            (3, "Produce".into()),
            (4, "Frozen".into()),
        ]
    }

    #[test]
    fn test_matrix_is_symmetric() {
        let m = CooccurrenceMatrix::from_order_categories(rows());
        for a in m.categories() {
            for b in m.categories() {
                assert_eq!(m.count(a, b), m.count(b, a), "{a} / {b}");
            }
        }
    }

    #[test]
    fn test_diagonal_counts_orders() {
        let m = CooccurrenceMatrix::from_order_categories(rows());
        assert_eq!(m.count("Dairy", "Dairy"), 3);
        assert_eq!(m.count("Bakery", "Bakery"), 2);
        assert_eq!(m.count("Frozen", "Frozen"), 1);
    }

    #[test]
    fn test_pair_counts() {
        let m = CooccurrenceMatrix::from_order_categories(rows());
        assert_eq!(m.count("Bakery", "Dairy"), 2);
        assert_eq!(m.count("Dairy", "Produce"), 2);
        assert_eq!(m.count("Bakery", "Produce"), 1);
        assert_eq!(m.count("Frozen", "Dairy"), 0);
        assert_eq!(m.count("Unknown", "Dairy"), 0);
    }

    #[test]
    fn test_categories_sorted() {
        let m = CooccurrenceMatrix::from_order_categories(rows());
        assert_eq!(m.categories(), ["Bakery", "Dairy", "Frozen", "Produce"]);
    }

    #[test]
    fn test_top_pairs() {
        let m = CooccurrenceMatrix::from_order_categories(rows());
        let top = m.top_pairs(2);
        assert_eq!(top, vec![("Bakery", "Dairy", 2), ("Dairy", "Produce", 2)]);
    }

    #[test]
    fn test_empty_input() {
        let m = CooccurrenceMatrix::from_order_categories(Vec::new());
        assert!(m.is_empty());
        assert!(m.rows().is_empty());
    }
}
