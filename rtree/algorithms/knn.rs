//! K-Nearest Neighbors (KNN) search algorithm for R-tree
//!
//! This module implements a best-first branch-and-bound KNN search. Nodes are
//! expanded in order of the lower-bound distance from the query point to their
//! bounding box, using a min-heap. Candidates found in leaves are merged into a
//! running top-k list; once the list is full its k-th distance becomes the
//! pruning bound.
//!
//! ## Algorithm Overview
//!
//! 1. Push the root onto the heap with priority 0
//! 2. Loop:
//!    - Pop the node with the smallest lower-bound distance
//!    - Stop once k results are held and the popped bound is not below the k-th distance
//!    - Leaf: compute exact distances to its items and merge them into the top-k list
//!    - Internal node: push every child whose lower bound can still beat the k-th distance
//! 3. Return the top-k list, nearest first
//!
//! Distances are planar Euclidean distances in the building's coordinate space.

use super::super::node::{Item, Node, NodeKind};
use super::super::rectangle::Point;
use super::super::rtree::RTree;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use tracing::{trace, warn};

/// Result of a KNN search: an item and its distance to the query point
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor<'a, T> {
    /// The item found
    pub item: &'a Item<T>,
    /// Euclidean distance from the query point
    pub distance: f64,
}

/// Entry in the priority queue: a node and the lower bound of the distance
/// from the query point to anything inside it
struct QueueEntry<'a, T> {
    min_distance: f64,
    node: &'a Node<T>,
}

// BinaryHeap is a max-heap, so the ordering is reversed to pop the smallest bound first
impl<T> PartialEq for QueueEntry<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.min_distance == other.min_distance
    }
}

impl<T> Eq for QueueEntry<'_, T> {}

impl<T> PartialOrd for QueueEntry<'_, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for QueueEntry<'_, T> {
    fn cmp(&self, other: &Self) -> Ordering {
        other.min_distance.total_cmp(&self.min_distance)
    }
}

impl<T> RTree<T> {
    /// Find the `k` items nearest to `(x, y)`
    ///
    /// Results are sorted by ascending distance. Fewer than `k` results are
    /// returned only when the tree holds fewer than `k` items. Items at exactly
    /// equal distance may come back in either order.
    ///
    /// # Examples
    ///
    /// ```
    /// use bim_spatial::RTree;
    ///
    /// let mut tree = RTree::new(4).unwrap();
    /// tree.insert("ahu-1", 0.0, 0.0, "AHU").unwrap();
    /// tree.insert("vav-7", 3.0, 4.0, "VAV").unwrap();
    ///
    /// let nearest = tree.nearest_neighbors(2.5, 3.5, 1);
    /// assert_eq!(nearest[0].item.id, "vav-7");
    /// ```
    pub fn nearest_neighbors(&self, x: f64, y: f64, k: usize) -> Vec<Neighbor<'_, T>> {
        let query = Point::new(x, y);
        if !query.is_finite() {
            warn!(x, y, "ignoring nearest-neighbor query with non-finite point");
            return Vec::new();
        }

        knn_search(self.root_ref(), &query, k, |_| true)
    }

    /// Find the `k` nearest items that satisfy `filter`
    ///
    /// Items rejected by the filter never enter the top-k list, so they do not
    /// tighten the pruning bound; the search keeps expanding until `k` accepted
    /// items are found or the tree is exhausted.
    pub fn nearest_neighbors_where<F>(&self, x: f64, y: f64, k: usize, filter: F) -> Vec<Neighbor<'_, T>>
    where
        F: Fn(&Item<T>) -> bool,
    {
        let query = Point::new(x, y);
        if !query.is_finite() {
            warn!(x, y, "ignoring nearest-neighbor query with non-finite point");
            return Vec::new();
        }

        knn_search(self.root_ref(), &query, k, filter)
    }
}

/// Perform KNN search starting from `root`
///
/// # Returns
///
/// Vector of [`Neighbor`], sorted by ascending distance (nearest first)
pub fn knn_search<'a, T, F>(root: &'a Node<T>, query: &Point, k: usize, filter: F) -> Vec<Neighbor<'a, T>>
where
    F: Fn(&Item<T>) -> bool,
{
    // Early return if tree is empty or k is 0
    if k == 0 || root.is_empty() {
        return Vec::new();
    }

    let mut results: Vec<Neighbor<'a, T>> = Vec::with_capacity(k);
    let mut heap = BinaryHeap::new();
    let mut expanded = 0usize;

    heap.push(QueueEntry {
        min_distance: 0.0,
        node: root,
    });

    while let Some(QueueEntry { min_distance, node }) = heap.pop() {
        // Early termination: nothing left in the heap can beat the k-th distance
        if results.len() == k && min_distance >= results[k - 1].distance {
            break;
        }
        expanded += 1;

        match &node.kind {
            NodeKind::Leaf(items) => {
                for item in items.iter().filter(|item| filter(*item)) {
                    let distance = query.distance(&item.location);
                    offer(&mut results, k, Neighbor { item, distance });
                }
            }
            NodeKind::Internal(children) => {
                for child in children {
                    let bound = child.bbox.distance_to_point(query);
                    if results.len() < k || bound < results[k - 1].distance {
                        heap.push(QueueEntry {
                            min_distance: bound,
                            node: child,
                        });
                    }
                }
            }
        }
    }

    trace!(k, expanded, found = results.len(), "knn search finished");
    results
}

/// Insert a candidate into the sorted top-k list, dropping anything past `k`
fn offer<'a, T>(results: &mut Vec<Neighbor<'a, T>>, k: usize, candidate: Neighbor<'a, T>) {
    if results.len() == k && candidate.distance >= results[k - 1].distance {
        return;
    }

    let position = results.partition_point(|n| n.distance <= candidate.distance);
    results.insert(position, candidate);
    results.truncate(k);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn sorted_ids<T>(neighbors: &[Neighbor<'_, T>]) -> Vec<String> {
        let mut ids: Vec<String> = neighbors.iter().map(|n| n.item.id.clone()).collect();
        ids.sort();
        ids
    }

    fn brute_force(points: &[(String, Point)], query: &Point, k: usize) -> Vec<String> {
        let mut by_distance: Vec<(f64, &String)> =
            points.iter().map(|(id, p)| (query.distance(p), id)).collect();
        by_distance.sort_by(|a, b| a.0.total_cmp(&b.0));
        let mut ids: Vec<String> = by_distance.into_iter().take(k).map(|(_, id)| id.clone()).collect();
        ids.sort();
        ids
    }

    #[test]
    fn test_knn_empty_tree_and_zero_k() {
        let empty: RTree<()> = RTree::new(4).unwrap();
        assert!(empty.nearest_neighbors(0.0, 0.0, 3).is_empty());

        let mut rtree = RTree::new(4).unwrap();
        rtree.insert("a", 1.0, 1.0, ()).unwrap();
        assert!(rtree.nearest_neighbors(0.0, 0.0, 0).is_empty());
    }

    #[test]
    fn test_knn_fewer_items_than_k() {
        let mut rtree = RTree::new(4).unwrap();
        rtree.insert("a", 1.0, 0.0, ()).unwrap();
        rtree.insert("b", 3.0, 0.0, ()).unwrap();
        rtree.insert("c", 2.0, 0.0, ()).unwrap();

        let results = rtree.nearest_neighbors(0.0, 0.0, 10);
        let ids: Vec<&str> = results.iter().map(|n| n.item.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c", "b"]);
        assert_eq!(results[0].distance, 1.0);
        assert_eq!(results[2].distance, 3.0);
    }

    #[test]
    fn test_knn_sorted_ascending() {
        let mut rtree = RTree::new(4).unwrap();
        for i in 0..50 {
            rtree.insert(i.to_string(), (i * 3 % 17) as f64, (i * 7 % 23) as f64, ()).unwrap();
        }

        let results = rtree.nearest_neighbors(8.0, 11.0, 12);
        assert_eq!(results.len(), 12);
        assert!(results.windows(2).all(|w| w[0].distance <= w[1].distance));
    }

    #[test]
    fn test_knn_matches_brute_force_top5() {
        let mut rng = StdRng::seed_from_u64(2024);
        let mut rtree = RTree::new(4).unwrap();
        let mut points = Vec::new();
        for i in 0..100 {
            let x: f64 = rng.gen_range(0.0..1000.0);
            let y: f64 = rng.gen_range(0.0..1000.0);
            rtree.insert(format!("eq-{}", i), x, y, i).unwrap();
            points.push((format!("eq-{}", i), Point::new(x, y)));
        }

        let query = Point::new(500.0, 500.0);
        let results = rtree.nearest_neighbors(query.x, query.y, 5);
        assert_eq!(results.len(), 5);
        assert_eq!(sorted_ids(&results), brute_force(&points, &query, 5));
    }

    #[test]
    fn test_knn_matches_brute_force_random_queries() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut rtree = RTree::new(6).unwrap();
        let mut points = Vec::new();
        for i in 0..600 {
            let x: f64 = rng.gen_range(-200.0..200.0);
            let y: f64 = rng.gen_range(-200.0..200.0);
            rtree.insert(i.to_string(), x, y, ()).unwrap();
            points.push((i.to_string(), Point::new(x, y)));
        }

        for _ in 0..40 {
            let query = Point::new(rng.gen_range(-250.0..250.0), rng.gen_range(-250.0..250.0));
            let k = rng.gen_range(1..30);
            let results = rtree.nearest_neighbors(query.x, query.y, k);
            assert_eq!(sorted_ids(&results), brute_force(&points, &query, k));
        }
    }

    #[test]
    fn test_knn_non_finite_query() {
        let mut rtree = RTree::new(4).unwrap();
        rtree.insert("a", 1.0, 1.0, ()).unwrap();
        assert!(rtree.nearest_neighbors(f64::NAN, 1.0, 1).is_empty());
    }

    #[test]
    fn test_knn_with_filter() {
        let mut rtree = RTree::new(4).unwrap();
        for i in 0..40 {
            let kind = if i % 4 == 0 { "pump" } else { "valve" };
            rtree.insert(i.to_string(), i as f64, 0.0, kind).unwrap();
        }

        let results = rtree.nearest_neighbors_where(13.0, 0.0, 3, |item| item.payload == "pump");
        let ids: Vec<&str> = results.iter().map(|n| n.item.id.as_str()).collect();
        assert_eq!(ids, vec!["12", "16", "8"]);

        let none = rtree.nearest_neighbors_where(13.0, 0.0, 3, |item| item.payload == "fan");
        assert!(none.is_empty());
    }

    #[test]
    fn test_offer_keeps_k_smallest() {
        let items: Vec<Item<()>> = (0..5).map(|i| Item::new(i.to_string(), 0.0, 0.0, ())).collect();
        let mut results = Vec::new();
        for (item, distance) in items.iter().zip([5.0, 1.0, 4.0, 2.0, 3.0]) {
            offer(&mut results, 3, Neighbor { item, distance });
        }

        let distances: Vec<f64> = results.iter().map(|n| n.distance).collect();
        assert_eq!(distances, vec![1.0, 2.0, 3.0]);
    }
}
