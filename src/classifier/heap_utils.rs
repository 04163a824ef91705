//! This module contains utility structures for keeping the k nearest training samples using a binary heap.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use ordered_float::OrderedFloat; // For using f64 in BinaryHeap

/// Represents an element in the KBestNeighbors heap, pairing a distance with data.
///
/// `rank` is the insertion position; it breaks distance ties so that the
/// earlier training sample is considered nearer.
#[derive(Debug)]
pub struct HeapElement<P> {
    pub distance: OrderedFloat<f64>,
    pub rank: usize,
    pub data: P,
}

impl<P> PartialEq for HeapElement<P> {
    fn eq(&self, other: &Self) -> bool {
        self.distance == other.distance && self.rank == other.rank
    }
}
impl<P> Eq for HeapElement<P> {}

impl<P> PartialOrd for HeapElement<P> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<P> Ord for HeapElement<P> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Max-heap: the farthest (then latest) neighbour sits on top and is evicted first.
        self.distance
            .cmp(&other.distance)
            .then_with(|| self.rank.cmp(&other.rank))
    }
}

/// Manages a collection of the K nearest items seen so far.
#[derive(Debug)]
pub struct KBestNeighbors<P> {
    capacity: usize,
    inserted: usize,
    heap: BinaryHeap<HeapElement<P>>,
}

impl<P> KBestNeighbors<P> {
    pub fn new(capacity: usize) -> Self {
        KBestNeighbors {
            capacity,
            inserted: 0,
            heap: BinaryHeap::with_capacity(capacity + 1),
        }
    }

    pub fn add(&mut self, distance: f64, point_data: P) {
        if self.capacity == 0 {
            return;
        }
        let item = HeapElement {
            distance: OrderedFloat(distance),
            rank: self.inserted,
            data: point_data,
        };
        self.inserted += 1;
        if self.heap.len() < self.capacity {
            self.heap.push(item);
        } else if let Some(farthest) = self.heap.peek() {
            if item < *farthest {
                self.heap.pop();
                self.heap.push(item);
            }
        }
    }

    /// Nearest first.
    pub fn into_sorted_points(self) -> Vec<P> {
        self.heap.into_sorted_vec().into_iter().map(|elem| elem.data).collect()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
