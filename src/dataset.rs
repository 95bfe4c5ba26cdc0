//! Datasets with independent per-consumer read cursors.
//!
//! Producers append or replace points; each consumer drains only what it has
//! not seen yet, identified by name. Cursor state survives across calls, so
//! interleaved producers and consumers stay consistent without coordination.

use std::collections::HashMap;

use crate::geom::Point;

/// Unbounded, insertion-ordered point store.
#[derive(Debug, Clone)]
pub struct Dataset {
    name: String,
    points: Vec<Point>,
    cursors: HashMap<String, usize>,
}

impl Dataset {
    /// Create an empty dataset.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            points: Vec::new(),
            cursors: HashMap::new(),
        }
    }

    /// Access the dataset name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a point.
    pub fn push(&mut self, point: Point) {
        self.points.push(point);
    }

    /// Replace the entire backing store.
    ///
    /// Cursors are left untouched; a consumer ahead of the new length sees
    /// nothing until the store regrows past its cursor.
    pub fn set(&mut self, points: Vec<Point>) {
        self.points = points;
    }

    /// Empty the store and zero all cursors.
    pub fn clear(&mut self) {
        self.points.clear();
        for cursor in self.cursors.values_mut() {
            *cursor = 0;
        }
    }

    /// Number of stored points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Access all stored points.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Zero one consumer's cursor.
    pub fn reset_cursor(&mut self, consumer: &str) {
        self.cursors.insert(consumer.to_string(), 0);
    }

    /// Current cursor of a consumer.
    pub fn cursor(&self, consumer: &str) -> usize {
        self.cursors.get(consumer).copied().unwrap_or(0)
    }

    /// Drain points the named consumer has not seen, advancing its cursor
    /// as each point is yielded.
    pub fn drain_new(&mut self, consumer: &str) -> DrainNew<'_> {
        let cursor = self.cursors.entry(consumer.to_string()).or_insert(0);
        DrainNew {
            points: &self.points,
            cursor,
        }
    }

    /// Drain the full current content, leaving the cursor at the end.
    pub fn replay(&mut self, consumer: &str) -> DrainNew<'_> {
        self.reset_cursor(consumer);
        self.drain_new(consumer)
    }
}

/// Iterator over a [`Dataset`]'s unseen points for one consumer.
#[derive(Debug)]
pub struct DrainNew<'a> {
    points: &'a [Point],
    cursor: &'a mut usize,
}

impl Iterator for DrainNew<'_> {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        let point = self.points.get(*self.cursor).copied()?;
        *self.cursor += 1;
        Some(point)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.points.len().saturating_sub(*self.cursor);
        (remaining, Some(remaining))
    }
}

/// Bounded point store that overwrites the oldest entry once full.
///
/// Pushes are counted monotonically; logical index `i` lives in slot
/// `i % capacity`, which makes wraparound cursor arithmetic exact. Reads
/// always yield the retained window oldest to newest, and a cursor that has
/// fallen behind the window clamps to the oldest retained entry.
#[derive(Debug, Clone)]
pub struct RingDataset {
    name: String,
    slots: Vec<Point>,
    capacity: usize,
    total: u64,
    cursors: HashMap<String, u64>,
}

impl RingDataset {
    /// Create an empty ring with the given capacity.
    pub fn new(name: impl Into<String>, capacity: usize) -> Self {
        assert!(capacity > 0, "ring dataset capacity must be non-zero");
        Self {
            name: name.into(),
            slots: Vec::with_capacity(capacity),
            capacity,
            total: 0,
            cursors: HashMap::new(),
        }
    }

    /// Access the dataset name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Maximum number of retained points.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of retained points.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check whether nothing is retained.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Append a point, overwriting the oldest once full.
    pub fn push(&mut self, point: Point) {
        if self.slots.len() < self.capacity {
            self.slots.push(point);
        } else {
            let slot = (self.total % self.capacity as u64) as usize;
            self.slots[slot] = point;
        }
        self.total += 1;
    }

    /// Replace the contents, keeping only the most recent `capacity` points
    /// in their original relative order.
    pub fn set(&mut self, points: Vec<Point>) {
        let skip = points.len().saturating_sub(self.capacity);
        self.slots.clear();
        self.slots.extend(points.into_iter().skip(skip));
        self.total = self.slots.len() as u64;
    }

    /// Empty the store and zero all cursors.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.total = 0;
        for cursor in self.cursors.values_mut() {
            *cursor = 0;
        }
    }

    /// Zero one consumer's cursor.
    pub fn reset_cursor(&mut self, consumer: &str) {
        self.cursors.insert(consumer.to_string(), 0);
    }

    /// Drain points the named consumer has not seen, oldest first,
    /// advancing its cursor as each point is yielded.
    pub fn drain_new(&mut self, consumer: &str) -> RingDrain<'_> {
        let oldest = self.total - self.slots.len() as u64;
        let cursor = self.cursors.entry(consumer.to_string()).or_insert(0);
        if *cursor < oldest {
            *cursor = oldest;
        }
        RingDrain {
            slots: &self.slots,
            capacity: self.capacity as u64,
            end: self.total,
            cursor,
        }
    }

    /// Drain the full retained window, leaving the cursor at the end.
    pub fn replay(&mut self, consumer: &str) -> RingDrain<'_> {
        self.reset_cursor(consumer);
        self.drain_new(consumer)
    }
}

/// Iterator over a [`RingDataset`]'s unseen points for one consumer.
#[derive(Debug)]
pub struct RingDrain<'a> {
    slots: &'a [Point],
    capacity: u64,
    end: u64,
    cursor: &'a mut u64,
}

impl Iterator for RingDrain<'_> {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if *self.cursor >= self.end {
            return None;
        }
        let slot = (*self.cursor % self.capacity) as usize;
        let point = self.slots[slot];
        *self.cursor += 1;
        Some(point)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end.saturating_sub(*self.cursor) as usize;
        (remaining, Some(remaining))
    }
}

/// Either dataset variant behind one name-keyed API.
#[derive(Debug, Clone)]
pub enum DataStore {
    /// Unbounded dataset.
    Unbounded(Dataset),
    /// Bounded ring dataset.
    Ring(RingDataset),
}

impl DataStore {
    /// Create an unbounded store.
    pub fn unbounded(name: impl Into<String>) -> Self {
        Self::Unbounded(Dataset::new(name))
    }

    /// Create a ring store with the given capacity.
    pub fn ring(name: impl Into<String>, capacity: usize) -> Self {
        Self::Ring(RingDataset::new(name, capacity))
    }

    /// Access the dataset name.
    pub fn name(&self) -> &str {
        match self {
            Self::Unbounded(dataset) => dataset.name(),
            Self::Ring(ring) => ring.name(),
        }
    }

    /// Append a point.
    pub fn push(&mut self, point: Point) {
        match self {
            Self::Unbounded(dataset) => dataset.push(point),
            Self::Ring(ring) => ring.push(point),
        }
    }

    /// Replace the contents.
    pub fn set(&mut self, points: Vec<Point>) {
        match self {
            Self::Unbounded(dataset) => dataset.set(points),
            Self::Ring(ring) => ring.set(points),
        }
    }

    /// Empty the store and zero all cursors.
    pub fn clear(&mut self) {
        match self {
            Self::Unbounded(dataset) => dataset.clear(),
            Self::Ring(ring) => ring.clear(),
        }
    }

    /// Number of retained points.
    pub fn len(&self) -> usize {
        match self {
            Self::Unbounded(dataset) => dataset.len(),
            Self::Ring(ring) => ring.len(),
        }
    }

    /// Check whether nothing is retained.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Zero one consumer's cursor.
    pub fn reset_cursor(&mut self, consumer: &str) {
        match self {
            Self::Unbounded(dataset) => dataset.reset_cursor(consumer),
            Self::Ring(ring) => ring.reset_cursor(consumer),
        }
    }

    /// Drain points the named consumer has not seen.
    pub fn drain_new(&mut self, consumer: &str) -> NewPoints<'_> {
        match self {
            Self::Unbounded(dataset) => NewPoints::Unbounded(dataset.drain_new(consumer)),
            Self::Ring(ring) => NewPoints::Ring(ring.drain_new(consumer)),
        }
    }

    /// Drain the full retained content, leaving the cursor at the end.
    pub fn replay(&mut self, consumer: &str) -> NewPoints<'_> {
        self.reset_cursor(consumer);
        self.drain_new(consumer)
    }
}

impl From<Dataset> for DataStore {
    fn from(dataset: Dataset) -> Self {
        Self::Unbounded(dataset)
    }
}

impl From<RingDataset> for DataStore {
    fn from(ring: RingDataset) -> Self {
        Self::Ring(ring)
    }
}

/// Iterator over a [`DataStore`]'s unseen points for one consumer.
#[derive(Debug)]
pub enum NewPoints<'a> {
    /// Drain from an unbounded dataset.
    Unbounded(DrainNew<'a>),
    /// Drain from a ring dataset.
    Ring(RingDrain<'a>),
}

impl Iterator for NewPoints<'_> {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        match self {
            Self::Unbounded(drain) => drain.next(),
            Self::Ring(drain) => drain.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Self::Unbounded(drain) => drain.size_hint(),
            Self::Ring(drain) => drain.size_hint(),
        }
    }
}
