use crate::color::Rgba;
use crate::sampler::StampRequest;

/// Smallest capacity allocated on first growth.
pub const MIN_CAPACITY: usize = 16;

/// Consumer of stamps and canvas resets.
///
/// The painter drives one of these both for live input and for history replay.
pub trait StampSink {
    fn append(&mut self, stamp: &StampRequest);

    /// Resets the image buffer to its background.
    fn clear(&mut self);
}

/// Growable parallel-array stamp buffer, drained once per frame.
///
/// Layout matches what the renderer uploads: one array per instance attribute,
/// all indexed by the shared write cursor.
///
/// Invariants:
/// - `len() <= capacity()`
/// - capacity only grows, doubling (minimum [`MIN_CAPACITY`]) when full
/// - growth keeps every written entry at its index
/// - [`reset`](Self::reset) rewinds the cursor and keeps the capacity
#[derive(Debug, Default)]
pub struct StampBatch {
    positions: Vec<[f32; 2]>,
    sizes: Vec<f32>,
    /// `[angle, ratio]`
    shapes: Vec<[f32; 2]>,
    colors: Vec<[f32; 4]>,

    stamp_index: usize,
    stamp_max_count: usize,
}

impl StampBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let mut batch = Self::new();
        if capacity > 0 {
            batch.reallocate(capacity);
        }
        batch
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.stamp_index
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stamp_index == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.stamp_max_count
    }

    /// Writes `stamp` at the cursor, growing first if the batch is full.
    pub fn append(&mut self, stamp: &StampRequest) {
        if self.stamp_index == self.stamp_max_count {
            self.grow();
        }
        let i = self.stamp_index;
        self.positions[i] = [stamp.x, stamp.y];
        self.sizes[i] = stamp.size;
        self.shapes[i] = [stamp.angle, stamp.ratio];
        self.colors[i] = stamp.color.to_array();
        self.stamp_index += 1;
    }

    /// Rewinds the cursor after a draw. Capacity is retained.
    #[inline]
    pub fn reset(&mut self) {
        self.stamp_index = 0;
    }

    /// Reads back the stamp at `index`, if it is live.
    pub fn get(&self, index: usize) -> Option<StampRequest> {
        if index >= self.stamp_index {
            return None;
        }
        let [x, y] = self.positions[index];
        let [angle, ratio] = self.shapes[index];
        let [r, g, b, a] = self.colors[index];
        Some(StampRequest {
            x,
            y,
            size: self.sizes[index],
            angle,
            ratio,
            color: Rgba::new(r, g, b, a),
        })
    }

    // ── live slices for upload ─────────────────────────────────────────────

    #[inline]
    pub fn positions(&self) -> &[[f32; 2]] {
        &self.positions[..self.stamp_index]
    }

    #[inline]
    pub fn sizes(&self) -> &[f32] {
        &self.sizes[..self.stamp_index]
    }

    #[inline]
    pub fn shapes(&self) -> &[[f32; 2]] {
        &self.shapes[..self.stamp_index]
    }

    #[inline]
    pub fn colors(&self) -> &[[f32; 4]] {
        &self.colors[..self.stamp_index]
    }

    fn grow(&mut self) {
        let next = MIN_CAPACITY.max(self.stamp_max_count * 2);
        log::debug!("stamp batch grow {} -> {}", self.stamp_max_count, next);
        self.reallocate(next);
    }

    fn reallocate(&mut self, capacity: usize) {
        let live = self.stamp_index;
        regrow(&mut self.positions, live, capacity);
        regrow(&mut self.sizes, live, capacity);
        regrow(&mut self.shapes, live, capacity);
        regrow(&mut self.colors, live, capacity);
        self.stamp_max_count = capacity;
    }
}

/// Replaces `storage` with a fresh allocation of `capacity`, copying `[0, live)`.
fn regrow<T: Copy + Default>(storage: &mut Vec<T>, live: usize, capacity: usize) {
    let mut next = vec![T::default(); capacity];
    next[..live].copy_from_slice(&storage[..live]);
    *storage = next;
}

impl StampSink for StampBatch {
    fn append(&mut self, stamp: &StampRequest) {
        StampBatch::append(self, stamp);
    }

    fn clear(&mut self) {
        self.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stamp(i: usize) -> StampRequest {
        let f = i as f32;
        StampRequest {
            x: f,
            y: f * 2.0,
            size: 10.0 + f,
            angle: f * 0.01,
            ratio: 1.0 / (1.0 + f),
            color: Rgba::new(f / 100.0, 0.5, 0.25, 1.0),
        }
    }

    #[test]
    fn starts_empty_without_allocation() {
        let b = StampBatch::new();
        assert!(b.is_empty());
        assert_eq!(b.capacity(), 0);
    }

    #[test]
    fn first_append_allocates_minimum() {
        let mut b = StampBatch::new();
        b.append(&stamp(0));
        assert_eq!(b.capacity(), MIN_CAPACITY);
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn seventeen_stamps_grow_once_and_survive() {
        let mut b = StampBatch::new();
        for i in 0..17 {
            b.append(&stamp(i));
        }
        assert_eq!(b.capacity(), 32);
        for i in 0..17 {
            assert_eq!(b.get(i), Some(stamp(i)), "entry {i}");
        }
        assert_eq!(b.get(17), None);
    }

    #[test]
    fn many_grows_preserve_order() {
        let mut b = StampBatch::new();
        for i in 0..1000 {
            b.append(&stamp(i));
            assert!(b.len() <= b.capacity());
        }
        assert_eq!(b.capacity(), 1024);
        assert!((0..1000).all(|i| b.get(i) == Some(stamp(i))));
        assert_eq!(b.positions().len(), 1000);
        assert_eq!(b.positions()[999], [999.0, 1998.0]);
    }

    #[test]
    fn reset_keeps_capacity() {
        let mut b = StampBatch::new();
        for i in 0..40 {
            b.append(&stamp(i));
        }
        b.reset();
        assert!(b.is_empty());
        assert_eq!(b.capacity(), 64);
        assert!(b.sizes().is_empty());

        // Stable count: no further growth.
        for i in 0..40 {
            b.append(&stamp(i));
        }
        assert_eq!(b.capacity(), 64);
    }

    #[test]
    fn with_capacity_preallocates() {
        let mut b = StampBatch::with_capacity(100);
        assert_eq!(b.capacity(), 100);
        for i in 0..101 {
            b.append(&stamp(i));
        }
        assert_eq!(b.capacity(), 200);
        assert_eq!(b.get(100), Some(stamp(100)));
    }

    #[test]
    fn sink_clear_rewinds() {
        let mut b = StampBatch::new();
        StampSink::append(&mut b, &stamp(1));
        StampSink::clear(&mut b);
        assert!(b.is_empty());
    }
}
