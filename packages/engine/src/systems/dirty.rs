//! Dirty tracking: last sampled transform per body
//!
//! The snapshot of a body only moves forward when the body moved beyond the
//! epsilons, so slow drift still accumulates into a redraw eventually.

use std::collections::HashMap;
use std::hash::Hash;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformSnapshot {
    pub x: f32,
    pub y: f32,
    pub angle: f32,
}

#[derive(Clone, Debug)]
pub struct DirtyTracker<K> {
    eps_pos: f32,
    eps_ang: f32,
    last: HashMap<K, TransformSnapshot>,
}

impl<K: Eq + Hash + Copy> DirtyTracker<K> {
    pub fn new(eps_pos: f32, eps_ang: f32) -> Self {
        Self { eps_pos, eps_ang, last: HashMap::new() }
    }

    /// Compare one body against its snapshot. Never-seen bodies are dirty.
    pub fn observe(&mut self, key: K, now: TransformSnapshot) -> bool {
        match self.last.get_mut(&key) {
            None => {
                self.last.insert(key, now);
                true
            }
            Some(prev) => {
                let moved = (now.x - prev.x).abs() > self.eps_pos
                    || (now.y - prev.y).abs() > self.eps_pos
                    || (now.angle - prev.angle).abs() > self.eps_ang;
                if moved {
                    *prev = now;
                }
                moved
            }
        }
    }

    /// Observe every body; true if any of them is dirty. Every body is
    /// visited so each snapshot stays current.
    pub fn observe_all<I>(&mut self, items: I) -> bool
    where
        I: IntoIterator<Item = (K, TransformSnapshot)>,
    {
        items
            .into_iter()
            .fold(false, |dirty, (key, snap)| self.observe(key, snap) || dirty)
    }

    pub fn clear(&mut self) {
        self.last.clear();
    }

    pub fn len(&self) -> usize {
        self.last.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(x: f32, y: f32, angle: f32) -> TransformSnapshot {
        TransformSnapshot { x, y, angle }
    }

    #[test]
    fn first_sample_is_dirty_then_clean() {
        let mut t = DirtyTracker::new(0.2, 0.002);
        assert!(t.observe(1u32, snap(0.0, 0.0, 0.0)));
        assert!(!t.observe(1u32, snap(0.0, 0.0, 0.0)));
        assert!(!t.observe(1u32, snap(0.1, -0.1, 0.001)));
    }

    #[test]
    fn motion_beyond_eps_is_dirty() {
        let mut t = DirtyTracker::new(0.2, 0.002);
        t.observe(1u32, snap(0.0, 0.0, 0.0));
        assert!(t.observe(1u32, snap(0.0, 0.3, 0.0)));
        assert!(t.observe(1u32, snap(0.0, 0.3, 0.01)));
    }

    #[test]
    fn slow_drift_accumulates() {
        let mut t = DirtyTracker::new(0.2, 0.002);
        t.observe(7u32, snap(0.0, 0.0, 0.0));
        assert!(!t.observe(7u32, snap(0.15, 0.0, 0.0)));
        assert!(t.observe(7u32, snap(0.3, 0.0, 0.0)));
    }

    #[test]
    fn observe_all_updates_every_snapshot() {
        let mut t = DirtyTracker::new(0.2, 0.002);
        assert!(t.observe_all([(1u32, snap(0.0, 0.0, 0.0)), (2u32, snap(5.0, 5.0, 0.0))]));
        assert_eq!(t.len(), 2);
        assert!(t.observe_all([(1u32, snap(1.0, 0.0, 0.0)), (2u32, snap(6.0, 5.0, 0.0))]));
        assert!(!t.observe_all([(1u32, snap(1.0, 0.0, 0.0)), (2u32, snap(6.0, 5.0, 0.0))]));
        t.clear();
        assert!(t.is_empty());
    }
}
