//! Global scroll/wheel input fan-out
//!
//! Raw input is captured once per page and broadcast as `LiftInput` messages
//! to every live scene. Scenes register weakly; dropping a scene is enough to
//! unregister it. Each scene applies its own guards when it receives a message.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// One raw vertical input sample
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LiftInput {
    /// Pixels; positive values scroll the page down
    pub delta_y: f32,
    /// Timestamp in ms on the scene clock
    pub now: f64,
}

/// Anything that consumes lift input
pub trait LiftSink {
    fn on_lift_input(&mut self, input: LiftInput);
}

/// Turns absolute page scroll offsets into deltas
#[derive(Clone, Debug, Default)]
pub struct ScrollTracker {
    last_y: f32,
}

impl ScrollTracker {
    pub fn new(initial_y: f32) -> Self {
        Self { last_y: initial_y }
    }

    pub fn delta(&mut self, y: f32) -> f32 {
        let dy = y - self.last_y;
        self.last_y = y;
        dy
    }
}

pub struct InputDispatcher<S> {
    sinks: Vec<Weak<RefCell<S>>>,
    scroll: ScrollTracker,
}

impl<S: LiftSink> InputDispatcher<S> {
    pub fn new(initial_scroll_y: f32) -> Self {
        Self { sinks: Vec::new(), scroll: ScrollTracker::new(initial_scroll_y) }
    }

    pub fn register(&mut self, sink: &Rc<RefCell<S>>) {
        self.sinks.push(Rc::downgrade(sink));
    }

    /// Live registrations after pruning dropped sinks
    pub fn live_count(&mut self) -> usize {
        self.prune();
        self.sinks.len()
    }

    /// Deliver one message to every live sink. Returns how many received it.
    pub fn dispatch(&mut self, input: LiftInput) -> usize {
        self.prune();
        let mut delivered = 0;
        for sink in self.sinks.iter().filter_map(Weak::upgrade) {
            // a sink already borrowed is mid-callback; it misses this sample
            if let Ok(mut s) = sink.try_borrow_mut() {
                s.on_lift_input(input);
                delivered += 1;
            }
        }
        delivered
    }

    /// Page scroll position changed
    pub fn on_scroll(&mut self, scroll_y: f32, now: f64) -> usize {
        let delta_y = self.scroll.delta(scroll_y);
        self.dispatch(LiftInput { delta_y, now })
    }

    pub fn on_wheel(&mut self, delta_y: f32, now: f64) -> usize {
        let delta_y = if delta_y.is_finite() { delta_y } else { 0.0 };
        self.dispatch(LiftInput { delta_y, now })
    }

    fn prune(&mut self) {
        self.sinks.retain(|w| w.strong_count() > 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        seen: Vec<LiftInput>,
    }

    impl LiftSink for Recorder {
        fn on_lift_input(&mut self, input: LiftInput) {
            self.seen.push(input);
        }
    }

    #[test]
    fn scroll_positions_become_deltas() {
        let mut t = ScrollTracker::new(100.0);
        assert_eq!(t.delta(130.0), 30.0);
        assert_eq!(t.delta(120.0), -10.0);
    }

    #[test]
    fn every_live_sink_gets_the_same_message() {
        let a = Rc::new(RefCell::new(Recorder::default()));
        let b = Rc::new(RefCell::new(Recorder::default()));
        let mut d = InputDispatcher::new(0.0);
        d.register(&a);
        d.register(&b);
        assert_eq!(d.on_scroll(40.0, 1.0), 2);
        assert_eq!(d.on_wheel(12.0, 2.0), 2);
        assert_eq!(a.borrow().seen, b.borrow().seen);
        assert_eq!(a.borrow().seen[0], LiftInput { delta_y: 40.0, now: 1.0 });
        assert_eq!(a.borrow().seen[1].delta_y, 12.0);
    }

    #[test]
    fn dropped_sinks_are_pruned() {
        let a = Rc::new(RefCell::new(Recorder::default()));
        let mut d = InputDispatcher::new(0.0);
        d.register(&a);
        {
            let b = Rc::new(RefCell::new(Recorder::default()));
            d.register(&b);
            assert_eq!(d.live_count(), 2);
        }
        assert_eq!(d.on_wheel(5.0, 0.0), 1);
        assert_eq!(d.live_count(), 1);
    }

    #[test]
    fn non_finite_wheel_delta_becomes_zero() {
        let a = Rc::new(RefCell::new(Recorder::default()));
        let mut d = InputDispatcher::new(0.0);
        d.register(&a);
        d.on_wheel(f32::NAN, 0.0);
        assert_eq!(a.borrow().seen[0].delta_y, 0.0);
    }
}
