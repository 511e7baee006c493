//! Cancellable one-shot timers
//!
//! Every delayed action in the shell (toast auto-dismiss, post-logout
//! redirect) goes through [`Scheduler`] so it can be cancelled by handle and
//! driven by a virtual clock in tests.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// Opaque handle for a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

pub type Task = Box<dyn FnOnce()>;

pub trait Scheduler {
    /// Monotonic milliseconds
    fn now_ms(&self) -> f64;

    fn schedule(&self, delay_ms: u32, task: Task) -> TimerHandle;

    /// No-op for handles that already fired or were never issued
    fn cancel(&self, handle: TimerHandle);
}

// =============================================================================
// MANUAL SCHEDULER (virtual clock)
// =============================================================================

struct Scheduled {
    id: u64,
    due: f64,
    task: Task,
}

/// Virtual-clock scheduler; nothing fires until [`ManualScheduler::advance`]
#[derive(Default)]
pub struct ManualScheduler {
    now: Cell<f64>,
    next_id: Cell<u64>,
    queue: RefCell<Vec<Scheduled>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward, firing due tasks in deadline order
    ///
    /// Tasks scheduled by a firing task run in the same call if they fall
    /// inside the window.
    pub fn advance(&self, ms: f64) {
        let target = self.now.get() + ms;
        loop {
            // Borrow is released before the task runs so it can reschedule.
            let next = {
                let mut queue = self.queue.borrow_mut();
                let idx = queue
                    .iter()
                    .enumerate()
                    .filter(|(_, s)| s.due <= target)
                    .min_by(|(_, a), (_, b)| a.due.total_cmp(&b.due).then(a.id.cmp(&b.id)))
                    .map(|(i, _)| i);
                idx.map(|i| queue.remove(i))
            };
            match next {
                Some(scheduled) => {
                    self.now.set(scheduled.due);
                    (scheduled.task)();
                }
                None => break,
            }
        }
        self.now.set(target);
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }
}

impl Scheduler for ManualScheduler {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }

    fn schedule(&self, delay_ms: u32, task: Task) -> TimerHandle {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        self.queue.borrow_mut().push(Scheduled {
            id,
            due: self.now.get() + f64::from(delay_ms),
            task,
        });
        TimerHandle(id)
    }

    fn cancel(&self, handle: TimerHandle) {
        self.queue.borrow_mut().retain(|s| s.id != handle.0);
    }
}

// =============================================================================
// CALLBACK SLOTS (JS closure lifetimes)
// =============================================================================

/// Owns the JS callbacks behind live browser timers
///
/// A callback is never dropped while it may be executing: firing or
/// cancelling only moves it to a retired list, and [`CallbackSlots::sweep`]
/// frees that list once no callback is running.
pub struct CallbackSlots<C> {
    live: RefCell<HashMap<u64, C>>,
    retired: RefCell<Vec<C>>,
    running: Cell<usize>,
}

impl<C> Default for CallbackSlots<C> {
    fn default() -> Self {
        Self {
            live: RefCell::new(HashMap::new()),
            retired: RefCell::new(Vec::new()),
            running: Cell::new(0),
        }
    }
}

impl<C> CallbackSlots<C> {
    pub fn insert(&self, id: u64, callback: C) {
        self.live.borrow_mut().insert(id, callback);
    }

    /// Returns false for ids that already fired or were cancelled
    pub fn retire(&self, id: u64) -> bool {
        let Some(callback) = self.live.borrow_mut().remove(&id) else {
            return false;
        };
        self.retired.borrow_mut().push(callback);
        true
    }

    /// Bracket a callback body; `finish` retires the slot
    pub fn begin(&self) {
        self.running.set(self.running.get() + 1);
    }

    pub fn finish(&self, id: u64) {
        self.running.set(self.running.get().saturating_sub(1));
        self.retire(id);
    }

    pub fn sweep(&self) {
        if self.running.get() > 0 {
            return;
        }
        let retired = std::mem::take(&mut *self.retired.borrow_mut());
        drop(retired);
    }

    pub fn live(&self) -> usize {
        self.live.borrow().len()
    }

    pub fn retired(&self) -> usize {
        self.retired.borrow().len()
    }
}

// =============================================================================
// WEB SCHEDULER (setTimeout / clearTimeout)
// =============================================================================

#[cfg(target_arch = "wasm32")]
pub use web::WebScheduler;

#[cfg(target_arch = "wasm32")]
mod web {
    use super::{CallbackSlots, Scheduler, Task, TimerHandle};
    use std::cell::Cell;
    use std::rc::Rc;
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::JsCast;

    /// Browser timers; `setTimeout` ids are always positive, so 0 marks a failed schedule
    #[derive(Default)]
    pub struct WebScheduler {
        slots: Rc<CallbackSlots<Closure<dyn FnMut()>>>,
    }

    impl Scheduler for WebScheduler {
        fn now_ms(&self) -> f64 {
            web_sys::window()
                .and_then(|w| w.performance())
                .map(|p| p.now())
                .unwrap_or(0.0)
        }

        fn schedule(&self, delay_ms: u32, task: Task) -> TimerHandle {
            self.slots.sweep();

            let Some(window) = web_sys::window() else {
                tracing::error!("schedule: no window");
                return TimerHandle(0);
            };

            let id = Rc::new(Cell::new(0u64));
            let (slots, slot_id) = (self.slots.clone(), id.clone());
            let callback = Closure::once(move || {
                slots.begin();
                task();
                slots.finish(slot_id.get());
            });

            let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
            match window.set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                delay,
            ) {
                Ok(timeout_id) => {
                    id.set(timeout_id as u64);
                    self.slots.insert(timeout_id as u64, callback);
                    TimerHandle(timeout_id as u64)
                }
                Err(e) => {
                    tracing::error!("setTimeout failed: {:?}", e);
                    TimerHandle(0)
                }
            }
        }

        fn cancel(&self, handle: TimerHandle) {
            if handle.0 == 0 {
                return;
            }
            if let Some(window) = web_sys::window() {
                window.clear_timeout_with_handle(handle.0 as i32);
            }
            self.slots.retire(handle.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_fires_only_when_due() {
        let scheduler = ManualScheduler::new();
        let fired = Rc::new(Cell::new(false));
        let flag = fired.clone();
        scheduler.schedule(100, Box::new(move || flag.set(true)));

        scheduler.advance(99.0);
        assert!(!fired.get());
        scheduler.advance(1.0);
        assert!(fired.get());
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_cancel_prevents_fire() {
        let scheduler = ManualScheduler::new();
        let fired = Rc::new(Cell::new(false));
        let flag = fired.clone();
        let handle = scheduler.schedule(10, Box::new(move || flag.set(true)));

        scheduler.cancel(handle);
        scheduler.advance(50.0);
        assert!(!fired.get());

        // Cancelling again is harmless
        scheduler.cancel(handle);
    }

    #[test]
    fn test_fires_in_deadline_then_schedule_order() {
        let scheduler = ManualScheduler::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        for (delay, tag) in [(30, "c"), (10, "a"), (10, "b")] {
            let order = order.clone();
            scheduler.schedule(delay, Box::new(move || order.borrow_mut().push(tag)));
        }

        scheduler.advance(100.0);
        assert_eq!(*order.borrow(), vec!["a", "b", "c"]);
        assert_eq!(scheduler.now_ms(), 100.0);
    }

    /// Counts drops of the value it wraps
    struct Tracked(Rc<Cell<u32>>);

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn test_cancelled_callback_is_freed_on_sweep() {
        let slots = CallbackSlots::default();
        let drops = Rc::new(Cell::new(0));
        slots.insert(7, Tracked(drops.clone()));

        assert!(slots.retire(7));
        assert!(!slots.retire(7));
        assert_eq!(slots.live(), 0);
        assert_eq!(drops.get(), 0);

        slots.sweep();
        assert_eq!(slots.retired(), 0);
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn test_fired_callback_survives_until_it_returns() {
        let slots = CallbackSlots::default();
        let drops = Rc::new(Cell::new(0));
        slots.insert(1, Tracked(drops.clone()));
        slots.insert(2, Tracked(drops.clone()));

        // Timer 1 firing cancels timer 2 and schedules again (sweep)
        slots.begin();
        slots.retire(2);
        slots.sweep();
        assert_eq!(drops.get(), 0);
        slots.finish(1);

        slots.sweep();
        assert_eq!(drops.get(), 2);
        assert_eq!(slots.live(), 0);
    }

    #[test]
    fn test_task_can_schedule_followup() {
        let scheduler = Rc::new(ManualScheduler::new());
        let fired = Rc::new(Cell::new(0u32));

        let inner_scheduler = scheduler.clone();
        let inner_fired = fired.clone();
        scheduler.schedule(
            10,
            Box::new(move || {
                inner_fired.set(inner_fired.get() + 1);
                let f = inner_fired.clone();
                inner_scheduler.schedule(10, Box::new(move || f.set(f.get() + 1)));
            }),
        );

        scheduler.advance(25.0);
        assert_eq!(fired.get(), 2);
    }
}
