use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo::render::{request_animation_frame, AnimationFrame};

type Tick = Rc<RefCell<dyn FnMut(f64)>>;

/// Repeating `requestAnimationFrame` loop.
///
/// The tick runs once per frame until the handle is dropped. Dropping it
/// cancels the pending frame, and a tick that drops its own handle is not
/// rescheduled.
pub struct FrameLoop {
    pending: Rc<RefCell<Option<AnimationFrame>>>,
    alive: Rc<Cell<bool>>,
}

impl FrameLoop {
    pub fn start(tick: impl FnMut(f64) + 'static) -> Self {
        let pending = Rc::new(RefCell::new(None));
        let alive = Rc::new(Cell::new(true));
        let tick: Tick = Rc::new(RefCell::new(tick));
        schedule(&pending, &alive, tick);
        Self { pending, alive }
    }

    pub fn is_running(&self) -> bool {
        self.alive.get()
    }
}

fn schedule(pending: &Rc<RefCell<Option<AnimationFrame>>>, alive: &Rc<Cell<bool>>, tick: Tick) {
    let next = Rc::clone(pending);
    let still = Rc::clone(alive);
    let frame = request_animation_frame(move |timestamp| {
        if !still.get() {
            return;
        }
        (*tick.borrow_mut())(timestamp);
        // the tick may have dropped its own handle
        if still.get() {
            schedule(&next, &still, tick);
        }
    });
    *pending.borrow_mut() = Some(frame);
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.alive.set(false);
        self.pending.borrow_mut().take();
    }
}
