//! Run lifecycle and frame-driven tick loop
//!
//! The engine owns the single authoritative `GameState`. A host-provided
//! [`Scheduler`] asks the host for "one more frame"; when that frame fires the
//! host calls [`Engine::tick`]. Every mutation is broadcast to subscribers in
//! emission order.

use std::cell::RefCell;
use std::rc::Rc;

use crate::sim::{GameState, InputState, KeyBindings, TickInput, TickOutcome, tick};

/// Opaque handle for a pending frame request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickHandle(pub i32);

/// Host frame source (requestAnimationFrame, a timer, a test pump...)
///
/// A request must result in exactly one later call to `Engine::tick` unless
/// it is cancelled first.
pub trait Scheduler {
    fn request_tick(&mut self) -> TickHandle;
    fn cancel_tick(&mut self, handle: TickHandle);
}

#[derive(Debug, Default)]
struct ManualQueue {
    pending: Option<TickHandle>,
    next_id: i32,
}

/// Scheduler pumped by hand (tests, headless runs)
///
/// Clones share one queue: give one clone to the engine and keep another to
/// fire frames.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    queue: Rc<RefCell<ManualQueue>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a frame has been requested and not yet fired or cancelled
    pub fn pending(&self) -> bool {
        self.queue.borrow().pending.is_some()
    }

    /// Consume the pending request, if any. The caller must then tick the engine.
    pub fn fire(&self) -> bool {
        self.queue.borrow_mut().pending.take().is_some()
    }
}

impl Scheduler for ManualScheduler {
    fn request_tick(&mut self) -> TickHandle {
        let mut q = self.queue.borrow_mut();
        q.next_id += 1;
        let handle = TickHandle(q.next_id);
        q.pending = Some(handle);
        handle
    }

    fn cancel_tick(&mut self, handle: TickHandle) {
        let mut q = self.queue.borrow_mut();
        if q.pending == Some(handle) {
            q.pending = None;
        }
    }
}

/// Identifies a snapshot listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&GameState)>;

/// Simulation engine: lifecycle control plus snapshot broadcast
pub struct Engine {
    state: GameState,
    input: InputState,
    bindings: KeyBindings,
    scheduler: Box<dyn Scheduler>,
    frame: Option<TickHandle>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_listener_id: u64,
}

impl Engine {
    pub fn new(scheduler: impl Scheduler + 'static, bindings: KeyBindings) -> Self {
        Self {
            state: GameState::new(),
            input: InputState::new(),
            bindings,
            scheduler: Box::new(scheduler),
            frame: None,
            listeners: Vec::new(),
            next_listener_id: 1,
        }
    }

    /// Discard the current run and begin a new one
    pub fn start(&mut self) {
        self.cancel_frame();
        self.state = GameState::fresh_run();
        log::info!(
            "Run started: {} platforms, {} coins",
            self.state.platforms.len(),
            self.state.coins.len()
        );
        self.emit();
        self.schedule();
    }

    /// Stop the tick loop, keeping the rest of the state as-is
    pub fn pause(&mut self) {
        if !self.state.running {
            return;
        }
        self.state.running = false;
        self.cancel_frame();
        log::info!("Paused at tick {}", self.state.ticks);
        self.emit();
    }

    /// Re-enter the tick loop after a pause. No-op once the run is over.
    pub fn resume(&mut self) {
        if self.state.running || self.state.game_over {
            return;
        }
        self.state.running = true;
        log::info!("Resumed at tick {}", self.state.ticks);
        self.emit();
        self.schedule();
    }

    /// Advance one frame. Returns true if a snapshot was emitted.
    pub fn tick(&mut self) -> bool {
        // Drop whatever request is outstanding; a fired one cancels as a no-op
        self.cancel_frame();

        let input = TickInput::resolve(&self.input, &self.bindings);
        let outcome = tick(&mut self.state, &input);
        if !outcome.advanced() {
            return false;
        }

        if let TickOutcome::Advanced(report) | TickOutcome::GameOver(report) = outcome {
            if let Some(index) = report.landed_on {
                log::debug!("Landed on platform {index} at tick {}", self.state.ticks);
            }
            if report.coins_collected > 0 {
                log::debug!(
                    "Collected {} coin(s), score {}",
                    report.coins_collected,
                    self.state.score
                );
            }
        }

        self.emit();

        if outcome.is_terminal() {
            log::info!(
                "Game over after {} ticks, score {}",
                self.state.ticks,
                self.state.score
            );
        } else {
            self.schedule();
        }
        true
    }

    /// Latest emitted state
    pub fn current_state(&self) -> &GameState {
        &self.state
    }

    /// Owned copy of the latest emitted state
    pub fn snapshot(&self) -> GameState {
        self.state.clone()
    }

    /// Register a listener for every future emission (no replay)
    pub fn subscribe(&mut self, listener: impl FnMut(&GameState) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_listener_id);
        self.next_listener_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    pub fn key_down(&mut self, key: &str) {
        self.input.key_down(key);
    }

    pub fn key_up(&mut self, key: &str) {
        self.input.key_up(key);
    }

    pub fn release_keys(&mut self) {
        self.input.release_all();
    }

    fn emit(&mut self) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(&self.state);
        }
    }

    fn schedule(&mut self) {
        self.frame = Some(self.scheduler.request_tick());
    }

    fn cancel_frame(&mut self) {
        if let Some(handle) = self.frame.take() {
            self.scheduler.cancel_tick(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    fn engine() -> (Engine, ManualScheduler) {
        let scheduler = ManualScheduler::new();
        let engine = Engine::new(scheduler.clone(), KeyBindings::default());
        (engine, scheduler)
    }

    /// Collect every emitted snapshot
    fn record(engine: &mut Engine) -> Rc<RefCell<Vec<GameState>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        engine.subscribe(move |s| sink.borrow_mut().push(s.clone()));
        seen
    }

    /// Fire frames until the loop stops or `max` frames have run
    fn pump(engine: &mut Engine, scheduler: &ManualScheduler, max: usize) -> usize {
        let mut frames = 0;
        while frames < max && scheduler.fire() {
            engine.tick();
            frames += 1;
        }
        frames
    }

    #[test]
    fn test_start_emits_fresh_state_and_schedules() {
        let (mut engine, scheduler) = engine();
        let seen = record(&mut engine);
        assert!(!scheduler.pending());

        engine.start();
        assert!(scheduler.pending());
        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        let s = &seen[0];
        assert!(s.running && !s.game_over);
        assert_eq!(s.score, 0);
        assert_eq!(s.player_x, 100.0);
        assert_eq!(s.player_y, 450.0);
        assert_eq!(s.platforms.len(), 6);
        assert_eq!(s.coins.len(), 7);
        assert!(s.coins.iter().all(|c| !c.collected));
    }

    #[test]
    fn test_falls_onto_ground() {
        let (mut engine, scheduler) = engine();
        engine.start();
        pump(&mut engine, &scheduler, 60);
        let state = engine.current_state();
        assert_eq!(state.player_y, 520.0);
        assert_eq!(state.velocity_y, 0.0);
        assert!(state.running);
    }

    #[test]
    fn test_one_emission_per_active_tick() {
        let (mut engine, scheduler) = engine();
        let seen = record(&mut engine);

        // Idle engine: tick is a no-op
        assert!(!engine.tick());
        assert!(seen.borrow().is_empty());

        engine.start();
        let frames = pump(&mut engine, &scheduler, 25);
        assert_eq!(frames, 25);
        assert_eq!(seen.borrow().len(), 1 + 25);
        assert_eq!(engine.current_state().ticks, 25);
    }

    #[test]
    fn test_pause_halts_loop() {
        let (mut engine, scheduler) = engine();
        let seen = record(&mut engine);
        engine.start();
        pump(&mut engine, &scheduler, 5);

        engine.pause();
        assert!(!scheduler.pending());
        assert!(!engine.current_state().running);
        assert_eq!(seen.borrow().len(), 1 + 5 + 1);

        // Paused engine ignores stray ticks and repeated pauses
        let ticks = engine.current_state().ticks;
        assert!(!engine.tick());
        engine.pause();
        assert_eq!(engine.current_state().ticks, ticks);
        assert_eq!(seen.borrow().len(), 7);
    }

    #[test]
    fn test_resume_continues_run() {
        let (mut engine, scheduler) = engine();
        engine.start();
        pump(&mut engine, &scheduler, 3);
        engine.pause();
        let paused = engine.snapshot();

        engine.resume();
        assert!(scheduler.pending());
        pump(&mut engine, &scheduler, 2);
        let state = engine.current_state();
        assert_eq!(state.ticks, paused.ticks + 2);
        assert_eq!(state.score, paused.score);
    }

    #[test]
    fn test_game_over_stops_emissions() {
        let (mut engine, scheduler) = engine();
        let seen = record(&mut engine);
        engine.start();
        // Nothing to stand on
        engine.state.platforms.clear();

        let frames = pump(&mut engine, &scheduler, 1000);
        assert!(frames < 1000);
        let state = engine.current_state();
        assert!(state.game_over);
        assert!(!state.running);
        assert!(!scheduler.pending());
        assert!(seen.borrow().last().is_some_and(|s| s.game_over));

        let emitted = seen.borrow().len();
        assert!(!engine.tick());
        assert_eq!(seen.borrow().len(), emitted);

        // Resume cannot revive a finished run
        engine.resume();
        assert!(!scheduler.pending());
    }

    #[test]
    fn test_start_discards_previous_run() {
        let (mut engine, scheduler) = engine();
        engine.start();
        engine.state.score = 700;
        engine.state.coins[0].collected = true;
        pump(&mut engine, &scheduler, 3);

        engine.start();
        let state = engine.current_state();
        assert_eq!(state.score, 0);
        assert_eq!(state.ticks, 0);
        assert!(state.coins.iter().all(|c| !c.collected));
        assert!(scheduler.pending());
    }

    /// Tracks requests that were neither fired nor cancelled
    #[derive(Clone, Default)]
    struct CountingScheduler {
        outstanding: Rc<RefCell<Vec<TickHandle>>>,
        next_id: i32,
    }

    impl Scheduler for CountingScheduler {
        fn request_tick(&mut self) -> TickHandle {
            self.next_id += 1;
            let handle = TickHandle(self.next_id);
            self.outstanding.borrow_mut().push(handle);
            handle
        }

        fn cancel_tick(&mut self, handle: TickHandle) {
            self.outstanding.borrow_mut().retain(|h| *h != handle);
        }
    }

    #[test]
    fn test_direct_ticks_keep_one_frame_outstanding() {
        let scheduler = CountingScheduler::default();
        let outstanding = scheduler.outstanding.clone();
        let mut engine = Engine::new(scheduler, KeyBindings::default());

        engine.start();
        assert_eq!(outstanding.borrow().len(), 1);
        assert!(engine.tick());
        assert!(engine.tick());
        assert_eq!(outstanding.borrow().len(), 1);

        // Restarting mid-run replaces the request instead of adding one
        engine.start();
        assert_eq!(outstanding.borrow().len(), 1);

        engine.pause();
        assert!(outstanding.borrow().is_empty());

        engine.resume();
        assert!(engine.tick());
        assert_eq!(outstanding.borrow().len(), 1);
    }

    #[test]
    fn test_late_subscriber_gets_no_history() {
        let (mut engine, scheduler) = engine();
        engine.start();
        pump(&mut engine, &scheduler, 4);

        let seen = record(&mut engine);
        assert!(seen.borrow().is_empty());
        pump(&mut engine, &scheduler, 1);
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(seen.borrow()[0].ticks, 5);
    }

    #[test]
    fn test_unsubscribe() {
        let (mut engine, _scheduler) = engine();
        let count = Rc::new(RefCell::new(0));
        let sink = count.clone();
        let id = engine.subscribe(move |_| *sink.borrow_mut() += 1);
        engine.start();
        assert!(engine.unsubscribe(id));
        assert!(!engine.unsubscribe(id));
        engine.start();
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_held_keys_drive_player() {
        let (mut engine, scheduler) = engine();
        engine.start();
        pump(&mut engine, &scheduler, 20);
        assert_eq!(engine.current_state().player_y, 520.0);

        engine.key_down("ArrowRight");
        pump(&mut engine, &scheduler, 4);
        assert_eq!(engine.current_state().player_x, 120.0);
        engine.key_up("ArrowRight");

        engine.key_down(" ");
        pump(&mut engine, &scheduler, 1);
        let state = engine.current_state();
        assert_eq!(state.velocity_y, JUMP_STRENGTH + GRAVITY);
        assert!(state.player_y < 520.0);

        engine.release_keys();
        pump(&mut engine, &scheduler, 1);
        assert_eq!(engine.current_state().player_x, 120.0);
    }

    #[test]
    fn test_jump_into_ground_coin() {
        let (mut engine, scheduler) = engine();
        engine.start();
        pump(&mut engine, &scheduler, 20);

        // Coin at (400, 500) sits just above a player resting at y=520
        engine.key_down("d");
        pump(&mut engine, &scheduler, 58);
        engine.key_up("d");
        assert_eq!(engine.current_state().player_x, 390.0);
        assert_eq!(engine.current_state().score, 0);

        engine.key_down("w");
        pump(&mut engine, &scheduler, 1);
        let state = engine.current_state();
        assert!(state.coins[5].collected);
        assert_eq!(state.score, COIN_VALUE);
    }
}
