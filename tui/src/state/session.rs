use std::sync::Arc;

use neural_playground::{
    dataset::XOR_LEN,
    inspect::{Element, NodeId},
    progress::{Progress, TOTAL_LESSONS},
    Controller, Snapshot,
};
use parking_lot::Mutex;
use tokio::sync::watch;

use super::model::{LogLine, SessionView};

const MAX_LOGS: usize = 200;

/// Learning rate change per key press.
pub const LEARNING_RATE_STEP: f64 = 0.05;
/// Speed change per key press.
pub const SPEED_STEP: i16 = 5;

/// Drives the TUI state from the controller's snapshot channel and forwards
/// key presses to the controller.
pub struct SessionState {
    controller: Controller,
    snapshots: watch::Receiver<Snapshot>,
    progress: Arc<Mutex<Progress>>,
    log_every: u64,
    view: SessionView,
}

impl SessionState {
    /// Creates a new `SessionState`.
    ///
    /// # Args
    /// * `controller` - The controller owning the trainer.
    /// * `progress` - The tutorial progress the trainer reports into.
    /// * `log_every` - How many epochs apart the progress log lines are.
    pub fn new(controller: Controller, progress: Arc<Mutex<Progress>>, log_every: u64) -> Self {
        let snapshots = controller.subscribe();
        let snapshot = snapshots.borrow().clone();

        let view = SessionView {
            snapshot,
            example: XOR_LEN - 1,
            inspected: Element::Node(NodeId::Output),
            lessons_completed: progress.lock().completed_count(),
            lessons_total: TOTAL_LESSONS,
            logs: vec![LogLine {
                level: "INFO",
                message: "press space to start training".into(),
            }],
        };

        Self {
            controller,
            snapshots,
            progress,
            log_every: log_every.max(1),
            view,
        }
    }

    /// Returns the current view for rendering.
    pub fn view(&self) -> &SessionView {
        &self.view
    }

    pub fn progress(&self) -> &Arc<Mutex<Progress>> {
        &self.progress
    }

    /// Picks up the latest snapshot, if any. Non-blocking.
    ///
    /// Should be called once per TUI frame tick.
    pub fn tick(&mut self) {
        if !self.snapshots.has_changed().unwrap_or(false) {
            return;
        }

        let snapshot = self.snapshots.borrow_and_update().clone();
        self.apply(snapshot);
    }

    fn apply(&mut self, next: Snapshot) {
        let prev = &self.view.snapshot;
        let mut logs = Vec::new();

        if next.state.epoch == 0 && prev.state.epoch > 0 {
            logs.push(("INFO", "network reset with fresh random weights".to_string()));
        }

        if next.running != prev.running {
            let what = if next.running { "started" } else { "paused" };
            logs.push(("INFO", format!("training {what} at epoch {}", next.state.epoch)));
        }

        if next.state.epoch / self.log_every > prev.state.epoch / self.log_every {
            logs.push((
                "INFO",
                format!(
                    "epoch {}: loss={:.4} correct={}/{XOR_LEN}",
                    next.state.epoch,
                    next.state.total_loss,
                    next.state.correct_count()
                ),
            ));
        }

        if next.state.converged && !prev.state.converged {
            logs.push((
                "INFO",
                format!("converged at epoch {}, every prediction is right", next.state.epoch),
            ));
        }

        if !next.state.total_loss.is_finite() && prev.state.total_loss.is_finite() {
            logs.push(("WARN", "loss is no longer finite, try a lower learning rate".to_string()));
        }

        self.view.snapshot = next;
        self.view.lessons_completed = self.progress.lock().completed_count();
        for (level, message) in logs {
            self.push_log(level, message);
        }
    }

    pub fn toggle(&self) {
        self.controller.toggle();
    }

    pub fn pause(&self) {
        self.controller.pause();
    }

    pub fn step(&self) {
        self.controller.step();
    }

    pub fn reset(&self) {
        self.controller.reset();
    }

    /// Moves the learning rate by `delta`, the controller clamps it.
    pub fn nudge_learning_rate(&self, delta: f64) {
        let lr = self.controller.snapshot().learning_rate;
        self.controller.set_learning_rate(lr + delta);
    }

    pub fn nudge_speed(&self, delta: i16) {
        let speed = self.controller.snapshot().speed;
        self.controller.set_speed(speed.nudge(delta));
    }

    /// Shows the forward pass of the `i`-th XOR example, ignoring out of range values.
    pub fn select_example(&mut self, i: usize) {
        if i < XOR_LEN {
            self.view.example = i;
        }
    }

    /// Moves the inspector `offset` elements forward, wrapping around.
    pub fn inspect_next(&mut self, offset: isize) {
        let all = Element::all(self.view.snapshot.params.hidden_units());
        let len = all.len() as isize;
        let current = all
            .iter()
            .position(|e| *e == self.view.inspected)
            .unwrap_or(0) as isize;

        let next = (current + offset).rem_euclid(len);
        self.view.inspected = all[next as usize];
    }

    /// Clears the tutorial progress.
    pub fn reset_progress(&mut self) {
        self.progress.lock().reset_progress();
        self.view.lessons_completed = 0;
        self.push_log("INFO", "tutorial progress cleared".into());
    }

    fn push_log(&mut self, level: &'static str, message: String) {
        self.view.logs.push(LogLine { level, message });
        if self.view.logs.len() > MAX_LOGS {
            let drain = self.view.logs.len() - MAX_LOGS;
            self.view.logs.drain(0..drain);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{num::NonZeroUsize, time::Duration};

    use neural_playground::{
        inspect::EdgeId,
        progress::{StepTracker, TRAINING_LESSON},
        training::DEFAULT_MIN_INTERVAL,
        Speed, Trainer,
    };
    use rand::{rngs::StdRng, SeedableRng};
    use tokio::runtime::Handle;

    use super::*;

    fn session() -> SessionState {
        session_logging_every(500)
    }

    fn session_logging_every(log_every: u64) -> SessionState {
        let progress = Arc::new(Mutex::new(Progress::new()));
        let trainer = Trainer::new(NonZeroUsize::new(2).unwrap(), 0.5, StdRng::seed_from_u64(1))
            .with_completion(StepTracker::new(progress.clone(), TRAINING_LESSON));
        let controller = Controller::new(
            trainer,
            Speed::default(),
            DEFAULT_MIN_INTERVAL,
            Handle::current(),
        );

        SessionState::new(controller, progress, log_every)
    }

    #[tokio::test(start_paused = true)]
    async fn tick_picks_up_steps() {
        let mut s = session();
        s.step();
        s.step();
        s.tick();

        assert_eq!(s.view().snapshot.state.epoch, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn logs_lifecycle() {
        let mut s = session();
        s.toggle();
        s.tick();
        tokio::time::sleep(Duration::from_millis(100)).await;
        s.tick();
        assert!(s.view().snapshot.state.epoch > 0);
        s.reset();
        s.tick();

        let messages: Vec<_> = s.view().logs.iter().map(|l| l.message.as_str()).collect();
        assert!(messages.iter().any(|m| m.starts_with("training started")));
        assert!(messages.iter().any(|m| m.starts_with("network reset")));
        assert!(!s.view().snapshot.running);
    }

    #[tokio::test(start_paused = true)]
    async fn nudges_are_clamped() {
        let mut s = session();
        for _ in 0..100 {
            s.nudge_learning_rate(LEARNING_RATE_STEP);
            s.nudge_speed(SPEED_STEP);
        }
        s.tick();

        assert_eq!(s.view().snapshot.learning_rate, 2.);
        assert_eq!(s.view().snapshot.speed, Speed::MAX);
    }

    #[tokio::test(start_paused = true)]
    async fn inspector_wraps() {
        let mut s = session();
        assert_eq!(s.view().inspected, Element::Node(NodeId::Output));

        s.inspect_next(-1);
        assert_eq!(s.view().inspected, Element::Node(NodeId::Hidden(1)));

        // 2 inputs, 2 hidden and the output, then 4 + 2 edges.
        s.inspect_next(7);
        assert_eq!(s.view().inspected, Element::Edge(EdgeId::HiddenOutput { hidden: 1 }));
        s.inspect_next(1);
        assert_eq!(s.view().inspected, Element::Node(NodeId::Input(0)));
    }

    #[tokio::test(start_paused = true)]
    async fn example_selection() {
        let mut s = session();
        s.select_example(1);
        s.select_example(7);

        assert_eq!(s.view().example, 1);
        assert_eq!(s.view().pass().inputs, [0., 1.]);
    }

    #[tokio::test(start_paused = true)]
    async fn progress_logs_follow_log_every() {
        let mut s = session_logging_every(2);
        for _ in 0..5 {
            s.step();
            s.tick();
        }

        let progress: Vec<_> = s
            .view()
            .logs
            .iter()
            .filter(|l| l.message.starts_with("epoch "))
            .map(|l| l.message.as_str())
            .collect();
        assert_eq!(progress.len(), 2);
        assert!(progress[0].starts_with("epoch 2:"));
        assert!(progress[1].starts_with("epoch 4:"));
    }
}
