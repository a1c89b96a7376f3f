use std::{
    sync::{Arc, Weak},
    time::Duration,
};

use log::{debug, info};
use parking_lot::Mutex;
use tokio::{runtime::Handle, sync::watch};
use tokio_util::sync::CancellationToken;

use super::{
    speed::{clamp_learning_rate, Speed},
    state::Snapshot,
    trainer::Trainer,
};

/// The floor for the pause between two automatic steps, one frame at about 30 fps.
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(33);

struct Inner {
    trainer: Trainer,
    speed: Speed,
    run: Option<CancellationToken>,
}

impl Inner {
    fn snapshot(&self) -> Snapshot {
        self.trainer.snapshot(self.run.is_some(), self.speed)
    }

    /// Stops the running loop, if any. Must be called with the lock held so no
    /// step can sneak in after it returns.
    fn stop(&mut self) -> bool {
        match self.run.take() {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }
}

struct Shared {
    inner: Mutex<Inner>,
    snapshots: watch::Sender<Snapshot>,
}

impl Shared {
    fn publish(&self, inner: &Inner) {
        self.snapshots.send_replace(inner.snapshot());
    }
}

/// Drives a `Trainer` from the outside world: starts and stops the automatic
/// stepping loop and publishes a `Snapshot` after every change.
#[derive(Clone)]
pub struct Controller {
    shared: Arc<Shared>,
    handle: Handle,
    min_interval: Duration,
}

impl Controller {
    /// Creates a new paused `Controller`.
    ///
    /// # Arguments
    /// * `trainer` - The trainer to drive.
    /// * `speed` - The initial slider position.
    /// * `min_interval` - The shortest pause between two automatic steps.
    /// * `handle` - The runtime the stepping loop is spawned on.
    pub fn new(trainer: Trainer, speed: Speed, min_interval: Duration, handle: Handle) -> Self {
        let inner = Inner {
            trainer,
            speed,
            run: None,
        };
        let (snapshots, _) = watch::channel(inner.snapshot());

        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(inner),
                snapshots,
            }),
            handle,
            min_interval,
        }
    }

    /// Starts stepping automatically. Does nothing if already running.
    pub fn start(&self) {
        let mut inner = self.shared.inner.lock();
        if inner.run.is_some() {
            return;
        }

        let token = CancellationToken::new();
        inner.run = Some(token.clone());
        self.shared.publish(&inner);
        info!(epoch = inner.trainer.state().epoch; "training started");

        self.handle.spawn(run_loop(
            Arc::downgrade(&self.shared),
            token,
            self.min_interval,
        ));
    }

    /// Stops stepping. Once this returns no further step will happen until the
    /// next `start`.
    pub fn pause(&self) {
        let mut inner = self.shared.inner.lock();
        if inner.stop() {
            self.shared.publish(&inner);
            info!(epoch = inner.trainer.state().epoch; "training paused");
        }
    }

    /// Pauses when running, starts otherwise.
    pub fn toggle(&self) {
        if self.is_running() {
            self.pause();
        } else {
            self.start();
        }
    }

    pub fn is_running(&self) -> bool {
        self.shared.inner.lock().run.is_some()
    }

    /// Runs exactly one epoch. Ignored while running.
    pub fn step(&self) {
        let mut inner = self.shared.inner.lock();
        if inner.run.is_some() {
            debug!("step ignored while running");
            return;
        }

        inner.trainer.train_step();
        self.shared.publish(&inner);
    }

    /// Stops any running loop, re-randomizes the network and clears the state.
    pub fn reset(&self) {
        let mut inner = self.shared.inner.lock();
        inner.stop();
        inner.trainer.reset();
        self.shared.publish(&inner);
        info!("training reset");
    }

    /// Sets the learning rate, clamped to the slider's range. Applies from the next step.
    pub fn set_learning_rate(&self, learning_rate: f64) {
        let mut inner = self.shared.inner.lock();
        let learning_rate = clamp_learning_rate(learning_rate);
        inner.trainer.set_learning_rate(learning_rate);
        self.shared.publish(&inner);
        debug!(learning_rate = learning_rate; "learning rate changed");
    }

    /// Sets the slider position. Applies from the next pause between steps.
    pub fn set_speed(&self, speed: Speed) {
        let mut inner = self.shared.inner.lock();
        inner.speed = speed;
        self.shared.publish(&inner);
        debug!(speed = speed.get(); "speed changed");
    }

    /// The latest published state.
    pub fn snapshot(&self) -> Snapshot {
        self.shared.snapshots.borrow().clone()
    }

    /// A receiver notified after every published change.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.shared.snapshots.subscribe()
    }
}

/// Steps until `token` is cancelled or every `Controller` is gone.
async fn run_loop(weak: Weak<Shared>, token: CancellationToken, min_interval: Duration) {
    loop {
        let Some(shared) = weak.upgrade() else {
            debug!("controller dropped");
            break;
        };

        let interval = {
            let mut inner = shared.inner.lock();
            // A pause or reset may have won the lock since the last sleep.
            if token.is_cancelled() {
                break;
            }

            inner.trainer.train_step();
            shared.publish(&inner);
            inner.speed.interval().max(min_interval)
        };
        drop(shared);

        tokio::select! {
            _ = token.cancelled() => break,
            _ = tokio::time::sleep(interval) => {}
        }
    }

    debug!("stepping loop finished");
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    const H4: NonZeroUsize = NonZeroUsize::new(4).unwrap();

    fn controller(speed: u8) -> Controller {
        let trainer = Trainer::new(H4, 0.5, StdRng::seed_from_u64(9));
        Controller::new(
            trainer,
            Speed::new(speed),
            DEFAULT_MIN_INTERVAL,
            Handle::current(),
        )
    }

    fn epoch(c: &Controller) -> u64 {
        c.snapshot().state.epoch
    }

    #[tokio::test(start_paused = true)]
    async fn starts_paused() {
        let c = controller(50);
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert!(!c.is_running());
        assert_eq!(epoch(&c), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn runs_until_paused() {
        let c = controller(100);
        c.start();
        tokio::time::sleep(Duration::from_millis(200)).await;

        c.pause();
        let paused_at = epoch(&c);
        assert!(paused_at > 0);
        assert!(!c.snapshot().running);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(epoch(&c), paused_at);
    }

    #[tokio::test(start_paused = true)]
    async fn double_start_runs_one_loop() {
        let c = controller(1);
        c.start();
        c.start();

        // One step right away, then one per 100ms.
        tokio::time::sleep(Duration::from_millis(1050)).await;
        c.pause();

        assert_eq!(epoch(&c), 11);
    }

    #[tokio::test(start_paused = true)]
    async fn step_only_while_paused() {
        let c = controller(1);
        c.step();
        c.step();
        assert_eq!(epoch(&c), 2);

        c.start();
        tokio::time::sleep(Duration::from_millis(50)).await;
        let running_at = epoch(&c);
        c.step();
        assert_eq!(epoch(&c), running_at);
        c.pause();
    }

    #[tokio::test(start_paused = true)]
    async fn reset_stops_and_clears() {
        let c = controller(100);
        c.start();
        tokio::time::sleep(Duration::from_millis(100)).await;

        for _ in 0..2 {
            c.reset();
            let snapshot = c.snapshot();
            assert!(!snapshot.running);
            assert_eq!(snapshot.state.epoch, 0);
            assert_eq!(snapshot.state.predictions, [0.5; 4]);
            assert!(snapshot.last_pass.is_none());
        }

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(epoch(&c), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn learning_rate_is_clamped() {
        let c = controller(50);

        c.set_learning_rate(10.);
        assert_eq!(c.snapshot().learning_rate, 2.);
        c.set_learning_rate(-1.);
        assert_eq!(c.snapshot().learning_rate, 0.01);
    }

    #[tokio::test(start_paused = true)]
    async fn subscribers_see_changes() {
        let c = controller(50);
        let mut rx = c.subscribe();

        c.set_speed(Speed::new(70));
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().speed.get(), 70);

        c.step();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().state.epoch, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn one_step_per_frame_at_most() {
        let c = controller(100);
        c.start();
        tokio::time::sleep(Duration::from_secs(1)).await;
        c.pause();

        let frame = DEFAULT_MIN_INTERVAL.as_millis() as u64;
        let epochs = epoch(&c);
        assert!(epochs > 1);
        assert!(epochs <= 1 + 1000 / frame, "{epochs} steps in one second");
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_controller_stops_stepping() {
        let c = controller(100);
        let rx = c.subscribe();
        c.start();
        tokio::time::sleep(Duration::from_millis(100)).await;

        let dropped_at = rx.borrow().state.epoch;
        assert!(dropped_at > 0);
        drop(c);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(rx.borrow().state.epoch, dropped_at);
        // Nothing keeps the shared state, and so the sender, alive.
        assert!(rx.has_changed().is_err());
    }
}
