use std::{collections::BTreeSet, sync::Arc};

use log::info;
use parking_lot::Mutex;

/// Something that wants to know when the learner is done with a lesson.
pub trait StepCompletion: Send {
    /// Called at most once per training cycle, when the lesson's goal is reached.
    fn mark_step_complete(&mut self);
}

impl<F: FnMut() + Send> StepCompletion for F {
    fn mark_step_complete(&mut self) {
        self()
    }
}

/// A lesson of the tutorial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lesson {
    pub id: usize,
    pub title: &'static str,
    pub short_title: &'static str,
}

const fn lesson(id: usize, title: &'static str, short_title: &'static str) -> Lesson {
    Lesson {
        id,
        title,
        short_title,
    }
}

pub const TOTAL_LESSONS: usize = 17;

pub const LESSONS: [Lesson; TOTAL_LESSONS] = [
    lesson(1, "What is a Neuron?", "Neuron Basics"),
    lesson(2, "Representing Weather as Numbers", "Data & Inputs"),
    lesson(3, "Weights: How Much Each Factor Matters", "Weights"),
    lesson(4, "Bias: The Baseline Rain Tendency", "Bias"),
    lesson(5, "The Dot Product", "Dot Product"),
    lesson(6, "Why Non-linearity Matters", "Non-linearity"),
    lesson(7, "The Sigmoid Function", "Sigmoid"),
    lesson(8, "Your First Complete Neuron", "First Neuron"),
    lesson(9, "Building a Layer of Neurons", "Layers"),
    lesson(10, "Connecting Layers into a Network", "Network"),
    lesson(11, "Forward Propagation", "Forward Pass"),
    lesson(12, "Measuring Error: The Loss Function", "Loss"),
    lesson(13, "Derivatives and Gradients", "Derivatives"),
    lesson(14, "The Chain Rule", "Chain Rule"),
    lesson(15, "Backpropagation", "Backprop"),
    lesson(16, "Gradient Descent", "Training"),
    lesson(17, "Training: Will It Rain?", "Rain Prediction"),
];

/// The lesson hosting the live XOR trainer.
pub const TRAINING_LESSON: usize = 17;

/// Looks a lesson up by its 1-based id.
pub fn lesson_by_id(id: usize) -> Option<&'static Lesson> {
    LESSONS.iter().find(|l| l.id == id)
}

/// Which lesson the learner is on and which ones are done. Lives in memory only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    current: usize,
    completed: BTreeSet<usize>,
}

impl Default for Progress {
    fn default() -> Self {
        Self::new()
    }
}

impl Progress {
    pub fn new() -> Self {
        Self {
            current: 1,
            completed: BTreeSet::new(),
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    /// Moves to lesson `id`, ignoring ids outside the catalogue.
    pub fn set_current(&mut self, id: usize) {
        if lesson_by_id(id).is_some() {
            self.current = id;
        }
    }

    /// Marks lesson `id` as completed.
    ///
    /// # Returns
    /// Whether this call changed anything.
    pub fn complete_step(&mut self, id: usize) -> bool {
        lesson_by_id(id).is_some() && self.completed.insert(id)
    }

    pub fn is_completed(&self, id: usize) -> bool {
        self.completed.contains(&id)
    }

    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    pub fn reset_progress(&mut self) {
        *self = Self::new();
    }
}

/// Completes a fixed lesson on a shared `Progress` whenever it's signalled.
#[derive(Debug, Clone)]
pub struct StepTracker {
    progress: Arc<Mutex<Progress>>,
    lesson: usize,
}

impl StepTracker {
    /// Creates a new `StepTracker`.
    ///
    /// # Arguments
    /// * `progress` - The progress shared with the rest of the shell.
    /// * `lesson` - The lesson to complete when signalled.
    pub fn new(progress: Arc<Mutex<Progress>>, lesson: usize) -> Self {
        Self { progress, lesson }
    }
}

impl StepCompletion for StepTracker {
    fn mark_step_complete(&mut self) {
        if self.progress.lock().complete_step(self.lesson) {
            info!(lesson = self.lesson; "lesson completed");
        }
    }
}
