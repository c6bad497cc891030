//! Composite: a course can be a single lesson or a bundle of courses, and a
//! learner works through either the same way.

use tracing::debug;

/// Progress report after one learning step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LearningState {
    /// More steps remain.
    More,
    /// The course is finished.
    Done,
}

/// Someone taking courses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Learner {
    pub id: u32,
    pub name: String,
}

impl Learner {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Step through `course` until it is done. Returns the number of steps.
    pub fn learn(&self, course: &mut dyn Course) -> usize {
        let mut steps = 0;
        loop {
            steps += 1;
            if course.learn(self) == LearningState::Done {
                return steps;
            }
        }
    }
}

/// Common interface of single and composite courses.
pub trait Course: Send {
    fn id(&self) -> u32;

    fn name(&self) -> &str;

    fn price(&self) -> f64;

    /// Take one learning step.
    fn learn(&mut self, learner: &Learner) -> LearningState;
}

/// A course finished in a single step.
#[derive(Clone, Debug)]
pub struct SimpleCourse {
    id: u32,
    name: String,
    price: f64,
}

impl SimpleCourse {
    pub fn new(id: u32, name: impl Into<String>, price: f64) -> Self {
        Self {
            id,
            name: name.into(),
            price,
        }
    }
}

impl Course for SimpleCourse {
    fn id(&self) -> u32 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn price(&self) -> f64 {
        self.price
    }

    fn learn(&mut self, learner: &Learner) -> LearningState {
        debug!(learner = %learner.name, course = %self.name, "learning");
        LearningState::Done
    }
}

/// A bundle of courses taken in order, one step at a time.
///
/// A bundle has its own price, independent of its parts.
pub struct CompositeCourse {
    id: u32,
    name: String,
    price: f64,
    courses: Vec<Box<dyn Course>>,
    index: usize,
}

impl CompositeCourse {
    pub fn new(id: u32, name: impl Into<String>, price: f64) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            courses: Vec::new(),
            index: 0,
        }
    }

    pub fn append(&mut self, course: impl Course + 'static) {
        self.courses.push(Box::new(course));
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// Returns `true` when every part has been finished.
    pub fn is_done(&self) -> bool {
        self.index >= self.courses.len()
    }
}

impl Course for CompositeCourse {
    fn id(&self) -> u32 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn price(&self) -> f64 {
        self.price
    }

    fn learn(&mut self, learner: &Learner) -> LearningState {
        let Some(current) = self.courses.get_mut(self.index) else {
            debug!(learner = %learner.name, course = %self.name, "no more courses");
            return LearningState::Done;
        };
        debug!(learner = %learner.name, course = %self.name, part = %current.name(), "learning");
        if current.learn(learner) == LearningState::Done {
            self.index += 1;
        }
        if self.is_done() {
            LearningState::Done
        } else {
            LearningState::More
        }
    }
}
