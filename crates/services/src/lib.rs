#![forbid(unsafe_code)]

pub mod error;
pub mod loader;
pub mod scoring;
pub mod sessions;
pub mod timer;

pub use exam_core::Clock;
pub use sessions as session;

pub use error::{GradeError, LoaderError, SessionError};
pub use scoring::{ChoiceReview, QuestionReview, grade, review};
pub use sessions::{ExamFlowService, SessionProgress, SessionService};
pub use timer::{ExamTimer, TimerClock, TimerState, TimerTick};
