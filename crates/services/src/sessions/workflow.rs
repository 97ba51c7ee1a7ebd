use exam_core::Clock;
use exam_core::model::{Chapter, ExamResult};

use super::service::SessionService;
use crate::error::{GradeError, SessionError};
use crate::scoring::{self, QuestionReview};
use crate::timer::ExamTimer;

/// Orchestrates an exam attempt end to end.
///
/// The UI shell holds one of these instead of module-level globals: it owns
/// the clock and the single active timer, starts sessions, and turns a
/// finished session into a result. Sessions are handed back to the caller so
/// the rendering layer can query them between events.
pub struct ExamFlowService {
    clock: Clock,
    timer: ExamTimer,
}

impl ExamFlowService {
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self {
            clock,
            timer: ExamTimer::new(),
        }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Start an attempt with an elapsed-time display.
    ///
    /// `on_tick` receives the `MM:SS` stopwatch display every second. Any
    /// previously running timer is stopped first.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyChapter` if the chapter has no questions.
    pub fn begin<T>(&mut self, chapter: Chapter, on_tick: T) -> Result<SessionService, SessionError>
    where
        T: FnMut(String) + Send + 'static,
    {
        let session = SessionService::new(chapter, self.clock.now())?;
        tracing::info!(
            chapter = %session.chapter().id(),
            questions = session.total_questions(),
            "exam attempt started"
        );
        self.timer.start_stopwatch(on_tick);
        Ok(session)
    }

    /// Start an attempt with a fixed time limit.
    ///
    /// `on_tick` receives the `MM:SS` remaining-time display every second and
    /// `on_expire` runs exactly once when time runs out; submitting is then
    /// the shell's move. Any previously running timer is stopped first.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyChapter` if the chapter has no questions.
    pub fn begin_timed<T, E>(
        &mut self,
        chapter: Chapter,
        duration_secs: u32,
        on_tick: T,
        on_expire: E,
    ) -> Result<SessionService, SessionError>
    where
        T: FnMut(String) + Send + 'static,
        E: FnOnce() + Send + 'static,
    {
        let session = SessionService::new(chapter, self.clock.now())?;
        tracing::info!(
            chapter = %session.chapter().id(),
            questions = session.total_questions(),
            duration_secs,
            "timed exam attempt started"
        );
        self.timer.start_countdown(duration_secs, on_tick, on_expire);
        Ok(session)
    }

    /// Stop the timer and score the attempt.
    ///
    /// Grading never mutates the session, so the caller can still walk it
    /// for the review screen afterwards.
    ///
    /// # Errors
    ///
    /// Returns `GradeError::NoQuestions` if the session somehow holds no
    /// questions; the session constructor rules that out.
    pub fn submit(&mut self, session: &SessionService) -> Result<ExamResult, GradeError> {
        self.timer.stop();
        let result = scoring::grade(session.chapter().questions(), session.answers())?;
        tracing::info!(
            chapter = %session.chapter().id(),
            correct = result.correct(),
            total = result.total(),
            percentage = result.percentage(),
            "exam attempt submitted"
        );
        Ok(result)
    }

    /// Per-question detail for the review screen, derived without touching
    /// the session.
    #[must_use]
    pub fn review(&self, session: &SessionService) -> Vec<QuestionReview> {
        scoring::review(session.chapter().questions(), session.answers())
    }

    /// Time spent on the attempt so far, by this service's clock.
    #[must_use]
    pub fn time_spent(&self, session: &SessionService) -> chrono::Duration {
        session.elapsed(self.clock.now())
    }

    /// Abandon the attempt: stops the timer, discards nothing the caller
    /// still owns.
    pub fn exit(&mut self) {
        self.timer.stop();
        tracing::debug!("exam attempt exited");
    }

    /// True while a tick cadence is active.
    #[must_use]
    pub fn timer_running(&self) -> bool {
        self.timer.is_running()
    }
}
