//! Native host for the verification core.
//!
//! Drives a [`crux_core::Core`] on a single cooperative task: effects are
//! handled synchronously as they are produced, timers are held here with
//! tokio deadlines and resolved one at a time from [`VerificationController::tick`].

use crux_core::{Core, Request};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info};

use crate::{
    capabilities::{AudioOperation, Capabilities, TimerOperation, TimerOutput},
    outcome::SharedDraw,
    App, DrawSource, Effect, Event, FormField, PresentationSnapshot, State, VerificationConfig,
    ViewModel,
};

/// Paints a snapshot onto whatever surface the shell owns.
pub trait PresentationSink {
    fn render(&mut self, snapshot: &PresentationSnapshot);
}

pub trait AudioSink {
    fn play_success_cue(&mut self);
    fn play_error_cue(&mut self);
}

/// Audio sink for hosts without sound output.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAudio;

impl AudioSink for LogAudio {
    fn play_success_cue(&mut self) {
        info!(cue = "success", "audio cue");
    }

    fn play_error_cue(&mut self) {
        info!(cue = "error", "audio cue");
    }
}

struct PendingTimer {
    deadline: Instant,
    request: Request<TimerOperation>,
}

pub struct VerificationController<P, A> {
    core: Core<Effect, App>,
    presentation: P,
    audio: A,
    pending: Vec<PendingTimer>,
}

impl<P, A> VerificationController<P, A>
where
    P: PresentationSink,
    A: AudioSink,
{
    /// Creates the session and paints the initial `Idle` snapshot.
    pub fn new(presentation: P, audio: A) -> Self {
        let mut controller = Self {
            core: Core::new::<Capabilities>(),
            presentation,
            audio,
            pending: Vec::new(),
        };
        controller.dispatch(Event::AppStarted);
        controller
    }

    /// Like [`Self::new`], with scan outcomes taken from `source`.
    pub fn with_draw_source(
        presentation: P,
        audio: A,
        source: impl DrawSource + 'static,
    ) -> Self {
        let mut controller = Self::new(presentation, audio);
        controller.set_draw_source(source);
        controller
    }

    /// Replaces the outcome source for every scan resolved from now on.
    pub fn set_draw_source(&mut self, source: impl DrawSource + 'static) {
        self.dispatch(Event::DrawSourceChanged(SharedDraw::new(source)));
    }

    pub fn start_verification(&mut self) {
        self.dispatch(Event::StartVerification);
    }

    pub fn press_key(&mut self, key: &str) {
        self.dispatch(Event::KeyPressed {
            key: key.to_string(),
        });
    }

    pub fn set_state(&mut self, state: State) {
        self.dispatch(Event::SetState(state));
    }

    /// Untyped variant of [`Self::set_state`]; unknown names are ignored.
    pub fn request_state(&mut self, name: &str) {
        self.dispatch(Event::StateRequested {
            name: name.to_string(),
        });
    }

    pub fn cancel(&mut self) {
        self.dispatch(Event::CancelVerification);
    }

    pub fn fill_test_data(&mut self) {
        self.dispatch(Event::FillTestData);
    }

    pub fn edit_field(&mut self, field: FormField, value: impl Into<String>) {
        self.dispatch(Event::FieldEdited {
            field,
            value: value.into(),
        });
    }

    pub fn configure(&mut self, config: VerificationConfig) {
        self.dispatch(Event::ConfigChanged(config));
    }

    #[must_use]
    pub fn current_state(&self) -> State {
        self.core.view().state
    }

    #[must_use]
    pub fn view(&self) -> ViewModel {
        self.core.view()
    }

    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.pending.len()
    }

    pub fn presentation(&self) -> &P {
        &self.presentation
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    /// Waits for the earliest pending timer and feeds it back into the core.
    /// Returns `false` when nothing is pending.
    pub async fn tick(&mut self) -> bool {
        let Some(index) = self
            .pending
            .iter()
            .enumerate()
            .min_by_key(|(_, timer)| timer.deadline)
            .map(|(index, _)| index)
        else {
            return false;
        };

        // Stays queued across the await so a dropped tick loses nothing.
        sleep_until(self.pending[index].deadline).await;
        let mut timer = self.pending.swap_remove(index);
        debug!(phase = ?timer.request.operation.phase(), "timer elapsed");

        let effects = self.core.resolve(&mut timer.request, TimerOutput::Elapsed);
        self.handle(effects);
        true
    }

    /// Fires timers until none remain.
    pub async fn run_until_settled(&mut self) {
        while self.tick().await {}
    }

    fn dispatch(&mut self, event: Event) {
        let effects = self.core.process_event(event);
        self.handle(effects);
    }

    fn handle(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Render(_) => {
                    let view = self.core.view();
                    self.presentation.render(&view.snapshot);
                }
                Effect::Audio(request) => match request.operation {
                    AudioOperation::SuccessCue => self.audio.play_success_cue(),
                    AudioOperation::ErrorCue => self.audio.play_error_cue(),
                },
                Effect::Timer(request) => {
                    let deadline = Instant::now() + request.operation.duration();
                    self.pending.push(PendingTimer { deadline, request });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[derive(Default)]
    struct Frames(Vec<PresentationSnapshot>);

    impl PresentationSink for Frames {
        fn render(&mut self, snapshot: &PresentationSnapshot) {
            self.0.push(snapshot.clone());
        }
    }

    fn certain(success_rate: f64) -> VerificationConfig {
        VerificationConfig {
            success_rate,
            ..VerificationConfig::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn initial_render_is_idle() {
        let controller = VerificationController::new(Frames::default(), LogAudio);
        assert_eq!(controller.current_state(), State::Idle);
        assert_eq!(controller.presentation().0.len(), 1);
        assert!(controller.presentation().0[0].button_enabled);
        assert_eq!(controller.pending_timers(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn tick_without_timers_returns_immediately() {
        let mut controller = VerificationController::new(Frames::default(), LogAudio);
        let start = Instant::now();
        assert!(!controller.tick().await);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn configured_durations_drive_the_clock() {
        let mut controller = VerificationController::new(Frames::default(), LogAudio);
        controller.configure(VerificationConfig {
            scan_duration_ms: 250,
            result_display_ms: 750,
            success_rate: 0.0,
        });

        let start = Instant::now();
        controller.start_verification();
        assert_eq!(controller.pending_timers(), 1);

        assert!(controller.tick().await);
        assert_eq!(start.elapsed(), Duration::from_millis(250));
        assert_eq!(controller.current_state(), State::Failure);

        controller.run_until_settled().await;
        assert_eq!(start.elapsed(), Duration::from_millis(1000));
        assert_eq!(controller.current_state(), State::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_run_still_drains_its_timer() {
        let mut controller = VerificationController::new(Frames::default(), LogAudio);
        controller.configure(certain(1.0));

        controller.start_verification();
        controller.cancel();
        assert_eq!(controller.current_state(), State::Idle);
        let frames = controller.presentation().0.len();

        controller.run_until_settled().await;
        assert_eq!(controller.current_state(), State::Idle);
        assert_eq!(controller.presentation().0.len(), frames);
    }
}
