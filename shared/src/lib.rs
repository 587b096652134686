// lib.rs - Fingerprint verification core

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod capabilities;
pub mod event;
pub mod model;
pub mod outcome;
pub mod shell;
pub mod view;

use std::time::Duration;
use thiserror::Error;

pub use app::App;
pub use capabilities::{Capabilities, Effect};
pub use crux_core::{render::Render, App as CruxApp};
pub use event::Event;
pub use model::{DemoForm, FormField, Model, State, VerificationConfig};
pub use outcome::{
    DrawSource, FixedDraw, Outcome, ScriptedDraw, SeededDraw, SharedDraw, ThreadRngDraw,
};
pub use view::{snapshot_for, FormView, Icon, PresentationSnapshot, Tone, ViewModel};

pub const SCAN_DURATION_MS: u64 = 3000;
pub const RESULT_DISPLAY_DURATION_MS: u64 = 4000;
pub const SUCCESS_RATE: f64 = 0.7;

pub const SCAN_DURATION: Duration = Duration::from_millis(SCAN_DURATION_MS);
pub const RESULT_DISPLAY_DURATION: Duration = Duration::from_millis(RESULT_DISPLAY_DURATION_MS);

/// Rejected input. Never crosses the core boundary: the offending event is
/// logged and dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    #[error("invalid state requested: {requested:?}")]
    InvalidStateRequested { requested: String },

    #[error("invalid config: {reason}")]
    InvalidConfig { reason: String },
}

impl VerificationError {
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidStateRequested { .. } => "INVALID_STATE",
            Self::InvalidConfig { .. } => "INVALID_CONFIG",
        }
    }
}

pub mod app {
    use tracing::{debug, info, warn};

    use super::*;
    use crate::{capabilities::TimerPhase, event::ENTER_KEY};

    #[derive(Default)]
    pub struct App;

    impl App {
        /// Replaces the current state and pushes its snapshot.
        fn transition(model: &mut Model, next: State, caps: &Capabilities) {
            let from = model.state;
            model.state = next;
            debug!(%from, to = %next, run = model.run, "state transition");

            caps.render.render();

            match next {
                State::Success => caps.audio.play_success_cue(),
                State::Failure => caps.audio.play_error_cue(),
                State::Idle | State::Scanning => {}
            }
        }

        /// Transition requested from outside the timed flow. Pending timers
        /// of the current run are abandoned.
        fn force_state(model: &mut Model, next: State, caps: &Capabilities) {
            model.next_run();
            Self::transition(model, next, caps);
        }

        fn start(model: &mut Model, caps: &Capabilities) {
            if model.state == State::Scanning {
                warn!(run = model.run, "verification already in progress; start ignored");
                return;
            }

            let run = model.next_run();
            Self::transition(model, State::Scanning, caps);

            caps.timer.notify_after(
                Duration::from_millis(model.config.scan_duration_ms),
                TimerPhase::Scan,
                move |_| Event::ScanElapsed { run },
            );
        }

        fn resolve_scan(model: &mut Model, run: u64, caps: &Capabilities) {
            if !model.is_current_run(run) || model.state != State::Scanning {
                debug!(run, current = model.run, "dropping stale scan timer");
                return;
            }

            let draw = model.draw_source.draw();
            let outcome = Outcome::from_draw(draw, model.config.success_rate);
            info!(run, draw, ?outcome, "scan resolved");

            Self::transition(model, outcome.state(), caps);

            caps.timer.notify_after(
                Duration::from_millis(model.config.result_display_ms),
                TimerPhase::ResultDisplay,
                move |_| Event::ResultElapsed { run },
            );
        }

        fn finish_run(model: &mut Model, run: u64, caps: &Capabilities) {
            if !model.is_current_run(run) || !model.state.is_result() {
                debug!(run, current = model.run, "dropping stale result timer");
                return;
            }
            Self::transition(model, State::Idle, caps);
        }
    }

    impl crux_core::App for App {
        type Event = Event;
        type Model = Model;
        type ViewModel = ViewModel;
        type Capabilities = Capabilities;

        fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
            debug!(
                event = event.name(),
                user = event.is_user_initiated(),
                state = %model.state,
                "update"
            );

            match event {
                Event::AppStarted => {
                    caps.render.render();
                }

                Event::StartVerification => Self::start(model, caps),

                Event::KeyPressed { key } => {
                    if key == ENTER_KEY && model.state == State::Idle {
                        Self::start(model, caps);
                    }
                }

                Event::CancelVerification => Self::force_state(model, State::Idle, caps),

                Event::SetState(state) => Self::force_state(model, state, caps),

                Event::StateRequested { name } => match name.parse::<State>() {
                    Ok(state) => Self::force_state(model, state, caps),
                    Err(e) => {
                        warn!(code = e.code(), error = %e, state = %model.state, "state request ignored");
                    }
                },

                Event::FillTestData => {
                    model.form = DemoForm::test_data();
                    caps.render.render();
                }

                Event::FieldEdited { field, value } => {
                    model.form.set(field, value);
                    caps.render.render();
                }

                Event::ConfigChanged(config) => match config.validate() {
                    Ok(()) => {
                        info!(?config, "verification config updated");
                        model.config = config;
                    }
                    Err(e) => {
                        warn!(code = e.code(), error = %e, "config change rejected");
                    }
                },

                Event::DrawSourceChanged(source) => {
                    debug!("draw source replaced");
                    model.draw_source = Box::new(source);
                }

                Event::ScanElapsed { run } => Self::resolve_scan(model, run, caps),

                Event::ResultElapsed { run } => Self::finish_run(model, run, caps),
            }
        }

        fn view(&self, model: &Model) -> ViewModel {
            ViewModel {
                state: model.state,
                snapshot: snapshot_for(model.state),
                form: FormView::from(&model.form),
            }
        }
    }
}
