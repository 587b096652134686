use serde::{Deserialize, Serialize};

use crate::{
    model::{FormField, State, VerificationConfig},
    outcome::SharedDraw,
};

pub const ENTER_KEY: &str = "Enter";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum Event {
    AppStarted,

    /// Primary action button.
    StartVerification,
    KeyPressed {
        key: String,
    },
    CancelVerification,

    SetState(State),
    /// Untyped state request from the shell's debug surface.
    StateRequested {
        name: String,
    },

    FillTestData,
    FieldEdited {
        field: FormField,
        value: String,
    },

    ConfigChanged(VerificationConfig),
    /// Installs the source later scans draw their outcome from.
    #[serde(skip)]
    DrawSourceChanged(SharedDraw),

    // internal, fired by timers armed for `run`
    #[serde(skip)]
    ScanElapsed {
        run: u64,
    },
    #[serde(skip)]
    ResultElapsed {
        run: u64,
    },
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AppStarted => "app_started",
            Self::StartVerification => "start_verification",
            Self::KeyPressed { .. } => "key_pressed",
            Self::CancelVerification => "cancel_verification",
            Self::SetState(_) => "set_state",
            Self::StateRequested { .. } => "state_requested",
            Self::FillTestData => "fill_test_data",
            Self::FieldEdited { .. } => "field_edited",
            Self::ConfigChanged(_) => "config_changed",
            Self::DrawSourceChanged(_) => "draw_source_changed",
            Self::ScanElapsed { .. } => "scan_elapsed",
            Self::ResultElapsed { .. } => "result_elapsed",
        }
    }

    #[must_use]
    pub const fn is_user_initiated(&self) -> bool {
        matches!(
            self,
            Self::StartVerification
                | Self::KeyPressed { .. }
                | Self::CancelVerification
                | Self::FillTestData
                | Self::FieldEdited { .. }
        )
    }
}
