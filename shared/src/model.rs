use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::{
    outcome::{DrawSource, ThreadRngDraw},
    VerificationError, RESULT_DISPLAY_DURATION_MS, SCAN_DURATION_MS, SUCCESS_RATE,
};

pub const TEST_NATIONAL_ID: &str = "1234567890";
pub const TEST_BIRTH_DATE: &str = "1990-05-15";
pub const TEST_ID_VERSION: &str = "123456";
pub const DEFAULT_BIRTH_DATE_SUGGESTION: &str = "1990-01-01";

/// Verification state. Exactly one is current at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum State {
    #[default]
    Idle,
    Scanning,
    Success,
    Failure,
}

impl State {
    pub const ALL: [Self; 4] = [Self::Idle, Self::Scanning, Self::Success, Self::Failure];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Scanning => "scanning",
            Self::Success => "success",
            Self::Failure => "failure",
        }
    }

    #[must_use]
    pub const fn is_result(self) -> bool {
        matches!(self, Self::Success | Self::Failure)
    }
}

impl FromStr for State {
    type Err = VerificationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| VerificationError::InvalidStateRequested {
                requested: s.to_string(),
            })
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Timing and probability knobs for the simulated scan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VerificationConfig {
    pub scan_duration_ms: u64,
    pub result_display_ms: u64,
    pub success_rate: f64,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            scan_duration_ms: SCAN_DURATION_MS,
            result_display_ms: RESULT_DISPLAY_DURATION_MS,
            success_rate: SUCCESS_RATE,
        }
    }
}

impl VerificationConfig {
    pub fn validate(&self) -> Result<(), VerificationError> {
        if self.scan_duration_ms == 0 {
            return Err(VerificationError::invalid_config("scan duration must be positive"));
        }
        if self.result_display_ms == 0 {
            return Err(VerificationError::invalid_config(
                "result display duration must be positive",
            ));
        }
        if !self.success_rate.is_finite() || !(0.0..=1.0).contains(&self.success_rate) {
            return Err(VerificationError::invalid_config(format!(
                "success rate {} outside [0, 1]",
                self.success_rate
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    NationalId,
    BirthDate,
    IdVersion,
}

/// Identity form shown next to the scanner. Presentation only, never validated.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DemoForm {
    pub national_id: String,
    pub birth_date: String,
    pub id_version: String,
}

impl DemoForm {
    #[must_use]
    pub fn test_data() -> Self {
        Self {
            national_id: TEST_NATIONAL_ID.to_string(),
            birth_date: TEST_BIRTH_DATE.to_string(),
            id_version: TEST_ID_VERSION.to_string(),
        }
    }

    pub fn set(&mut self, field: FormField, value: String) {
        match field {
            FormField::NationalId => self.national_id = value,
            FormField::BirthDate => self.birth_date = value,
            FormField::IdVersion => self.id_version = value,
        }
    }
}

pub struct Model {
    pub state: State,
    /// Generation of the current run; timers armed for an older run are dropped.
    pub run: u64,
    pub config: VerificationConfig,
    pub form: DemoForm,
    pub draw_source: Box<dyn DrawSource>,
}

impl Default for Model {
    fn default() -> Self {
        Self::with_draw_source(ThreadRngDraw)
    }
}

impl Model {
    pub fn with_draw_source(source: impl DrawSource + 'static) -> Self {
        Self {
            state: State::Idle,
            run: 0,
            config: VerificationConfig::default(),
            form: DemoForm::default(),
            draw_source: Box::new(source),
        }
    }

    /// Starts a new generation, invalidating every pending timer.
    pub fn next_run(&mut self) -> u64 {
        self.run = self.run.wrapping_add(1);
        self.run
    }

    #[must_use]
    pub const fn is_current_run(&self, run: u64) -> bool {
        self.run == run
    }
}

// Redact the draw source; it is opaque.
impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("state", &self.state)
            .field("run", &self.run)
            .field("config", &self.config)
            .field("form", &self.form)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn state_parses_its_own_names() {
        for state in State::ALL {
            assert_eq!(state.as_str().parse::<State>().unwrap(), state);
        }
    }

    #[test]
    fn unknown_state_name_is_rejected() {
        let err = "bogus".parse::<State>().unwrap_err();
        assert_eq!(
            err,
            VerificationError::InvalidStateRequested {
                requested: "bogus".into()
            }
        );
        assert!("Idle".parse::<State>().is_err());
        assert!("".parse::<State>().is_err());
    }

    #[test]
    fn state_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&State::Scanning).unwrap(), "\"scanning\"");
    }

    #[test]
    fn default_config_matches_constants() {
        let config = VerificationConfig::default();
        assert_eq!(config.scan_duration_ms, 3000);
        assert_eq!(config.result_display_ms, 4000);
        assert!((config.success_rate - 0.7).abs() < f64::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_validation() {
        let zero_scan = VerificationConfig {
            scan_duration_ms: 0,
            ..VerificationConfig::default()
        };
        assert!(zero_scan.validate().is_err());

        let zero_display = VerificationConfig {
            result_display_ms: 0,
            ..VerificationConfig::default()
        };
        assert!(zero_display.validate().is_err());

        for rate in [-0.1, 1.5, f64::NAN, f64::INFINITY] {
            let config = VerificationConfig {
                success_rate: rate,
                ..VerificationConfig::default()
            };
            assert!(config.validate().is_err(), "rate {rate} should be rejected");
        }

        let certain = VerificationConfig {
            success_rate: 1.0,
            ..VerificationConfig::default()
        };
        assert!(certain.validate().is_ok());
    }

    #[test]
    fn form_test_data_and_edits() {
        let mut form = DemoForm::test_data();
        assert_eq!(form.national_id, "1234567890");
        assert_eq!(form.birth_date, "1990-05-15");
        assert_eq!(form.id_version, "123456");

        form.set(FormField::BirthDate, DEFAULT_BIRTH_DATE_SUGGESTION.into());
        assert_eq!(form.birth_date, "1990-01-01");
        assert_eq!(form.national_id, "1234567890");
    }

    #[test]
    fn runs_are_generational() {
        let mut model = Model::default();
        assert_eq!(model.state, State::Idle);
        let first = model.next_run();
        assert!(model.is_current_run(first));
        let second = model.next_run();
        assert!(!model.is_current_run(first));
        assert!(model.is_current_run(second));
    }

    proptest! {
        #[test]
        fn unknown_names_never_parse(name in "\\PC{0,16}") {
            prop_assume!(!State::ALL.iter().any(|state| state.as_str() == name));
            prop_assert!(name.parse::<State>().is_err());
        }
    }
}
