use serde::{Deserialize, Serialize};

use crate::model::{DemoForm, State};

const STATUS_IDLE: &str = "ضع إصبع المستفيد على جهاز البصمة";
const STATUS_SCANNING: &str = "جاري التحقق...";
const STATUS_SUCCESS: &str = "تمت مطابقة البصمة بنجاح";
const STATUS_FAILURE: &str = "لم يتم تطابق البصمة. يرجى التحقق من الهوية.";

const LABEL_IDLE: &str = "بدء التحقق بالبصمة";
const LABEL_SCANNING: &str = "جاري التحقق...";
const LABEL_SUCCESS: &str = "إعادة التحقق";
const LABEL_FAILURE: &str = "إعادة المحاولة";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Icon {
    NoIcon,
    Fingerprint,
    Success,
    Failure,
}

/// Styling modifier the shell applies to the scanner section and status text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Idle,
    Scanning,
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationSnapshot {
    pub status_message: String,
    pub button_label: String,
    pub button_enabled: bool,
    pub visible_icon: Icon,
    /// Maps to `aria-busy` on the scanner section.
    pub busy: bool,
    /// Maps to `role="alert"` on the status text.
    pub announce_as_alert: bool,
    pub rings_active: bool,
    pub tone: Tone,
}

impl PresentationSnapshot {
    #[must_use]
    pub fn success_icon_hidden(&self) -> bool {
        self.visible_icon != Icon::Success
    }

    #[must_use]
    pub fn failure_icon_hidden(&self) -> bool {
        self.visible_icon != Icon::Failure
    }
}

/// Pure lookup from state to presentation.
#[must_use]
pub fn snapshot_for(state: State) -> PresentationSnapshot {
    let (status, label, icon, tone) = match state {
        State::Idle => (STATUS_IDLE, LABEL_IDLE, Icon::Fingerprint, Tone::Idle),
        State::Scanning => (STATUS_SCANNING, LABEL_SCANNING, Icon::Fingerprint, Tone::Scanning),
        State::Success => (STATUS_SUCCESS, LABEL_SUCCESS, Icon::Success, Tone::Success),
        State::Failure => (STATUS_FAILURE, LABEL_FAILURE, Icon::Failure, Tone::Failure),
    };

    PresentationSnapshot {
        status_message: status.to_string(),
        button_label: label.to_string(),
        button_enabled: state != State::Scanning,
        visible_icon: icon,
        busy: state == State::Scanning,
        announce_as_alert: state.is_result(),
        rings_active: state == State::Scanning,
        tone,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormView {
    pub national_id: String,
    pub birth_date: String,
    pub id_version: String,
}

impl From<&DemoForm> for FormView {
    fn from(form: &DemoForm) -> Self {
        Self {
            national_id: form.national_id.clone(),
            birth_date: form.birth_date.clone(),
            id_version: form.id_version.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewModel {
    pub state: State,
    pub snapshot: PresentationSnapshot,
    pub form: FormView,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn any_state() -> impl Strategy<Value = State> {
        prop_oneof![
            Just(State::Idle),
            Just(State::Scanning),
            Just(State::Success),
            Just(State::Failure),
        ]
    }

    #[test]
    fn scanning_disables_button_and_marks_busy() {
        let snapshot = snapshot_for(State::Scanning);
        assert!(!snapshot.button_enabled);
        assert!(snapshot.busy);
        assert!(snapshot.rings_active);
        assert!(!snapshot.announce_as_alert);
        assert_eq!(snapshot.visible_icon, Icon::Fingerprint);
    }

    #[test]
    fn results_announce_as_alert() {
        for state in [State::Success, State::Failure] {
            let snapshot = snapshot_for(state);
            assert!(snapshot.announce_as_alert);
            assert!(snapshot.button_enabled);
            assert!(!snapshot.busy);
            assert!(!snapshot.rings_active);
        }
        assert!(!snapshot_for(State::Idle).announce_as_alert);
    }

    #[test]
    fn icons_follow_state() {
        let success = snapshot_for(State::Success);
        assert_eq!(success.visible_icon, Icon::Success);
        assert!(!success.success_icon_hidden());
        assert!(success.failure_icon_hidden());

        let failure = snapshot_for(State::Failure);
        assert_eq!(failure.visible_icon, Icon::Failure);
        assert!(failure.success_icon_hidden());
        assert!(!failure.failure_icon_hidden());

        let idle = snapshot_for(State::Idle);
        assert!(idle.success_icon_hidden() && idle.failure_icon_hidden());
    }

    #[test]
    fn labels_per_state() {
        assert_eq!(snapshot_for(State::Idle).button_label, LABEL_IDLE);
        assert_eq!(snapshot_for(State::Success).button_label, LABEL_SUCCESS);
        assert_eq!(snapshot_for(State::Failure).button_label, LABEL_FAILURE);
        assert_eq!(snapshot_for(State::Failure).status_message, STATUS_FAILURE);
    }

    #[test]
    fn snapshot_serializes_for_the_shell() {
        let json = serde_json::to_value(snapshot_for(State::Success)).unwrap();
        assert_eq!(json["visible_icon"], "success");
        assert_eq!(json["announce_as_alert"], true);
        assert_eq!(json["tone"], "success");
    }

    proptest! {
        #[test]
        fn distinct_states_render_distinctly(a in any_state(), b in any_state()) {
            prop_assert_eq!(a == b, snapshot_for(a) == snapshot_for(b));
            prop_assert_eq!(a == b, snapshot_for(a).tone == snapshot_for(b).tone);
        }

        #[test]
        fn busy_and_alert_are_exclusive(state in any_state()) {
            let snapshot = snapshot_for(state);
            prop_assert!(!(snapshot.busy && snapshot.announce_as_alert));
            prop_assert_eq!(snapshot.button_enabled, !snapshot.busy);
        }
    }
}
