//! The single in-memory session record and its lifecycle.
//!
//! The session is an explicitly owned struct threaded through the cycle,
//! never ambient global state. Any change to the committed base inputs forces
//! a hard reset (fresh id, cleared placeholders) before the new values land,
//! so derived artifacts from a previous input combination can never leak into
//! the next one.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::info;
use uuid::Uuid;

use crate::intake::models::{InputMode, JdOutput, RawInputs};

pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// One user interaction's state: identity, committed inputs, and the
/// placeholder slots later phases will fill.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub input_mode: Option<InputMode>,
    pub base_inputs: Option<RawInputs>,
    pub temperature: f64,
    /// Future phase: accumulated refinement instructions.
    pub instructions: Vec<String>,
    /// Future phase: rolling summary of the instructions above.
    pub instruction_summary: String,
    /// Future phase: every generated JD revision, newest last.
    pub jd_versions: Vec<JdOutput>,
}

impl Session {
    /// A fresh session: new v4 id, no mode, no committed inputs, default
    /// temperature, empty placeholders.
    pub fn new() -> Self {
        Session {
            session_id: Uuid::new_v4(),
            created_at: Utc::now(),
            input_mode: None,
            base_inputs: None,
            temperature: DEFAULT_TEMPERATURE,
            instructions: Vec::new(),
            instruction_summary: String::new(),
            jd_versions: Vec::new(),
        }
    }

    /// Hard reset: replaces the entire record with a fresh one. The new id
    /// signals to consumers that this is a new interaction, not a
    /// continuation.
    pub fn reset(&mut self) {
        let old_id = self.session_id;
        *self = Session::new();
        info!("Session {old_id} hard-reset -> {}", self.session_id);
    }

    /// Change detection: compares the incoming base inputs against the
    /// previously committed ones by structural equality and hard-resets on
    /// any difference. Returns whether a reset fired.
    ///
    /// Must run before the new values are committed; comparing after would
    /// compare the inputs against themselves.
    pub fn reconcile(&mut self, current: &RawInputs) -> bool {
        match &self.base_inputs {
            Some(previous) if previous != current => {
                self.reset();
                true
            }
            _ => false,
        }
    }

    /// Unconditionally overwrites the committed inputs, mode, and
    /// temperature. No validation happens here.
    pub fn commit(&mut self, inputs: RawInputs, mode: InputMode, temperature: f64) {
        self.base_inputs = Some(inputs);
        self.input_mode = Some(mode);
        self.temperature = temperature;
    }

    /// The four-key session-state record the validator re-checks on every
    /// generate action. An unset mode serializes as null and an uncommitted
    /// `base_inputs` as an empty map, so a pre-commit snapshot fails the
    /// schema. By then the cycle has always committed.
    pub fn state_record(&self) -> Map<String, Value> {
        let mut record = Map::new();
        record.insert(
            "session_id".into(),
            Value::from(self.session_id.to_string()),
        );
        record.insert(
            "input_mode".into(),
            match self.input_mode {
                Some(mode) => Value::from(mode.as_str()),
                None => Value::Null,
            },
        );
        record.insert("temperature".into(), Value::from(self.temperature));
        record.insert(
            "base_inputs".into(),
            Value::Object(
                self.base_inputs
                    .as_ref()
                    .map(RawInputs::record)
                    .unwrap_or_default(),
            ),
        );
        record
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_inputs() -> RawInputs {
        RawInputs {
            existing_jd: String::new(),
            education: "Graduate".to_string(),
            experience: 3,
            skills: "python,sql".to_string(),
            functional_area: "Data".to_string(),
        }
    }

    #[test]
    fn test_new_session_defaults() {
        let session = Session::new();
        assert!(session.input_mode.is_none());
        assert!(session.base_inputs.is_none());
        assert_eq!(session.temperature, DEFAULT_TEMPERATURE);
        assert!(session.instructions.is_empty());
        assert!(session.instruction_summary.is_empty());
        assert!(session.jd_versions.is_empty());
    }

    #[test]
    fn test_reset_regenerates_id_and_clears_placeholders() {
        let mut session = Session::new();
        let old_id = session.session_id;
        session.instructions.push("make it shorter".to_string());
        session.instruction_summary = "shorter".to_string();
        session.commit(sample_inputs(), InputMode::Structured, 0.4);

        session.reset();

        assert_ne!(session.session_id, old_id);
        assert!(session.instructions.is_empty());
        assert!(session.instruction_summary.is_empty());
        assert!(session.base_inputs.is_none());
        assert!(session.input_mode.is_none());
        assert_eq!(session.temperature, DEFAULT_TEMPERATURE);
    }

    #[test]
    fn test_first_presentation_never_resets() {
        let mut session = Session::new();
        let id = session.session_id;
        assert!(!session.reconcile(&sample_inputs()));
        assert_eq!(session.session_id, id);
    }

    #[test]
    fn test_unchanged_inputs_do_not_reset() {
        let mut session = Session::new();
        session.commit(sample_inputs(), InputMode::Structured, 0.7);
        let id = session.session_id;
        assert!(!session.reconcile(&sample_inputs()));
        assert_eq!(session.session_id, id);
    }

    #[test]
    fn test_changed_inputs_reset_before_commit() {
        let mut session = Session::new();
        session.commit(sample_inputs(), InputMode::Structured, 0.7);
        session.instructions.push("stale artifact".to_string());
        let old_id = session.session_id;

        let mut changed = sample_inputs();
        changed.experience = 5;
        assert!(session.reconcile(&changed));

        assert_ne!(session.session_id, old_id);
        assert!(session.instructions.is_empty());
        // reconcile resets but does not commit; the cycle commits next
        assert!(session.base_inputs.is_none());

        session.commit(changed.clone(), InputMode::Structured, 0.7);
        assert_eq!(session.base_inputs.as_ref().unwrap().experience, 5);
    }

    #[test]
    fn test_commit_overwrites_mode_inputs_and_temperature() {
        let mut session = Session::new();
        session.commit(sample_inputs(), InputMode::Structured, 0.7);
        let mut jd_inputs = sample_inputs();
        jd_inputs.existing_jd = "We are hiring a backend engineer".to_string();

        session.commit(jd_inputs.clone(), InputMode::ExistingJd, 0.2);

        assert_eq!(session.input_mode, Some(InputMode::ExistingJd));
        assert_eq!(session.base_inputs, Some(jd_inputs));
        assert_eq!(session.temperature, 0.2);
    }

    #[test]
    fn test_state_record_has_exactly_four_keys() {
        let mut session = Session::new();
        session.commit(sample_inputs(), InputMode::Structured, 0.7);
        let record = session.state_record();
        assert_eq!(record.len(), 4);
        assert_eq!(record["input_mode"], "STRUCTURED");
        assert!(record["base_inputs"].is_object());
        assert_eq!(record["base_inputs"]["experience"], 3);
    }

    #[test]
    fn test_state_record_before_commit_is_null_mode_empty_inputs() {
        let record = Session::new().state_record();
        assert!(record["input_mode"].is_null());
        assert_eq!(record["base_inputs"].as_object().unwrap().len(), 0);
    }

    #[test]
    fn test_session_serializes_for_debug_dump() {
        let mut session = Session::new();
        session.commit(sample_inputs(), InputMode::Structured, 0.7);
        let dump = serde_json::to_value(&session).unwrap();
        assert_eq!(dump["input_mode"], "STRUCTURED");
        assert_eq!(dump["temperature"], 0.7);
        assert_eq!(dump["base_inputs"]["skills"], "python,sql");
        assert!(dump["jd_versions"].as_array().unwrap().is_empty());
    }
}
