//! One synchronous re-evaluation cycle per user interaction.
//!
//! Every keystroke-equivalent runs the same top-to-bottom sequence:
//! normalize the form, reconcile against the committed inputs (maybe hard
//! reset), determine the mode, commit, and validate only when the generate
//! action fired. There are no suspension points and no background work.

use serde_json::Value;
use tracing::{debug, error, info};

use crate::intake::models::{BaseInput, FormSnapshot, InputMode};
use crate::intake::schema::SchemaValidationError;
use crate::intake::session::Session;
use crate::intake::validation::{determine_mode, validate_inputs};

/// Outcome of one cycle, mirroring the three renderable kinds: nothing was
/// requested, the inputs validated, or validation failed with field errors.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    NoAction,
    Validated(BaseInput),
    Rejected(SchemaValidationError),
}

/// What one cycle did, for the rendering layer.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub mode: InputMode,
    pub reset_occurred: bool,
    pub outcome: Outcome,
}

/// Owns the session record and drives the interaction cycle. One engine per
/// active user interaction; no sharing, no locking.
#[derive(Debug, Default)]
pub struct IntakeEngine {
    session: Session,
}

impl IntakeEngine {
    pub fn new() -> Self {
        let session = Session::new();
        info!("Intake session {} started", session.session_id);
        IntakeEngine { session }
    }

    /// Runs one full re-evaluation cycle over the current form values.
    pub fn run_cycle(&mut self, form: &FormSnapshot) -> CycleReport {
        let current = form.base_inputs();
        let reset_occurred = self.session.reconcile(&current);
        let mode = determine_mode(&form.existing_jd);
        self.session.commit(current.clone(), mode, form.temperature);
        debug!(
            "Cycle committed: session {} mode {} reset={reset_occurred}",
            self.session.session_id,
            mode.as_str()
        );

        let outcome = if form.generate {
            match validate_inputs(mode, &current, &self.session) {
                Ok(base) => Outcome::Validated(base),
                Err(err) => {
                    if err.record == "session_state" {
                        // Not a user-input problem: the session's own shape
                        // failed its consistency check.
                        error!("session-state record failed validation: {err}");
                    }
                    Outcome::Rejected(err)
                }
            }
        } else {
            Outcome::NoAction
        };

        CycleReport {
            mode,
            reset_occurred,
            outcome,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Read-only dump of the full session record, for the debug panel.
    pub fn session_dump(&self) -> Value {
        serde_json::to_value(&self.session).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::schema::Constraint;

    fn structured_form() -> FormSnapshot {
        FormSnapshot {
            existing_jd: String::new(),
            education: "Graduate".to_string(),
            experience: 3,
            skills: "python,sql".to_string(),
            functional_area: "Data".to_string(),
            temperature: 0.7,
            generate: false,
        }
    }

    #[test]
    fn test_cycle_without_generate_takes_no_action() {
        let mut engine = IntakeEngine::new();
        let report = engine.run_cycle(&structured_form());
        assert_eq!(report.mode, InputMode::Structured);
        assert!(!report.reset_occurred);
        assert_eq!(report.outcome, Outcome::NoAction);
        // the cycle still committed
        assert!(engine.session().base_inputs.is_some());
    }

    #[test]
    fn test_generate_on_valid_structured_form_validates() {
        let mut engine = IntakeEngine::new();
        let mut form = structured_form();
        form.generate = true;
        let report = engine.run_cycle(&form);
        assert!(matches!(
            report.outcome,
            Outcome::Validated(BaseInput::Structured(_))
        ));
    }

    #[test]
    fn test_generate_on_pasted_jd_validates_in_existing_mode() {
        let mut engine = IntakeEngine::new();
        let form = FormSnapshot {
            existing_jd: "We are hiring a backend engineer...".to_string(),
            generate: true,
            ..FormSnapshot::default()
        };
        let report = engine.run_cycle(&form);
        assert_eq!(report.mode, InputMode::ExistingJd);
        assert!(matches!(
            report.outcome,
            Outcome::Validated(BaseInput::ExistingJd(_))
        ));
    }

    #[test]
    fn test_generate_on_empty_form_reports_field_errors() {
        let mut engine = IntakeEngine::new();
        let form = FormSnapshot {
            generate: true,
            ..FormSnapshot::default()
        };
        let report = engine.run_cycle(&form);
        let Outcome::Rejected(err) = report.outcome else {
            panic!("expected rejection");
        };
        assert_eq!(err.record, "structured_input");
        assert!(err
            .violations
            .iter()
            .any(|v| v.field == "education" && v.constraint == Constraint::NonEmpty));
    }

    // Scenario C: commit, then change one field -> fresh session id.
    #[test]
    fn test_changing_a_field_resets_the_session() {
        let mut engine = IntakeEngine::new();
        engine.run_cycle(&structured_form());
        let old_id = engine.session().session_id;

        let mut changed = structured_form();
        changed.experience = 5;
        let report = engine.run_cycle(&changed);

        assert!(report.reset_occurred);
        assert_ne!(engine.session().session_id, old_id);
        assert_eq!(
            engine.session().base_inputs.as_ref().unwrap().experience,
            5
        );
    }

    #[test]
    fn test_repeating_the_same_form_keeps_the_session() {
        let mut engine = IntakeEngine::new();
        engine.run_cycle(&structured_form());
        let id = engine.session().session_id;
        let report = engine.run_cycle(&structured_form());
        assert!(!report.reset_occurred);
        assert_eq!(engine.session().session_id, id);
    }

    #[test]
    fn test_temperature_change_alone_does_not_reset() {
        // temperature is not part of the base inputs
        let mut engine = IntakeEngine::new();
        engine.run_cycle(&structured_form());
        let id = engine.session().session_id;

        let mut warmer = structured_form();
        warmer.temperature = 0.9;
        let report = engine.run_cycle(&warmer);

        assert!(!report.reset_occurred);
        assert_eq!(engine.session().session_id, id);
        assert_eq!(engine.session().temperature, 0.9);
    }

    #[test]
    fn test_switching_to_pasted_jd_resets_and_flips_mode() {
        let mut engine = IntakeEngine::new();
        engine.run_cycle(&structured_form());
        let old_id = engine.session().session_id;

        let mut form = structured_form();
        form.existing_jd = "We are hiring".to_string();
        let report = engine.run_cycle(&form);

        assert!(report.reset_occurred);
        assert_eq!(report.mode, InputMode::ExistingJd);
        assert_ne!(engine.session().session_id, old_id);
        assert_eq!(engine.session().input_mode, Some(InputMode::ExistingJd));
    }

    #[test]
    fn test_validation_failure_leaves_committed_state_intact() {
        let mut engine = IntakeEngine::new();
        let form = FormSnapshot {
            education: "Graduate".to_string(),
            experience: 31,
            skills: "python".to_string(),
            functional_area: "Data".to_string(),
            generate: true,
            ..FormSnapshot::default()
        };
        let report = engine.run_cycle(&form);
        assert!(matches!(report.outcome, Outcome::Rejected(_)));
        // commit happened before validation and survives the failure
        assert_eq!(
            engine.session().base_inputs.as_ref().unwrap().experience,
            31
        );
    }

    #[test]
    fn test_session_dump_exposes_the_full_record() {
        let mut engine = IntakeEngine::new();
        engine.run_cycle(&structured_form());
        let dump = engine.session_dump();
        assert_eq!(dump["input_mode"], "STRUCTURED");
        assert_eq!(dump["base_inputs"]["functional_area"], "Data");
        assert_eq!(dump["temperature"], 0.7);
        assert!(dump["session_id"].is_string());
    }
}
