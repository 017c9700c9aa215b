//! Record shapes for the intake cycle: raw form values, the two alternative
//! base-input records, and the reserved generation output shape.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Mutually exclusive input modes. Recomputed every cycle from whether the
/// pasted-JD field is non-empty after trimming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InputMode {
    Structured,
    ExistingJd,
}

impl InputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputMode::Structured => "STRUCTURED",
            InputMode::ExistingJd => "EXISTING_JD",
        }
    }
}

/// One cycle's worth of raw form values, exactly as the form-rendering layer
/// hands them over: five field values, the temperature slider, and whether
/// the generate action fired this cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct FormSnapshot {
    pub existing_jd: String,
    pub education: String,
    pub experience: i64,
    pub skills: String,
    pub functional_area: String,
    pub temperature: f64,
    pub generate: bool,
}

impl Default for FormSnapshot {
    fn default() -> Self {
        FormSnapshot {
            existing_jd: String::new(),
            education: String::new(),
            experience: 0,
            skills: String::new(),
            functional_area: String::new(),
            temperature: crate::intake::session::DEFAULT_TEMPERATURE,
            generate: false,
        }
    }
}

impl FormSnapshot {
    /// Normalizes the five form fields into the change-detection key:
    /// free-text fields trimmed, select/slider values kept as-is.
    pub fn base_inputs(&self) -> RawInputs {
        RawInputs {
            existing_jd: self.existing_jd.trim().to_string(),
            education: self.education.clone(),
            experience: self.experience,
            skills: self.skills.trim().to_string(),
            functional_area: self.functional_area.trim().to_string(),
        }
    }
}

/// The committed base inputs: one value per form field regardless of mode.
/// Structural equality on this record is what triggers a hard session reset.
///
/// `experience` is signed on purpose: out-of-range values must be
/// representable so the validator, not the type, rejects them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawInputs {
    pub existing_jd: String,
    pub education: String,
    pub experience: i64,
    pub skills: String,
    pub functional_area: String,
}

impl RawInputs {
    /// The five-key map shape the session-state record embeds.
    pub fn record(&self) -> Map<String, Value> {
        let mut record = Map::new();
        record.insert("existing_jd".into(), Value::from(self.existing_jd.clone()));
        record.insert("education".into(), Value::from(self.education.clone()));
        record.insert("experience".into(), Value::from(self.experience));
        record.insert("skills".into(), Value::from(self.skills.clone()));
        record.insert(
            "functional_area".into(),
            Value::from(self.functional_area.clone()),
        );
        record
    }
}

/// Structured-attributes request, relevant only in `STRUCTURED` mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredInput {
    pub education: String,
    pub experience: i64,
    pub skills: String,
    pub functional_area: String,
}

impl StructuredInput {
    pub fn record(&self) -> Map<String, Value> {
        let mut record = Map::new();
        record.insert("education".into(), Value::from(self.education.clone()));
        record.insert("experience".into(), Value::from(self.experience));
        record.insert("skills".into(), Value::from(self.skills.clone()));
        record.insert(
            "functional_area".into(),
            Value::from(self.functional_area.clone()),
        );
        record
    }
}

/// Pasted-document request, relevant only in `EXISTING_JD` mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExistingJdInput {
    pub existing_jd: String,
}

impl ExistingJdInput {
    pub fn record(&self) -> Map<String, Value> {
        let mut record = Map::new();
        record.insert("existing_jd".into(), Value::from(self.existing_jd.clone()));
        record
    }
}

/// The single base-request sum type: exactly one alternative is live per
/// session, selected by [`InputMode`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BaseInput {
    Structured(StructuredInput),
    ExistingJd(ExistingJdInput),
}

/// Target shape of a generated JD. Reserved for the generation phase; this
/// core never produces one, but `jd_versions` is typed against it so the
/// session dump already carries the final contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct JdOutput {
    pub education: String,
    pub experience: String,
    pub skills: Vec<String>,
    pub roles_and_responsibilities: Vec<String>,
}
