//! Mode selection and record validation for one intake cycle.

use crate::intake::models::{
    BaseInput, ExistingJdInput, InputMode, RawInputs, StructuredInput,
};
use crate::intake::schema::{FieldSpec, FieldType, Schema, SchemaValidationError};
use crate::intake::session::Session;

/// Accepted education levels for structured input. The empty string is a
/// distinct "nothing selected" value, rejected as empty rather than as
/// out-of-set.
pub const EDUCATION_LEVELS: &[&str] = &["Graduate", "Post Graduate", "PhD"];

/// Inclusive bounds on years of experience.
pub const EXPERIENCE_RANGE: (i64, i64) = (0, 30);

/// Inclusive bounds on the generation temperature.
pub const TEMPERATURE_RANGE: (f64, f64) = (0.0, 1.0);

const STRUCTURED_SCHEMA: Schema = Schema {
    record: "structured_input",
    fields: &[
        FieldSpec {
            name: "education",
            ty: FieldType::Str {
                non_empty: true,
                one_of: Some(EDUCATION_LEVELS),
            },
        },
        FieldSpec {
            name: "experience",
            ty: FieldType::Int {
                min: EXPERIENCE_RANGE.0,
                max: EXPERIENCE_RANGE.1,
            },
        },
        FieldSpec {
            name: "skills",
            ty: FieldType::Str {
                non_empty: true,
                one_of: None,
            },
        },
        FieldSpec {
            name: "functional_area",
            ty: FieldType::Str {
                non_empty: true,
                one_of: None,
            },
        },
    ],
};

const EXISTING_JD_SCHEMA: Schema = Schema {
    record: "existing_jd_input",
    fields: &[FieldSpec {
        name: "existing_jd",
        ty: FieldType::Str {
            non_empty: true,
            one_of: None,
        },
    }],
};

const SESSION_STATE_SCHEMA: Schema = Schema {
    record: "session_state",
    fields: &[
        FieldSpec {
            name: "session_id",
            ty: FieldType::Str {
                non_empty: true,
                one_of: None,
            },
        },
        FieldSpec {
            name: "input_mode",
            ty: FieldType::Str {
                non_empty: true,
                one_of: Some(&["STRUCTURED", "EXISTING_JD"]),
            },
        },
        FieldSpec {
            name: "temperature",
            ty: FieldType::Float {
                min: TEMPERATURE_RANGE.0,
                max: TEMPERATURE_RANGE.1,
            },
        },
        FieldSpec {
            name: "base_inputs",
            ty: FieldType::Object,
        },
    ],
};

/// The sole mode-selection rule: a non-empty pasted JD (after trimming) wins,
/// everything else is structured input. Which structured fields happen to be
/// filled plays no part.
pub fn determine_mode(existing_jd: &str) -> InputMode {
    if existing_jd.trim().is_empty() {
        InputMode::Structured
    } else {
        InputMode::ExistingJd
    }
}

/// Validates one generate action: builds the mode's base-input record, checks
/// it against its schema, then re-checks the session-state record under the
/// same strict rules. Stop-on-first-failing-record: a failing base record is
/// reported in full and the session record is never reached.
///
/// Pure: no session mutation, same inputs give the same outcome.
pub fn validate_inputs(
    mode: InputMode,
    raw: &RawInputs,
    session: &Session,
) -> Result<BaseInput, SchemaValidationError> {
    let base = match mode {
        InputMode::Structured => {
            let input = StructuredInput {
                education: raw.education.clone(),
                experience: raw.experience,
                skills: raw.skills.clone(),
                functional_area: raw.functional_area.clone(),
            };
            STRUCTURED_SCHEMA.validate(&input.record())?;
            BaseInput::Structured(input)
        }
        InputMode::ExistingJd => {
            let input = ExistingJdInput {
                existing_jd: raw.existing_jd.clone(),
            };
            EXISTING_JD_SCHEMA.validate(&input.record())?;
            BaseInput::ExistingJd(input)
        }
    };

    // Consistency self-check on the session's own shape. A failure here is an
    // internal defect, surfaced through the same error type.
    SESSION_STATE_SCHEMA.validate(&session.state_record())?;

    Ok(base)
}
