//! Declarative output contracts.
//!
//! A contract describes the shape a generation response must have: field
//! names, types, numeric ranges, required-ness and array cardinality. It is
//! rendered into the service's `responseSchema` dialect when a request is
//! sent, and checked against the parsed response when it comes back.
//! Validation is all-or-nothing: the first violation rejects the response.

use neuro_core::{BigFiveTrait, CognitiveMetric, CurvePhase};
use serde_json::{json, Map, Value};

/// Which typed result a contract decodes into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContractKind {
    Profile,
    Scenario,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    String,
    /// String that must contain more than whitespace
    Text,
    /// String restricted to a fixed set of values
    Enum(Vec<&'static str>),
    Number {
        min: Option<f64>,
        max: Option<f64>,
    },
    Object(Vec<Field>),
    Array {
        items: Box<FieldKind>,
        min_items: usize,
        max_items: Option<usize>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub description: Option<&'static str>,
}

impl Field {
    pub fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
            description: None,
        }
    }

    pub fn string(name: &'static str) -> Self {
        Self::new(name, FieldKind::String)
    }

    pub fn text(name: &'static str) -> Self {
        Self::new(name, FieldKind::Text)
    }

    pub fn number(name: &'static str, min: Option<f64>, max: Option<f64>) -> Self {
        Self::new(name, FieldKind::Number { min, max })
    }

    /// Number on the shared 0-100 scale
    pub fn score(name: &'static str) -> Self {
        Self::number(name, Some(0.0), Some(100.0)).describe("Score from 0-100")
    }

    pub fn object(name: &'static str, fields: Vec<Field>) -> Self {
        Self::new(name, FieldKind::Object(fields))
    }

    pub fn array(name: &'static str, items: FieldKind, min_items: usize) -> Self {
        Self::new(
            name,
            FieldKind::Array {
                items: Box::new(items),
                min_items,
                max_items: None,
            },
        )
    }

    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    /// Caps an array field; no-op on other kinds
    pub fn max_items(mut self, max: usize) -> Self {
        if let FieldKind::Array { max_items, .. } = &mut self.kind {
            *max_items = Some(max);
        }
        self
    }
}

/// Contract violation, naming the offending JSON path
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ContractViolation {
    #[error("missing required field `{path}`")]
    MissingField { path: String },

    #[error("field `{path}` is blank")]
    BlankText { path: String },

    #[error("field `{path}` should be {expected}")]
    WrongType { path: String, expected: &'static str },

    #[error("field `{path}` is {value}, outside {bounds}")]
    OutOfRange {
        path: String,
        value: f64,
        bounds: String,
    },

    #[error("field `{path}` is {value:?}, expected one of {allowed:?}")]
    UnexpectedValue {
        path: String,
        value: String,
        allowed: Vec<&'static str>,
    },

    #[error("array `{path}` has {len} entries, expected at least {min}")]
    TooFewItems { path: String, len: usize, min: usize },

    #[error("array `{path}` has {len} entries, expected at most {max}")]
    TooManyItems { path: String, len: usize, max: usize },
}

/// Required output shape for one generation mode
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaContract {
    kind: ContractKind,
    fields: Vec<Field>,
}

impl SchemaContract {
    pub fn new(kind: ContractKind, fields: Vec<Field>) -> Self {
        Self { kind, fields }
    }

    pub fn kind(&self) -> ContractKind {
        self.kind
    }

    /// Narrative, researcher report, charts and scientific analysis
    pub fn profile() -> Self {
        Self::new(
            ContractKind::Profile,
            vec![
                Field::text("narrativeReport").describe(
                    "A creative, first-person story of a typical day for this individual. \
                     Describe their thoughts, feelings, social interactions, and \
                     problem-solving approaches. About 3-4 paragraphs long.",
                ),
                researcher_report_field(),
                charts_data_field(),
                scientific_analysis_field(),
            ],
        )
    }

    /// Narrative, outcome, three-point emotional curve and metrics
    pub fn scenario() -> Self {
        let curve_point = FieldKind::Object(vec![
            Field::new(
                "time",
                FieldKind::Enum(CurvePhase::ALL.iter().map(|p| p.key()).collect()),
            )
            .describe("Phase of the scenario: start, middle or end"),
            Field::score("stress"),
            Field::score("focus"),
            Field::score("confidence"),
        ]);

        let metric = FieldKind::Object(vec![
            Field::string("name"),
            Field::score("value"),
            Field::string("explanation"),
        ]);

        Self::new(
            ContractKind::Scenario,
            vec![
                Field::text("narrative").describe(
                    "First-person account of how this individual experiences the scenario.",
                ),
                Field::text("outcome").describe("How the scenario most likely ends."),
                Field::array("emotionalResponseCurve", curve_point, 3)
                    .max_items(3)
                    .describe("Exactly three points, in order: start, middle, end."),
                Field::array("performanceMetrics", metric, 1)
                    .describe("Scenario-relevant performance scores with justification."),
            ],
        )
    }

    /// Check a parsed response; the first violation found is returned
    pub fn validate(&self, value: &Value) -> Result<(), ContractViolation> {
        let object = value.as_object().ok_or_else(|| ContractViolation::WrongType {
            path: "$".to_string(),
            expected: "an object",
        })?;
        validate_fields(&self.fields, object, "")
    }

    /// Render in the service's `responseSchema` dialect
    pub fn to_response_schema(&self) -> Value {
        object_schema(&self.fields)
    }
}

fn researcher_report_field() -> Field {
    let strings = || FieldKind::String;

    Field::object(
        "researcherReport",
        vec![
            Field::object(
                "cognitiveAnalysis",
                vec![
                    Field::array("strengths", strings(), 1),
                    Field::array("weaknesses", strings(), 1),
                ],
            ),
            Field::object(
                "bigFiveProfile",
                BigFiveTrait::ALL.iter().map(|t| Field::score(t.key())).collect(),
            ),
            Field::array("predispositions", strings(), 1).describe(
                "Potential predispositions like anxiety, high creativity, depression, focus, etc.",
            ),
        ],
    )
}

fn charts_data_field() -> Field {
    let name_value = FieldKind::Object(vec![
        Field::string("name"),
        Field::score("value").describe("Relative level from 0-100"),
    ]);

    let stress_point = FieldKind::Object(vec![
        Field::number("time", Some(0.0), None).describe("Time point, e.g., 0, 1, 2..."),
        Field::score("cortisol"),
        Field::score("dopamine"),
    ]);

    let activity_point = FieldKind::Object(vec![
        Field::string("area").describe("e.g., PFC, Amygdala, Hippocampus, Striatum"),
        Field::number("x", Some(-10.0), Some(10.0)).describe("Coordinate between -10 and 10"),
        Field::number("y", Some(-10.0), Some(10.0)).describe("Coordinate between -10 and 10"),
        Field::score("activity").describe("Activity level from 0 to 100"),
    ]);

    Field::object(
        "chartsData",
        vec![
            Field::object(
                "radarProfile",
                CognitiveMetric::ALL.iter().map(|m| Field::score(m.key())).collect(),
            ),
            Field::array("neurotransmitterBalance", name_value, 1),
            Field::array("stressResponseCurve", stress_point, 1)
                .describe("Simulate levels over 8-10 time points after a stressful event."),
            Field::array("brainActivityMap", activity_point, 1)
                .describe("Provide data for 5-7 key brain regions."),
        ],
    )
}

fn scientific_analysis_field() -> Field {
    let formula = |name: &'static str| {
        Field::object(
            name,
            vec![
                Field::string("formula").describe("LaTeX formula over the brain parameters"),
                Field::string("calculation")
                    .describe("The formula with this profile's values substituted"),
                Field::string("explanation"),
            ],
        )
    };

    Field::object(
        "scientificAnalysis",
        vec![
            Field::object(
                "cognitiveMetrics",
                CognitiveMetric::ALL.iter().map(|m| formula(m.key())).collect(),
            ),
            Field::object(
                "personalityTraits",
                BigFiveTrait::ALL.iter().map(|t| formula(t.key())).collect(),
            ),
            Field::string("summary"),
        ],
    )
}

fn join(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}.{name}")
    }
}

fn validate_fields(
    fields: &[Field],
    object: &Map<String, Value>,
    parent: &str,
) -> Result<(), ContractViolation> {
    for field in fields {
        let path = join(parent, field.name);
        match object.get(field.name) {
            None | Some(Value::Null) if field.required => {
                return Err(ContractViolation::MissingField { path });
            }
            None | Some(Value::Null) => {}
            Some(value) => validate_value(&field.kind, value, &path)?,
        }
    }
    Ok(())
}

fn validate_value(kind: &FieldKind, value: &Value, path: &str) -> Result<(), ContractViolation> {
    match kind {
        FieldKind::String => {
            if !value.is_string() {
                return Err(wrong_type(path, "a string"));
            }
        }
        FieldKind::Text => {
            let text = value.as_str().ok_or_else(|| wrong_type(path, "a string"))?;
            if text.trim().is_empty() {
                return Err(ContractViolation::BlankText {
                    path: path.to_string(),
                });
            }
        }
        FieldKind::Enum(allowed) => {
            let text = value.as_str().ok_or_else(|| wrong_type(path, "a string"))?;
            if !allowed.contains(&text) {
                return Err(ContractViolation::UnexpectedValue {
                    path: path.to_string(),
                    value: text.to_string(),
                    allowed: allowed.clone(),
                });
            }
        }
        FieldKind::Number { min, max } => {
            let number = value.as_f64().ok_or_else(|| wrong_type(path, "a number"))?;
            let below = min.map_or(false, |m| number < m);
            let above = max.map_or(false, |m| number > m);
            if below || above {
                return Err(ContractViolation::OutOfRange {
                    path: path.to_string(),
                    value: number,
                    bounds: format_bounds(*min, *max),
                });
            }
        }
        FieldKind::Object(fields) => {
            let object = value.as_object().ok_or_else(|| wrong_type(path, "an object"))?;
            validate_fields(fields, object, path)?;
        }
        FieldKind::Array {
            items,
            min_items,
            max_items,
        } => {
            let array = value.as_array().ok_or_else(|| wrong_type(path, "an array"))?;
            if array.len() < *min_items {
                return Err(ContractViolation::TooFewItems {
                    path: path.to_string(),
                    len: array.len(),
                    min: *min_items,
                });
            }
            if let Some(max) = max_items {
                if array.len() > *max {
                    return Err(ContractViolation::TooManyItems {
                        path: path.to_string(),
                        len: array.len(),
                        max: *max,
                    });
                }
            }
            for (i, item) in array.iter().enumerate() {
                validate_value(items, item, &format!("{path}[{i}]"))?;
            }
        }
    }
    Ok(())
}

fn wrong_type(path: &str, expected: &'static str) -> ContractViolation {
    ContractViolation::WrongType {
        path: path.to_string(),
        expected,
    }
}

fn format_bounds(min: Option<f64>, max: Option<f64>) -> String {
    match (min, max) {
        (Some(lo), Some(hi)) => format!("[{lo}, {hi}]"),
        (Some(lo), None) => format!("[{lo}, inf)"),
        (None, Some(hi)) => format!("(-inf, {hi}]"),
        (None, None) => "(-inf, inf)".to_string(),
    }
}

fn object_schema(fields: &[Field]) -> Value {
    let mut properties = Map::new();
    for field in fields {
        let mut schema = kind_schema(&field.kind);
        if let (Some(description), Some(obj)) = (field.description, schema.as_object_mut()) {
            obj.insert("description".to_string(), json!(description));
        }
        properties.insert(field.name.to_string(), schema);
    }

    let required: Vec<&str> = fields.iter().filter(|f| f.required).map(|f| f.name).collect();

    json!({
        "type": "OBJECT",
        "properties": properties,
        "required": required,
    })
}

fn kind_schema(kind: &FieldKind) -> Value {
    match kind {
        FieldKind::String | FieldKind::Text => json!({ "type": "STRING" }),
        FieldKind::Enum(values) => json!({ "type": "STRING", "format": "enum", "enum": values }),
        FieldKind::Number { min, max } => {
            let mut schema = json!({ "type": "NUMBER" });
            if let Some(obj) = schema.as_object_mut() {
                if let Some(lo) = min {
                    obj.insert("minimum".to_string(), json!(lo));
                }
                if let Some(hi) = max {
                    obj.insert("maximum".to_string(), json!(hi));
                }
            }
            schema
        }
        FieldKind::Object(fields) => object_schema(fields),
        FieldKind::Array {
            items,
            min_items,
            max_items,
        } => {
            let mut schema = json!({
                "type": "ARRAY",
                "items": kind_schema(items),
                "minItems": min_items.to_string(),
            });
            if let (Some(max), Some(obj)) = (max_items, schema.as_object_mut()) {
                obj.insert("maxItems".to_string(), json!(max.to_string()));
            }
            schema
        }
    }
}
