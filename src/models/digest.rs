use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::ErrorResult;

/// How much an insight could change the founder's trajectory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactLevel {
    GameChanger,
    HighImpact,
    ModerateImpact,
    Tactical,
    /// Missing or not one of the levels the prompt asks for
    #[default]
    Unknown,
}

impl ImpactLevel {
    pub fn label(&self) -> &'static str {
        match self {
            ImpactLevel::GameChanger => "game changer",
            ImpactLevel::HighImpact => "high impact",
            ImpactLevel::ModerateImpact => "moderate impact",
            ImpactLevel::Tactical => "tactical",
            ImpactLevel::Unknown => "unrated",
        }
    }
}

/// A piece of SME guidance extracted from the transcript
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_score")]
    pub confidence_score: f64,
    #[serde(default, deserialize_with = "lenient_impact")]
    pub impact_level: ImpactLevel,
    #[serde(default, deserialize_with = "lenient_text")]
    pub reasoning: String,
}

impl Insight {
    /// Read an insight entry without ever failing.
    ///
    /// A bare string is taken as the description; anything that is neither a
    /// string nor an object yields an empty insight.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(text) => Insight {
                description: text.clone(),
                ..Default::default()
            },
            Value::Object(_) => serde_json::from_value(value.clone()).unwrap_or_default(),
            _ => Insight::default(),
        }
    }
}

/// A notable SME quote with its estimated position in the conversation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Estimated `mm:ss`
    #[serde(default, deserialize_with = "lenient_text")]
    pub timestamp: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub quote: String,
    #[serde(default, deserialize_with = "lenient_score")]
    pub relevance_score: f64,
    #[serde(default, deserialize_with = "lenient_text")]
    pub context: String,
}

impl Quote {
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(text) => Quote {
                quote: text.clone(),
                ..Default::default()
            },
            Value::Object(_) => serde_json::from_value(value.clone()).unwrap_or_default(),
            _ => Quote::default(),
        }
    }
}

/// Read a score as a number; numeric strings are accepted, anything else
/// (including "NaN" and "inf") is 0
pub fn score_of(value: &Value) -> f64 {
    let score = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    score.filter(|s| s.is_finite()).unwrap_or(0.0)
}

fn lenient_score<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(score_of(&value))
}

fn lenient_impact<'de, D>(deserializer: D) -> Result<ImpactLevel, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// Parsed (and usually ranked) model answer.
///
/// Holds the JSON object exactly as the model returned it; the typed
/// accessors are read-only views used for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DigestResult(Map<String, Value>);

impl DigestResult {
    pub fn new(object: Map<String, Value>) -> Self {
        Self(object)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn as_map_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    pub fn has_insights(&self) -> bool {
        self.0.contains_key("insights")
    }

    pub fn has_quotes(&self) -> bool {
        self.0.contains_key("quotes")
    }

    pub fn insights(&self) -> Vec<Insight> {
        self.entries("insights").map(Insight::from_value).collect()
    }

    pub fn quotes(&self) -> Vec<Quote> {
        self.entries("quotes").map(Quote::from_value).collect()
    }

    fn entries(&self, key: &str) -> impl Iterator<Item = &Value> {
        self.0
            .get(key)
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
    }
}

/// Final outcome of one analysis: exactly one of the two shapes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DigestOutcome {
    Digest(DigestResult),
    Failed(ErrorResult),
}

impl DigestOutcome {
    pub fn is_error(&self) -> bool {
        matches!(self, DigestOutcome::Failed(_))
    }
}
