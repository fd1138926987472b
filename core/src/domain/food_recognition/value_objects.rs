use serde_json::{Map, Value};
use url::Url;

use crate::domain::{
    common::entities::app_errors::CoreError, food_recognition::entities::NutritionField,
};

#[derive(Debug, Clone)]
pub struct RecognizeFoodInput {
    /// A `data:image/...` URI or an absolute http(s) URL.
    pub image: String,
}

/// A validated image reference, safe to forward to the vision model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageReference {
    DataUri(String),
    Url(Url),
}

impl ImageReference {
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let raw = raw.trim();

        if raw.is_empty() {
            return Err(CoreError::InvalidInput("请提供图片".to_string()));
        }

        if raw.starts_with("data:image") {
            return Ok(ImageReference::DataUri(raw.to_string()));
        }

        match Url::parse(raw) {
            Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {
                Ok(ImageReference::Url(url))
            }
            _ => Err(CoreError::InvalidInput("图片格式不正确".to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ImageReference::DataUri(uri) => uri,
            ImageReference::Url(url) => url.as_str(),
        }
    }

    pub fn len(&self) -> usize {
        self.as_str().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }
}

/// What the model put in its message content once it parsed as JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedContent {
    /// `{ "error": "...", "suggestion": "..." }`
    Declined {
        message: String,
        suggestion: Option<String>,
    },
    Recognition(RawRecognitionResponse),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawRecognitionResponse {
    pub foods: Vec<Value>,
    pub total_calories: Option<f64>,
}

impl RawRecognitionResponse {
    pub fn from_object(object: &Map<String, Value>) -> Self {
        let foods = match object.get("foods") {
            Some(Value::Array(foods)) => foods.clone(),
            _ => Vec::new(),
        };

        Self {
            foods,
            total_calories: object.get("total_calories").and_then(parse_number),
        }
    }
}

/// One nutrition field as the model sent it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawField {
    /// Current shape: `{ "value": 200, "confidence": 80 }`. An unusable
    /// value reads as zero but keeps its confidence.
    Scored { value: f64, confidence: Option<f64> },
    /// Legacy shape: a bare number.
    Bare(f64),
    Missing,
}

impl RawField {
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Object(object)) if object.contains_key("value") => RawField::Scored {
                value: object.get("value").and_then(parse_number).unwrap_or(0.0),
                confidence: object.get("confidence").and_then(parse_confidence),
            },
            Some(other) => parse_number(other).map_or(RawField::Missing, RawField::Bare),
            None => RawField::Missing,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawFoodItem {
    pub food_name: String,
    pub confidence: Option<f64>,
    pub fields: Vec<RawFieldEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawFieldEntry {
    pub field: NutritionField,
    pub raw: RawField,
    /// Legacy `<field>_confidence` sibling, if the model sent one.
    pub sibling_confidence: Option<f64>,
}

impl RawFoodItem {
    /// Returns `None` for items that are not JSON objects.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;

        let food_name = match object.get("food_name") {
            Some(Value::String(name)) => name.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };

        let fields = NutritionField::ALL
            .iter()
            .map(|field| RawFieldEntry {
                field: *field,
                raw: RawField::from_value(object.get(field.key())),
                sibling_confidence: object
                    .get(&format!("{}_confidence", field.key()))
                    .and_then(parse_confidence),
            })
            .collect();

        Some(Self {
            food_name,
            confidence: object.get("confidence").and_then(parse_confidence),
            fields,
        })
    }
}

pub fn parse_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }?;

    number.is_finite().then_some(number)
}

/// Accepts numbers, numeric strings and the words `high`/`medium`/`low`.
pub fn parse_confidence(value: &Value) -> Option<f64> {
    if let Value::String(text) = value {
        match text.trim().to_ascii_lowercase().as_str() {
            "high" => return Some(90.0),
            "medium" => return Some(65.0),
            "low" => return Some(40.0),
            _ => {}
        }
    }
    parse_number(value)
}
