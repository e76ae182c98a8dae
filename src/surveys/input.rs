//! Request bodies for survey creation and update, and their validation.

use crate::error::{ApiError, ApiResult};
use crate::orm::questions::QuestionType;
use crate::orm::surveys::SurveyStatus;
use crate::store::questions::NewQuestion;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionInput {
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type", default)]
    pub question_type: QuestionType,
    #[serde(default)]
    pub options: Option<Vec<String>>,
    pub order: i32,
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSurveyInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<SurveyStatus>,
    #[serde(default)]
    pub expires_at: Option<String>,
    #[serde(default)]
    pub questions: Option<Vec<QuestionInput>>,
}

/// Partial update. For `description` and `expiresAt` an explicit `null`
/// clears the value while an absent key leaves it alone. A present
/// `questions` list, even empty, replaces every existing question.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSurveyInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub status: Option<SurveyStatus>,
    #[serde(default, deserialize_with = "present")]
    pub expires_at: Option<Option<String>>,
    #[serde(default)]
    pub questions: Option<Vec<QuestionInput>>,
}

/// Marks a key as present, keeping a `null` value as `Some(None)`.
fn present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

pub fn validate_title(title: &str) -> ApiResult<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ApiError::bad_request("Title is required"));
    }
    Ok(title.to_owned())
}

/// Parses an expiration date. Blank or absent means no expiration.
///
/// Accepted: RFC 3339, `YYYY-MM-DDTHH:MM:SS[.f]` in UTC, or `YYYY-MM-DD`
/// (midnight UTC).
pub fn parse_expiration(raw: Option<&str>) -> ApiResult<Option<NaiveDateTime>> {
    let raw = match raw.map(str::trim) {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Ok(None),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(dt.naive_utc()));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(Some(dt));
        }
    }
    if let Some(dt) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(Some(dt));
    }

    Err(ApiError::bad_request(format!(
        "Invalid expiration date: {}",
        raw
    )))
}

/// Validates question inputs and serializes their options.
pub fn build_questions(inputs: Vec<QuestionInput>) -> ApiResult<Vec<NewQuestion>> {
    inputs
        .into_iter()
        .map(|q| {
            let title = q.title.trim();
            if title.is_empty() {
                return Err(ApiError::bad_request("Question title is required"));
            }

            let options = match q.options {
                Some(options) => Some(serde_json::to_string(&options)?),
                None => None,
            };

            Ok(NewQuestion {
                title: title.to_owned(),
                question_type: q.question_type,
                options,
                display_order: q.order,
                required: q.required,
            })
        })
        .collect()
}
