use crate::orm::questions::{self, QuestionType};
use crate::orm::surveys::{self, SurveyStatus};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::Serialize;

pub(crate) fn utc(naive: NaiveDateTime) -> DateTime<Utc> {
    Utc.from_utc_datetime(&naive)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub id: i32,
    pub survey_id: i32,
    pub title: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub options: Option<Vec<String>>,
    pub order: i32,
    pub required: bool,
}

impl From<questions::Model> for QuestionView {
    fn from(q: questions::Model) -> Self {
        let options = q.options.as_deref().and_then(|raw| {
            serde_json::from_str(raw)
                .map_err(|e| log::warn!("Unreadable options on question {}: {}", q.id, e))
                .ok()
        });

        Self {
            id: q.id,
            survey_id: q.survey_id,
            title: q.title,
            question_type: q.question_type,
            options,
            order: q.display_order,
            required: q.required,
        }
    }
}

/// A survey with its questions in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyDetail {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub status: SurveyStatus,
    pub created_by: i32,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub questions: Vec<QuestionView>,
}

impl SurveyDetail {
    pub fn new(survey: surveys::Model, questions: Vec<questions::Model>) -> Self {
        Self {
            id: survey.id,
            title: survey.title,
            description: survey.description,
            status: survey.status,
            created_by: survey.created_by,
            expires_at: survey.expires_at.map(utc),
            created_at: utc(survey.created_at),
            updated_at: utc(survey.updated_at),
            questions: questions.into_iter().map(QuestionView::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SurveySummary {
    pub id: i32,
    pub title: String,
    pub status: SurveyStatus,
}

impl From<&surveys::Model> for SurveySummary {
    fn from(survey: &surveys::Model) -> Self {
        Self {
            id: survey.id,
            title: survey.title.clone(),
            status: survey.status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsCounts {
    pub total_responses: usize,
    pub question_count: usize,
    pub status: SurveyStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurveyStats {
    pub survey: SurveyDetail,
    pub stats: StatsCounts,
}
