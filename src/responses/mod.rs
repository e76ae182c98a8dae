//! Anonymous submission of responses and their aggregation for owners.

mod view;

pub use view::{
    build_analytics, AnswerView, QuestionAnalytics, ResponseDetail, ResponseView,
    SurveyAnalytics,
};

use crate::error::{ApiError, ApiResult};
use crate::orm::questions;
use crate::store;
use crate::store::responses::{NewAnswer, NewResponse};
use crate::surveys::{SurveyService, SurveySummary};
use sea_orm::{DatabaseConnection, TransactionTrait};
use serde::Deserialize;
use std::collections::HashSet;
use validator::Validate;

pub const RESPONSE_NOT_FOUND: &str = "Response not found";
pub const INVALID_QUESTION: &str = "Invalid question";

/// A single answer value: free text, or several selected options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Text(String),
    Multiple(Vec<String>),
}

impl AnswerValue {
    /// Text is stored verbatim, multiple values as a JSON array.
    pub fn encode(&self) -> ApiResult<String> {
        match self {
            AnswerValue::Text(text) => Ok(text.clone()),
            AnswerValue::Multiple(values) => Ok(serde_json::to_string(values)?),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerInput {
    pub question_id: i32,
    pub value: AnswerValue,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitInput {
    pub survey_id: i32,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub respondent_name: Option<String>,
    #[serde(default)]
    #[validate(email, length(max = 255))]
    pub respondent_email: Option<String>,
    #[serde(default)]
    pub answers: Vec<AnswerInput>,
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// Checks submitted answers against the survey's questions.
///
/// Required questions are checked first, in question order, and the first
/// unanswered one names the error. Then every answer must point at a
/// question of this survey.
pub fn check_answers(questions: &[questions::Model], answers: &[AnswerInput]) -> ApiResult<()> {
    let answered: HashSet<i32> = answers.iter().map(|a| a.question_id).collect();
    if let Some(missing) = questions
        .iter()
        .find(|q| q.required && !answered.contains(&q.id))
    {
        return Err(ApiError::bad_request(format!(
            "Question \"{}\" is required",
            missing.title
        )));
    }

    let known: HashSet<i32> = questions.iter().map(|q| q.id).collect();
    if answers.iter().any(|a| !known.contains(&a.question_id)) {
        return Err(ApiError::bad_request(INVALID_QUESTION));
    }

    Ok(())
}

#[derive(Clone)]
pub struct ResponseService {
    db: DatabaseConnection,
    surveys: SurveyService,
}

impl ResponseService {
    pub fn new(db: DatabaseConnection, surveys: SurveyService) -> Self {
        Self { db, surveys }
    }

    /// Responses of an owned survey, newest first.
    pub async fn list_for_survey(&self, survey_id: i32, user_id: i32) -> ApiResult<Vec<ResponseView>> {
        let survey = self.surveys.require_owned(survey_id, user_id).await?;

        let responses = store::responses::find_by_survey(&self.db, survey.id).await?;
        let ids = responses.iter().map(|r| r.id).collect();
        let answers = store::responses::find_answers(&self.db, ids).await?;
        let questions = store::questions::find_by_survey(&self.db, survey.id).await?;

        Ok(view::build_response_views(responses, answers, &questions))
    }

    pub async fn get_by_id(&self, response_id: i32) -> ApiResult<ResponseDetail> {
        let response = store::responses::find_by_id(&self.db, response_id)
            .await?
            .ok_or_else(|| ApiError::not_found(RESPONSE_NOT_FOUND))?;

        let survey = store::surveys::find_by_id(&self.db, response.survey_id)
            .await?
            .ok_or_else(|| ApiError::not_found(RESPONSE_NOT_FOUND))?;
        let answers = store::responses::find_answers(&self.db, vec![response.id]).await?;
        let question_ids = answers.iter().map(|a| a.question_id).collect();
        let questions = store::questions::find_by_ids(&self.db, question_ids).await?;

        let response = view::build_response_views(vec![response], answers, &questions)
            .pop()
            .ok_or_else(|| ApiError::internal("response view was not built"))?;

        Ok(ResponseDetail {
            response,
            survey: SurveySummary::from(&survey),
        })
    }

    /// Records an anonymous response to a published, unexpired survey.
    pub async fn submit(&self, input: SubmitInput, ip_address: Option<String>) -> ApiResult<ResponseDetail> {
        let survey = self.surveys.require_public(input.survey_id).await?;
        let questions = store::questions::find_by_survey(&self.db, survey.id).await?;

        if let Err(e) = check_answers(&questions, &input.answers) {
            log::debug!("Submission rejected for survey_id={}: {}", survey.id, e);
            return Err(e);
        }

        let input = SubmitInput {
            respondent_name: blank_to_none(input.respondent_name),
            respondent_email: blank_to_none(input.respondent_email),
            ..input
        };
        input.validate().map_err(|e| {
            log::debug!("Respondent validation failed: {}", e);
            ApiError::bad_request("Invalid respondent data")
        })?;

        let new_answers = input
            .answers
            .iter()
            .map(|a| {
                Ok(NewAnswer {
                    question_id: a.question_id,
                    value: a.value.encode()?,
                })
            })
            .collect::<ApiResult<Vec<_>>>()?;

        let txn = self.db.begin().await?;
        let response = store::responses::insert(
            &txn,
            NewResponse {
                survey_id: survey.id,
                respondent_name: input.respondent_name,
                respondent_email: input.respondent_email,
                ip_address,
            },
            new_answers,
        )
        .await?;
        txn.commit().await?;

        log::info!(
            "Response submitted: response_id={} survey_id={}",
            response.id,
            survey.id
        );
        self.get_by_id(response.id).await
    }

    /// Only the owner of the parent survey may delete a response.
    pub async fn delete(&self, response_id: i32, user_id: i32) -> ApiResult<()> {
        let response = store::responses::find_by_id(&self.db, response_id)
            .await?
            .ok_or_else(|| ApiError::not_found(RESPONSE_NOT_FOUND))?;

        if store::surveys::find_owned(&self.db, response.survey_id, user_id)
            .await?
            .is_none()
        {
            log::warn!(
                "Response deletion denied: response_id={} user_id={}",
                response_id,
                user_id
            );
            return Err(ApiError::unauthorized(
                "You do not have permission to delete this response",
            ));
        }

        let txn = self.db.begin().await?;
        store::responses::delete(&txn, response_id).await?;
        txn.commit().await?;

        log::info!("Response deleted: response_id={}", response_id);
        Ok(())
    }

    pub async fn analytics(&self, survey_id: i32, user_id: i32) -> ApiResult<SurveyAnalytics> {
        let survey = self.surveys.require_owned(survey_id, user_id).await?;

        let responses = store::responses::find_by_survey(&self.db, survey.id).await?;
        let ids = responses.iter().map(|r| r.id).collect();
        let answers = store::responses::find_answers(&self.db, ids).await?;
        let questions = store::questions::find_by_survey(&self.db, survey.id).await?;

        Ok(build_analytics(
            SurveySummary::from(&survey),
            &questions,
            &responses,
            &answers,
        ))
    }
}
