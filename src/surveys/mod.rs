//! Survey lifecycle: creation, partial update, publication and closing.
//!
//! Owner-scoped operations look the survey up with the owner as part of the
//! query. A survey owned by someone else fails exactly like a missing one.
//!
//! Status moves between DRAFT, PUBLISHED and CLOSED. Entering PUBLISHED
//! requires at least one question, whichever operation sets it.

mod input;
mod view;

pub use input::{
    build_questions, parse_expiration, validate_title, CreateSurveyInput, QuestionInput,
    UpdateSurveyInput,
};
pub use view::{QuestionView, StatsCounts, SurveyDetail, SurveyStats, SurveySummary};

use crate::error::{ApiError, ApiResult};
use crate::orm::surveys::{self, SurveyStatus};
use crate::store;
use crate::store::surveys::{NewSurvey, SurveyChanges};
use chrono::Utc;
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use std::collections::HashMap;

pub const SURVEY_NOT_FOUND: &str = "Survey not found";
pub const SURVEY_NOT_AVAILABLE: &str = "Survey not available";
pub const SURVEY_EXPIRED: &str = "This survey has expired";
pub const PUBLISH_WITHOUT_QUESTIONS: &str = "A survey without questions cannot be published";

/// Guard for entering PUBLISHED.
pub fn ensure_publishable(question_count: usize) -> ApiResult<()> {
    if question_count == 0 {
        return Err(ApiError::bad_request(PUBLISH_WITHOUT_QUESTIONS));
    }
    Ok(())
}

#[derive(Clone)]
pub struct SurveyService {
    db: DatabaseConnection,
}

impl SurveyService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// All surveys of `user_id`, most recent first.
    pub async fn list_owned(&self, user_id: i32) -> ApiResult<Vec<SurveyDetail>> {
        let owned = store::surveys::find_all_by_owner(&self.db, user_id).await?;
        let ids = owned.iter().map(|s| s.id).collect();

        let mut by_survey: HashMap<i32, Vec<_>> = HashMap::new();
        for question in store::questions::find_by_surveys(&self.db, ids).await? {
            by_survey.entry(question.survey_id).or_default().push(question);
        }

        Ok(owned
            .into_iter()
            .map(|survey| {
                let questions = by_survey.remove(&survey.id).unwrap_or_default();
                SurveyDetail::new(survey, questions)
            })
            .collect())
    }

    pub async fn get_owned(&self, survey_id: i32, user_id: i32) -> ApiResult<SurveyDetail> {
        let survey = self.require_owned(survey_id, user_id).await?;
        self.detail(&self.db, survey).await
    }

    /// Published and unexpired survey, for respondents.
    pub async fn get_public(&self, survey_id: i32) -> ApiResult<SurveyDetail> {
        let survey = self.require_public(survey_id).await?;
        self.detail(&self.db, survey).await
    }

    pub async fn create(&self, input: CreateSurveyInput, user_id: i32) -> ApiResult<SurveyDetail> {
        let title = validate_title(&input.title)?;
        let expires_at = parse_expiration(input.expires_at.as_deref())?;
        let new_questions = build_questions(input.questions.unwrap_or_default())?;
        let status = input.status.unwrap_or_default();

        if status == SurveyStatus::Published {
            ensure_publishable(new_questions.len())?;
        }

        let txn = self.db.begin().await?;
        let survey = store::surveys::insert(
            &txn,
            NewSurvey {
                title,
                description: input.description,
                status,
                expires_at,
                created_by: user_id,
            },
        )
        .await?;
        store::questions::insert_many(&txn, survey.id, new_questions).await?;
        txn.commit().await?;

        log::info!(
            "Survey created: survey_id={} user_id={}",
            survey.id,
            user_id
        );
        self.reload(survey.id).await
    }

    pub async fn update(
        &self,
        survey_id: i32,
        input: UpdateSurveyInput,
        user_id: i32,
    ) -> ApiResult<SurveyDetail> {
        let txn = self.db.begin().await?;
        let survey = store::surveys::find_owned(&txn, survey_id, user_id)
            .await?
            .ok_or_else(|| ApiError::not_found(SURVEY_NOT_FOUND))?;

        let changes = SurveyChanges {
            title: input.title.as_deref().map(validate_title).transpose()?,
            description: input.description,
            status: input.status,
            expires_at: input
                .expires_at
                .map(|raw| parse_expiration(raw.as_deref()))
                .transpose()?,
        };
        let replacement = input.questions.map(build_questions).transpose()?;
        let replaced = replacement.is_some();

        // Checked against the status the survey ends up with.
        if changes.status.unwrap_or(survey.status) == SurveyStatus::Published {
            let question_count = match &replacement {
                Some(questions) => questions.len(),
                None => store::questions::count_by_survey(&txn, survey_id).await?,
            };
            ensure_publishable(question_count)?;
        }

        if let Some(questions) = replacement {
            let removed = store::questions::delete_by_survey(&txn, survey_id).await?;
            log::debug!(
                "Replacing {} question(s) of survey_id={} with {}",
                removed,
                survey_id,
                questions.len()
            );
            store::questions::insert_many(&txn, survey_id, questions).await?;
        }

        if replaced && changes.is_empty() {
            store::surveys::touch(&txn, survey).await?;
        } else {
            store::surveys::update(&txn, survey, changes).await?;
        }
        txn.commit().await?;

        log::info!("Survey updated: survey_id={}", survey_id);
        self.reload(survey_id).await
    }

    /// Deletes the survey with its questions, responses and answers.
    pub async fn delete(&self, survey_id: i32, user_id: i32) -> ApiResult<()> {
        let txn = self.db.begin().await?;
        store::surveys::find_owned(&txn, survey_id, user_id)
            .await?
            .ok_or_else(|| ApiError::not_found(SURVEY_NOT_FOUND))?;

        store::responses::delete_by_survey(&txn, survey_id).await?;
        store::questions::delete_by_survey(&txn, survey_id).await?;
        store::surveys::delete(&txn, survey_id).await?;
        txn.commit().await?;

        log::info!("Survey deleted: survey_id={}", survey_id);
        Ok(())
    }

    pub async fn publish(&self, survey_id: i32, user_id: i32) -> ApiResult<SurveyDetail> {
        let survey = self.require_owned(survey_id, user_id).await?;

        let question_count = store::questions::count_by_survey(&self.db, survey_id).await?;
        if let Err(e) = ensure_publishable(question_count) {
            log::debug!("Publish rejected: survey_id={} has no questions", survey_id);
            return Err(e);
        }

        let survey = store::surveys::set_status(&self.db, survey, SurveyStatus::Published).await?;
        log::info!("Survey published: survey_id={}", survey_id);
        self.detail(&self.db, survey).await
    }

    /// Closing has no precondition besides ownership.
    pub async fn close(&self, survey_id: i32, user_id: i32) -> ApiResult<SurveyDetail> {
        let survey = self.require_owned(survey_id, user_id).await?;
        let survey = store::surveys::set_status(&self.db, survey, SurveyStatus::Closed).await?;
        log::info!("Survey closed: survey_id={}", survey_id);
        self.detail(&self.db, survey).await
    }

    pub async fn stats(&self, survey_id: i32, user_id: i32) -> ApiResult<SurveyStats> {
        let survey = self.require_owned(survey_id, user_id).await?;
        let total_responses = store::responses::count_by_survey(&self.db, survey_id).await?;
        let survey = self.detail(&self.db, survey).await?;

        Ok(SurveyStats {
            stats: StatsCounts {
                total_responses,
                question_count: survey.questions.len(),
                status: survey.status,
            },
            survey,
        })
    }

    /// Owner-scoped lookup shared with the response service.
    pub async fn require_owned(&self, survey_id: i32, user_id: i32) -> ApiResult<surveys::Model> {
        store::surveys::find_owned(&self.db, survey_id, user_id)
            .await?
            .ok_or_else(|| ApiError::not_found(SURVEY_NOT_FOUND))
    }

    /// Publication is checked before expiration.
    pub async fn require_public(&self, survey_id: i32) -> ApiResult<surveys::Model> {
        let survey = store::surveys::find_published(&self.db, survey_id)
            .await?
            .ok_or_else(|| ApiError::not_found(SURVEY_NOT_AVAILABLE))?;

        if survey.is_expired_at(Utc::now().naive_utc()) {
            return Err(ApiError::gone(SURVEY_EXPIRED));
        }
        Ok(survey)
    }

    async fn reload(&self, survey_id: i32) -> ApiResult<SurveyDetail> {
        let survey = store::surveys::find_by_id(&self.db, survey_id)
            .await?
            .ok_or_else(|| ApiError::not_found(SURVEY_NOT_FOUND))?;
        self.detail(&self.db, survey).await
    }

    async fn detail<C: ConnectionTrait>(
        &self,
        db: &C,
        survey: surveys::Model,
    ) -> ApiResult<SurveyDetail> {
        let questions = store::questions::find_by_survey(db, survey.id).await?;
        Ok(SurveyDetail::new(survey, questions))
    }
}
