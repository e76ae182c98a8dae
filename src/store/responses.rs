//! Response store. Answers are only ever written together with their response.

use crate::orm::{answers, responses};
use chrono::Utc;
use sea_orm::{entity::*, query::*, ConnectionTrait, DbErr, PaginatorTrait};

#[derive(Debug, Clone, Default)]
pub struct NewResponse {
    pub survey_id: i32,
    pub respondent_name: Option<String>,
    pub respondent_email: Option<String>,
    pub ip_address: Option<String>,
}

/// Answer of a new response; `value` is already encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAnswer {
    pub question_id: i32,
    pub value: String,
}

/// Responses of a survey, newest first.
pub async fn find_by_survey<C: ConnectionTrait>(
    db: &C,
    survey_id: i32,
) -> Result<Vec<responses::Model>, DbErr> {
    responses::Entity::find()
        .filter(responses::Column::SurveyId.eq(survey_id))
        .order_by_desc(responses::Column::CreatedAt)
        .order_by_desc(responses::Column::Id)
        .all(db)
        .await
}

pub async fn find_by_id<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<Option<responses::Model>, DbErr> {
    responses::Entity::find_by_id(id).one(db).await
}

pub async fn count_by_survey<C: ConnectionTrait>(db: &C, survey_id: i32) -> Result<usize, DbErr> {
    let count = responses::Entity::find()
        .filter(responses::Column::SurveyId.eq(survey_id))
        .count(db)
        .await?;
    Ok(count as usize)
}

/// Answers of the given responses in submission order.
pub async fn find_answers<C: ConnectionTrait>(
    db: &C,
    response_ids: Vec<i32>,
) -> Result<Vec<answers::Model>, DbErr> {
    if response_ids.is_empty() {
        return Ok(Vec::new());
    }

    answers::Entity::find()
        .filter(answers::Column::ResponseId.is_in(response_ids))
        .order_by_asc(answers::Column::Id)
        .all(db)
        .await
}

pub async fn insert<C: ConnectionTrait>(
    db: &C,
    new: NewResponse,
    new_answers: Vec<NewAnswer>,
) -> Result<responses::Model, DbErr> {
    let response = responses::ActiveModel {
        survey_id: Set(new.survey_id),
        respondent_name: Set(new.respondent_name),
        respondent_email: Set(new.respondent_email),
        ip_address: Set(new.ip_address),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    if !new_answers.is_empty() {
        let rows = new_answers.into_iter().map(|a| answers::ActiveModel {
            response_id: Set(response.id),
            question_id: Set(a.question_id),
            value: Set(a.value),
            ..Default::default()
        });
        answers::Entity::insert_many(rows).exec(db).await?;
    }

    Ok(response)
}

/// Removes a response and its answers.
pub async fn delete<C: ConnectionTrait>(db: &C, id: i32) -> Result<bool, DbErr> {
    answers::Entity::delete_many()
        .filter(answers::Column::ResponseId.eq(id))
        .exec(db)
        .await?;

    let res = responses::Entity::delete_many()
        .filter(responses::Column::Id.eq(id))
        .exec(db)
        .await?;
    Ok(res.rows_affected > 0)
}

/// Removes every response of a survey and their answers.
pub async fn delete_by_survey<C: ConnectionTrait>(db: &C, survey_id: i32) -> Result<u64, DbErr> {
    let response_ids: Vec<i32> = find_by_survey(db, survey_id)
        .await?
        .into_iter()
        .map(|r| r.id)
        .collect();

    if response_ids.is_empty() {
        return Ok(0);
    }

    answers::Entity::delete_many()
        .filter(answers::Column::ResponseId.is_in(response_ids))
        .exec(db)
        .await?;

    let res = responses::Entity::delete_many()
        .filter(responses::Column::SurveyId.eq(survey_id))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}
