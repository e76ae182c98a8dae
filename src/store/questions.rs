//! Question store.

use crate::orm::{answers, questions};
use sea_orm::{entity::*, query::*, ConnectionTrait, DbErr, PaginatorTrait};

/// Fields of a new question row; `options` is already serialized.
#[derive(Debug, Clone, PartialEq)]
pub struct NewQuestion {
    pub title: String,
    pub question_type: questions::QuestionType,
    pub options: Option<String>,
    pub display_order: i32,
    pub required: bool,
}

/// Questions of one survey in display order.
pub async fn find_by_survey<C: ConnectionTrait>(
    db: &C,
    survey_id: i32,
) -> Result<Vec<questions::Model>, DbErr> {
    questions::Entity::find()
        .filter(questions::Column::SurveyId.eq(survey_id))
        .order_by_asc(questions::Column::DisplayOrder)
        .order_by_asc(questions::Column::Id)
        .all(db)
        .await
}

/// Questions of several surveys in display order, for list views.
pub async fn find_by_surveys<C: ConnectionTrait>(
    db: &C,
    survey_ids: Vec<i32>,
) -> Result<Vec<questions::Model>, DbErr> {
    if survey_ids.is_empty() {
        return Ok(Vec::new());
    }

    questions::Entity::find()
        .filter(questions::Column::SurveyId.is_in(survey_ids))
        .order_by_asc(questions::Column::DisplayOrder)
        .order_by_asc(questions::Column::Id)
        .all(db)
        .await
}

pub async fn find_by_ids<C: ConnectionTrait>(
    db: &C,
    ids: Vec<i32>,
) -> Result<Vec<questions::Model>, DbErr> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    questions::Entity::find()
        .filter(questions::Column::Id.is_in(ids))
        .all(db)
        .await
}

pub async fn count_by_survey<C: ConnectionTrait>(db: &C, survey_id: i32) -> Result<usize, DbErr> {
    let count = questions::Entity::find()
        .filter(questions::Column::SurveyId.eq(survey_id))
        .count(db)
        .await?;
    Ok(count as usize)
}

pub async fn insert_many<C: ConnectionTrait>(
    db: &C,
    survey_id: i32,
    new_questions: Vec<NewQuestion>,
) -> Result<(), DbErr> {
    if new_questions.is_empty() {
        return Ok(());
    }

    let rows = new_questions.into_iter().map(|q| questions::ActiveModel {
        survey_id: Set(survey_id),
        title: Set(q.title),
        question_type: Set(q.question_type),
        options: Set(q.options),
        display_order: Set(q.display_order),
        required: Set(q.required),
        ..Default::default()
    });

    questions::Entity::insert_many(rows).exec(db).await?;
    Ok(())
}

/// Removes every question of a survey together with the answers given to them.
pub async fn delete_by_survey<C: ConnectionTrait>(db: &C, survey_id: i32) -> Result<u64, DbErr> {
    let question_ids: Vec<i32> = find_by_survey(db, survey_id)
        .await?
        .into_iter()
        .map(|q| q.id)
        .collect();

    if question_ids.is_empty() {
        return Ok(0);
    }

    answers::Entity::delete_many()
        .filter(answers::Column::QuestionId.is_in(question_ids))
        .exec(db)
        .await?;

    let res = questions::Entity::delete_many()
        .filter(questions::Column::SurveyId.eq(survey_id))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}
