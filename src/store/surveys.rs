//! Survey store.
//!
//! Owner-scoped reads filter on the owner inside the query itself, so a survey
//! owned by someone else is indistinguishable from one that does not exist.

use crate::orm::surveys::{self, SurveyStatus};
use chrono::Utc;
use sea_orm::{entity::*, prelude::DateTime, query::*, ConnectionTrait, DbErr};

/// Fields of a new survey row.
#[derive(Debug, Clone)]
pub struct NewSurvey {
    pub title: String,
    pub description: Option<String>,
    pub status: SurveyStatus,
    pub expires_at: Option<DateTime>,
    pub created_by: i32,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct SurveyChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<SurveyStatus>,
    pub expires_at: Option<Option<DateTime>>,
}

impl SurveyChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.expires_at.is_none()
    }
}

pub async fn find_all_by_owner<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
) -> Result<Vec<surveys::Model>, DbErr> {
    surveys::Entity::find()
        .filter(surveys::Column::CreatedBy.eq(user_id))
        .order_by_desc(surveys::Column::CreatedAt)
        .order_by_desc(surveys::Column::Id)
        .all(db)
        .await
}

pub async fn find_by_id<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<Option<surveys::Model>, DbErr> {
    surveys::Entity::find_by_id(id).one(db).await
}

/// Survey `id` if and only if it is owned by `user_id`.
pub async fn find_owned<C: ConnectionTrait>(
    db: &C,
    id: i32,
    user_id: i32,
) -> Result<Option<surveys::Model>, DbErr> {
    surveys::Entity::find()
        .filter(surveys::Column::Id.eq(id))
        .filter(surveys::Column::CreatedBy.eq(user_id))
        .one(db)
        .await
}

/// Survey `id` if and only if it is published. Expiration is left to the caller.
pub async fn find_published<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<Option<surveys::Model>, DbErr> {
    surveys::Entity::find()
        .filter(surveys::Column::Id.eq(id))
        .filter(surveys::Column::Status.eq(SurveyStatus::Published))
        .one(db)
        .await
}

pub async fn insert<C: ConnectionTrait>(db: &C, new: NewSurvey) -> Result<surveys::Model, DbErr> {
    let now = Utc::now().naive_utc();
    surveys::ActiveModel {
        title: Set(new.title),
        description: Set(new.description),
        status: Set(new.status),
        created_by: Set(new.created_by),
        expires_at: Set(new.expires_at),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn update<C: ConnectionTrait>(
    db: &C,
    survey: surveys::Model,
    changes: SurveyChanges,
) -> Result<surveys::Model, DbErr> {
    if changes.is_empty() {
        return Ok(survey);
    }

    let mut active: surveys::ActiveModel = survey.into();
    if let Some(title) = changes.title {
        active.title = Set(title);
    }
    if let Some(description) = changes.description {
        active.description = Set(description);
    }
    if let Some(status) = changes.status {
        active.status = Set(status);
    }
    if let Some(expires_at) = changes.expires_at {
        active.expires_at = Set(expires_at);
    }
    active.updated_at = Set(Utc::now().naive_utc());
    active.update(db).await
}

/// Bumps `updated_at` when only the questions changed.
pub async fn touch<C: ConnectionTrait>(
    db: &C,
    survey: surveys::Model,
) -> Result<surveys::Model, DbErr> {
    let mut active: surveys::ActiveModel = survey.into();
    active.updated_at = Set(Utc::now().naive_utc());
    active.update(db).await
}

pub async fn set_status<C: ConnectionTrait>(
    db: &C,
    survey: surveys::Model,
    status: SurveyStatus,
) -> Result<surveys::Model, DbErr> {
    update(
        db,
        survey,
        SurveyChanges {
            status: Some(status),
            ..Default::default()
        },
    )
    .await
}

pub async fn delete<C: ConnectionTrait>(db: &C, id: i32) -> Result<bool, DbErr> {
    let res = surveys::Entity::delete_many()
        .filter(surveys::Column::Id.eq(id))
        .exec(db)
        .await?;
    Ok(res.rows_affected > 0)
}
