//! Credential store.

use crate::orm::users;
use chrono::Utc;
use sea_orm::{entity::*, query::*, ConnectionTrait, DbErr};

pub async fn find_by_email<C: ConnectionTrait>(
    db: &C,
    email: &str,
) -> Result<Option<users::Model>, DbErr> {
    users::Entity::find()
        .filter(users::Column::Email.eq(email))
        .one(db)
        .await
}

pub async fn find_by_id<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<Option<users::Model>, DbErr> {
    users::Entity::find_by_id(id).one(db).await
}

pub async fn insert<C: ConnectionTrait>(
    db: &C,
    name: &str,
    email: &str,
    password_hash: &str,
) -> Result<users::Model, DbErr> {
    let now = Utc::now().naive_utc();
    users::ActiveModel {
        name: Set(name.to_owned()),
        email: Set(email.to_owned()),
        password: Set(password_hash.to_owned()),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn set_active<C: ConnectionTrait>(
    db: &C,
    user: users::Model,
    is_active: bool,
) -> Result<users::Model, DbErr> {
    let mut active: users::ActiveModel = user.into();
    active.is_active = Set(is_active);
    active.updated_at = Set(Utc::now().naive_utc());
    active.update(db).await
}
