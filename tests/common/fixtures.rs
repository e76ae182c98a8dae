//! Test fixtures for creating test data
#![allow(dead_code)]

use chrono::{Duration, Utc};
use sea_orm::{entity::*, ActiveValue::Set, DatabaseConnection, DbErr};
use surveyor::app_config::AuthConfig;
use surveyor::auth::password::hash_password;
use surveyor::auth::{AuthService, TokenService};
use surveyor::orm::questions::QuestionType;
use surveyor::orm::surveys;
use surveyor::orm::surveys::SurveyStatus;
use surveyor::responses::ResponseService;
use surveyor::surveys::{CreateSurveyInput, QuestionInput, SurveyDetail, SurveyService};

/// Test user fixture
pub struct TestUser {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password: String, // Plain text password for testing
}

/// Create an active user with known credentials
pub async fn create_test_user(
    db: &DatabaseConnection,
    name: &str,
    email: &str,
    password: &str,
) -> Result<TestUser, DbErr> {
    let password_hash = hash_password(password)
        .map_err(|e| DbErr::Custom(format!("Password hashing failed: {}", e)))?;
    let user = surveyor::store::users::insert(db, name, email, &password_hash).await?;

    Ok(TestUser {
        id: user.id,
        name: user.name,
        email: user.email,
        password: password.to_string(),
    })
}

pub async fn deactivate_user(db: &DatabaseConnection, user_id: i32) -> Result<(), DbErr> {
    let user = surveyor::store::users::find_by_id(db, user_id)
        .await?
        .ok_or_else(|| DbErr::Custom(format!("user {}", user_id)))?;
    surveyor::store::users::set_active(db, user, false).await?;
    Ok(())
}

pub fn test_tokens() -> TokenService {
    TokenService::from_config(&AuthConfig::default())
}

pub fn auth_service(db: &DatabaseConnection) -> AuthService {
    AuthService::new(
        db.clone(),
        test_tokens(),
        AuthConfig::default().min_password_length,
    )
}

pub fn survey_service(db: &DatabaseConnection) -> SurveyService {
    SurveyService::new(db.clone())
}

pub fn response_service(db: &DatabaseConnection) -> ResponseService {
    ResponseService::new(db.clone(), survey_service(db))
}

pub fn question(title: &str, question_type: QuestionType, order: i32, required: bool) -> QuestionInput {
    QuestionInput {
        title: title.to_string(),
        question_type,
        options: None,
        order,
        required,
    }
}

pub fn choice_question(title: &str, options: &[&str], order: i32, required: bool) -> QuestionInput {
    QuestionInput {
        options: Some(options.iter().map(|o| o.to_string()).collect()),
        ..question(title, QuestionType::Radio, order, required)
    }
}

pub fn checkbox_question(title: &str, options: &[&str], order: i32, required: bool) -> QuestionInput {
    QuestionInput {
        question_type: QuestionType::Checkbox,
        ..choice_question(title, options, order, required)
    }
}

pub fn survey_input(title: &str, questions: Vec<QuestionInput>) -> CreateSurveyInput {
    CreateSurveyInput {
        title: title.to_string(),
        questions: Some(questions),
        ..Default::default()
    }
}

/// Draft survey owned by `user_id`.
pub async fn create_draft_survey(
    db: &DatabaseConnection,
    user_id: i32,
    questions: Vec<QuestionInput>,
) -> SurveyDetail {
    survey_service(db)
        .create(survey_input("Test survey", questions), user_id)
        .await
        .expect("Failed to create test survey")
}

/// Published survey owned by `user_id`.
pub async fn create_published_survey(
    db: &DatabaseConnection,
    user_id: i32,
    questions: Vec<QuestionInput>,
) -> SurveyDetail {
    let input = CreateSurveyInput {
        status: Some(SurveyStatus::Published),
        ..survey_input("Published survey", questions)
    };
    survey_service(db)
        .create(input, user_id)
        .await
        .expect("Failed to create published survey")
}

/// Moves the expiration of a survey into the past.
pub async fn expire_survey(db: &DatabaseConnection, survey_id: i32) -> Result<(), DbErr> {
    let survey = surveys::Entity::find_by_id(survey_id)
        .one(db)
        .await?
        .ok_or_else(|| DbErr::Custom(format!("survey {}", survey_id)))?;

    let mut active: surveys::ActiveModel = survey.into();
    active.expires_at = Set(Some(Utc::now().naive_utc() - Duration::hours(1)));
    active.update(db).await?;
    Ok(())
}
