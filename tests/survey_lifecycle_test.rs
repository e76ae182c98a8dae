/// Integration tests for survey creation, update, publication and deletion
mod common;

use common::*;
use surveyor::orm::questions::QuestionType;
use surveyor::orm::surveys::SurveyStatus;
use surveyor::responses::{AnswerInput, AnswerValue, SubmitInput};
use surveyor::surveys::{
    CreateSurveyInput, UpdateSurveyInput, PUBLISH_WITHOUT_QUESTIONS, SURVEY_EXPIRED,
    SURVEY_NOT_AVAILABLE, SURVEY_NOT_FOUND,
};
use surveyor::ApiError;

#[actix_rt::test]
async fn test_create_returns_questions_in_display_order() {
    let db = setup_test_database().await.unwrap();
    let owner = create_test_user(&db, "Owner", "owner@x.com", "secret1")
        .await
        .unwrap();

    let survey = create_draft_survey(
        &db,
        owner.id,
        vec![
            question("Third", QuestionType::Textarea, 3, false),
            choice_question("First", &["A", "B"], 1, true),
            question("Second", QuestionType::Text, 2, false),
        ],
    )
    .await;

    assert_eq!(survey.status, SurveyStatus::Draft);
    assert_eq!(survey.created_by, owner.id);
    let titles: Vec<&str> = survey.questions.iter().map(|q| q.title.as_str()).collect();
    assert_eq!(titles, vec!["First", "Second", "Third"]);
    assert_eq!(
        survey.questions[0].options,
        Some(vec!["A".to_string(), "B".to_string()])
    );
    assert!(survey.questions[0].required);
    assert_eq!(survey.questions[1].options, None);
}

#[actix_rt::test]
async fn test_create_rejects_blank_title() {
    let db = setup_test_database().await.unwrap();
    let owner = create_test_user(&db, "Owner", "owner@x.com", "secret1")
        .await
        .unwrap();

    let err = survey_service(&db)
        .create(survey_input("   ", vec![]), owner.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::BadRequest(_)));
}

#[actix_rt::test]
async fn test_create_published_without_questions_is_rejected() {
    let db = setup_test_database().await.unwrap();
    let owner = create_test_user(&db, "Owner", "owner@x.com", "secret1")
        .await
        .unwrap();

    let input = CreateSurveyInput {
        title: "Empty".to_string(),
        status: Some(SurveyStatus::Published),
        ..Default::default()
    };
    let err = survey_service(&db).create(input, owner.id).await.unwrap_err();
    assert_eq!(err, ApiError::bad_request(PUBLISH_WITHOUT_QUESTIONS));
    assert!(survey_service(&db).list_owned(owner.id).await.unwrap().is_empty());
}

#[actix_rt::test]
async fn test_owner_scoping_hides_foreign_surveys() {
    let db = setup_test_database().await.unwrap();
    let owner = create_test_user(&db, "Owner", "owner@x.com", "secret1")
        .await
        .unwrap();
    let other = create_test_user(&db, "Other", "other@x.com", "secret1")
        .await
        .unwrap();
    let survey = create_draft_survey(
        &db,
        owner.id,
        vec![question("Q1", QuestionType::Text, 1, false)],
    )
    .await;
    let surveys = survey_service(&db);
    let not_found = ApiError::not_found(SURVEY_NOT_FOUND);

    assert_eq!(surveys.get_owned(survey.id, other.id).await.unwrap_err(), not_found);
    assert_eq!(
        surveys
            .update(survey.id, UpdateSurveyInput::default(), other.id)
            .await
            .unwrap_err(),
        not_found
    );
    assert_eq!(surveys.publish(survey.id, other.id).await.unwrap_err(), not_found);
    assert_eq!(surveys.close(survey.id, other.id).await.unwrap_err(), not_found);
    assert_eq!(surveys.stats(survey.id, other.id).await.unwrap_err(), not_found);
    assert_eq!(surveys.delete(survey.id, other.id).await.unwrap_err(), not_found);
    assert!(surveys.list_owned(other.id).await.unwrap().is_empty());

    // Still intact for the owner
    assert_eq!(surveys.get_owned(survey.id, owner.id).await.unwrap().id, survey.id);
}

#[actix_rt::test]
async fn test_list_owned_newest_first() {
    let db = setup_test_database().await.unwrap();
    let owner = create_test_user(&db, "Owner", "owner@x.com", "secret1")
        .await
        .unwrap();

    let first = create_draft_survey(&db, owner.id, vec![]).await;
    let second = create_draft_survey(&db, owner.id, vec![]).await;

    let ids: Vec<i32> = survey_service(&db)
        .list_owned(owner.id)
        .await
        .unwrap()
        .iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(ids, vec![second.id, first.id]);
}

#[actix_rt::test]
async fn test_publish_requires_questions() {
    let db = setup_test_database().await.unwrap();
    let owner = create_test_user(&db, "Owner", "owner@x.com", "secret1")
        .await
        .unwrap();
    let surveys = survey_service(&db);

    let empty = create_draft_survey(&db, owner.id, vec![]).await;
    assert_eq!(
        surveys.publish(empty.id, owner.id).await.unwrap_err(),
        ApiError::bad_request(PUBLISH_WITHOUT_QUESTIONS)
    );
    assert_eq!(
        surveys.get_owned(empty.id, owner.id).await.unwrap().status,
        SurveyStatus::Draft
    );

    let survey = create_draft_survey(
        &db,
        owner.id,
        vec![question("Q1", QuestionType::Text, 1, true)],
    )
    .await;
    let published = surveys.publish(survey.id, owner.id).await.unwrap();
    assert_eq!(published.status, SurveyStatus::Published);
}

#[actix_rt::test]
async fn test_close_has_no_precondition() {
    let db = setup_test_database().await.unwrap();
    let owner = create_test_user(&db, "Owner", "owner@x.com", "secret1")
        .await
        .unwrap();
    let surveys = survey_service(&db);

    let draft = create_draft_survey(&db, owner.id, vec![]).await;
    assert_eq!(
        surveys.close(draft.id, owner.id).await.unwrap().status,
        SurveyStatus::Closed
    );

    let closed_again = surveys.close(draft.id, owner.id).await.unwrap();
    assert_eq!(closed_again.status, SurveyStatus::Closed);

    let err = surveys.get_public(draft.id).await.unwrap_err();
    assert_eq!(err, ApiError::not_found(SURVEY_NOT_AVAILABLE));
}

#[actix_rt::test]
async fn test_update_is_partial_and_tri_state() {
    let db = setup_test_database().await.unwrap();
    let owner = create_test_user(&db, "Owner", "owner@x.com", "secret1")
        .await
        .unwrap();
    let surveys = survey_service(&db);

    let input = CreateSurveyInput {
        title: "Original".to_string(),
        description: Some("Keep me".to_string()),
        expires_at: Some("2099-01-01".to_string()),
        questions: Some(vec![question("Q1", QuestionType::Text, 1, false)]),
        ..Default::default()
    };
    let survey = surveys.create(input, owner.id).await.unwrap();
    assert!(survey.expires_at.is_some());

    // Absent keys leave values alone
    let update: UpdateSurveyInput = serde_json::from_str(r#"{"title":"Renamed"}"#).unwrap();
    let updated = surveys.update(survey.id, update, owner.id).await.unwrap();
    assert_eq!(updated.title, "Renamed");
    assert_eq!(updated.description.as_deref(), Some("Keep me"));
    assert_eq!(updated.expires_at, survey.expires_at);
    assert_eq!(updated.questions.len(), 1);

    // Explicit null clears
    let update: UpdateSurveyInput =
        serde_json::from_str(r#"{"description":null,"expiresAt":null}"#).unwrap();
    let updated = surveys.update(survey.id, update, owner.id).await.unwrap();
    assert_eq!(updated.title, "Renamed");
    assert_eq!(updated.description, None);
    assert_eq!(updated.expires_at, None);

    // Blank title is rejected
    let update: UpdateSurveyInput = serde_json::from_str(r#"{"title":"  "}"#).unwrap();
    let err = surveys.update(survey.id, update, owner.id).await.unwrap_err();
    assert!(matches!(err, ApiError::BadRequest(_)));
}

#[actix_rt::test]
async fn test_update_replaces_questions() {
    let db = setup_test_database().await.unwrap();
    let owner = create_test_user(&db, "Owner", "owner@x.com", "secret1")
        .await
        .unwrap();
    let surveys = survey_service(&db);

    let survey = create_draft_survey(
        &db,
        owner.id,
        vec![
            question("Old 1", QuestionType::Text, 1, false),
            question("Old 2", QuestionType::Text, 2, false),
        ],
    )
    .await;

    let update = UpdateSurveyInput {
        questions: Some(vec![choice_question("New", &["Y", "N"], 1, true)]),
        ..Default::default()
    };
    let updated = surveys.update(survey.id, update, owner.id).await.unwrap();
    assert_eq!(updated.questions.len(), 1);
    assert_eq!(updated.questions[0].title, "New");
    assert!(!survey.questions.iter().any(|q| q.id == updated.questions[0].id));

    // An empty list removes every question, so publishing fails afterwards
    let update = UpdateSurveyInput {
        questions: Some(vec![]),
        ..Default::default()
    };
    let updated = surveys.update(survey.id, update, owner.id).await.unwrap();
    assert!(updated.questions.is_empty());
    assert_eq!(
        surveys.publish(survey.id, owner.id).await.unwrap_err(),
        ApiError::bad_request(PUBLISH_WITHOUT_QUESTIONS)
    );
}

#[actix_rt::test]
async fn test_update_to_published_checks_resulting_questions() {
    let db = setup_test_database().await.unwrap();
    let owner = create_test_user(&db, "Owner", "owner@x.com", "secret1")
        .await
        .unwrap();
    let surveys = survey_service(&db);
    let survey = create_draft_survey(&db, owner.id, vec![]).await;

    let update = UpdateSurveyInput {
        status: Some(SurveyStatus::Published),
        ..Default::default()
    };
    assert_eq!(
        surveys.update(survey.id, update, owner.id).await.unwrap_err(),
        ApiError::bad_request(PUBLISH_WITHOUT_QUESTIONS)
    );

    let update = UpdateSurveyInput {
        status: Some(SurveyStatus::Published),
        questions: Some(vec![question("Q1", QuestionType::Text, 1, false)]),
        ..Default::default()
    };
    let updated = surveys.update(survey.id, update, owner.id).await.unwrap();
    assert_eq!(updated.status, SurveyStatus::Published);
    assert_eq!(updated.questions.len(), 1);
}

#[actix_rt::test]
async fn test_published_survey_cannot_lose_all_questions() {
    let db = setup_test_database().await.unwrap();
    let owner = create_test_user(&db, "Owner", "owner@x.com", "secret1")
        .await
        .unwrap();
    let surveys = survey_service(&db);
    let survey = create_published_survey(
        &db,
        owner.id,
        vec![question("Q1", QuestionType::Text, 1, true)],
    )
    .await;

    let update = UpdateSurveyInput {
        questions: Some(vec![]),
        ..Default::default()
    };
    assert_eq!(
        surveys.update(survey.id, update, owner.id).await.unwrap_err(),
        ApiError::bad_request(PUBLISH_WITHOUT_QUESTIONS)
    );

    // Rolled back: still published with its question
    let current = surveys.get_public(survey.id).await.unwrap();
    assert_eq!(current.status, SurveyStatus::Published);
    assert_eq!(current.questions.len(), 1);

    // Closing in the same update lifts the guard
    let update = UpdateSurveyInput {
        status: Some(SurveyStatus::Closed),
        questions: Some(vec![]),
        ..Default::default()
    };
    let updated = surveys.update(survey.id, update, owner.id).await.unwrap();
    assert_eq!(updated.status, SurveyStatus::Closed);
    assert!(updated.questions.is_empty());
}

#[actix_rt::test]
async fn test_replacing_questions_bumps_updated_at() {
    let db = setup_test_database().await.unwrap();
    let owner = create_test_user(&db, "Owner", "owner@x.com", "secret1")
        .await
        .unwrap();
    let surveys = survey_service(&db);
    let survey = create_draft_survey(
        &db,
        owner.id,
        vec![question("Old", QuestionType::Text, 1, false)],
    )
    .await;

    actix_rt::time::sleep(std::time::Duration::from_millis(20)).await;

    let update = UpdateSurveyInput {
        questions: Some(vec![question("New", QuestionType::Text, 1, false)]),
        ..Default::default()
    };
    let updated = surveys.update(survey.id, update, owner.id).await.unwrap();
    assert_eq!(updated.questions[0].title, "New");
    assert!(updated.updated_at > survey.updated_at);
    assert_eq!(updated.created_at, survey.created_at);
}

#[actix_rt::test]
async fn test_public_view_requires_published_and_unexpired() {
    let db = setup_test_database().await.unwrap();
    let owner = create_test_user(&db, "Owner", "owner@x.com", "secret1")
        .await
        .unwrap();
    let surveys = survey_service(&db);

    let draft = create_draft_survey(
        &db,
        owner.id,
        vec![question("Q1", QuestionType::Text, 1, false)],
    )
    .await;
    assert_eq!(
        surveys.get_public(draft.id).await.unwrap_err(),
        ApiError::not_found(SURVEY_NOT_AVAILABLE)
    );
    assert_eq!(
        surveys.get_public(9999).await.unwrap_err(),
        ApiError::not_found(SURVEY_NOT_AVAILABLE)
    );

    let published = surveys.publish(draft.id, owner.id).await.unwrap();
    assert_eq!(surveys.get_public(published.id).await.unwrap().id, published.id);

    expire_survey(&db, published.id).await.unwrap();
    assert_eq!(
        surveys.get_public(published.id).await.unwrap_err(),
        ApiError::gone(SURVEY_EXPIRED)
    );
}

#[actix_rt::test]
async fn test_stats_counts_responses() {
    let db = setup_test_database().await.unwrap();
    let owner = create_test_user(&db, "Owner", "owner@x.com", "secret1")
        .await
        .unwrap();
    let survey = create_published_survey(
        &db,
        owner.id,
        vec![
            question("Q1", QuestionType::Text, 1, false),
            question("Q2", QuestionType::Text, 2, false),
        ],
    )
    .await;

    let responses = response_service(&db);
    for _ in 0..2 {
        responses
            .submit(
                SubmitInput {
                    survey_id: survey.id,
                    respondent_name: None,
                    respondent_email: None,
                    answers: vec![],
                },
                None,
            )
            .await
            .unwrap();
    }

    let stats = survey_service(&db).stats(survey.id, owner.id).await.unwrap();
    assert_eq!(stats.survey.id, survey.id);
    assert_eq!(stats.stats.total_responses, 2);
    assert_eq!(stats.stats.question_count, 2);
    assert_eq!(stats.stats.status, SurveyStatus::Published);
}

#[actix_rt::test]
async fn test_delete_removes_survey_and_dependents() {
    let db = setup_test_database().await.unwrap();
    let owner = create_test_user(&db, "Owner", "owner@x.com", "secret1")
        .await
        .unwrap();
    let survey = create_published_survey(
        &db,
        owner.id,
        vec![question("Q1", QuestionType::Text, 1, true)],
    )
    .await;

    let submitted = response_service(&db)
        .submit(
            SubmitInput {
                survey_id: survey.id,
                respondent_name: None,
                respondent_email: None,
                answers: vec![AnswerInput {
                    question_id: survey.questions[0].id,
                    value: AnswerValue::Text("hello".to_string()),
                }],
            },
            None,
        )
        .await
        .unwrap();

    let surveys = survey_service(&db);
    surveys.delete(survey.id, owner.id).await.unwrap();

    assert_eq!(
        surveys.get_owned(survey.id, owner.id).await.unwrap_err(),
        ApiError::not_found(SURVEY_NOT_FOUND)
    );
    assert!(matches!(
        response_service(&db).get_by_id(submitted.response.id).await,
        Err(ApiError::NotFound(_))
    ));
    assert!(surveyor::store::questions::find_by_survey(&db, survey.id)
        .await
        .unwrap()
        .is_empty());
    assert!(surveyor::store::responses::find_answers(&db, vec![submitted.response.id])
        .await
        .unwrap()
        .is_empty());
}
