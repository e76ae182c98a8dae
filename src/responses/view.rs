use crate::orm::questions::{self, QuestionType};
use crate::orm::{answers, responses};
use crate::surveys::{QuestionView, SurveySummary};
use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerView {
    pub id: i32,
    pub question_id: i32,
    pub value: String,
    pub question: Option<QuestionView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseView {
    pub id: i32,
    pub survey_id: i32,
    pub respondent_name: Option<String>,
    pub respondent_email: Option<String>,
    pub ip_address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub answers: Vec<AnswerView>,
}

/// A single response together with the survey it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseDetail {
    #[serde(flatten)]
    pub response: ResponseView,
    pub survey: SurveySummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionAnalytics {
    pub question_id: i32,
    pub question_title: String,
    pub question_type: QuestionType,
    pub total_answers: usize,
    pub answers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyAnalytics {
    pub survey: SurveySummary,
    pub total_responses: usize,
    pub analytics: Vec<QuestionAnalytics>,
}

/// Joins responses with their answers and the questions those answer.
pub(crate) fn build_response_views(
    responses: Vec<responses::Model>,
    answers: Vec<answers::Model>,
    questions: &[questions::Model],
) -> Vec<ResponseView> {
    let questions: HashMap<i32, &questions::Model> = questions.iter().map(|q| (q.id, q)).collect();

    let mut by_response: HashMap<i32, Vec<AnswerView>> = HashMap::new();
    for answer in answers {
        by_response
            .entry(answer.response_id)
            .or_default()
            .push(AnswerView {
                id: answer.id,
                question_id: answer.question_id,
                question: questions
                    .get(&answer.question_id)
                    .map(|q| QuestionView::from((*q).clone())),
                value: answer.value,
            });
    }

    responses
        .into_iter()
        .map(|r| ResponseView {
            answers: by_response.remove(&r.id).unwrap_or_default(),
            id: r.id,
            survey_id: r.survey_id,
            respondent_name: r.respondent_name,
            respondent_email: r.respondent_email,
            ip_address: r.ip_address,
            created_at: Utc.from_utc_datetime(&r.created_at),
        })
        .collect()
}

/// Per-question breakdown. Answers follow the order of `responses`, and the
/// submission order within each response.
pub fn build_analytics(
    survey: SurveySummary,
    questions: &[questions::Model],
    responses: &[responses::Model],
    answers: &[answers::Model],
) -> SurveyAnalytics {
    let mut by_response: HashMap<i32, Vec<&answers::Model>> = HashMap::new();
    for answer in answers {
        by_response.entry(answer.response_id).or_default().push(answer);
    }

    let analytics = questions
        .iter()
        .map(|question| {
            let values: Vec<String> = responses
                .iter()
                .filter_map(|r| by_response.get(&r.id))
                .flatten()
                .filter(|a| a.question_id == question.id)
                .map(|a| a.value.clone())
                .collect();

            QuestionAnalytics {
                question_id: question.id,
                question_title: question.title.clone(),
                question_type: question.question_type,
                total_answers: values.len(),
                answers: values,
            }
        })
        .collect();

    SurveyAnalytics {
        survey,
        total_responses: responses.len(),
        analytics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orm::surveys::SurveyStatus;

    fn question(id: i32, title: &str) -> questions::Model {
        questions::Model {
            id,
            survey_id: 1,
            title: title.to_string(),
            question_type: QuestionType::Text,
            options: None,
            display_order: id,
            required: false,
        }
    }

    fn response(id: i32) -> responses::Model {
        responses::Model {
            id,
            survey_id: 1,
            respondent_name: None,
            respondent_email: None,
            ip_address: None,
            created_at: Utc::now().naive_utc(),
        }
    }

    fn answer(id: i32, response_id: i32, question_id: i32, value: &str) -> answers::Model {
        answers::Model {
            id,
            response_id,
            question_id,
            value: value.to_string(),
        }
    }

    #[test]
    fn test_analytics_groups_answers_by_question() {
        let summary = SurveySummary {
            id: 1,
            title: "Test".to_string(),
            status: SurveyStatus::Published,
        };
        let questions = vec![question(10, "Q1"), question(11, "Q2"), question(12, "Q3")];
        // newest first
        let responses = vec![response(2), response(1)];
        let answers = vec![
            answer(1, 1, 10, "old"),
            answer(2, 1, 11, "only"),
            answer(3, 2, 10, "new"),
        ];

        let analytics = build_analytics(summary, &questions, &responses, &answers);

        assert_eq!(analytics.total_responses, 2);
        assert_eq!(analytics.analytics.len(), 3);
        assert_eq!(analytics.analytics[0].total_answers, 2);
        assert_eq!(analytics.analytics[0].answers, vec!["new", "old"]);
        assert_eq!(analytics.analytics[1].answers, vec!["only"]);
        assert_eq!(analytics.analytics[2].total_answers, 0);
    }

    #[test]
    fn test_response_views_attach_answers() {
        let questions = vec![question(10, "Q1")];
        let views = build_response_views(
            vec![response(1), response(2)],
            vec![answer(1, 1, 10, "a")],
            &questions,
        );

        assert_eq!(views[0].answers.len(), 1);
        assert_eq!(views[0].answers[0].question.as_ref().unwrap().title, "Q1");
        assert!(views[1].answers.is_empty());
    }
}
