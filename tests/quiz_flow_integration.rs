//! Multiple-choice quiz flow against a mock quiz service
//!
//! Drives `QuizController` over `HttpQuizService` through a full
//! ten-question attempt and checks what the user would see at each step.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use secquiz::difficulty::DifficultyView;
use secquiz::quiz::{format_elapsed, format_percentage, Advanced, QuizController, QuizState};
use secquiz::topics::QuizTopic;
use secquiz::SecquizError;

mod common;

const WRONG_ANSWERS: u32 = 3;

async fn mount_start(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/quiz/start"))
        .and(header("authorization", "Bearer test-token"))
        .and(body_json(json!({"topic": "networking", "number_of_questions": 10})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "session_id": "S1",
            "topic": "networking",
            "total_questions": 10,
            "difficulty_level": 1.0,
            "first_question": common::question_json(1, 10)
        })))
        .expect(1)
        .mount(server)
        .await;
}

/// One mock per question, keyed on the submitted question id
async fn mount_answers(server: &MockServer) {
    let mut correct = 0;
    let mut difficulty = 1.0_f64;
    for number in 1..=10u32 {
        let is_correct = number > WRONG_ANSWERS;
        let selected = if is_correct { 2 } else { 1 };
        if is_correct {
            correct += 1;
            difficulty += 0.1;
        } else {
            difficulty -= 0.2;
        }
        let done = number == 10;
        let body = json!({
            "is_correct": is_correct,
            "explanation": format!("Explanation {}", number),
            "correct_option_id": 2,
            "points_earned": if is_correct { 10 } else { 0 },
            "current_score": correct * 10,
            "current_streak": if is_correct { number - WRONG_ANSWERS } else { 0 },
            "new_difficulty": (difficulty * 10.0).round() / 10.0,
            "quiz_complete": done,
            "next_question": if done { serde_json::Value::Null } else { common::question_json(number + 1, 10) }
        });

        Mock::given(method("POST"))
            .and(path("/quiz/answer"))
            .and(query_param("session_id", "S1"))
            .and(body_json(json!({
                "question_id": 100 + i64::from(number),
                "selected_option_id": selected
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }
}

async fn mount_complete(server: &MockServer, template: ResponseTemplate, times: u64) {
    Mock::given(method("POST"))
        .and(path("/quiz/complete"))
        .and(query_param("session_id", "S1"))
        .respond_with(template)
        .up_to_n_times(times)
        .mount(server)
        .await;
}

fn final_results() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "session_id": "S1",
        "topic": "networking",
        "total_questions": 10,
        "correct_answers": 7,
        "incorrect_answers": 3,
        "score_percentage": 70.0,
        "time_taken_seconds": 125,
        "final_difficulty": 1.4
    }))
}

/// Answer every question in order; returns the percent shown before each answer
async fn answer_all(controller: &mut QuizController) -> Vec<f64> {
    let mut shown = Vec::new();
    for number in 1..=10u32 {
        let session = controller.session().expect("active session");
        assert_eq!(session.progress().position, number);
        shown.push(session.progress().percent());

        let option = if number > WRONG_ANSWERS { 2 } else { 1 };
        assert!(controller.select_option(option));
        let outcome = controller
            .submit_answer()
            .await
            .expect("submit should succeed")
            .expect("submission should be issued");
        assert_eq!(outcome.feedback.is_correct, number > WRONG_ANSWERS);
        assert_eq!(controller.state(), QuizState::Revealing);

        let advanced = controller.wait_and_advance(outcome.pending).await;
        let expected = if number == 10 {
            Advanced::ReadyToComplete
        } else {
            Advanced::NextQuestion
        };
        assert_eq!(advanced, expected);
    }
    shown
}

#[tokio::test]
async fn test_ten_question_quiz_end_to_end() {
    let server = MockServer::start().await;
    mount_start(&server).await;
    mount_answers(&server).await;
    mount_complete(&server, final_results(), 1).await;

    let service = Arc::new(common::authed_service(&server));
    let mut controller = QuizController::new(service).with_reveal_delay(Duration::ZERO);

    let session = controller
        .start(QuizTopic::Networking, Some(10))
        .await
        .expect("start should succeed");
    assert_eq!(session.session_id(), "S1");
    assert_eq!(session.total_questions(), 10);
    assert!((session.progress().percent() - 10.0).abs() < 1e-9);
    assert_eq!(controller.state(), QuizState::Unanswered);

    let shown = answer_all(&mut controller).await;
    assert!((shown[0] - 10.0).abs() < 1e-9);
    assert!((shown[1] - 20.0).abs() < 1e-9);
    assert!((shown[9] - 100.0).abs() < 1e-9);
    assert_eq!(controller.state(), QuizState::Completing);

    let results = controller.complete().await.expect("complete should succeed");
    assert_eq!(format_percentage(results.score_percentage), "70.0%");
    assert_eq!(format_elapsed(results.time_taken_seconds), "2m 5s");
    assert_eq!(controller.state(), QuizState::Complete);
}

#[tokio::test]
async fn test_wrong_first_answer_lowers_difficulty() {
    let server = MockServer::start().await;
    mount_start(&server).await;
    mount_answers(&server).await;

    let service = Arc::new(common::authed_service(&server));
    let mut controller = QuizController::new(service).with_reveal_delay(Duration::ZERO);
    controller
        .start(QuizTopic::Networking, Some(10))
        .await
        .unwrap();

    assert!(controller.select_option(1));
    let outcome = controller.submit_answer().await.unwrap().unwrap();
    assert!(!outcome.feedback.is_correct);
    assert_eq!(outcome.feedback.correct_option_id, 2);
    assert_eq!(
        DifficultyView::new(outcome.feedback.difficulty).to_string(),
        "0.8 (Beginner)"
    );

    assert_eq!(
        controller.wait_and_advance(outcome.pending).await,
        Advanced::NextQuestion
    );
    let session = controller.session().unwrap();
    assert!((session.progress().percent() - 20.0).abs() < 1e-9);
    assert_eq!(session.selected_option_id(), None);
    assert!(!session.is_answered());
}

#[tokio::test]
async fn test_failed_completion_can_be_retried() {
    let server = MockServer::start().await;
    mount_start(&server).await;
    mount_answers(&server).await;
    mount_complete(
        &server,
        ResponseTemplate::new(500).set_body_json(json!({"detail": "database unavailable"})),
        1,
    )
    .await;
    mount_complete(&server, final_results(), 1).await;

    let service = Arc::new(common::authed_service(&server));
    let mut controller = QuizController::new(service).with_reveal_delay(Duration::ZERO);
    controller
        .start(QuizTopic::Networking, Some(10))
        .await
        .unwrap();
    answer_all(&mut controller).await;

    let err = controller.complete().await.unwrap_err();
    let err = err.downcast_ref::<SecquizError>().expect("typed error");
    match err {
        SecquizError::Api { status, message } => {
            assert_eq!(*status, 500);
            assert_eq!(message, "database unavailable");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(err.is_retryable());
    assert_eq!(controller.state(), QuizState::Completing);

    let results = controller.complete().await.expect("retry should succeed");
    assert_eq!(results.correct_answers, 7);
}

#[tokio::test]
async fn test_failed_submit_keeps_selection() {
    let server = MockServer::start().await;
    mount_start(&server).await;
    Mock::given(method("POST"))
        .and(path("/quiz/answer"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"detail": "Invalid quiz session"})))
        .mount(&server)
        .await;

    let service = Arc::new(common::authed_service(&server));
    let mut controller = QuizController::new(service);
    controller
        .start(QuizTopic::Networking, Some(10))
        .await
        .unwrap();
    assert!(controller.select_option(3));

    assert!(controller.submit_answer().await.is_err());
    let session = controller.session().unwrap();
    assert_eq!(session.selected_option_id(), Some(3));
    assert!(!session.is_answered());
    assert!(controller.can_submit());
}
