use std::sync::Arc;

use quiz_core::catalog;
use quiz_core::model::{Answer, QuestionKind, QuizMode};
use quiz_core::time::fixed_now;
use services::{Clock, QuizHistoryService, QuizLoopService, Shuffle, StatsService};
use storage::repository::{InMemoryRepository, QuestionRepository, QuizHistoryRepository};

async fn seeded_repo() -> InMemoryRepository {
    let repo = InMemoryRepository::new();
    for question in catalog::default_questions().unwrap() {
        repo.upsert_question(&question).await.unwrap();
    }
    repo
}

fn loop_service(repo: &InMemoryRepository) -> QuizLoopService {
    QuizLoopService::new(
        Clock::fixed(fixed_now()),
        Arc::new(repo.clone()),
        Arc::new(repo.clone()),
    )
    .with_shuffle(Shuffle::Seeded(7))
}

fn correct_answer(kind: &QuestionKind) -> Answer {
    match kind {
        QuestionKind::MultipleChoice { correct, .. } => Answer::Choice(*correct),
        QuestionKind::TrueFalse { correct } => Answer::Bool(*correct),
    }
}

#[tokio::test]
async fn recap_draws_five_questions_with_fifteen_second_timer() {
    let repo = seeded_repo().await;
    let session = loop_service(&repo)
        .start_session(QuizMode::Recap)
        .await
        .unwrap();
    assert_eq!(session.total_questions(), 5);
    assert_eq!(session.time_left(), 15);
}

#[tokio::test]
async fn true_false_draws_ten_questions_with_twelve_second_timer() {
    let repo = seeded_repo().await;
    let session = loop_service(&repo)
        .start_session(QuizMode::TrueFalse)
        .await
        .unwrap();
    assert_eq!(session.total_questions(), 10);
    assert_eq!(session.time_left(), 12);
}

#[tokio::test]
async fn completing_a_quiz_appends_exactly_one_history_entry() {
    let repo = seeded_repo().await;
    let loop_svc = loop_service(&repo);

    let mut session = loop_svc.start_session(QuizMode::Recap).await.unwrap();
    while !session.is_complete() {
        let answer = correct_answer(session.current_question().unwrap().kind());
        session.submit_answer(Some(answer)).unwrap();
        loop_svc.advance(&mut session).await.unwrap();
    }

    let history_id = session.history_id().expect("entry persisted");
    let entry = repo.get_entry(history_id).await.unwrap();
    assert_eq!(entry.score(), session.score());
    assert_eq!(entry.total(), 5);
    assert!(entry.is_perfect());
    assert_eq!(entry.percentage(), 100);

    // finalize is idempotent once the entry exists
    let again = loop_svc.finalize_entry(&mut session).await.unwrap();
    assert_eq!(again, history_id);
    assert_eq!(repo.list_recent(10).await.unwrap().len(), 1);
}

#[tokio::test]
async fn finished_quiz_shows_up_in_history_and_stats() {
    let repo = seeded_repo().await;
    let loop_svc = loop_service(&repo);

    let mut session = loop_svc.start_session(QuizMode::TrueFalse).await.unwrap();
    while !session.is_complete() {
        // let every question time out
        session.submit_answer(None).unwrap();
        loop_svc.advance(&mut session).await.unwrap();
    }
    assert_eq!(session.score(), 0);

    let history = QuizHistoryService::new(Arc::new(repo.clone()));
    let items = history.recent(10).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].score, 0);
    assert_eq!(items[0].total, 10);
    assert_eq!(items[0].percentage, 0);

    let stats = StatsService::new(Arc::new(repo.clone()));
    let overview = stats.overview().await.unwrap();
    assert_eq!(overview.total_quizzes, 1);
    assert_eq!(overview.last_score_percent, Some(0));
    assert_eq!(overview.best_streak, 0);
}

#[tokio::test(start_paused = true)]
async fn timer_expiry_records_a_single_timeout() {
    let repo = seeded_repo().await;
    let loop_svc = loop_service(&repo);

    let mut session = loop_svc.start_session(QuizMode::Recap).await.unwrap();
    let mut timer = services::QuestionTimer::start(session.time_left());

    let outcome = loop_svc
        .run_question(&mut session, &mut timer)
        .await
        .expect("timeout recorded");
    assert!(outcome.answer.is_none());
    assert!(!outcome.correct);
    assert_eq!(session.answered_count(), 1);
    assert_eq!(session.time_left(), 0);
}

#[tokio::test]
async fn starting_with_an_empty_pool_is_an_error() {
    let repo = InMemoryRepository::new();
    let err = loop_service(&repo)
        .start_session(QuizMode::Recap)
        .await
        .unwrap_err();
    assert!(matches!(err, services::SessionError::EmptyPool));
}

#[tokio::test]
async fn seeded_draws_are_reproducible() {
    let repo = seeded_repo().await;
    let loop_svc = loop_service(&repo);

    let first = loop_svc.start_session(QuizMode::TrueFalse).await.unwrap();
    let second = loop_svc.start_session(QuizMode::TrueFalse).await.unwrap();

    let ids = |s: &services::QuizSession| {
        s.current_question().map(quiz_core::model::Question::id)
    };
    assert_eq!(ids(&first), ids(&second));
}
