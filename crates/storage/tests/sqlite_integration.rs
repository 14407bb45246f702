use quiz_core::model::{
    Question, QuestionId, QuestionKind, QuizHistoryEntry, QuizMode,
};
use quiz_core::time::fixed_now;
use storage::repository::{QuestionRepository, QuizHistoryRepository};
use storage::sqlite::SqliteRepository;

fn build_choice_question(id: u64, correct: usize) -> Question {
    Question::new(
        QuestionId::new(id),
        format!("Q{id}"),
        QuestionKind::MultipleChoice {
            options: vec!["A".into(), "B".into(), "C".into()],
            correct,
        },
        "Because.",
        "Misc",
    )
    .unwrap()
}

fn build_true_false_question(id: u64, correct: bool) -> Question {
    Question::new(
        QuestionId::new(id),
        format!("Q{id}"),
        QuestionKind::TrueFalse { correct },
        "Because.",
        "Misc",
    )
    .unwrap()
}

#[tokio::test]
async fn sqlite_roundtrips_questions_by_mode() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_questions?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    repo.upsert_question(&build_choice_question(1, 2))
        .await
        .unwrap();
    repo.upsert_question(&build_true_false_question(2, false))
        .await
        .unwrap();

    let recap = repo.questions_for_mode(QuizMode::Recap).await.unwrap();
    assert_eq!(recap.len(), 1);
    assert_eq!(recap[0].id(), QuestionId::new(1));
    assert_eq!(recap[0].options().len(), 3);
    assert_eq!(recap[0].correct_option(), Some("C"));

    let true_false = repo.questions_for_mode(QuizMode::TrueFalse).await.unwrap();
    assert_eq!(true_false.len(), 1);
    assert!(matches!(
        true_false[0].kind(),
        QuestionKind::TrueFalse { correct: false }
    ));
}

#[tokio::test]
async fn sqlite_upsert_replaces_existing_question() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_upsert?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    repo.upsert_question(&build_choice_question(7, 0))
        .await
        .unwrap();
    repo.upsert_question(&build_choice_question(7, 1))
        .await
        .unwrap();

    let recap = repo.questions_for_mode(QuizMode::Recap).await.unwrap();
    assert_eq!(recap.len(), 1);
    assert_eq!(recap[0].correct_option(), Some("B"));
}

#[tokio::test]
async fn sqlite_roundtrips_history_newest_first() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_history?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let older = QuizHistoryEntry::from_persisted(QuizMode::Recap, 3, 5, fixed_now(), 1).unwrap();
    let newer = QuizHistoryEntry::from_persisted(
        QuizMode::TrueFalse,
        10,
        10,
        fixed_now() + chrono::Duration::minutes(5),
        10,
    )
    .unwrap();

    let older_id = repo.append_entry(&older).await.unwrap();
    let newer_id = repo.append_entry(&newer).await.unwrap();

    let fetched = repo.get_entry(older_id).await.unwrap();
    assert_eq!(fetched, older);

    let rows = repo.list_recent(10).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].id, newer_id);
    assert!(rows[0].entry.is_perfect());
    assert_eq!(rows[1].id, older_id);

    let capped = repo.list_recent(1).await.unwrap();
    assert_eq!(capped.len(), 1);
    assert_eq!(capped[0].id, newer_id);
}
