use daily_core::library::LibraryFilter;
use daily_core::model::{Catalog, CommandId};
use daily_core::selection::SeededRandom;
use services::{AppServices, IntentOutcome, LoadOutcome, UserIntent};

const CATALOG: &str = r#"[
    {"id": 1, "command": "ls -lh", "description": "List files with readable sizes"},
    {"id": 2, "command": "grep -i", "description": "Case-insensitive search"},
    {"id": 3, "command": "tar -xzf", "description": "Extract a gzip archive"}
]"#;

#[tokio::test]
async fn study_loop_persists_progress_across_sessions() {
    let url = "sqlite:file:memdb_study_flow?mode=memory&cache=shared";
    let catalog = Catalog::from_json(CATALOG).unwrap();
    let services = AppServices::new_sqlite(url, catalog.clone()).await.unwrap();

    let mut session = services.study_session_with(Box::new(SeededRandom::new(11)));
    session.load_next(false).await.unwrap();

    let mut mastered = 0;
    loop {
        match session.dispatch(UserIntent::Master).await.unwrap() {
            IntentOutcome::Loaded(LoadOutcome::Card(_)) => mastered += 1,
            IntentOutcome::Loaded(LoadOutcome::Exhausted(card)) => {
                mastered += 1;
                assert!(card.review_mode);
                break;
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }
    assert_eq!(mastered, 3);

    session
        .dispatch(UserIntent::ToggleFavoriteId(CommandId::new(2)))
        .await
        .unwrap();

    // A fresh view over the same store sees the persisted state.
    let reopened = AppServices::new_sqlite(url, catalog).await.unwrap();
    let mut view = reopened.study_session();
    let summary = view.progress_summary().await.unwrap();
    assert_eq!(summary.learned_count, 3);
    assert_eq!(summary.percentage, 100);
    assert!(matches!(view.load_next(false).await.unwrap(), LoadOutcome::Exhausted(_)));

    let favorites = reopened
        .library()
        .list(LibraryFilter::Favorites, "")
        .await
        .unwrap();
    assert_eq!(favorites.shown(), 1);
    assert!(favorites.rows[0].is_learned);

    view.dispatch(UserIntent::ResetLearned { confirmed: true })
        .await
        .unwrap();
    assert!(matches!(view.load_next(false).await.unwrap(), LoadOutcome::Card(_)));
    assert!(reopened.tracker().is_favorite(CommandId::new(2)).await.unwrap());
}

#[tokio::test]
async fn empty_catalog_shows_placeholder() {
    let services = AppServices::in_memory(Catalog::from_json("[]").unwrap());
    let mut session = services.study_session();
    assert_eq!(session.load_next(false).await.unwrap(), LoadOutcome::NoData);
    assert_eq!(
        session.dispatch(UserIntent::Master).await.unwrap(),
        IntentOutcome::NothingShown
    );
}
