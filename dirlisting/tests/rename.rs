mod common;

use std::time::{Duration, Instant};

use common::*;
use dirlisting::prelude::*;

const PAST_DELAY: Duration = Duration::from_millis(600);

/// Click row `index` twice and let the rename delay pass.
async fn enter_rename(listing: &mut DirListing, index: usize) -> bool {
    click(listing, index, Modifiers::NONE).await;
    click(listing, index, Modifiers::NONE).await;
    listing.poll_timers(Instant::now() + PAST_DELAY)
}

fn renames(model: &MemoryModel) -> Vec<Operation> {
    model.operations_of(OpKind::Rename)
}

// ============================================================================
// Entering edit mode
// ============================================================================

#[tokio::test]
async fn test_second_click_arms_delayed_rename() {
    let mut listing = listing(sample_model(), ScriptedDialogs::answering(true));
    click(&mut listing, 2, Modifiers::NONE).await;
    assert!(!listing.rename_armed());
    click(&mut listing, 2, Modifiers::NONE).await;
    assert!(listing.rename_armed());

    assert!(!listing.poll_timers(Instant::now()));
    assert!(listing.poll_timers(Instant::now() + PAST_DELAY));

    let session = listing.rename_session().unwrap();
    assert_eq!(session.original, "c.ipynb");
    assert_eq!(session.field.selection(), Some((0, 1)));
}

#[tokio::test]
async fn test_double_click_cancels_rename() {
    let model = sample_model();
    let mut listing = listing(model.clone(), ScriptedDialogs::answering(true));
    click(&mut listing, 2, Modifiers::NONE).await;
    click(&mut listing, 2, Modifiers::NONE).await;
    listing
        .handle_event(ListingEvent::DoubleClick {
            position: row(2),
            button: MouseButton::Left,
        })
        .await;
    assert!(!listing.poll_timers(Instant::now() + PAST_DELAY));
    assert!(listing.rename_session().is_none());
}

#[tokio::test]
async fn test_selection_change_drops_armed_rename() {
    let mut listing = listing(sample_model(), ScriptedDialogs::answering(true));
    click(&mut listing, 2, Modifiers::NONE).await;
    click(&mut listing, 2, Modifiers::NONE).await;
    click(&mut listing, 4, Modifiers::CTRL).await;
    assert!(!listing.poll_timers(Instant::now() + PAST_DELAY));
}

#[tokio::test]
async fn test_start_rename_requires_selection() {
    let mut listing = listing(sample_model(), ScriptedDialogs::answering(true));
    assert!(matches!(
        listing.start_rename(),
        Err(ListingError::NoSelection)
    ));
    click(&mut listing, 0, Modifiers::NONE).await;
    listing.start_rename().unwrap();
    assert!(matches!(
        listing.start_rename(),
        Err(ListingError::RenameInProgress)
    ));
}

#[tokio::test]
async fn test_edit_follows_its_row_across_refresh() {
    let model = sample_model();
    let mut listing = listing(model.clone(), ScriptedDialogs::answering(true));
    click(&mut listing, 4, Modifiers::NONE).await;
    listing.start_rename().unwrap();

    // A new entry sorts before e.txt and shifts it down.
    model.copy("/a.txt", "/").await.unwrap();
    listing.refresh().await.unwrap();
    assert_eq!(listing.rename_session().unwrap().index, 5);

    type_text(&mut listing, "f").await;
    key(&mut listing, KeyCombo::key(Key::Enter)).await;
    assert_eq!(
        renames(&model),
        vec![Operation::Rename {
            old: "e.txt".into(),
            new: "f.txt".into()
        }]
    );
    assert_eq!(names(&listing)[..2], ["a-Copy1.txt", "a.txt"]);
}

#[tokio::test]
async fn test_edit_cancelled_when_entry_disappears() {
    let model = sample_model();
    let mut listing = listing(model.clone(), ScriptedDialogs::answering(true));
    click(&mut listing, 4, Modifiers::NONE).await;
    listing.start_rename().unwrap();

    model.delete("e.txt").await.unwrap();
    listing.refresh().await.unwrap();
    assert!(listing.rename_session().is_none());
    assert_eq!(
        key(&mut listing, KeyCombo::key(Key::Enter)).await,
        EventResult::Ignored
    );
    assert!(renames(&model).is_empty());
}

// ============================================================================
// Resolving
// ============================================================================

#[tokio::test]
async fn test_unchanged_name_issues_no_request() {
    let model = sample_model();
    let mut listing = listing(model.clone(), ScriptedDialogs::answering(true));
    assert!(enter_rename(&mut listing, 2).await);
    let outcome = listing.finish_rename(Resolution::Commit).await;
    assert_eq!(outcome, RenameOutcome::Unchanged);
    assert!(model.mutations().is_empty());
}

#[tokio::test]
async fn test_escape_cancels_edit() {
    let model = sample_model();
    let mut listing = listing(model.clone(), ScriptedDialogs::answering(true));
    assert!(enter_rename(&mut listing, 0).await);
    type_text(&mut listing, "zzz").await;
    key(&mut listing, KeyCombo::key(Key::Escape)).await;
    assert!(listing.rename_session().is_none());
    assert!(model.mutations().is_empty());
    assert_eq!(listing.rows().get(0).unwrap().name, "a.txt");
}

#[tokio::test]
async fn test_enter_commits_new_name() {
    let model = sample_model();
    let mut listing = listing(model.clone(), ScriptedDialogs::answering(true));
    assert!(enter_rename(&mut listing, 0).await);
    type_text(&mut listing, "alpha").await;
    key(&mut listing, KeyCombo::key(Key::Enter)).await;

    assert_eq!(
        renames(&model),
        vec![Operation::Rename {
            old: "a.txt".into(),
            new: "alpha.txt".into()
        }]
    );
    assert!(names(&listing).contains(&"alpha.txt".to_string()));
    assert!(listing.rename_session().is_none());
}

#[tokio::test]
async fn test_click_elsewhere_commits() {
    let model = sample_model();
    let mut listing = listing(model.clone(), ScriptedDialogs::answering(true));
    assert!(enter_rename(&mut listing, 4).await);
    type_text(&mut listing, "f").await;
    click(&mut listing, 0, Modifiers::NONE).await;
    assert!(model.exists("f.txt"));
    assert!(!model.exists("e.txt"));
}

#[tokio::test]
async fn test_conflict_confirmed_deletes_then_renames() {
    let model = sample_model();
    let dialogs = ScriptedDialogs::answering(true);
    let mut listing = listing(model.clone(), dialogs.clone());
    assert!(enter_rename(&mut listing, 0).await);
    type_text(&mut listing, "b").await;
    let outcome = listing.finish_rename(Resolution::Commit).await;

    assert_eq!(outcome, RenameOutcome::Overwritten("b.txt".into()));
    assert_eq!(
        model.mutations(),
        vec![
            Operation::Rename {
                old: "a.txt".into(),
                new: "b.txt".into()
            },
            Operation::Delete("b.txt".into()),
            Operation::Rename {
                old: "a.txt".into(),
                new: "b.txt".into()
            },
        ]
    );
    assert_eq!(
        dialogs.confirms(),
        vec![(
            "Overwrite file?".to_string(),
            "\"b.txt\" already exists, overwrite?".to_string()
        )]
    );
    assert!(!model.exists("a.txt"));
}

#[tokio::test]
async fn test_conflict_declined_restores_name() {
    let model = sample_model();
    let mut listing = listing(model.clone(), ScriptedDialogs::answering(false));
    assert!(enter_rename(&mut listing, 0).await);
    type_text(&mut listing, "b").await;
    let outcome = listing.finish_rename(Resolution::Commit).await;

    assert_eq!(outcome, RenameOutcome::Declined);
    assert!(model.operations_of(OpKind::Delete).is_empty());
    assert_eq!(listing.rows().get(0).unwrap().name, "a.txt");
    assert!(model.exists("b.txt"));
}

#[tokio::test]
async fn test_failure_reports_and_restores() {
    let model = sample_model();
    let dialogs = ScriptedDialogs::answering(true);
    let mut listing = listing(model.clone(), dialogs.clone());
    model.fail_next(OpKind::Rename, ModelError::http(500, "server error"));
    assert!(enter_rename(&mut listing, 0).await);
    type_text(&mut listing, "z").await;
    let outcome = listing.finish_rename(Resolution::Commit).await;

    assert_eq!(outcome, RenameOutcome::Failed);
    assert_eq!(dialogs.error_titles(), vec!["Rename Error".to_string()]);
    assert!(dialogs.confirms().is_empty());
    assert_eq!(listing.rows().get(0).unwrap().name, "a.txt");
}

#[tokio::test]
async fn test_already_exists_message_counts_as_conflict() {
    let model = sample_model();
    let dialogs = ScriptedDialogs::answering(true);
    let mut listing = listing(model.clone(), dialogs.clone());
    model.fail_next(OpKind::Rename, ModelError::Other("x.txt already exists".into()));
    assert!(enter_rename(&mut listing, 0).await);
    type_text(&mut listing, "x").await;
    let outcome = listing.finish_rename(Resolution::Commit).await;

    // The injected failure claimed a conflict; nothing was there to delete.
    assert_eq!(outcome, RenameOutcome::Failed);
    assert_eq!(dialogs.confirms().len(), 1);
    assert_eq!(dialogs.error_titles(), vec!["Rename Error".to_string()]);
}
