mod common;

use std::any::Any;
use std::sync::Arc;

use common::*;
use dirlisting::prelude::*;

async fn move_to(listing: &mut DirListing, x: i32, y: i32) -> EventResult {
    listing
        .handle_event(ListingEvent::PointerMove {
            position: Position::new(x, y),
        })
        .await
}

/// Press row `index` and drag it far enough to start a transfer.
async fn start_drag(listing: &mut DirListing, index: usize) -> TransferPayload {
    press(listing, index, Modifiers::NONE).await;
    let result = move_to(listing, 10, index as i32).await;
    assert_eq!(result, EventResult::StartDrag);
    listing.drag_session().unwrap().payload.clone()
}

fn over(index: usize, payload: &TransferPayload) -> DragEvent {
    DragEvent::new(row(index), DropAction::Move, payload.clone())
}

// ============================================================================
// Gesture threshold
// ============================================================================

#[tokio::test]
async fn test_small_move_is_a_click() {
    let mut listing = listing(sample_model(), ScriptedDialogs::answering(true));
    press(&mut listing, 1, Modifiers::NONE).await;
    assert_eq!(move_to(&mut listing, 4, 5).await, EventResult::Consumed);
    assert!(listing.drag_session().is_none());
    assert_eq!(release(&mut listing, 1).await, EventResult::Consumed);
    assert_eq!(selected(&listing), vec![1]);
}

#[tokio::test]
async fn test_threshold_on_one_axis_starts_drag() {
    let mut listing = listing(sample_model(), ScriptedDialogs::answering(true));
    press(&mut listing, 1, Modifiers::NONE).await;
    assert_eq!(move_to(&mut listing, 6, 1).await, EventResult::StartDrag);
    assert!(listing.drag_session().is_some());
    // Releasing does not click while the host runs the transfer.
    assert_eq!(release(&mut listing, 1).await, EventResult::Ignored);
    assert!(selected(&listing).is_empty());
}

#[tokio::test]
async fn test_press_outside_rows_drops_stale_press() {
    let mut listing = listing(sample_model(), ScriptedDialogs::answering(true));
    press(&mut listing, 1, Modifiers::NONE).await;
    // The release of the first press never arrives.
    assert_eq!(press(&mut listing, 40, Modifiers::NONE).await, EventResult::Ignored);
    assert_eq!(move_to(&mut listing, 30, 40).await, EventResult::Ignored);
    assert!(listing.drag_session().is_none());
}

#[tokio::test]
async fn test_right_press_drops_stale_press() {
    let mut listing = listing(sample_model(), ScriptedDialogs::answering(true));
    press(&mut listing, 1, Modifiers::NONE).await;
    listing
        .handle_event(ListingEvent::PointerDown {
            position: row(3),
            button: MouseButton::Right,
            modifiers: Modifiers::NONE,
        })
        .await;
    assert_eq!(move_to(&mut listing, 30, 3).await, EventResult::Ignored);
    assert!(listing.drag_session().is_none());
    assert_eq!(selected(&listing), vec![3]);
}

#[tokio::test]
async fn test_move_without_press_is_ignored() {
    let mut listing = listing(sample_model(), ScriptedDialogs::answering(true));
    assert_eq!(move_to(&mut listing, 50, 50).await, EventResult::Ignored);
}

// ============================================================================
// Drag source
// ============================================================================

#[tokio::test]
async fn test_drag_unselected_row_drags_alone() {
    let mut listing = listing(sample_model(), ScriptedDialogs::answering(true));
    click(&mut listing, 0, Modifiers::NONE).await;
    click(&mut listing, 1, Modifiers::CTRL).await;
    let payload = start_drag(&mut listing, 4).await;

    assert_eq!(payload.paths(), Some(&["/e.txt".to_string()][..]));
    let session = listing.drag_session().unwrap();
    assert_eq!(session.indices, vec![4]);
    assert_eq!(session.proxy.text, "e.txt");
    assert_eq!(session.proxy.badge, None);
    assert_eq!(session.proposed_action, DropAction::Move);
}

#[tokio::test]
async fn test_drag_selected_row_drags_selection() {
    let mut listing = listing(sample_model(), ScriptedDialogs::answering(true));
    click(&mut listing, 0, Modifiers::NONE).await;
    click(&mut listing, 2, Modifiers::CTRL).await;
    let payload = start_drag(&mut listing, 2).await;

    assert_eq!(
        payload.paths(),
        Some(&["/a.txt".to_string(), "/c.ipynb".to_string()][..])
    );
    let proxy = &listing.drag_session().unwrap().proxy;
    assert_eq!(proxy.text, "(2)");
    assert_eq!(proxy.badge, Some(2));
    assert!(!payload.has_data(FACTORY_MIME));
}

#[tokio::test]
async fn test_single_document_offers_viewer() {
    let mut listing = listing(sample_model(), ScriptedDialogs::answering(true));
    let factory: ViewerFactory = Arc::new(|entry: &Entry| Box::new(entry.path.clone()) as Box<dyn Any + Send>);
    listing.set_viewer_factory(Some(factory));
    let payload = start_drag(&mut listing, 2).await;

    let viewer = payload.open_viewer().unwrap();
    assert_eq!(viewer.downcast_ref::<String>(), Some(&"c.ipynb".to_string()));
}

#[tokio::test]
async fn test_drag_ended_tears_down_session() {
    let mut listing = listing(sample_model(), ScriptedDialogs::answering(true));
    start_drag(&mut listing, 0).await;
    let result = listing
        .handle_event(ListingEvent::DragEnded(DropAction::None))
        .await;
    assert_eq!(result, EventResult::Consumed);
    assert!(listing.drag_session().is_none());
    assert!(listing.rows().drop_target().is_none());
}

// ============================================================================
// Drop target
// ============================================================================

#[tokio::test]
async fn test_drag_enter_marks_only_directories() {
    let mut listing = listing(sample_model(), ScriptedDialogs::answering(true));
    let payload = start_drag(&mut listing, 0).await;

    let file = listing.handle_event(ListingEvent::DragEnter(over(1, &payload))).await;
    assert_eq!(file, EventResult::Ignored);
    assert!(listing.rows().drop_target().is_none());

    let dir = listing.handle_event(ListingEvent::DragEnter(over(3, &payload))).await;
    assert_eq!(dir, EventResult::Accept(DropAction::Move));
    assert_eq!(listing.rows().drop_target(), Some(3));
}

#[tokio::test]
async fn test_foreign_payload_is_ignored() {
    let mut listing = listing(sample_model(), ScriptedDialogs::answering(true));
    let foreign = TransferPayload::new();
    let result = listing.handle_event(ListingEvent::DragEnter(over(3, &foreign))).await;
    assert_eq!(result, EventResult::Ignored);
    let result = listing.handle_event(ListingEvent::DragOver(over(3, &foreign))).await;
    assert_eq!(result, EventResult::Ignored);
    assert!(listing.rows().drop_target().is_none());
}

#[tokio::test]
async fn test_dragged_directory_is_not_a_target() {
    let mut listing = listing(sample_model(), ScriptedDialogs::answering(true));
    let payload = start_drag(&mut listing, 3).await;
    let result = listing.handle_event(ListingEvent::DragEnter(over(3, &payload))).await;
    assert_eq!(result, EventResult::Ignored);
}

#[tokio::test]
async fn test_drag_over_follows_pointer_and_leave_clears() {
    let mut listing = listing(sample_model(), ScriptedDialogs::answering(true));
    let payload = start_drag(&mut listing, 0).await;

    listing.handle_event(ListingEvent::DragOver(over(3, &payload))).await;
    assert_eq!(listing.rows().drop_target(), Some(3));
    listing.handle_event(ListingEvent::DragOver(over(5, &payload))).await;
    assert_eq!(listing.rows().drop_target(), Some(5));
    let on_file = listing.handle_event(ListingEvent::DragOver(over(4, &payload))).await;
    assert_eq!(on_file, EventResult::Accept(DropAction::Move));
    assert!(listing.rows().drop_target().is_none());

    listing.handle_event(ListingEvent::DragOver(over(3, &payload))).await;
    listing.handle_event(ListingEvent::DragLeave).await;
    assert!(listing.rows().drop_target().is_none());
}

// ============================================================================
// Drop
// ============================================================================

#[tokio::test]
async fn test_drop_moves_into_directory() {
    let model = sample_model();
    let mut listing = listing(model.clone(), ScriptedDialogs::answering(true));
    click(&mut listing, 0, Modifiers::NONE).await;
    click(&mut listing, 1, Modifiers::CTRL).await;
    let payload = start_drag(&mut listing, 0).await;

    let result = listing.handle_event(ListingEvent::Drop(over(3, &payload))).await;
    assert_eq!(result, EventResult::Accept(DropAction::Move));
    assert!(model.exists("/docs/a.txt"));
    assert!(model.exists("/docs/b.txt"));
    assert_eq!(names(&listing), vec!["c.ipynb", "docs", "e.txt", "src"]);
    assert!(listing.rows().drop_target().is_none());
}

#[tokio::test]
async fn test_drop_on_file_is_rejected() {
    let model = sample_model();
    let mut listing = listing(model.clone(), ScriptedDialogs::answering(true));
    let payload = start_drag(&mut listing, 0).await;
    let result = listing.handle_event(ListingEvent::Drop(over(4, &payload))).await;
    assert_eq!(result, EventResult::Accept(DropAction::None));
    assert!(model.mutations().is_empty());
}

#[tokio::test]
async fn test_drop_with_no_action_is_noop() {
    let model = sample_model();
    let mut listing = listing(model.clone(), ScriptedDialogs::answering(true));
    let payload = start_drag(&mut listing, 0).await;
    let event = DragEvent::new(row(3), DropAction::None, payload);
    let result = listing.handle_event(ListingEvent::Drop(event)).await;
    assert_eq!(result, EventResult::Accept(DropAction::None));
    assert!(model.operations().is_empty());
}

#[tokio::test]
async fn test_drop_conflict_overwrites_after_confirm() {
    let model = Arc::new(
        MemoryModel::new()
            .with_file("a.txt")
            .with_dir("docs")
            .with_file("docs/a.txt"),
    );
    let dialogs = ScriptedDialogs::answering(true);
    let mut listing = listing(model.clone(), dialogs.clone());
    let payload = start_drag(&mut listing, 0).await;
    listing.handle_event(ListingEvent::Drop(over(1, &payload))).await;

    assert_eq!(
        model.mutations(),
        vec![
            Operation::Rename {
                old: "/a.txt".into(),
                new: "docs/a.txt".into()
            },
            Operation::Delete("docs/a.txt".into()),
            Operation::Rename {
                old: "/a.txt".into(),
                new: "docs/a.txt".into()
            },
        ]
    );
    assert_eq!(dialogs.confirms().len(), 1);
    assert!(dialogs.error_titles().is_empty());
    assert!(!model.exists("/a.txt"));
}

#[tokio::test]
async fn test_drop_failure_reports_move_error() {
    let model = sample_model();
    let dialogs = ScriptedDialogs::answering(true);
    let mut listing = listing(model.clone(), dialogs.clone());
    click(&mut listing, 0, Modifiers::NONE).await;
    click(&mut listing, 1, Modifiers::CTRL).await;
    let payload = start_drag(&mut listing, 0).await;
    model.fail_next(OpKind::Rename, ModelError::http(500, "boom"));
    listing.handle_event(ListingEvent::Drop(over(3, &payload))).await;

    assert_eq!(dialogs.error_titles(), vec!["Move Error".to_string()]);
    assert_eq!(model.operations_of(OpKind::Rename).len(), 2);
    assert_eq!(names(&listing).len(), 5);
}
