#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dirlisting::prelude::*;

/// Dialogs that answer prompts with a fixed choice and record everything.
#[derive(Debug, Default)]
pub struct ScriptedDialogs {
    answer: bool,
    pub confirms: Mutex<Vec<(String, String)>>,
    pub errors: Mutex<Vec<(String, String)>>,
}

impl ScriptedDialogs {
    pub fn answering(answer: bool) -> Arc<Self> {
        Arc::new(Self {
            answer,
            ..Self::default()
        })
    }

    pub fn confirms(&self) -> Vec<(String, String)> {
        self.confirms.lock().unwrap().clone()
    }

    pub fn error_titles(&self) -> Vec<String> {
        self.errors
            .lock()
            .unwrap()
            .iter()
            .map(|(title, _)| title.clone())
            .collect()
    }
}

#[async_trait]
impl Dialogs for ScriptedDialogs {
    async fn confirm(&self, title: &str, body: &str) -> bool {
        self.confirms
            .lock()
            .unwrap()
            .push((title.to_string(), body.to_string()));
        self.answer
    }

    fn show_error(&self, title: &str, error: &ListingError) {
        self.errors
            .lock()
            .unwrap()
            .push((title.to_string(), error.to_string()));
    }
}

/// A root with two directories and four files, listed by name:
/// 0 `a.txt`, 1 `b.txt`, 2 `c.ipynb`, 3 `docs`, 4 `e.txt`, 5 `src`.
pub fn sample_model() -> Arc<MemoryModel> {
    Arc::new(
        MemoryModel::new()
            .with_file("a.txt")
            .with_file("b.txt")
            .with_notebook("c.ipynb")
            .with_dir("docs")
            .with_file("e.txt")
            .with_dir("src"),
    )
}

/// Listing with one pixel per row, starting at y = 0.
pub fn listing(model: Arc<MemoryModel>, dialogs: Arc<ScriptedDialogs>) -> DirListing {
    DirListing::new(model, dialogs, ListingConfig::default()).with_locator(FixedRowLocator::new(0, 1))
}

pub fn row(index: usize) -> Position {
    Position::new(0, index as i32)
}

pub fn selected(listing: &DirListing) -> Vec<usize> {
    listing.rows().selected_indices()
}

pub fn names(listing: &DirListing) -> Vec<String> {
    listing
        .rows()
        .rows()
        .iter()
        .map(|row| row.name.clone())
        .collect()
}

pub async fn press(listing: &mut DirListing, index: usize, modifiers: Modifiers) -> EventResult {
    listing
        .handle_event(ListingEvent::PointerDown {
            position: row(index),
            button: MouseButton::Left,
            modifiers,
        })
        .await
}

pub async fn release(listing: &mut DirListing, index: usize) -> EventResult {
    listing
        .handle_event(ListingEvent::PointerUp {
            position: row(index),
            button: MouseButton::Left,
        })
        .await
}

pub async fn click(listing: &mut DirListing, index: usize, modifiers: Modifiers) {
    press(listing, index, modifiers).await;
    release(listing, index).await;
}

pub async fn key(listing: &mut DirListing, combo: KeyCombo) -> EventResult {
    listing.handle_event(ListingEvent::Key(combo)).await
}

pub async fn type_text(listing: &mut DirListing, text: &str) {
    for c in text.chars() {
        key(listing, KeyCombo::key(Key::Char(c))).await;
    }
}
