//! View switching, selection and view models.

use super::GalleryApp;
use crate::error::Result;
use crate::types::{Event, ViewKind};
use crate::view::{self, ExportControl, Interaction, ViewModel};

impl GalleryApp {
    /// Make `view` the current view
    pub async fn switch_view(&self, view: ViewKind) {
        self.state.write().await.current_view = view;
        tracing::debug!(%view, "switched view");
    }

    /// Current view
    pub async fn current_view(&self) -> ViewKind {
        self.state.read().await.current_view
    }

    /// Apply a grid interaction to the current view
    pub async fn handle(&self, interaction: Interaction) -> Result<()> {
        let view = self.current_view().await;
        match interaction {
            Interaction::EntryClicked(position) | Interaction::ToggleChanged(position) => {
                self.toggle(view, position).await?;
            }
            Interaction::ToggleAll => {
                self.toggle_all(view).await;
            }
        }
        Ok(())
    }

    /// Flip one position of `view`; returns whether it is selected afterwards
    pub async fn toggle(&self, view: ViewKind, position: usize) -> Result<bool> {
        let mut state = self.state.write().await;
        let selection = state.selection_mut(view);
        let selected = selection.toggle(position)?;
        let count = selection.count();
        drop(state);

        self.emit(Event::SelectionChanged {
            view,
            selected: count,
        });
        Ok(selected)
    }

    /// Select everything in `view`, or clear it when everything is selected
    pub async fn toggle_all(&self, view: ViewKind) -> bool {
        let mut state = self.state.write().await;
        let selection = state.selection_mut(view);
        let any = selection.toggle_all();
        let count = selection.count();
        drop(state);

        self.emit(Event::SelectionChanged {
            view,
            selected: count,
        });
        any
    }

    /// View model of the current view
    pub async fn render(&self) -> ViewModel {
        let view = self.current_view().await;
        self.render_view(view).await
    }

    /// View model of `kind`
    pub async fn render_view(&self, kind: ViewKind) -> ViewModel {
        let state = self.state.read().await;
        match kind {
            ViewKind::Gallery => view::render_gallery(&state.load, &state.gallery, &state.gallery_selection),
            ViewKind::Decks => view::render_decks(&state.load, &state.decks, &state.deck_selection),
        }
    }

    /// Export button for the current view
    pub async fn export_control(&self) -> ExportControl {
        let state = self.state.read().await;
        view::export_control(state.selection(state.current_view), state.running)
    }
}
