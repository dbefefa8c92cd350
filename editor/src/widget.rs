use crate::document::TextDocument;
use crate::selection::Position;
use crate::selection::Range;
use crate::view_state::ViewState;
use std::sync::Arc;

const DEFAULT_VIEWPORT_HEIGHT: u32 = 40;

/// What the editor service needs from an editor widget.
pub trait EditorWidget: Send + 'static {
    /// Currently bound document.
    fn document(&self) -> Option<Arc<TextDocument>>;

    /// Binds `document`, resetting cursor and scroll to the top of the file.
    fn set_document(&mut self, document: Arc<TextDocument>);

    fn save_view_state(&self) -> ViewState;

    fn restore_view_state(&mut self, state: &ViewState);

    /// Moves the cursor and clears any selection.
    fn set_position(&mut self, position: Position);

    fn set_selection(&mut self, range: Range);

    fn reveal_position_in_center(&mut self, position: Position);

    fn reveal_range_in_center(&mut self, range: Range);

    fn focus(&mut self);
}

/// The most recent reveal request a [`HeadlessEditor`] handled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reveal {
    Position(Position),
    Range(Range),
}

/// Editor widget without a screen: tracks cursor, selection, scroll and
/// focus so callers can render a window of lines themselves.
#[derive(Debug)]
pub struct HeadlessEditor {
    document: Option<Arc<TextDocument>>,
    cursor: Position,
    selection: Option<Range>,
    scroll_top_line: u32,
    viewport_height: u32,
    focused: bool,
    last_reveal: Option<Reveal>,
}

impl Default for HeadlessEditor {
    fn default() -> Self {
        Self::new(DEFAULT_VIEWPORT_HEIGHT)
    }
}

impl HeadlessEditor {
    pub fn new(viewport_height: u32) -> Self {
        Self {
            document: None,
            cursor: Position::default(),
            selection: None,
            scroll_top_line: 1,
            viewport_height: viewport_height.max(1),
            focused: false,
            last_reveal: None,
        }
    }

    pub fn cursor(&self) -> Position {
        self.cursor
    }

    pub fn selection(&self) -> Option<Range> {
        self.selection
    }

    pub fn scroll_top_line(&self) -> u32 {
        self.scroll_top_line
    }

    pub fn viewport_height(&self) -> u32 {
        self.viewport_height
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn last_reveal(&self) -> Option<Reveal> {
        self.last_reveal
    }

    /// Lines inside the viewport, numbered from 1.
    pub fn visible_lines(&self) -> Vec<(u32, &str)> {
        let Some(document) = &self.document else {
            return Vec::new();
        };
        let last = document
            .line_count()
            .min(self.scroll_top_line.saturating_add(self.viewport_height - 1));
        (self.scroll_top_line..=last)
            .filter_map(|number| document.line(number).map(|line| (number, line)))
            .collect()
    }

    /// Scrolls so `line` sits in the middle of the viewport, without
    /// scrolling past the first line.
    fn center_on(&mut self, line: u32) {
        let half = self.viewport_height / 2;
        self.scroll_top_line = line.saturating_sub(half).max(1);
    }
}

impl EditorWidget for HeadlessEditor {
    fn document(&self) -> Option<Arc<TextDocument>> {
        self.document.clone()
    }

    fn set_document(&mut self, document: Arc<TextDocument>) {
        self.document = Some(document);
        self.cursor = Position::default();
        self.selection = None;
        self.scroll_top_line = 1;
    }

    fn save_view_state(&self) -> ViewState {
        ViewState {
            cursor: self.cursor,
            selection: self.selection,
            scroll_top_line: self.scroll_top_line,
        }
    }

    fn restore_view_state(&mut self, state: &ViewState) {
        self.cursor = state.cursor;
        self.selection = state.selection;
        self.scroll_top_line = state.scroll_top_line.max(1);
    }

    fn set_position(&mut self, position: Position) {
        self.cursor = position;
        self.selection = None;
    }

    fn set_selection(&mut self, range: Range) {
        self.selection = Some(range);
        self.cursor = range.end;
    }

    fn reveal_position_in_center(&mut self, position: Position) {
        self.center_on(position.line);
        self.last_reveal = Some(Reveal::Position(position));
    }

    fn reveal_range_in_center(&mut self, range: Range) {
        self.center_on(range.center_line());
        self.last_reveal = Some(Reveal::Range(range));
    }

    fn focus(&mut self) {
        self.focused = true;
    }
}
