use serde::Deserialize;
use serde::Serialize;

/// 1-based line and column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Line halfway between start and end.
    pub fn center_line(&self) -> u32 {
        let (low, high) = if self.start.line <= self.end.line {
            (self.start.line, self.end.line)
        } else {
            (self.end.line, self.start.line)
        };
        low + (high - low) / 2
    }
}

/// Where the caller of `open` wants the cursor. A request carrying both end
/// coordinates selects a range; anything else places the cursor at the start.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionRequest {
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: Option<u32>,
    pub end_column: Option<u32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionTarget {
    Position(Position),
    Range(Range),
}

impl SelectionRequest {
    pub fn position(line: u32, column: u32) -> Self {
        Self {
            start_line: line,
            start_column: column,
            end_line: None,
            end_column: None,
        }
    }

    pub fn range(start_line: u32, start_column: u32, end_line: u32, end_column: u32) -> Self {
        Self {
            start_line,
            start_column,
            end_line: Some(end_line),
            end_column: Some(end_column),
        }
    }

    pub fn target(&self) -> SelectionTarget {
        let start = Position::new(self.start_line, self.start_column);
        match (self.end_line, self.end_column) {
            (Some(line), Some(column)) => {
                SelectionTarget::Range(Range::new(start, Position::new(line, column)))
            }
            _ => SelectionTarget::Position(start),
        }
    }
}
