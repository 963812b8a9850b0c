//! An ordered chain of cells sharing state through their results.

use quire_eval::Bindings;

use crate::result::CellResult;
use crate::evaluate;

/// One cell: a code fragment and the result of its last submission.
#[derive(Debug, Clone, Default)]
pub struct Cell {
    pub code: String,
    pub result: Option<CellResult>,
}

/// An ordered sequence of cells.
///
/// Each cell's input environment is the resulting bindings of the cell
/// directly above it (the first cell starts empty). Submitting a cell
/// evaluates only that cell: cells below keep whatever result they last
/// produced until they are submitted again themselves.
#[derive(Debug, Clone, Default)]
pub struct Notebook {
    cells: Vec<Cell>,
}

impl Notebook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new cell and return its index.
    pub fn push_cell(&mut self, code: impl Into<String>) -> usize {
        self.cells.push(Cell {
            code: code.into(),
            result: None,
        });
        self.cells.len() - 1
    }

    /// Replace a cell's code. Its previous result is kept until the
    /// cell is submitted again.
    pub fn set_code(&mut self, index: usize, code: impl Into<String>) {
        if let Some(cell) = self.cells.get_mut(index) {
            cell.code = code.into();
        }
    }

    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The bindings a cell at `index` would receive: the predecessor's
    /// resulting bindings, or an empty environment for the first cell
    /// (and for a predecessor that was never submitted).
    pub fn input_bindings(&self, index: usize) -> Bindings {
        index
            .checked_sub(1)
            .and_then(|prev| self.cells.get(prev))
            .and_then(|cell| cell.result.as_ref())
            .map(|result| result.bindings.clone())
            .unwrap_or_default()
    }

    /// Evaluate the cell at `index` against its predecessor's bindings
    /// and store the result. Returns `None` for an out-of-range index.
    pub fn submit(&mut self, index: usize) -> Option<&CellResult> {
        if index >= self.cells.len() {
            return None;
        }
        let input = self.input_bindings(index);
        let result = evaluate(&self.cells[index].code, &input);
        self.cells[index].result = Some(result);
        self.cells[index].result.as_ref()
    }
}
