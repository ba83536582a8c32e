//! Tree drawn as a flat table of rows.
//!
//! Every row records its depth. The subtree of a row is the run of
//! following rows that are deeper than it. Clicking a row shows or hides
//! that whole run and keeps the plus/minus icons of nested rows in step.

const PLUS: &str = "plus";
const MINUS: &str = "minus";

/// One table row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub id: String,
    pub depth: usize,
    pub displayed: bool,
    /// Source of the plus/minus image, if the row has one
    pub icon_src: Option<String>,
}

impl TableRow {
    pub fn new(id: impl Into<String>, depth: usize) -> Self {
        Self {
            id: id.into(),
            depth,
            displayed: true,
            icon_src: None,
        }
    }

    pub fn with_icon(mut self, icon_src: impl Into<String>) -> Self {
        self.icon_src = Some(icon_src.into());
        self
    }

    fn icon_is(&self, name: &str) -> bool {
        self.icon_src.as_deref().is_some_and(|src| src.contains(name))
    }

    fn swap_icon(&mut self, from: &str, to: &str) {
        if let Some(src) = &mut self.icon_src {
            *src = src.replacen(from, to, 1);
        }
    }
}

/// Rows of a depth-indexed tree table, in document order
#[derive(Debug, Clone, Default)]
pub struct RowTree {
    rows: Vec<TableRow>,
}

impl RowTree {
    pub fn new(rows: Vec<TableRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn get(&self, id: &str) -> Option<&TableRow> {
        self.rows.iter().find(|row| row.id == id)
    }

    /// Toggle the subtree below the row with `id`
    ///
    /// Returns whether the subtree is now shown, or None for an unknown row.
    pub fn tree_click(&mut self, id: &str) -> Option<bool> {
        let position = self.rows.iter().position(|row| row.id == id)?;

        let clicked = &mut self.rows[position];
        let depth = clicked.depth;
        let show = if clicked.icon_is(MINUS) {
            clicked.swap_icon(MINUS, PLUS);
            false
        } else {
            clicked.swap_icon(PLUS, MINUS);
            true
        };

        for row in self.rows[position + 1..]
            .iter_mut()
            .take_while(|row| row.depth > depth)
        {
            row.displayed = show;
            if !show && row.icon_is(MINUS) {
                row.swap_icon(MINUS, PLUS);
            }
            if show && row.icon_is(PLUS) {
                row.swap_icon(PLUS, MINUS);
            }
        }

        tracing::trace!("tree_click {} -> {}", id, show);
        Some(show)
    }
}
