//! Substring filter over a fixed list of rendered rows.
//!
//! Each row has a label, and a row is shown when its label contains the
//! query (case-sensitive). Results are cached per query prefix. Typing
//! another character narrows the previous result instead of rescanning
//! every row. Backspace restores the cached result for the shorter query.

/// One filterable row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterRow {
    pub id: String,
    pub label: String,
}

impl FilterRow {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone)]
struct CachedMatch {
    query: String,
    /// Indices of the matching rows
    matches: Vec<usize>,
}

/// Search filter state
#[derive(Debug, Clone)]
pub struct SearchFilter {
    rows: Vec<FilterRow>,
    visible: Vec<bool>,
    /// Each entry's query is a strict prefix of the next one's
    cache: Vec<CachedMatch>,
}

impl SearchFilter {
    /// Create a filter with every row shown
    pub fn new(rows: Vec<FilterRow>) -> Self {
        let visible = vec![true; rows.len()];
        Self {
            rows,
            visible,
            cache: Vec::new(),
        }
    }

    /// Apply a new query, returning the number of visible rows
    pub fn update(&mut self, query: &str) -> usize {
        if query.is_empty() {
            self.reset();
            return self.rows.len();
        }

        // Keep only cached queries this one extends (or equals)
        while let Some(last) = self.cache.last() {
            if query.starts_with(last.query.as_str()) {
                break;
            }
            self.cache.pop();
        }

        // The rows shown right now are a subset of the surviving cache
        // entry's matches, so only those need to be touched.
        let matches = match self.cache.last() {
            Some(last) if last.query == query => {
                tracing::trace!("search restore {:?} ({})", query, last.matches.len());
                for &index in &last.matches {
                    self.visible[index] = true;
                }
                return last.matches.len();
            }
            Some(last) => {
                let mut matches = Vec::new();
                for &index in &last.matches {
                    let hit = self.rows[index].label.contains(query);
                    self.visible[index] = hit;
                    if hit {
                        matches.push(index);
                    }
                }
                matches
            }
            None => {
                let mut matches = Vec::new();
                for (index, row) in self.rows.iter().enumerate() {
                    let hit = row.label.contains(query);
                    self.visible[index] = hit;
                    if hit {
                        matches.push(index);
                    }
                }
                matches
            }
        };

        let count = matches.len();
        self.cache.push(CachedMatch {
            query: query.to_string(),
            matches,
        });
        count
    }

    /// Clear the query: show every row and drop the cache
    pub fn reset(&mut self) {
        self.cache.clear();
        self.visible.fill(true);
    }

    pub fn rows(&self) -> &[FilterRow] {
        &self.rows
    }

    /// Check whether the row with `id` is shown
    pub fn is_visible(&self, id: &str) -> bool {
        self.rows
            .iter()
            .position(|row| row.id == id)
            .is_some_and(|index| self.visible[index])
    }

    /// IDs of the shown rows, in row order
    pub fn visible_ids(&self) -> Vec<&str> {
        self.rows
            .iter()
            .zip(&self.visible)
            .filter(|(_, visible)| **visible)
            .map(|(row, _)| row.id.as_str())
            .collect()
    }
}
