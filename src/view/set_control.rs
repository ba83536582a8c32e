//! Set control: an ordered list of options mirrored into a hidden field.
//!
//! The hidden field holds the option values joined with commas and is
//! re-encoded after every change.

/// One entry of a select list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    /// User-visible text
    pub text: String,
    /// Encoded value
    pub value: String,
}

impl SelectOption {
    pub fn new(text: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            value: value.into(),
        }
    }
}

/// Join option values with commas, in list order
pub fn encode_select_options(options: &[SelectOption]) -> String {
    options
        .iter()
        .map(|option| option.value.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

/// Split an encoded set back into values
///
/// A blank field is an empty set.
pub fn decode_set_contents(contents: &str) -> Vec<String> {
    if contents.trim().is_empty() {
        return Vec::new();
    }
    contents.split(',').map(str::to_string).collect()
}

/// Select list holding the elements of a set, plus its encoded contents
#[derive(Debug, Clone, Default)]
pub struct SetControl {
    options: Vec<SelectOption>,
    selected: Option<usize>,
    contents: String,
}

impl SetControl {
    pub fn new(options: Vec<SelectOption>) -> Self {
        let contents = encode_select_options(&options);
        Self {
            options,
            selected: None,
            contents,
        }
    }

    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    /// Encoded value of the hidden field
    pub fn contents(&self) -> &str {
        &self.contents
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Select the option at `index`, or clear the selection
    pub fn select(&mut self, index: Option<usize>) {
        self.selected = index.filter(|&i| i < self.options.len());
    }

    /// Append an element unless its value is empty or already present
    ///
    /// Returns whether the element was added.
    pub fn add(&mut self, text: &str, value: &str) -> bool {
        if self.options.iter().any(|option| option.value == value) {
            return false;
        }

        let added = !value.is_empty();
        if added {
            self.options.push(SelectOption::new(text, value));
        }
        self.reencode();
        added
    }

    /// Drop the selected element
    pub fn remove_selected(&mut self) -> Option<SelectOption> {
        let removed = self.selected.take().map(|index| self.options.remove(index));
        self.reencode();
        removed
    }

    /// Move the selected element by `offset` positions, keeping it selected
    ///
    /// Nothing happens when nothing is selected or the target is out of
    /// range. Returns whether the element moved.
    pub fn move_selected(&mut self, offset: isize) -> bool {
        let moved = self.swap_selected(offset);
        self.reencode();
        moved
    }

    fn swap_selected(&mut self, offset: isize) -> bool {
        let Some(index) = self.selected else {
            return false;
        };
        let Some(target) = index.checked_add_signed(offset) else {
            return false;
        };
        if target >= self.options.len() {
            return false;
        }

        self.options.swap(index, target);
        self.selected = Some(target);
        true
    }

    fn reencode(&mut self) {
        self.contents = encode_select_options(&self.options);
    }
}
