//! Form field value objects

/// Type-safe field values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    /// One of a fixed set of options
    Choice { options: Vec<String>, selected: usize },
    Toggle(bool),
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

/// Represents a single form field with its configuration and value
#[derive(Debug, Clone)]
pub struct FormField {
    pub label: String,
    pub value: FieldValue,
    pub is_multiline: bool,
    /// Rendered masked (passwords)
    pub is_secret: bool,
}

impl FormField {
    /// Create a new text field
    pub fn text(label: &str, is_multiline: bool) -> Self {
        Self {
            label: label.to_string(),
            value: FieldValue::Text(String::new()),
            is_multiline,
            is_secret: false,
        }
    }

    /// Create a masked single-line field
    pub fn secret(label: &str) -> Self {
        Self {
            is_secret: true,
            ..Self::text(label, false)
        }
    }

    pub fn choice(label: &str, options: &[&str]) -> Self {
        Self {
            value: FieldValue::Choice {
                options: options.iter().map(|o| o.to_string()).collect(),
                selected: 0,
            },
            ..Self::text(label, false)
        }
    }

    pub fn toggle(label: &str, on: bool) -> Self {
        Self {
            value: FieldValue::Toggle(on),
            ..Self::text(label, false)
        }
    }

    /// Text content, or the selected option for choice fields
    pub fn as_text(&self) -> &str {
        match &self.value {
            FieldValue::Text(s) => s,
            FieldValue::Choice { options, selected } => {
                options.get(*selected).map(String::as_str).unwrap_or("")
            }
            FieldValue::Toggle(_) => "",
        }
    }

    pub fn is_on(&self) -> bool {
        matches!(self.value, FieldValue::Toggle(true))
    }

    pub fn set_text(&mut self, value: String) {
        self.value = FieldValue::Text(value);
    }

    /// Push a character to the field value. Space flips a toggle.
    pub fn push_char(&mut self, c: char) {
        match &mut self.value {
            FieldValue::Text(s) => s.push(c),
            FieldValue::Toggle(on) if c == ' ' => *on = !*on,
            _ => {}
        }
    }

    /// Remove the last character from the field value
    pub fn pop_char(&mut self) {
        if let FieldValue::Text(s) = &mut self.value {
            s.pop();
        }
    }

    /// Step a choice to the next/previous option, or flip a toggle
    pub fn cycle(&mut self, forward: bool) {
        match &mut self.value {
            FieldValue::Choice { options, selected } if !options.is_empty() => {
                let count = options.len();
                *selected = if forward {
                    (*selected + 1) % count
                } else {
                    (*selected + count - 1) % count
                };
            }
            FieldValue::Toggle(on) => *on = !*on,
            _ => {}
        }
    }

    /// Select the option equal to `value`, adding it when the list lacks it
    pub fn select(&mut self, value: &str) {
        if let FieldValue::Choice { options, selected } = &mut self.value {
            *selected = match options.iter().position(|o| o == value) {
                Some(index) => index,
                None => {
                    options.push(value.to_string());
                    options.len() - 1
                }
            };
        }
    }

    pub fn set_on(&mut self, on: bool) {
        if let FieldValue::Toggle(value) = &mut self.value {
            *value = on;
        }
    }

    /// Get the display value for rendering
    pub fn display_value(&self) -> String {
        match &self.value {
            FieldValue::Text(s) if self.is_secret => "•".repeat(s.chars().count()),
            FieldValue::Text(s) => s.clone(),
            FieldValue::Choice { .. } => format!("◀ {} ▶", self.as_text()),
            FieldValue::Toggle(true) => "[x] Yes".to_string(),
            FieldValue::Toggle(false) => "[ ] No".to_string(),
        }
    }
}
