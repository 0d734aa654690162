//! Paragraph input tokens.

use inkline_font::FontStyle;

/// One word in document order.
///
/// `attach` marks a token that joins the previous one with no space,
/// such as closing punctuation after a styled run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Word {
    pub text: String,
    pub style: FontStyle,
    pub underline: bool,
    pub attach: bool,
}

impl Word {
    #[must_use]
    pub fn new(text: impl Into<String>, style: FontStyle) -> Self {
        Self {
            text: text.into(),
            style,
            underline: false,
            attach: false,
        }
    }

    #[must_use]
    pub fn attached(mut self) -> Self {
        self.attach = true;
        self
    }

    #[must_use]
    pub fn underlined(mut self) -> Self {
        self.underline = true;
        self
    }
}
