//! Shared rendering context passed to every widget.

use crate::data::DemoData;
use crate::i18n::Translator;

/// State shared by all widgets during one render pass.
#[derive(Debug, Clone, Copy)]
pub struct WidgetContext<'a> {
    /// Project data the widgets display
    pub data: &'a DemoData,
    /// Translation lookup
    pub translator: &'a Translator,
}

impl<'a> WidgetContext<'a> {
    /// Creates a context over `data` using `translator` for labels.
    pub fn new(data: &'a DemoData, translator: &'a Translator) -> Self {
        Self { data, translator }
    }

    /// Shorthand for `translator.t(key)`.
    pub fn t<'k>(&self, key: &'k str) -> &'k str {
        self.translator.t(key)
    }
}
