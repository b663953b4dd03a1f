/// Localized strings written into output records
#[derive(Debug, Clone)]
pub struct LocaleStrings {
    /// Notice appended to machine-translated renderings
    pub ai_notice: &'static str,
}

impl LocaleStrings {
    pub const fn polish() -> Self {
        Self {
            ai_notice: "(Przetłumaczono automatycznie)",
        }
    }

    pub const fn english() -> Self {
        Self {
            ai_notice: "(Machine translated)",
        }
    }

    pub const fn ukrainian() -> Self {
        Self {
            ai_notice: "(Перекладено автоматично)",
        }
    }

    pub const fn russian() -> Self {
        Self {
            ai_notice: "(Переведено автоматически)",
        }
    }
}
