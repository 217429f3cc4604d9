//! Per-session locale selection

use crate::config::LocaleConfig;
use crate::error::{Error, Result};
use crate::session::{Segment, Session};

const LOCALE_KEY: &str = "locale";

/// Tracks which locale each session uses
///
/// The chosen locale lives in a segment owned by the manager itself, so
/// controllers cannot overwrite it by accident.
#[derive(Debug, Clone)]
pub struct LocaleManager {
    default_locale: String,
    supported: Vec<String>,
}

impl LocaleManager {
    /// Create a manager from the locale configuration
    pub fn new(config: &LocaleConfig) -> Self {
        Self {
            default_locale: config.default_locale.clone(),
            supported: config.supported.clone(),
        }
    }

    /// Locales users may switch to
    pub fn supported(&self) -> &[String] {
        &self.supported
    }

    /// Locale used when a session has none
    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    /// Whether `locale` may be selected
    pub fn is_supported(&self, locale: &str) -> bool {
        self.supported.iter().any(|l| l == locale)
    }

    /// Current locale of `session`
    pub async fn locale(&self, session: &Session) -> Result<String> {
        let stored = self.segment(session).get::<String>(LOCALE_KEY).await?;
        Ok(stored
            .filter(|l| self.is_supported(l))
            .unwrap_or_else(|| self.default_locale.clone()))
    }

    /// Select `locale` for `session`
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedLocale`] if `locale` is not in the supported list.
    pub async fn set_locale(&self, session: &Session, locale: &str) -> Result<()> {
        if !self.is_supported(locale) {
            return Err(Error::UnsupportedLocale(locale.to_string()));
        }
        self.segment(session).set(LOCALE_KEY, locale).await?;
        tracing::debug!(locale, "Locale changed");
        Ok(())
    }

    fn segment(&self, session: &Session) -> Segment {
        Segment::new(session.clone(), std::any::type_name::<Self>())
    }
}
