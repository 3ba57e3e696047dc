//! Named grammars, MIME aliases and file-extension metadata.

use std::{collections::HashMap, sync::Arc};

use crate::{Grammar, LexerOptions, ModeError, RGrammar};

/// Descriptive entry for a mode, used to pick one from a file name.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct ModeInfo {
    /// Human readable name.
    pub name: String,
    pub mime: String,
    /// Name the grammar is registered under.
    pub mode: String,
    /// File extensions, without the leading dot.
    pub ext: Vec<String>,
}

/// Lookup table from mode names and MIME types to grammars.
#[derive(Debug, Clone, Default)]
pub struct ModeRegistry {
    modes: HashMap<String, Arc<Grammar>>,
    mimes: HashMap<String, String>,
    infos: Vec<ModeInfo>,
}

impl ModeRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with `elixir`, `text/plain`, `r` and `ielixir`.
    ///
    /// ```
    /// use ielixir_mode::{LexerOptions, ModeRegistry};
    ///
    /// let registry = ModeRegistry::standard(LexerOptions::default());
    /// let info = registry.find_by_extension("ex").unwrap();
    /// assert_eq!(info.mode, "ielixir");
    /// assert!(registry.get("text/x-ielixir").is_ok());
    /// ```
    #[must_use]
    pub fn standard(options: LexerOptions) -> Self {
        let mut registry = Self::new();

        registry.define_mode("elixir", Grammar::elixir(options));
        registry.define_mime("text/x-elixir", "elixir");

        registry.define_mode("text/plain", Grammar::PlainText);

        registry.define_mode("r", Grammar::R(RGrammar));
        registry.define_mime("text/x-rsrc", "r");
        registry.push_info(ModeInfo {
            name: "R".to_owned(),
            mime: "text/x-rsrc".to_owned(),
            mode: "r".to_owned(),
            ext: vec!["r".to_owned(), "R".to_owned()],
        });

        registry.define_mode("ielixir", Grammar::ielixir(options));
        registry.define_mime("text/x-ielixir", "ielixir");
        registry.push_info(ModeInfo {
            name: "ielixir".to_owned(),
            mime: "text/x-ielixir".to_owned(),
            mode: "ielixir".to_owned(),
            ext: vec!["ex".to_owned()],
        });

        registry
    }

    /// Registers `grammar` under `name`, replacing any previous entry.
    pub fn define_mode(&mut self, name: impl Into<String>, grammar: Grammar) {
        let name = name.into();
        tracing::debug!(mode = %name, grammar = grammar.name(), "defining mode");
        self.modes.insert(name, Arc::new(grammar));
    }

    /// Makes `mime` resolve to the mode named `mode`.
    pub fn define_mime(&mut self, mime: impl Into<String>, mode: impl Into<String>) {
        self.mimes.insert(mime.into(), mode.into());
    }

    pub fn push_info(&mut self, info: ModeInfo) {
        self.infos.push(info);
    }

    #[must_use]
    pub fn infos(&self) -> &[ModeInfo] {
        &self.infos
    }

    /// Resolves a mode name or a MIME type.
    ///
    /// # Errors
    ///
    /// [`ModeError::UnknownMode`] when neither a mode nor a MIME type of that
    /// name is registered.
    pub fn get(&self, name_or_mime: &str) -> Result<Arc<Grammar>, ModeError> {
        let name = self
            .mimes
            .get(name_or_mime)
            .map_or(name_or_mime, String::as_str);
        self.modes
            .get(name)
            .cloned()
            .ok_or_else(|| ModeError::UnknownMode(name_or_mime.to_owned()))
    }

    /// First info entry listing `ext`. A leading dot is ignored and the
    /// lookup is case-insensitive.
    ///
    /// # Errors
    ///
    /// [`ModeError::UnknownExtension`] when no entry lists the extension.
    pub fn find_by_extension(&self, ext: &str) -> Result<&ModeInfo, ModeError> {
        let wanted = ext.trim_start_matches('.').to_lowercase();
        self.infos
            .iter()
            .find(|info| info.ext.iter().any(|e| e.to_lowercase() == wanted))
            .ok_or_else(|| ModeError::UnknownExtension(ext.to_owned()))
    }

    #[must_use]
    pub fn find_by_mime(&self, mime: &str) -> Option<&ModeInfo> {
        self.infos.iter().find(|info| info.mime == mime)
    }
}
