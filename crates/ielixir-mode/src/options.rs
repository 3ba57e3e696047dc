/// Configuration shared by the grammars of a mode.
///
/// These mirror the editor settings a host passes when it instantiates a
/// mode: how wide one indentation step is and how tabs expand when columns
/// are computed.
///
/// # Examples
///
/// ```rust
/// use ielixir_mode::{Grammar, LexerOptions};
///
/// let options = LexerOptions {
///     indent_unit: 4,
///     ..Default::default()
/// };
/// let grammar = Grammar::elixir(options);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct LexerOptions {
    /// Width of one indentation step.
    ///
    /// The root scope of a buffer is recorded one step to the left of column
    /// zero, so a block keyword such as `do` on an unindented line opens a
    /// new scope.
    ///
    /// # Default
    ///
    /// `2`
    pub indent_unit: u32,

    /// Number of columns a tab advances to when computing token columns and
    /// line indentation.
    ///
    /// # Default
    ///
    /// `4`
    pub tab_size: u32,
}

impl Default for LexerOptions {
    fn default() -> Self {
        Self {
            indent_unit: 2,
            tab_size: 4,
        }
    }
}
