//! Error types for citation tracking.

/// Errors surfaced by the citation registry and context stack.
///
/// Almost nothing here is fallible: unknown identities and malformed
/// docstrings are tolerated silently. Only misuse of the context stack and
/// double logging initialisation reach the caller.
#[derive(Debug, thiserror::Error)]
pub enum CiteError {
    #[error("citation context mismatch: tried to close {found:?} but the innermost open context is {expected:?}")]
    ContextMismatch {
        /// Name of the frame on top of the stack, or `None` if the stack is empty.
        expected: Option<String>,
        /// Name of the frame the caller tried to close.
        found: String,
    },

    #[error("failed to install log subscriber: {0}")]
    Logging(String),
}
