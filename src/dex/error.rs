use std::fmt;

/// Builds a [`DexError`] without returning it.
///
/// `err!(malformed offset, "...")` reports broken input at a code unit offset, anything else is an
/// internal (programming) error. Unsupported features go through [`DexError::unsupported`].
#[macro_export]
macro_rules! err {
    (malformed $offset:expr, $msg:literal) => {
        $crate::dex::error::DexError::malformed($offset, $msg)
    };
    (malformed $offset:expr, $fmtstr:literal, $($args:tt)*) => {
        $crate::dex::error::DexError::malformed($offset, &format!($fmtstr, $($args)*))
    };
    ($msg:literal) => {
        $crate::dex::error::DexError::new($msg)
    };
    ($fmtstr:literal, $($args:tt)*) => {
        $crate::dex::error::DexError::new(&format!($fmtstr, $($args)*))
    };
}

/// Returns early with a [`DexError`]. Same forms as [`err!`].
#[macro_export]
macro_rules! fail {
    (malformed $offset:expr, $msg:literal) => {
        return Err($crate::dex::error::DexError::malformed($offset, $msg))
    };
    (malformed $offset:expr, $fmtstr:literal, $($args:tt)*) => {
        return Err($crate::dex::error::DexError::malformed($offset, &format!($fmtstr, $($args)*)))
    };
    ($msg:literal) => {
        return Err($crate::dex::error::DexError::new($msg))
    };
    ($fmtstr:literal, $($args:tt)*) => {
        return Err($crate::dex::error::DexError::new(&format!($fmtstr, $($args)*)))
    };
}

/// The three classes of failure the core reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind
{
    /// The input stream is broken: truncated, unknown opcode, bad payload, read of an undefined
    /// register. `offset` is in code units from the start of the method.
    Malformed { offset: usize },
    /// An invariant of an upstream pass was violated (operand too wide, invalid invoke target,
    /// non contiguous ranged registers, ...).
    Internal,
    /// The construct needs a newer platform than the configured minimum API level.
    Unsupported { min_api: i32 },
}

#[derive(Debug, PartialEq, Eq)]
pub struct DexError
{
    kind: ErrorKind,
    msg: String,
    contexts: Vec<String>,
}

impl DexError
{
    pub(crate) fn new(msg: &str) -> Self
    {
        DexError {
            kind: ErrorKind::Internal,
            msg: msg.to_string(),
            contexts: Vec::new(),
        }
    }

    pub(crate) fn malformed(offset: usize, msg: &str) -> Self
    {
        DexError {
            kind: ErrorKind::Malformed { offset },
            msg: format!("{} at offset {}", msg, offset),
            contexts: Vec::new(),
        }
    }

    /// Reports features that are only available from `min_api` onwards.
    ///
    /// The message reads `"<features> are only supported starting with <name> (--min-api <n>)"`
    /// followed by `": <source>"` when a source description is given.
    pub fn unsupported(min_api: i32, min_api_name: &str, features: &str, source: Option<&str>) -> Self
    {
        let mut msg = format!(
            "{} are only supported starting with {} (--min-api {})",
            features, min_api_name, min_api
        );
        if let Some(source) = source
        {
            msg.push_str(": ");
            msg.push_str(source);
        }
        DexError {
            kind: ErrorKind::Unsupported { min_api },
            msg,
            contexts: Vec::new(),
        }
    }

    pub(crate) fn with_context(base: DexError, context: String) -> Self
    {
        let mut contexts = base.contexts;
        contexts.push(context);
        DexError { kind: base.kind, msg: base.msg, contexts }
    }

    pub fn kind(&self) -> ErrorKind
    {
        self.kind
    }

    pub fn message(&self) -> &str
    {
        &self.msg
    }

    pub fn is_malformed(&self) -> bool
    {
        matches!(self.kind, ErrorKind::Malformed { .. })
    }

    pub fn is_internal(&self) -> bool
    {
        self.kind == ErrorKind::Internal
    }

    pub fn is_unsupported(&self) -> bool
    {
        matches!(self.kind, ErrorKind::Unsupported { .. })
    }
}

/// Adds a context line to the error of a `Result`, keeping its kind.
pub(crate) trait ResultExt<T>
{
    fn context<F: FnOnce() -> String>(self, f: F) -> Result<T, DexError>;
}

impl<T> ResultExt<T> for Result<T, DexError>
{
    fn context<F: FnOnce() -> String>(self, f: F) -> Result<T, DexError>
    {
        self.map_err(|e| DexError::with_context(e, f()))
    }
}

impl fmt::Display for DexError
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{}", self.msg)?;
        let mut connector = " for ";
        for context in &self.contexts
        {
            write!(f, "{}{}", connector, context)?;
            connector = " of ";
        }
        Ok(())
    }
}

impl std::error::Error for DexError {}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn unsupported_message_names_the_api_level()
    {
        let e = DexError::unsupported(26, "Android O", "invoke-custom", Some("Lfoo/Bar;->baz()V"));
        assert_eq!(
            e.to_string(),
            "invoke-custom are only supported starting with Android O (--min-api 26): Lfoo/Bar;->baz()V"
        );
        assert_eq!(e.kind(), ErrorKind::Unsupported { min_api: 26 });
    }

    #[test]
    fn contexts_are_chained()
    {
        let e = DexError::with_context(DexError::malformed(4, "Truncated instruction"), "rem-int".to_string());
        let e = DexError::with_context(e, "LFoo;->bar()V".to_string());
        assert_eq!(e.to_string(), "Truncated instruction at offset 4 for rem-int of LFoo;->bar()V");
        assert!(e.is_malformed());
    }
}
