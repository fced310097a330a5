use thiserror::Error;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.0.as_ref()
    }

    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    pub fn invalid_arg(name: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidArgument {
                name: name.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn invalid_state(operation: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidState {
                operation: operation.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    /// The allocator could not provide `requested` bytes.
    pub fn out_of_memory(requested: usize) -> Error {
        Error(
            ErrorKind::OutOfMemory {
                requested: Some(requested),
            }
            .into(),
        )
    }

    /// A size computation exceeded the representable range of byte counts.
    pub fn size_overflow() -> Error {
        Error(ErrorKind::OutOfMemory { requested: None }.into())
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self.kind(), ErrorKind::InvalidArgument { .. })
    }

    pub fn is_invalid_state(&self) -> bool {
        matches!(self.kind(), ErrorKind::InvalidState { .. })
    }

    pub fn is_out_of_memory(&self) -> bool {
        matches!(self.kind(), ErrorKind::OutOfMemory { .. })
    }
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("invalid argument {name}: {message}")]
    InvalidArgument { name: String, message: String },

    #[error("invalid state for {operation}: {message}")]
    InvalidState { operation: String, message: String },

    #[error(
        "out of memory (requested: {})",
        requested.map_or_else(|| "size overflow".to_string(), |n| format!("{n} bytes")))]
    OutOfMemory { requested: Option<usize> },
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(kind.into())
    }
}

impl From<Error> for std::io::Error {
    fn from(e: Error) -> Self {
        let kind = match e.kind() {
            ErrorKind::InvalidArgument { .. } => std::io::ErrorKind::InvalidInput,
            ErrorKind::InvalidState { .. } => std::io::ErrorKind::Other,
            ErrorKind::OutOfMemory { .. } => std::io::ErrorKind::OutOfMemory,
        };
        std::io::Error::new(kind, e)
    }
}
