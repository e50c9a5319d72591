use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to decode JSON in {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Malformed record on line {line}: {reason}")]
    MalformedRecord {
        line: usize,
        content: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

/// 對外報告用的三種錯誤類別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    FileNotFound,
    DecodeError,
    UnexpectedError,
}

impl EtlError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EtlError::FileNotFound { .. } => ErrorKind::FileNotFound,
            EtlError::Decode { .. } | EtlError::MalformedRecord { .. } => ErrorKind::DecodeError,
            _ => ErrorKind::UnexpectedError,
        }
    }

    /// 在 NotFound 時轉成帶路徑的 FileNotFound，其餘保留為 IoError
    pub fn from_io(path: &str, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            EtlError::FileNotFound {
                path: path.to_string(),
            }
        } else {
            EtlError::IoError(err)
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::FileNotFound { path } => format!("Error: the file '{}' was not found.", path),
            EtlError::Decode { path, source } => {
                format!("Error: '{}' is not valid JSON ({}).", path, source)
            }
            EtlError::MalformedRecord {
                line,
                content,
                reason,
            } => format!("Skipping line {} ({}): {}", line, reason, content),
            EtlError::ConfigError { message } => format!("Configuration problem: {}", message),
            EtlError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration value '{}' is invalid: {}", field, reason)
            }
            EtlError::MissingConfigError { field } => {
                format!("Configuration value '{}' is required", field)
            }
            other => format!("An unexpected error occurred: {}", other),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.kind() {
            ErrorKind::FileNotFound => "Check that the input path exists and is spelled correctly",
            ErrorKind::DecodeError => "Make sure the input is a JSON array or one JSON object per line",
            ErrorKind::UnexpectedError => match self {
                EtlError::ConfigError { .. }
                | EtlError::InvalidConfigValueError { .. }
                | EtlError::MissingConfigError { .. } => "Review the command-line flags or job file",
                _ => "Check file permissions and that the input is UTF-8 encoded",
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
