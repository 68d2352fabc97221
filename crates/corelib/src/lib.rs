//! Shared error types for the asset pipeline (converter-agnostic).

use thiserror::Error;

/// Per-file failure raised by the parsers, processors and encoders.
///
/// Every variant is local to a single input file: the batch drivers report
/// it, drop the partial artifact and move on to the next file.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: malformed face element '{element}'")]
    MalformedFace { line: usize, element: String },

    #[error("line {line}: {message}")]
    MalformedLine { line: usize, message: String },

    #[error("color-mapped TGA images are not supported")]
    UnsupportedColorMap,

    #[error("right-to-left TGA images are not supported")]
    UnsupportedMirroring,

    #[error("no channel format known for {0} bytes per pixel")]
    UnsupportedPixelDepth(u32),

    #[error("unsupported file extension: {0}")]
    UnsupportedExtension(String),
}

impl CompileError {
    pub fn malformed_face(line: usize, element: impl Into<String>) -> Self {
        Self::MalformedFace {
            line,
            element: element.into(),
        }
    }

    pub fn malformed_line(line: usize, message: impl Into<String>) -> Self {
        Self::MalformedLine {
            line,
            message: message.into(),
        }
    }
}

pub type CompileResult<T> = Result<T, CompileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_name_their_cause() {
        let err = CompileError::malformed_face(7, "1/2");
        assert_eq!(err.to_string(), "line 7: malformed face element '1/2'");

        let err = CompileError::UnsupportedPixelDepth(5);
        assert!(err.to_string().contains("5 bytes per pixel"));
    }
}
