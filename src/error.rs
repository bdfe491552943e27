use ariadne::{Color, Label, Report, ReportKind, Source};
use std::fmt;
use std::ops::Range;

pub type Result<T> = std::result::Result<T, Error>;

pub type SourceRange = Range<usize>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorType {
    Io,
    Template,
    Assemble,
}

#[derive(Debug)]
pub struct Error {
    pub error_type: ErrorType,
    pub message: String,
    pub range: Option<SourceRange>,
}

impl Error {
    pub fn new(error_type: ErrorType, message: String) -> Self {
        Self {
            error_type,
            message,
            range: None,
        }
    }

    pub fn new_with_range(error_type: ErrorType, message: String, range: SourceRange) -> Self {
        Self {
            error_type,
            message,
            range: Some(range),
        }
    }

    pub fn with_range(mut self, range: SourceRange) -> Self {
        self.range = Some(range);
        self
    }

    pub fn print(&self, file: &str, source: &str) -> std::io::Result<()> {
        match &self.range {
            Some(range) => Report::build(ReportKind::Error, file, range.start)
                .with_message(&self.message)
                .with_label(
                    Label::new((file, range.clone()))
                        .with_message(format!("{:?} error", self.error_type))
                        .with_color(Color::Red),
                )
                .finish()
                .eprint((file, Source::from(source))),
            None => {
                eprintln!("{:?} error: {}", self.error_type, self.message);
                Ok(())
            }
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} error: {}", self.error_type, self.message)
    }
}
