use crate::span::SchemaSource;

use colored::*;
use std::fmt;
use std::io;

pub type GenResult<T = ()> = Result<T, GenError>;

#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub enum GenErrorKind {
    Parse,
    Catalog,
    Config,
    Internal,
    IO,
}

impl fmt::Display for GenErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                GenErrorKind::Parse => "parse error",
                GenErrorKind::Catalog => "catalog error",
                GenErrorKind::Config => "config error",
                GenErrorKind::Internal => "internal error",
                GenErrorKind::IO => "i/o error",
            }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenError {
    pub msg: String,
    pub src: Option<SchemaSource>,
    pub kind: GenErrorKind,
    pub context: Option<String>,
}

impl GenError {
    pub fn new<S: ToString>(kind: GenErrorKind, msg: S) -> GenError {
        GenError {
            msg: msg.to_string(),
            src: None,
            kind,
            context: None,
        }
    }

    pub fn parse<S: ToString>(msg: S, src: SchemaSource) -> GenError {
        GenError {
            msg: msg.to_string(),
            src: Some(src),
            kind: GenErrorKind::Parse,
            context: None,
        }
    }

    pub fn internal<S: ToString>(msg: S) -> GenError {
        GenError::new(GenErrorKind::Internal, msg)
    }

    pub fn with_context<S: ToString>(mut self, context: S) -> GenError {
        self.context = Some(context.to_string());
        self
    }

    pub fn emit(self) {
        let kind = format!("{}:", self.kind);
        let msg = match &self.context {
            Some(ctx) => format!("{} (while generating `{}`)", self.msg, ctx),
            None => self.msg.clone(),
        };

        eprintln!("{} {}", kind.bold().red(), msg.bold());

        let src = unless!(self.src);
        let arrow = "-->".bold();
        let pipe = "|".bold();
        if let Some(origin) = &src.origin {
            eprintln!(" {} {}", arrow, origin);
        }

        eprintln!("  {}", pipe);
        eprintln!("  {} {}", pipe, src.text);
        if let Some(span) = src.span {
            let indent = " ".repeat(span.start.col);
            let indicator = "^".repeat(span.len().max(1)).bold().red();
            eprintln!("  {} {}{}", pipe, indent, indicator);
        }
    }
}

impl fmt::Display for GenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.msg)?;
        if let Some(src) = &self.src {
            if let Some(span) = src.span {
                write!(f, " at {} in `{}`", span, src.text)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for GenError {}

impl From<io::Error> for GenError {
    fn from(err: io::Error) -> GenError {
        GenError::new(GenErrorKind::IO, err)
    }
}

impl From<serde_json::Error> for GenError {
    fn from(err: serde_json::Error) -> GenError {
        let kind = if err.is_io() {
            GenErrorKind::IO
        } else {
            GenErrorKind::Catalog
        };
        GenError::new(kind, err)
    }
}
