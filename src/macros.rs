macro_rules! str {
    ($s:expr) => {
        $s.to_string()
    };
}

macro_rules! unless {
    ($ex:expr, else $else_block:expr) => {
        match $ex {
            Some(x) => x,
            _ => $else_block,
        }
    };
    ($ex:expr) => {
        match $ex {
            Some(x) => x,
            _ => return,
        }
    };
}

/// Builds an internal-consistency error. These are raised when a
/// generator is handed something the classifier should have rejected.
macro_rules! internal_err {
    ($($arg:tt)*) => {
        $crate::errors::GenError::internal(format!($($arg)*))
    };
}
