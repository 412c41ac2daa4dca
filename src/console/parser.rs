//! Command line tokenizer
//!
//! Splits on runs of one delimiter character. At most [`MAX_ARGS`] tokens
//! are kept; any further tokens are dropped.

use heapless::Vec;

use crate::config::MAX_ARGS;

/// Tokens of one line, borrowed from the line buffer.
pub type ArgVector<'a> = Vec<&'a str, MAX_ARGS>;

/// Split `line` into tokens, skipping empty runs.
pub fn tokenize(line: &str, delimiter: char) -> ArgVector<'_> {
    let mut args = ArgVector::new();
    for token in line.split(delimiter).filter(|t| !t.is_empty()) {
        if args.push(token).is_err() {
            break;
        }
    }
    args
}
