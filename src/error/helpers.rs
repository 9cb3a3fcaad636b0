//! Source-chain inspection helpers.

use std::error::Error as StdError;

/// Walk `err` and its `source()` chain, returning the first error of type `T`.
///
/// `err` itself is checked first, so wrapping is transparent to callers that
/// only care about the root cause.
pub fn find_source<'a, T: StdError + 'static>(err: &'a (dyn StdError + 'static)) -> Option<&'a T> {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(found) = e.downcast_ref::<T>() {
            return Some(found);
        }
        current = e.source();
    }
    None
}

/// Render an error and its causes as `outer: cause: root`, skipping causes
/// whose text is already part of the message above them.
pub fn error_chain_message(err: &(dyn StdError + 'static)) -> String {
    let mut out = err.to_string();
    let mut current = err.source();
    while let Some(e) = current {
        let text = e.to_string();
        if !out.contains(&text) {
            out.push_str(": ");
            out.push_str(&text);
        }
        current = e.source();
    }
    out
}
