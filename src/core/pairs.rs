//! `key=value` argument parsing.

use crate::error::{Result, SeedError};
use crate::models::kv::KeyValueSet;

/// Parse command-line pairs into a [`KeyValueSet`].
///
/// Each argument is split on its first `=`, so values may themselves contain
/// `=`. When a key repeats, the last occurrence wins. An empty list is a
/// usage error naming `program`; a single argument without `=` rejects the
/// whole list.
pub fn parse_pairs<S: AsRef<str>>(program: &str, args: &[S]) -> Result<KeyValueSet> {
    if args.is_empty() {
        return Err(SeedError::Usage {
            program: program.to_string(),
        });
    }

    let mut pairs = Vec::with_capacity(args.len());
    for arg in args {
        let arg = arg.as_ref();
        let (key, value) = arg
            .split_once('=')
            .ok_or_else(|| SeedError::MalformedArgument(arg.to_string()))?;
        pairs.push((key.to_string(), value.to_string()));
    }
    Ok(pairs.into_iter().collect())
}
