use rayon::prelude::*;

use crate::types::Document;
use crate::{ParseOptions, Result};

/// Parses independent inputs on the rayon pool. Results keep input order.
pub fn parse_batch<S>(inputs: &[S], options: &ParseOptions) -> Vec<Result<Document>>
where
    S: AsRef<str> + Sync,
{
    inputs
        .par_iter()
        .map(|input| crate::decode::parse(input.as_ref(), options))
        .collect()
}
