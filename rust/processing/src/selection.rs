// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Slot selection parsing
//!
//! Accepts comma-separated indices and inclusive ranges: `5,12,18-20`.

use crate::error::{Error, Result};
use tracing::warn;

/// Parse a selection string into slot indices
///
/// Order is preserved and repeats are kept; validation against a grid is a
/// separate step ([`partition`]).
pub fn parse_selection(input: &str) -> Result<Vec<usize>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::selection(input, "empty selection"));
    }

    let mut indices = Vec::new();
    for part in trimmed.split(',').map(str::trim) {
        if part.is_empty() {
            return Err(Error::selection(input, "empty entry between commas"));
        }

        match part.split_once('-') {
            Some((start, end)) => {
                let start = parse_index(input, start)?;
                let end = parse_index(input, end)?;
                if start > end {
                    return Err(Error::selection(
                        input,
                        format!("range {}-{} runs backwards", start, end),
                    ));
                }
                indices.extend(start..=end);
            }
            None => indices.push(parse_index(input, part)?),
        }
    }

    Ok(indices)
}

fn parse_index(input: &str, token: &str) -> Result<usize> {
    token
        .trim()
        .parse::<usize>()
        .map_err(|_| Error::selection(input, format!("'{}' is not a slot number", token.trim())))
}

/// Indices split by whether they exist on a grid of `slot_count` slots
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub valid: Vec<usize>,
    pub ignored: Vec<usize>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.valid.is_empty()
    }
}

/// Split indices into those within `[1, slot_count]` and the rest
pub fn partition(indices: &[usize], slot_count: usize) -> Selection {
    let (valid, ignored): (Vec<usize>, Vec<usize>) = indices
        .iter()
        .copied()
        .partition(|i| (1..=slot_count).contains(i));

    if !ignored.is_empty() {
        warn!(?ignored, slot_count, "Ignoring slot numbers outside the grid");
    }

    Selection { valid, ignored }
}

/// Parse and validate in one step
pub fn select(input: &str, slot_count: usize) -> Result<Selection> {
    Ok(partition(&parse_selection(input)?, slot_count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_and_ranges() {
        assert_eq!(parse_selection("5,12,18").unwrap(), vec![5, 12, 18]);
        assert_eq!(parse_selection("5-8").unwrap(), vec![5, 6, 7, 8]);
        assert_eq!(
            parse_selection(" 3, 10-12 ,1 ").unwrap(),
            vec![3, 10, 11, 12, 1]
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_selection("").is_err());
        assert!(parse_selection("1,,2").is_err());
        assert!(parse_selection("8-5").is_err());
        assert!(parse_selection("a,2").is_err());
        assert!(parse_selection("-3").is_err());
    }

    #[test]
    fn test_partition() {
        let selection = partition(&[0, 1, 5, 41, 42], 41);
        assert_eq!(selection.valid, vec![1, 5, 41]);
        assert_eq!(selection.ignored, vec![0, 42]);
        assert!(select("50-52", 41).unwrap().is_empty());
    }
}
