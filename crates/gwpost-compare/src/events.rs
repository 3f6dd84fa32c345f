//! Event selection by injection index.
//!
//! A selection is a comma separated list, optionally wrapped in brackets, of
//! single indices, inclusive ranges `a:b` (in either order) and the keyword
//! `all`.

use crate::CompareError;

/// Resolves `spec` against an injection table of `count` rows.
///
/// Indices are returned in the order they are named, without duplicates.
///
/// ```
/// use gwpost_compare::events::parse_events;
///
/// assert_eq!(parse_events("[0:2,5]", 10).unwrap(), vec![0, 1, 2, 5]);
/// assert_eq!(parse_events("3:1", 10).unwrap(), vec![3, 2, 1]);
/// assert_eq!(parse_events("all", 3).unwrap(), vec![0, 1, 2]);
/// assert!(parse_events("[4]", 3).is_err());
/// ```
pub fn parse_events(spec: &str, count: usize) -> Result<Vec<usize>, CompareError> {
    let invalid = |reason: &str| CompareError::InvalidEvents {
        spec: spec.to_owned(),
        reason: reason.to_owned(),
    };
    let tokens = spec
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect::<Vec<_>>();
    if tokens.is_empty() {
        return Err(invalid("no events given"));
    }
    if tokens.contains(&"all") {
        return Ok((0..count).collect());
    }

    let parse_index = |text: &str| {
        text.trim()
            .parse::<usize>()
            .map_err(|_| invalid(&format!("{text:?} is not an event index")))
    };
    let mut events = Vec::new();
    for token in tokens {
        if token.contains(':') {
            let limits = token.split(':').collect::<Vec<_>>();
            let &[low, high] = limits.as_slice() else {
                return Err(invalid("':' must separate two numbers"));
            };
            let (low, high) = (parse_index(low)?, parse_index(high)?);
            if low <= high {
                events.extend(low..=high);
            } else {
                events.extend((high..=low).rev());
            }
        } else {
            events.push(parse_index(token)?);
        }
    }

    if let Some(&index) = events.iter().find(|index| **index >= count) {
        return Err(CompareError::EventOutOfRange { index, count });
    }
    let mut seen = vec![false; count];
    events.retain(|index| !std::mem::replace(&mut seen[*index], true));
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranges_are_inclusive() {
        assert_eq!(parse_events("2:4", 5).unwrap(), vec![2, 3, 4]);
        assert_eq!(parse_events("[1:1]", 5).unwrap(), vec![1]);
        assert_eq!(parse_events("4:2, 0", 5).unwrap(), vec![4, 3, 2, 0]);
    }

    #[test]
    fn test_duplicates_are_dropped() {
        assert_eq!(parse_events("1,0:2,1", 5).unwrap(), vec![1, 0, 2]);
    }

    #[test]
    fn test_all_wins() {
        assert_eq!(parse_events("[7,all]", 2).unwrap(), vec![0, 1]);
        assert!(parse_events("all", 0).unwrap().is_empty());
    }

    #[test]
    fn test_malformed() {
        assert!(matches!(
            parse_events("1:2:3", 5),
            Err(CompareError::InvalidEvents { .. })
        ));
        assert!(matches!(
            parse_events("a", 5),
            Err(CompareError::InvalidEvents { .. })
        ));
        assert!(matches!(
            parse_events("[]", 5),
            Err(CompareError::InvalidEvents { .. })
        ));
        assert!(matches!(
            parse_events("0:9", 5),
            Err(CompareError::EventOutOfRange { index: 5, count: 5 })
        ));
    }
}
