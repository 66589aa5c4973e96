use crate::engine::{Move, State, NUM_TOWERS};
use crate::error::ParseError;

/// Parses one string per tower into a `State`.
///
/// Each string lists a tower's disk sizes from bottom to top, separated by
/// whitespace or commas. An empty string, `-` or `.` is an empty tower.
///
/// # Returns
/// * `Ok(State)` if there are exactly `NUM_TOWERS` rows and the resulting
///   layout is a legal state.
/// * `Err(ParseError)` for a wrong row count, a token that is not a disk
///   size, or a layout that breaks the stacking rules.
///
/// # Examples
/// ```
/// use hanoi_solver::utils::state_from_str_array;
///
/// let state = state_from_str_array(&["3 2", "1", "-"]).unwrap();
/// assert_eq!(state.to_string(), "[[3, 2], [1], []]");
///
/// assert!(state_from_str_array(&["1 2", "", ""]).is_err()); // larger on smaller
/// assert!(state_from_str_array(&["3 x 1", "", ""]).is_err());
/// assert!(state_from_str_array(&["3 2 1", ""]).is_err());
/// ```
pub fn state_from_str_array(rows: &[&str]) -> Result<State, ParseError> {
    if rows.len() != NUM_TOWERS {
        return Err(ParseError::TowerCount {
            expected: NUM_TOWERS,
            found: rows.len(),
        });
    }

    let mut towers: [Vec<usize>; NUM_TOWERS] = Default::default();
    for (i, row) in rows.iter().enumerate() {
        let row = row.trim();
        if row == "-" || row == "." {
            continue;
        }
        for token in row
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
        {
            let disk = token.parse::<usize>().map_err(|_| ParseError::BadDisk {
                tower: i,
                token: token.to_string(),
            })?;
            towers[i].push(disk);
        }
    }

    Ok(State::from_towers(towers)?)
}

/// Parses a single line of `|`-separated towers, e.g. `"3 2 | 1 | "`.
pub fn state_from_str(s: &str) -> Result<State, ParseError> {
    let rows: Vec<&str> = s.split('|').collect();
    state_from_str_array(&rows)
}

/// Parses a move written as `source target`, `source,target` or `source->target`.
pub fn move_from_str(s: &str) -> Result<Move, ParseError> {
    let spaced = s.replace("->", " ");
    let parts: Vec<&str> = spaced
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .collect();
    match parts.as_slice() {
        [source, target] => match (source.parse::<usize>(), target.parse::<usize>()) {
            (Ok(source), Ok(target)) => Ok(Move::new(source, target)),
            _ => Err(ParseError::BadMove(s.to_string())),
        },
        _ => Err(ParseError::BadMove(s.to_string())),
    }
}

/// Formats a move list as `(0, 2) (0, 1) ...`.
pub fn format_moves(moves: &[Move]) -> String {
    moves
        .iter()
        .map(Move::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PuzzleError;

    #[test]
    fn test_state_from_str_array_valid() {
        let state = state_from_str_array(&["5 4 1", "3", "2"]).unwrap();
        assert_eq!(state.tower(0), &[5, 4, 1]);
        assert_eq!(state.tower(1), &[3]);
        assert_eq!(state.tower(2), &[2]);
    }

    #[test]
    fn test_state_from_str_array_commas_and_empty_markers() {
        let state = state_from_str_array(&["3,2,1", ".", ""]).unwrap();
        assert_eq!(state, State::new(3));
    }

    #[test]
    fn test_state_from_str_array_wrong_tower_count() {
        let result = state_from_str_array(&["3 2 1"]);
        assert_eq!(
            result,
            Err(ParseError::TowerCount {
                expected: 3,
                found: 1
            })
        );
    }

    #[test]
    fn test_state_from_str_array_bad_token() {
        let result = state_from_str_array(&["3 2", "one", ""]);
        assert_eq!(
            result,
            Err(ParseError::BadDisk {
                tower: 1,
                token: "one".to_string()
            })
        );
    }

    #[test]
    fn test_state_from_str_array_invalid_layout() {
        let result = state_from_str_array(&["3 1", "", "1"]);
        assert!(matches!(
            result,
            Err(ParseError::Puzzle(PuzzleError::InvalidState(_)))
        ));
    }

    #[test]
    fn test_state_from_str_single_line() {
        let state = state_from_str("4 3 | 2 1 |").unwrap();
        assert_eq!(state.to_string(), "[[4, 3], [2, 1], []]");
        assert!(state_from_str("4 3 | 2 1").is_err());
    }

    #[test]
    fn test_move_from_str_forms() {
        assert_eq!(move_from_str("0 2"), Ok(Move::new(0, 2)));
        assert_eq!(move_from_str("1,0"), Ok(Move::new(1, 0)));
        assert_eq!(move_from_str(" 2->1 "), Ok(Move::new(2, 1)));
        assert!(move_from_str("0").is_err());
        assert!(move_from_str("a b").is_err());
        assert!(move_from_str("0 1 2").is_err());
    }

    #[test]
    fn test_move_from_str_rejects_negative_towers() {
        assert_eq!(move_from_str("-1 2"), Err(ParseError::BadMove("-1 2".to_string())));
        assert!(move_from_str("0 -2").is_err());
        assert!(move_from_str("0,-2").is_err());
        assert!(move_from_str("1-2").is_err());
        assert!(move_from_str("1>2").is_err());
        assert_eq!(move_from_str("0->2"), Ok(Move::new(0, 2)));
        assert_eq!(move_from_str("0 -> 2"), Ok(Move::new(0, 2)));
    }

    #[test]
    fn test_format_moves() {
        let moves = [Move::new(0, 2), Move::new(0, 1)];
        assert_eq!(format_moves(&moves), "(0, 2) (0, 1)");
        assert_eq!(format_moves(&[]), "");
    }
}
