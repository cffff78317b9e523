//! Raw `row,col` coordinate parsing for command arguments

use anyhow::{bail, Context, Result};

use havannah_core::Cell;

/// Parse a single `row,col` pair
pub fn parse_cell(text: &str) -> Result<Cell> {
    let Some((row, col)) = text.trim().split_once(',') else {
        bail!("expected row,col but got '{}'", text);
    };

    let row: i8 = row
        .trim()
        .parse()
        .with_context(|| format!("invalid row in '{}'", text))?;
    let col: i8 = col
        .trim()
        .parse()
        .with_context(|| format!("invalid column in '{}'", text))?;

    Ok(Cell::new(row, col))
}

/// Parse a whitespace-separated move list such as `9,9 8,9 9,8`
pub fn parse_moves(text: &str) -> Result<Vec<Cell>> {
    text.split_whitespace().map(parse_cell).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cell() {
        assert_eq!(parse_cell("9,9").unwrap(), Cell::new(9, 9));
        assert_eq!(parse_cell(" 8 , 10 ").unwrap(), Cell::new(8, 10));
        assert!(parse_cell("9").is_err());
        assert!(parse_cell("a,9").is_err());
        assert!(parse_cell("9,300").is_err());
    }

    #[test]
    fn test_parse_moves() {
        assert_eq!(
            parse_moves("9,9 8,9\n9,8").unwrap(),
            vec![Cell::new(9, 9), Cell::new(8, 9), Cell::new(9, 8)]
        );
        assert!(parse_moves("").unwrap().is_empty());
        assert!(parse_moves("9,9 x").is_err());
    }
}
