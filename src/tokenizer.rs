//! Best-effort CSV tokenizer for spreadsheet exports.
//!
//! Spreadsheet CSV is untrusted input: quoting may be inconsistent, line
//! terminators mixed, and trailing blank lines common. The scanner never
//! fails; malformed quoting degrades to a best-effort split instead of
//! aborting the whole fetch.

/// Splits raw CSV text into rows of trimmed cells.
///
/// Rules, applied in a single left-to-right scan:
/// - a leading byte-order mark is stripped,
/// - a doubled quote emits one literal quote character,
/// - an unescaped quote toggles the quoted-field state,
/// - a comma outside quotes ends the current cell,
/// - CR, LF, or CRLF outside quotes ends the current row,
/// - a row is kept only when at least one of its cells is non-empty,
/// - end of input flushes any in-progress cell and row.
pub fn tokenize(input: &str) -> Vec<Vec<String>> {
    let text = input.strip_prefix('\u{feff}').unwrap_or(input);

    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if chars.peek() == Some(&'"') => {
                cell.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                row.push(cell.trim().to_string());
                cell.clear();
            }
            '\r' | '\n' if !in_quotes => {
                // CRLF counts as a single terminator
                if c == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                row.push(cell.trim().to_string());
                cell.clear();
                if row.iter().any(|c| !c.is_empty()) {
                    rows.push(std::mem::take(&mut row));
                } else {
                    row.clear();
                }
            }
            _ => cell.push(c),
        }
    }

    if !cell.is_empty() || !row.is_empty() {
        row.push(cell.trim().to_string());
        if row.iter().any(|c| !c.is_empty()) {
            rows.push(row);
        }
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_plain_rows_and_trims_cells() {
        let rows = tokenize("a, b ,c\nd,e,f");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec!["a".to_string(), "b".to_string(), "c".to_string()]);
        assert_eq!(rows[1], vec!["d".to_string(), "e".to_string(), "f".to_string()]);
    }

    #[test]
    fn honors_quoted_commas_and_escaped_quotes() {
        let rows = tokenize("name,note\n\"Sharma, Arjun\",\"said \"\"maybe\"\"\"");
        assert_eq!(rows[1][0], "Sharma, Arjun");
        assert_eq!(rows[1][1], "said \"maybe\"");
    }

    #[test]
    fn treats_crlf_as_single_terminator() {
        let rows = tokenize("a,b\r\nc,d\rd2,e\nf,g");
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[1], vec!["c".to_string(), "d".to_string()]);
    }

    #[test]
    fn drops_fully_blank_rows() {
        let rows = tokenize("a,b\n\n,,\n ,\nc,d\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], vec!["c".to_string(), "d".to_string()]);
    }

    #[test]
    fn strips_byte_order_mark() {
        let rows = tokenize("\u{feff}id,name\n1,x");
        assert_eq!(rows[0][0], "id");
    }

    #[test]
    fn flushes_final_row_without_terminator() {
        let rows = tokenize("a,b\nc,d");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], vec!["c".to_string(), "d".to_string()]);
    }

    #[test]
    fn newline_inside_quotes_stays_in_cell() {
        let rows = tokenize("a,\"line1\nline2\"\nb,c");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][1], "line1\nline2");
    }

    #[test]
    fn unterminated_quote_degrades_without_error() {
        // Everything after the stray quote lands in one cell
        let rows = tokenize("a,\"unclosed,b\nc,d");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][0], "a");
        assert_eq!(rows[0][1], "unclosed,b\nc,d");
    }

    #[test]
    fn empty_input_yields_no_rows() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("\n\r\n").is_empty());
    }
}
