//! Minimal CSV writing, RFC-4180 quoting.
//!
//! The delta files round-trip through DuckDB and Excel; Excel wants a
//! UTF-8 BOM to pick the right encoding, DuckDB ignores it.

use std::io::{self, Write};

/// UTF-8 byte order mark, written once at the start of a file.
pub const BOM: &str = "\u{feff}";

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write one CSV row with CRLF line ending.
pub fn write_row<W: Write>(mut w: W, row: &[String]) -> io::Result<()> {
    for (i, cell) in row.iter().enumerate() {
        if i > 0 {
            w.write_all(b",")?;
        }
        if needs_quotes(cell) {
            let escaped = cell.replace('"', "\"\"");
            write!(w, "\"{escaped}\"")?;
        } else {
            w.write_all(cell.as_bytes())?;
        }
    }
    w.write_all(b"\r\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_string(cells: &[&str]) -> String {
        let mut buf = Vec::new();
        let owned: Vec<String> = cells.iter().map(|s| s.to_string()).collect();
        write_row(&mut buf, &owned).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn plain_row() {
        assert_eq!(row_string(&["1001", "7203", "トヨタ"]), "1001,7203,トヨタ\r\n");
    }

    #[test]
    fn comma_forces_quotes() {
        assert_eq!(row_string(&["a,b", "c"]), "\"a,b\",c\r\n");
    }

    #[test]
    fn embedded_quote_doubled() {
        assert_eq!(row_string(&[r#"say "hi""#]), "\"say \"\"hi\"\"\"\r\n");
    }

    #[test]
    fn newline_forces_quotes() {
        assert_eq!(row_string(&["two\nlines"]), "\"two\nlines\"\r\n");
    }

    #[test]
    fn empty_cells_kept() {
        assert_eq!(row_string(&["a", "", "c"]), "a,,c\r\n");
    }
}
