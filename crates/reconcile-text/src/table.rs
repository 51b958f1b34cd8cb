//! Minimal GitHub-flavored markdown table parser: just enough to feed
//! table reconciliation (C11) a `{headers, rows}` shape. Anything that
//! doesn't look like a pipe table with a separator row simply fails to
//! parse — the router falls back to reconstruction mode (§4.13).

#[derive(Debug, Clone)]
pub struct MarkdownTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

fn split_row(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    let trimmed = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix('|').unwrap_or(trimmed);
    trimmed.split('|').map(|c| c.trim().to_string()).collect()
}

fn is_separator_row(line: &str) -> bool {
    let cells = split_row(line);
    !cells.is_empty()
        && cells.iter().all(|c| {
            !c.is_empty()
                && c.chars().all(|ch| ch == '-' || ch == ':' || ch.is_whitespace())
                && c.contains('-')
        })
}

/// Parses `text` as a markdown pipe table. Requires at least a header row
/// and a separator row; body rows are optional (a header-only table is
/// still a table).
pub fn parse_markdown_table(text: &str) -> Option<MarkdownTable> {
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    if lines.len() < 2 {
        return None;
    }
    if !is_separator_row(lines[1]) {
        return None;
    }
    let headers = split_row(lines[0]);
    if headers.is_empty() {
        return None;
    }
    let rows = lines[2..].iter().map(|l| split_row(l)).collect();
    Some(MarkdownTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_simple_table() {
        let text = "| A | B |\n| --- | --- |\n| 1 | 2 |\n| 3 | 4 |";
        let table = parse_markdown_table(text).unwrap();
        assert_eq!(table.headers, vec!["A", "B"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0], vec!["1", "2"]);
    }

    #[test]
    fn header_only_table_parses_with_no_rows() {
        let text = "| A | B |\n| --- | --- |";
        let table = parse_markdown_table(text).unwrap();
        assert!(table.rows.is_empty());
    }

    #[test]
    fn plain_text_is_not_a_table() {
        assert!(parse_markdown_table("just some text\nmore text").is_none());
    }

    #[test]
    fn missing_separator_row_is_not_a_table() {
        assert!(parse_markdown_table("| A | B |\n| 1 | 2 |").is_none());
    }
}
