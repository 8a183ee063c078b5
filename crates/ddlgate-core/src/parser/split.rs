//! Element splitting and tokenizing inside a table body

/// Split a table body into its top-level elements (columns and constraints).
///
/// Commas split only at parenthesis depth zero and outside single-quoted
/// strings. A quote preceded by a backslash does not toggle the string
/// state; the SQL doubled-quote escape (`''`) is not recognized.
pub fn split_elements(body: &str) -> Vec<String> {
    let mut elements = Vec::new();
    let mut current = String::new();
    let mut depth: i32 = 0;
    let mut in_quotes = false;
    let mut prev: Option<char> = None;

    for ch in body.chars() {
        match ch {
            '\'' => {
                if prev != Some('\\') {
                    in_quotes = !in_quotes;
                }
                current.push(ch);
            }
            '(' => {
                if !in_quotes {
                    depth += 1;
                }
                current.push(ch);
            }
            ')' => {
                if !in_quotes {
                    depth -= 1;
                }
                current.push(ch);
            }
            ',' if !in_quotes && depth == 0 => {
                elements.push(std::mem::take(&mut current));
            }
            _ => current.push(ch),
        }
        prev = Some(ch);
    }

    if !current.trim().is_empty() {
        elements.push(current);
    }

    elements
}

/// Split one element into whitespace-separated tokens.
///
/// A parenthesized span is fused with the surrounding text into a single
/// token, so `DECIMAL(10, 2)` and `CHECK (x > 0)` each stay in one piece
/// when there is no space before the parenthesis.
pub fn tokenize(element: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut depth: i32 = 0;

    for ch in element.trim().chars() {
        match ch {
            '(' => {
                depth += 1;
                current.push(ch);
            }
            ')' => {
                depth -= 1;
                current.push(ch);
            }
            ' ' | '\t' | '\n' | '\r' => {
                if depth > 0 {
                    current.push(ch);
                } else if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(ch),
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}
