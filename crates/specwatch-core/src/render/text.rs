//! Text metrics and line wrapping.
//!
//! Widths are approximations of the standard Helvetica metrics, expressed as
//! a fraction of the font size. They only need to be conservative enough that
//! wrapped lines stay inside their block.

/// Width of a single character in em units.
fn char_em(c: char) -> f32 {
    match c {
        'i' | 'j' | 'l' | '.' | ',' | ':' | ';' | '\'' | '|' | '!' | ' ' => 0.28,
        'f' | 't' | 'r' | '(' | ')' | '[' | ']' | '/' | '-' => 0.36,
        'm' | 'w' | 'M' | 'W' | '@' => 0.86,
        c if c.is_ascii_digit() => 0.56,
        c if c.is_ascii_uppercase() => 0.68,
        _ => 0.56,
    }
}

/// Estimated rendered width of `text` at `size` points.
pub fn text_width(text: &str, size: f32) -> f32 {
    text.chars().map(char_em).sum::<f32>() * size
}

/// Baseline-to-baseline distance for `size`.
pub fn line_height(size: f32) -> f32 {
    size * 1.35
}

/// Greedy word wrap. Words wider than `max_width` are split by character.
/// Always returns at least one line.
pub fn wrap(text: &str, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if text_width(&candidate, size) <= max_width {
            current = candidate;
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if text_width(word, size) <= max_width {
            current = word.to_string();
        } else {
            for piece in split_long_word(word, size, max_width) {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                current = piece;
            }
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

fn split_long_word(word: &str, size: f32, max_width: f32) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    for c in word.chars() {
        piece.push(c);
        if text_width(&piece, size) > max_width && piece.chars().count() > 1 {
            piece.pop();
            pieces.push(std::mem::take(&mut piece));
            piece.push(c);
        }
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}

/// Cut `text` to fit `max_width`, appending `...` when shortened.
pub fn truncate(text: &str, size: f32, max_width: f32) -> String {
    if text_width(text, size) <= max_width {
        return text.to_string();
    }
    let budget = max_width - text_width("...", size);
    let mut out = String::new();
    for c in text.chars() {
        if text_width(&out, size) + char_em(c) * size > budget {
            break;
        }
        out.push(c);
    }
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_one_line() {
        assert_eq!(wrap("hello world", 10.0, 500.0), vec!["hello world"]);
    }

    #[test]
    fn empty_text_yields_one_empty_line() {
        assert_eq!(wrap("", 10.0, 100.0), vec![String::new()]);
    }

    #[test]
    fn wrapped_lines_fit() {
        let text = "Operation must have at least one 2xx or 3xx response defined for every method";
        let lines = wrap(text, 10.0, 120.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(line, 10.0) <= 120.0, "{line:?} overflows");
        }
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn long_words_are_split() {
        let word = "x".repeat(200);
        let lines = wrap(&word, 10.0, 100.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
        for line in &lines {
            assert!(text_width(line, 10.0) <= 100.0);
        }
    }

    #[test]
    fn truncate_adds_ellipsis() {
        let long = "paths./pets/{petId}.get.responses.200.content.application/json.schema";
        let cut = truncate(long, 9.0, 120.0);
        assert!(cut.ends_with("..."));
        assert!(text_width(&cut, 9.0) <= 120.0);
        assert_eq!(truncate("short", 9.0, 120.0), "short");
    }
}
