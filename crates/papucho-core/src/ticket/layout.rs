//! Fixed-width text primitives for thermal tickets.
//!
//! Widths are counted in characters, not bytes: the printer receives one
//! Windows-1252 byte per character, so `Tomáte` occupies six columns.
//!
//! ```text
//! center("Orden", 11)               →  "   Orden   "
//! right_align_price("1 Coca", "$900.00", 16)
//!                                   →  "1 Coca   $900.00"
//!                                                     ▲ column 16, always
//! ```

/// Characters per line on 80 mm paper.
pub const DEFAULT_WIDTH: usize = 48;

const ELLIPSIS: &str = "...";

/// Display width of `text` in columns.
pub fn text_width(text: &str) -> usize {
    text.chars().count()
}

/// Keeps the first `width` characters.
pub fn truncate(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}

/// Shortens `text` to at most `width` columns, marking the cut with `...`.
pub fn truncate_with_ellipsis(text: &str, width: usize) -> String {
    if text_width(text) <= width {
        return text.to_string();
    }
    if width <= ELLIPSIS.len() {
        return ".".repeat(width);
    }
    let mut out = truncate(text, width - ELLIPSIS.len());
    out.push_str(ELLIPSIS);
    out
}

/// Centers `text` in exactly `width` columns. The odd leftover space goes
/// to the right; text wider than `width` is cut.
pub fn center(text: &str, width: usize) -> String {
    let text = truncate(text, width);
    let free = width - text_width(&text);
    let left = free / 2;
    let right = free - left;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(right))
}

/// Builds `left + padding + price` in exactly `width` columns with the last
/// character of `price` at column `width`.
///
/// At least one space separates both parts; a `left` that is too long is
/// shortened with an ellipsis. A price wider than the whole line keeps its
/// rightmost `width` characters.
pub fn right_align_price(left: &str, price: &str, width: usize) -> String {
    let price_width = text_width(price);
    if price_width >= width {
        return price.chars().skip(price_width - width).collect();
    }

    let room = width - price_width - 1;
    let left = truncate_with_ellipsis(left, room);
    let padding = width - text_width(&left) - price_width;
    format!("{}{}{}", left, " ".repeat(padding), price)
}

/// A full-width rule: `rule('=', 5)` → `"====="`.
pub fn rule(ch: char, width: usize) -> String {
    std::iter::repeat(ch).take(width).collect()
}

/// Word-wraps `text` to `width` columns. Continuation lines start with
/// `indent` spaces. Words longer than a line are split.
pub fn wrap(text: &str, width: usize, indent: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }
    let indent = indent.min(width.saturating_sub(1));
    let prefix = " ".repeat(indent);

    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word = word.to_string();
        loop {
            let available = if lines.is_empty() { width } else { width - indent };
            let used = text_width(&current);
            let needed = if used == 0 { text_width(&word) } else { used + 1 + text_width(&word) };

            if needed <= available {
                if used > 0 {
                    current.push(' ');
                }
                current.push_str(&word);
                break;
            }

            if used > 0 {
                lines.push(std::mem::take(&mut current));
                continue;
            }

            // a single word wider than the line
            let head = truncate(&word, available);
            word = word.chars().skip(available).collect();
            lines.push(head);
            if word.is_empty() {
                break;
            }
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| if i == 0 { line } else { format!("{}{}", prefix, line) })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_pads_extra_space_right() {
        assert_eq!(center("ab", 5), " ab  ");
        assert_eq!(center("abc", 5), " abc ");
        assert_eq!(center("", 3), "   ");
        assert_eq!(center("abcdefgh", 4), "abcd");
    }

    #[test]
    fn test_center_counts_characters_not_bytes() {
        let line = center("Tomáte", 10);
        assert_eq!(text_width(&line), 10);
        assert_eq!(line, "  Tomáte  ");
    }

    #[test]
    fn test_right_align_price_is_flush() {
        let line = right_align_price("1 Coca", "$900.00", 16);
        assert_eq!(line, "1 Coca   $900.00");

        let line = right_align_price("Sin Tomáte", "-$500.00", 48);
        assert_eq!(text_width(&line), 48);
        assert!(line.ends_with("-$500.00"));
    }

    #[test]
    fn test_right_align_price_truncates_left_with_ellipsis() {
        let line = right_align_price("2 Hamburguesa Triple con Todo", "$100.00", 20);
        assert_eq!(text_width(&line), 20);
        assert_eq!(line, "2 Hamburg... $100.00");
        assert!(line.ends_with("$100.00"));
    }

    #[test]
    fn test_right_align_price_exact_fit_keeps_one_space() {
        // 12 + 1 + 7 = 20
        let line = right_align_price("123456789012", "$100.00", 20);
        assert_eq!(line, "123456789012 $100.00");
        // one more character no longer fits
        let line = right_align_price("1234567890123", "$100.00", 20);
        assert_eq!(line, "123456789... $100.00");
    }

    #[test]
    fn test_right_align_price_oversized_price() {
        assert_eq!(right_align_price("x", "$123456.00", 6), "456.00");
        assert_eq!(right_align_price("x", "$1.00", 5), "$1.00");
        assert_eq!(right_align_price("x", "$1.00", 6), " $1.00");
    }

    #[test]
    fn test_truncate_with_ellipsis() {
        assert_eq!(truncate_with_ellipsis("short", 10), "short");
        assert_eq!(truncate_with_ellipsis("Hamburguesa", 8), "Hambu...");
        assert_eq!(truncate_with_ellipsis("Hamburguesa", 2), "..");
    }

    #[test]
    fn test_wrap_indents_continuation_lines() {
        let lines = wrap("Domicilio: Avenida San Martín 1234 piso 3", 20, 2);
        assert_eq!(
            lines,
            vec!["Domicilio: Avenida", "  San Martín 1234", "  piso 3"]
        );
        assert!(lines.iter().all(|l| text_width(l) <= 20));
    }

    #[test]
    fn test_wrap_splits_long_words() {
        let lines = wrap("abcdefghijkl", 5, 2);
        assert_eq!(lines, vec!["abcde", "  fgh", "  ijk", "  l"]);
    }

    #[test]
    fn test_wrap_empty() {
        assert!(wrap("", 10, 2).is_empty());
        assert!(wrap("   ", 10, 2).is_empty());
    }

    #[test]
    fn test_rule() {
        assert_eq!(rule('=', 4), "====");
        assert_eq!(text_width(&rule('-', DEFAULT_WIDTH)), 48);
    }
}
