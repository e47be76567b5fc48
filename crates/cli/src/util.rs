use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Display width of a string, accounting for CJK double-width, emoji, etc.
pub(crate) fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Align {
    Left,
    Right,
}

/// Fit `s` into exactly `width` display columns. Text that is too wide is
/// cut and marked with "..".
pub(crate) fn fit(s: &str, width: usize, align: Align) -> String {
    let used = display_width(s);
    if used > width {
        return clip(s, width);
    }
    let fill = " ".repeat(width - used);
    match align {
        Align::Left => format!("{s}{fill}"),
        Align::Right => format!("{fill}{s}"),
    }
}

fn clip(s: &str, width: usize) -> String {
    let marker = if width >= 3 { ".." } else { "" };
    let room = width - marker.len();

    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > room {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push_str(marker);
    // A double-width char that did not fit leaves one column short.
    out.push_str(&" ".repeat(width - used - marker.len()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_counts_double_width_chars() {
        assert_eq!(display_width("T101"), 4);
        assert_eq!(display_width("\u{4e16}\u{754c}"), 4); // "世界"
    }

    #[test]
    fn fit_pads_by_alignment() {
        assert_eq!(fit("L1", 5, Align::Left), "L1   ");
        assert_eq!(fit("7,000", 8, Align::Right), "   7,000");
        assert_eq!(fit("", 2, Align::Left), "  ");
    }

    #[test]
    fn fit_clips_wide_text() {
        assert_eq!(fit("Duplicate location", 10, Align::Left), "Duplicat..");
        assert_eq!(fit("W-1042", 2, Align::Right), "W-");
        assert_eq!(fit("\u{4e16}\u{754c}x", 4, Align::Left), "\u{4e16}..");
        assert_eq!(fit("a\u{4e16}\u{754c}", 4, Align::Left), "a.. ");
    }
}
