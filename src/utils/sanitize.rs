//! Sanitizing server-provided text for terminal display.
//!
//! Assistant replies, suggestion rows, and topic bodies come off the wire
//! and are drawn straight into the terminal. An escape sequence embedded in
//! them could move the cursor, retitle the window, or clear the screen, so
//! remote text is scrubbed before rendering: CSI and OSC sequences are
//! removed whole, and control characters other than tab, newline, and
//! carriage return are dropped. Carriage returns are also dropped, which
//! folds CRLF line endings down to plain newlines.

/// Strip terminal escape sequences and stray control characters.
pub fn sanitize_for_display(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\x1b' {
            match chars.peek() {
                // CSI: ESC [ ... final byte in 0x40..=0x7E
                Some('[') => {
                    chars.next();
                    while let Some(&next) = chars.peek() {
                        chars.next();
                        if ('\x40'..='\x7e').contains(&next) {
                            break;
                        }
                    }
                }
                // OSC: ESC ] ... terminated by BEL or ESC \
                Some(']') => {
                    chars.next();
                    while let Some(next) = chars.next() {
                        if next == '\x07' {
                            break;
                        }
                        if next == '\x1b' && chars.peek() == Some(&'\\') {
                            chars.next();
                            break;
                        }
                    }
                }
                // two-character escapes (ESC c, ESC 7, ...)
                Some(_) => {
                    chars.next();
                }
                None => {}
            }
            continue;
        }

        if ch.is_control() && ch != '\t' && ch != '\n' {
            continue;
        }
        result.push(ch);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_codes_stripped() {
        assert_eq!(sanitize_for_display("\x1b[31malert\x1b[0m level"), "alert level");
    }

    #[test]
    fn test_clear_screen_and_cursor_moves_stripped() {
        assert_eq!(sanitize_for_display("\x1b[2J\x1b[1;1Hqui\x1b[3~et"), "quiet");
    }

    #[test]
    fn test_osc_window_title_stripped() {
        assert_eq!(sanitize_for_display("\x1b]0;owned\x07reply"), "reply");
        assert_eq!(sanitize_for_display("\x1b]8;;http://x\x1b\\link"), "link");
    }

    #[test]
    fn test_two_character_escape_stripped() {
        assert_eq!(sanitize_for_display("\x1bcfresh"), "fresh");
    }

    #[test]
    fn test_crlf_folds_to_newline() {
        assert_eq!(sanitize_for_display("line one\r\nline two"), "line one\nline two");
    }

    #[test]
    fn test_tabs_and_newlines_preserved() {
        assert_eq!(sanitize_for_display("a\tb\nc"), "a\tb\nc");
    }

    #[test]
    fn test_bell_and_backspace_dropped() {
        assert_eq!(sanitize_for_display("ding\x07 ba\x08ck"), "ding back");
    }

    #[test]
    fn test_plain_text_unchanged() {
        let text = "The glomerulus filters roughly 180 L/day.";
        assert_eq!(sanitize_for_display(text), text);
    }

    #[test]
    fn test_unicode_preserved() {
        assert_eq!(sanitize_for_display("心臓 → heart ❤"), "心臓 → heart ❤");
    }

    #[test]
    fn test_trailing_escape_without_sequence() {
        assert_eq!(sanitize_for_display("dangling\x1b"), "dangling");
    }
}
