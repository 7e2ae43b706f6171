/// Longest run of one character tolerated before a field is treated as
/// garbage/obfuscated text and truncated.
const MAX_CHAR_RUN: usize = 30;

/// Cleans one extracted text field: collapses whitespace runs to a single
/// space, trims, strips control characters, and truncates absurd repetitions.
/// Applied uniformly to every text that ends up in a [`crate::results::ContentElement`].
pub fn clean_text(raw: &str) -> String {
    let mut cleaned = String::with_capacity(raw.len());

    let mut last_was_space = false;
    for ch in raw.chars() {
        if ch.is_whitespace() {
            if !last_was_space {
                cleaned.push(' ');
                last_was_space = true;
            }
        } else if !is_control(ch) {
            cleaned.push(ch);
            last_was_space = false;
        }
    }

    collapse_runs(cleaned.trim())
}

/// Control characters stripped from output, keeping ordinary whitespace
/// (which the collapse above already handled).
fn is_control(ch: char) -> bool {
    matches!(ch, '\u{0000}'..='\u{0008}' | '\u{000B}' | '\u{000C}' | '\u{000E}'..='\u{001F}' | '\u{007F}')
}

/// Collapses any character repeated more than [`MAX_CHAR_RUN`] times in a row
/// down to three occurrences plus an ellipsis marker.
fn collapse_runs(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut run_char: Option<char> = None;
    let mut run_len = 0usize;

    let mut flush = |out: &mut String, ch: char, len: usize| {
        if len > MAX_CHAR_RUN {
            for _ in 0..3 {
                out.push(ch);
            }
            out.push_str("...");
        } else {
            for _ in 0..len {
                out.push(ch);
            }
        }
    };

    for ch in text.chars() {
        match run_char {
            Some(current) if current == ch => run_len += 1,
            Some(current) => {
                flush(&mut out, current, run_len);
                run_char = Some(ch);
                run_len = 1;
            }
            None => {
                run_char = Some(ch);
                run_len = 1;
            }
        }
    }
    if let Some(current) = run_char {
        flush(&mut out, current, run_len);
    }

    out
}
