//! LRC format parser
//!
//! Supports the common `[mm:ss.xx]text` format with line-level timing, and
//! enhanced lines carrying `<mm:ss.xx>` word tags:
//! `[00:01.00]<00:01.00>I <00:01.40>want <00:02.10>you`.

use super::types::{LyricToken, process_tokens};

/// Parse a timestamp tag such as `[mm:ss.xx]` or `<mm:ss.xx>`
///
/// Returns the consumed byte count and the time in milliseconds.
fn parse_tag(src: &str, open: char, close: char) -> Option<(usize, u64)> {
    if !src.starts_with(open) {
        return None;
    }

    let end = src.find(close)?;
    let time_str = &src[1..end];

    // Skip metadata tags like [ar:Artist], [ti:Title]
    if time_str.chars().next().is_some_and(|c| c.is_alphabetic()) {
        return None;
    }

    // Parse mm:ss.xx or mm:ss:xx
    let parts: Vec<&str> = time_str.split([':', '.']).collect();

    let time_ms = match parts.len() {
        2 => {
            let min: u64 = parts[0].parse().ok()?;
            let sec: u64 = parts[1].parse().ok()?;
            to_ms(min, sec, 0)?
        }
        3 => {
            let min: u64 = parts[0].parse().ok()?;
            let sec: u64 = parts[1].parse().ok()?;
            let frac_str = parts[2];
            let mut frac: u64 = frac_str.parse().ok()?;

            // xx is centiseconds, xxx milliseconds
            match frac_str.len() {
                1 => frac *= 100,
                2 => frac *= 10,
                3 => {}
                _ => return None,
            }

            to_ms(min, sec, frac)?
        }
        _ => return None,
    };

    Some((end + close.len_utf8(), time_ms))
}

/// Tags with out-of-range fields are rejected rather than wrapped
fn to_ms(min: u64, sec: u64, frac_ms: u64) -> Option<u64> {
    min.checked_mul(60_000)?
        .checked_add(sec.checked_mul(1000)?)?
        .checked_add(frac_ms)
}

fn ms_to_seconds(ms: u64) -> f64 {
    ms as f64 / 1000.0
}

/// Split the text part of a line into timed tokens
///
/// Text before the first word tag starts at `line_start`.
fn split_words(text: &str, line_start: u64) -> Vec<(u64, String)> {
    let mut words = Vec::new();
    let mut start = line_start;
    let mut pos = 0;

    while pos < text.len() {
        if let Some((consumed, time)) = parse_tag(&text[pos..], '<', '>') {
            start = time;
            pos += consumed;
            continue;
        }

        // Up to the next '<', skipping a stray one that is not a valid tag
        let skip = text[pos..].chars().next().map_or(1, char::len_utf8);
        let next = text[pos + skip..]
            .find('<')
            .map(|i| pos + skip + i)
            .unwrap_or(text.len());
        let word = text[pos..next].trim();
        if !word.is_empty() {
            words.push((start, word.to_string()));
        }
        pos = next;
    }

    words
}

/// Parse a single LRC line, which may have multiple timestamps
fn parse_line(line: &str) -> Vec<LyricToken> {
    let mut timestamps = Vec::new();
    let mut pos = 0;
    let line = line.trim();

    // Extract all timestamps at the beginning
    while pos < line.len() {
        if let Some((consumed, time)) = parse_tag(&line[pos..], '[', ']') {
            timestamps.push(time);
            pos += consumed;
        } else {
            break;
        }
    }

    let Some(&first) = timestamps.first() else {
        return Vec::new();
    };

    // Word times are relative to the first timestamp; repeats shift them
    let words = split_words(&line[pos..], first);
    let mut results = Vec::with_capacity(words.len() * timestamps.len());
    for line_start in timestamps {
        for (word_start, text) in &words {
            let shifted = word_start.saturating_sub(first).saturating_add(line_start);
            results.push(LyricToken::new(ms_to_seconds(shifted), text.clone()));
        }
    }

    results
}

/// Parse LRC content into lyric tokens
pub fn parse_lrc(src: &str) -> Vec<LyricToken> {
    let mut result: Vec<LyricToken> = src.lines().flat_map(parse_line).collect();
    process_tokens(&mut result);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tag() {
        assert_eq!(parse_tag("[00:01.12]", '[', ']'), Some((10, 1120)));
        assert_eq!(parse_tag("[00:10.254]", '[', ']'), Some((11, 10254)));
        assert_eq!(parse_tag("[01:10.1]", '[', ']'), Some((9, 70100)));
        assert_eq!(parse_tag("[00:00.00]", '[', ']'), Some((10, 0)));
        assert_eq!(parse_tag("[02:03]", '[', ']'), Some((7, 123000)));
        assert_eq!(parse_tag("<00:02.50>word", '<', '>'), Some((10, 2500)));
        assert_eq!(parse_tag("[ar:Artist]", '[', ']'), None);
        assert_eq!(parse_tag("[00:01.1234]", '[', ']'), None);
    }

    #[test]
    fn test_oversized_tag_fields_rejected() {
        assert_eq!(parse_tag("[18446744073709551:00.00]", '[', ']'), None);
        assert_eq!(parse_tag("[00:99999999999999999]", '[', ']'), None);
        assert_eq!(parse_tag("<18446744073709551:00.00>", '<', '>'), None);

        let tokens = parse_lrc("[18446744073709551:00.00]boom\n[00:01.00]ok");
        assert_eq!(tokens, vec![LyricToken::new(1.0, "ok")]);
    }

    #[test]
    fn test_parse_line() {
        let tokens = parse_line("[00:01.12] test LyRiC");
        assert_eq!(tokens.len(), 1);
        assert!((tokens[0].start_time - 1.12).abs() < 1e-9);
        assert_eq!(tokens[0].text, "test LyRiC");
    }

    #[test]
    fn test_parse_multiple_timestamps() {
        let tokens = parse_line("[00:12.50][01:30.00]Repeated line");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].start_time, 12.5);
        assert_eq!(tokens[1].start_time, 90.0);
    }

    #[test]
    fn test_word_tags() {
        let tokens = parse_line("[00:01.00]<00:01.00>I <00:01.40>want <00:02.10>you");
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["I", "want", "you"]);
        assert_eq!(tokens[1].start_time, 1.4);
        assert_eq!(tokens[2].start_time, 2.1);
    }

    #[test]
    fn test_word_tags_on_repeated_line() {
        let tokens = parse_line("[00:01.00][00:11.00]<00:01.00>la <00:01.50>la");
        let times: Vec<f64> = tokens.iter().map(|t| t.start_time).collect();
        assert_eq!(times, [1.0, 1.5, 11.0, 11.5]);
    }

    #[test]
    fn test_text_before_first_word_tag() {
        let tokens = parse_line("[00:03.00]Oh <00:04.00>yeah");
        assert_eq!(tokens[0], LyricToken::new(3.0, "Oh"));
        assert_eq!(tokens[1], LyricToken::new(4.0, "yeah"));
    }

    #[test]
    fn test_stray_angle_bracket() {
        let tokens = parse_line("[00:03.00]1 < 2");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].text, "1");
        assert_eq!(tokens[1].text, "< 2");
    }

    #[test]
    fn test_multibyte_words() {
        let tokens = parse_line("[00:01.00]<00:01.00>夜に <00:02.00>駆ける");
        assert_eq!(tokens[0].text, "夜に");
        assert_eq!(tokens[1], LyricToken::new(2.0, "駆ける"));
    }

    #[test]
    fn test_parse_lrc() {
        let content = "[ti:Test Song]\n[ar:Test Artist]\n[00:05.00]Second line\n[00:00.00]First line\n[00:08.00]\n[00:10.00]Third line";
        let tokens = parse_lrc(content);
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].text, "First line");
        assert_eq!(tokens[1].text, "Second line");
        assert_eq!(tokens[2].text, "Third line");
    }
}
