/// Numbered lines up to this many characters (after the marker) are treated
/// as subtitles and emphasised.
pub const SUBTITLE_MAX_CHARS: usize = 50;

/// Cleans model output for plain display.
///
/// Markdown heading markers (`#` to `####` followed by a space) are dropped,
/// and short numbered lines such as `1. Outlook` are wrapped in `**`.
pub fn tidy_completion(text: &str) -> String {
    text.lines()
        .map(|line| {
            let line = strip_heading(line);
            if is_subtitle(line) {
                format!("**{line}**")
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn strip_heading(line: &str) -> &str {
    let hashes = line.len() - line.trim_start_matches('#').len();
    if (1..=4).contains(&hashes) {
        if let Some(rest) = line[hashes..].strip_prefix(' ') {
            return rest;
        }
    }
    line
}

fn is_subtitle(line: &str) -> bool {
    let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return false;
    }
    let Some(rest) = line[digits..].strip_prefix('.') else {
        return false;
    };
    let title = rest.trim_start();
    if title.len() == rest.len() {
        return false;
    }
    let chars = title.chars().count();
    chars > 0 && chars <= SUBTITLE_MAX_CHARS
}
