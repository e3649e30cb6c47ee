//! ABC-notation header extraction.
//!
//! ABC files are plain text: a header of `X:`-style field lines followed by
//! the music body. This module pulls out the fields the pipeline needs —
//! title, composer, voices, tune count — by line-prefix matching. No attempt
//! is made to understand the music itself; rendering is the job of the
//! browser-side library that consumes the embedded source.
//!
//! ## Header scanning
//!
//! Scanning walks lines from the top of a tune and stops at the first blank
//! line or at a `K:`, `M:`, `L:`, or `V:` field (the key line conventionally
//! ends an ABC header; the others only appear at or past its tail end).
//! Within the scanned region:
//!
//! - `T:` lines accumulate: a second title is appended with a space. Hymn
//!   titles are routinely split across two `T:` lines in this corpus.
//! - `C:` lines overwrite: the last composer wins.
//!
//! ## Tunes and voices
//!
//! A single `.abc` file may hold several tunes separated by `X:` lines.
//! Page metadata comes from the first tune; the count is kept so the scan
//! output can show "(3 tunes)".
//!
//! Voice ids are collected from the whole file regardless of header
//! boundaries: `V:` declaration lines and inline `[V:id]` tags, distinct,
//! in first-appearance order.

/// Metadata extracted from an ABC tune header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TuneHeader {
    pub title: Option<String>,
    pub composer: Option<String>,
}

/// Prefixes that terminate header scanning.
const HEADER_TERMINATORS: &[&str] = &["K:", "M:", "L:", "V:"];

/// Extract title and composer from the header of a single tune.
pub fn extract_header(tune: &str) -> TuneHeader {
    let mut title: Option<String> = None;
    let mut composer: Option<String> = None;

    for line in tune.lines() {
        if line.trim().is_empty() {
            break;
        }
        if HEADER_TERMINATORS.iter().any(|p| line.starts_with(p)) {
            break;
        }
        if let Some(rest) = line.strip_prefix("T:") {
            let rest = rest.trim();
            if rest.is_empty() {
                continue;
            }
            title = match title {
                Some(existing) => Some(format!("{} {}", existing, rest)),
                None => Some(rest.to_string()),
            };
        } else if let Some(rest) = line.strip_prefix("C:") {
            let rest = rest.trim();
            if !rest.is_empty() {
                composer = Some(rest.to_string());
            }
        }
    }

    TuneHeader { title, composer }
}

/// Split a file into tunes on `X:` lines.
///
/// Every returned slice starts with its `X:` line except possibly the first,
/// which covers any content before the first `X:`. Content that is only
/// whitespace is dropped, so a file without `X:` yields a single tune.
pub fn split_tunes(content: &str) -> Vec<&str> {
    let mut bounds = vec![0];
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        let start = offset;
        offset += line.len();
        if start > 0 && line.starts_with("X:") {
            bounds.push(start);
        }
    }
    bounds.push(content.len());

    bounds
        .windows(2)
        .map(|w| &content[w[0]..w[1]])
        .filter(|tune| !tune.trim().is_empty())
        .collect()
}

/// Collect distinct voice ids in first-appearance order.
///
/// Recognizes `V:` declaration lines (`V:1 clef=bass`) and inline voice
/// tags in music lines (`[V:2] G,2 A,2`).
pub fn collect_voices(content: &str) -> Vec<String> {
    let mut voices: Vec<String> = Vec::new();

    let mut push = |id: &str| {
        let id = id.trim();
        if !id.is_empty() && !voices.iter().any(|v| v == id) {
            voices.push(id.to_string());
        }
    };

    for line in content.lines() {
        if let Some(rest) = line.strip_prefix("V:") {
            // The id is the first whitespace-delimited token.
            if let Some(id) = rest.split_whitespace().next() {
                push(id);
            }
            continue;
        }
        // Inline [V:id] tags, any number per line.
        let mut rest = line;
        while let Some(pos) = rest.find("[V:") {
            rest = &rest[pos + 3..];
            if let Some(end) = rest.find(']') {
                push(&rest[..end]);
                rest = &rest[end + 1..];
            } else {
                break;
            }
        }
    }

    voices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_and_composer() {
        let h = extract_header("X:1\nT:Cherubic Hymn\nC:Bortniansky\nK:C\nCDEF|\n");
        assert_eq!(h.title.as_deref(), Some("Cherubic Hymn"));
        assert_eq!(h.composer.as_deref(), Some("Bortniansky"));
    }

    #[test]
    fn multiple_titles_concatenated() {
        let h = extract_header("X:1\nT:Cherubic Hymn\nT:Ancient Chant\nK:C\n");
        assert_eq!(h.title.as_deref(), Some("Cherubic Hymn Ancient Chant"));
    }

    #[test]
    fn later_composer_wins() {
        let h = extract_header("X:1\nC:First\nT:Hymn\nC:Second\nK:C\n");
        assert_eq!(h.composer.as_deref(), Some("Second"));
    }

    #[test]
    fn blank_line_terminates() {
        let h = extract_header("X:1\nT:Real Title\n\nT:Not A Title\n");
        assert_eq!(h.title.as_deref(), Some("Real Title"));
    }

    #[test]
    fn key_line_terminates() {
        let h = extract_header("X:1\nT:Hymn\nK:Dm\nT:Lyric line, not a title\n");
        assert_eq!(h.title.as_deref(), Some("Hymn"));
    }

    #[test]
    fn meter_line_terminates() {
        let h = extract_header("X:1\nM:4/4\nT:Too Late\n");
        assert_eq!(h.title, None);
    }

    #[test]
    fn voice_line_terminates_header() {
        let h = extract_header("X:1\nT:Hymn\nV:1\nC:Not Reached\n");
        assert_eq!(h.title.as_deref(), Some("Hymn"));
        assert_eq!(h.composer, None);
    }

    #[test]
    fn missing_fields_are_none() {
        let h = extract_header("X:1\nK:C\nCDEF|\n");
        assert_eq!(h, TuneHeader::default());
    }

    #[test]
    fn fields_are_trimmed() {
        let h = extract_header("X:1\nT:   Spaced Out  \nC:  Someone \nK:C\n");
        assert_eq!(h.title.as_deref(), Some("Spaced Out"));
        assert_eq!(h.composer.as_deref(), Some("Someone"));
    }

    #[test]
    fn empty_title_line_ignored() {
        let h = extract_header("X:1\nT:\nT:Actual\nK:C\n");
        assert_eq!(h.title.as_deref(), Some("Actual"));
    }

    // =========================================================================
    // split_tunes
    // =========================================================================

    #[test]
    fn single_tune() {
        let tunes = split_tunes("X:1\nT:One\nK:C\nCDEF|\n");
        assert_eq!(tunes.len(), 1);
        assert!(tunes[0].starts_with("X:1"));
    }

    #[test]
    fn multiple_tunes_split_on_x_lines() {
        let tunes = split_tunes("X:1\nT:One\nK:C\nCDEF|\nX:2\nT:Two\nK:G\nGABc|\n");
        assert_eq!(tunes.len(), 2);
        assert!(tunes[0].contains("T:One"));
        assert!(tunes[1].starts_with("X:2"));
        assert!(tunes[1].contains("T:Two"));
    }

    #[test]
    fn inline_x_not_a_boundary() {
        let tunes = split_tunes("X:1\nT:Has X:2 inside\nK:C\n");
        assert_eq!(tunes.len(), 1);
    }

    #[test]
    fn content_without_x_is_one_tune() {
        let tunes = split_tunes("T:Headerless\nK:C\n");
        assert_eq!(tunes.len(), 1);
    }

    #[test]
    fn whitespace_only_is_empty() {
        assert!(split_tunes("  \n\n").is_empty());
        assert!(split_tunes("").is_empty());
    }

    #[test]
    fn first_tune_carries_page_metadata() {
        let content = "X:1\nT:First\nK:C\nCDEF|\nX:2\nT:Second\nK:C\nGABc|\n";
        let tunes = split_tunes(content);
        let h = extract_header(tunes[0]);
        assert_eq!(h.title.as_deref(), Some("First"));
    }

    // =========================================================================
    // collect_voices
    // =========================================================================

    #[test]
    fn voices_from_declaration_lines() {
        let voices = collect_voices("X:1\nT:Hymn\nV:1 clef=treble\nV:2 clef=bass\nK:C\n");
        assert_eq!(voices, vec!["1", "2"]);
    }

    #[test]
    fn voices_from_inline_tags() {
        let voices = collect_voices("K:C\n[V:1] CDEF|\n[V:2] C,D,E,F,|\n");
        assert_eq!(voices, vec!["1", "2"]);
    }

    #[test]
    fn voices_deduplicated_in_order() {
        let voices = collect_voices("V:2\nV:1\n[V:2] CDEF|\n[V:1] GABc|\n");
        assert_eq!(voices, vec!["2", "1"]);
    }

    #[test]
    fn multiple_inline_tags_per_line() {
        let voices = collect_voices("[V:S] C [V:A] E [V:T] G [V:B] C,\n");
        assert_eq!(voices, vec!["S", "A", "T", "B"]);
    }

    #[test]
    fn no_voices() {
        assert!(collect_voices("X:1\nT:Monophonic\nK:C\nCDEF|\n").is_empty());
    }

    #[test]
    fn unclosed_inline_tag_ignored() {
        assert!(collect_voices("[V:1 CDEF|\n").is_empty());
    }
}
