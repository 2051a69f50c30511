// afd_notify - SMS delivery of NWS forecast discussion sections
//
// Copyright 2023 Nick Pillitteri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.
//

use regex::Regex;
use std::error;
use std::fmt;
use std::sync::LazyLock;

static MULTI_SPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" {2,}").unwrap());
static TAB_CR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\t\r]").unwrap());

#[derive(Debug)]
pub enum SectionError {
    NotFound(String),
}

impl fmt::Display for SectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(name) => write!(f, "no section of type {} found", name),
        }
    }
}

impl error::Error for SectionError {}

/// Extract one named section from the raw text of a forecast discussion.
///
/// Sections start with a header of the form `.NAME...` or `.NAME` followed by
/// whitespace and run until the `&&` end-of-section marker. The requested name
/// is matched case-insensitively against its uppercase form; only the first
/// section with that name is returned. The extracted body is whitespace
/// normalized and prefixed with the uppercase name, e.g. `"SYNOPSIS:\n\n..."`.
///
/// A header with no `&&` marker anywhere after it does not count as a section.
pub fn extract_section(product_text: &str, section_name: &str) -> Result<String, SectionError> {
    let name = section_name.to_uppercase();
    let pattern = format!(r"(?is)\.{}[.\s]+(.+?)&&", regex::escape(&name));
    let re = Regex::new(&pattern).expect("escaped section pattern failed to compile");

    let body = re
        .captures(product_text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|body| !body.is_empty())
        .ok_or_else(|| SectionError::NotFound(name.clone()))?;

    Ok(format!("{}:\n\n{}", name, normalize(body)))
}

/// Normalize the whitespace of an extracted section body for SMS delivery.
///
/// Trims surrounding whitespace, joins lines that were force-wrapped by the
/// bulletin format, deletes runs of two or more spaces, and strips tabs and
/// carriage returns. The steps run in that order. Idempotent.
pub fn normalize(raw: &str) -> String {
    let joined = join_wrapped_lines(raw.trim());
    let despaced = MULTI_SPACE_RE.replace_all(&joined, "");

    TAB_CR_RE.replace_all(&despaced, "").into_owned()
}

/// Remove every newline whose neighbors on both sides are non-newline
/// characters, joining the wrapped line onto the previous one with no
/// separator. Blank-line paragraph breaks have a newline neighbor and
/// are kept as-is.
fn join_wrapped_lines(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());

    for (i, &c) in chars.iter().enumerate() {
        if c == '\n' {
            let prev = i.checked_sub(1).and_then(|p| chars.get(p));
            let next = chars.get(i + 1);
            if matches!((prev, next), (Some(&p), Some(&n)) if p != '\n' && n != '\n') {
                continue;
            }
        }
        out.push(c);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::{extract_section, normalize, SectionError};

    const DISCUSSION: &str = "\
000\n\
FXUS61 KBOX 071750\n\
AFDBOX\n\
\n\
Area Forecast Discussion\n\
National Weather Service Boston/Norton MA\n\
150 PM EDT Thu Aug 7 2025\n\
\n\
.SYNOPSIS...\n\
High pressure builds offshore tonight. A warm front\n\
approaches Friday with increasing humidity.\n\
\n\
&&\n\
\n\
.NEAR TERM /THROUGH TONIGHT/...\n\
Mostly clear skies with light winds expected.\n\
\n\
&&\n\
\n\
.AVIATION /18Z THURSDAY THROUGH MONDAY/...\n\
Ceilings AOA 5000 ft.&&\n\
\n\
.MARINE...\n\
Seas 2 to 4 ft through tonight.\n\
\n\
&&\n\
\n\
$$\n";

    #[test]
    fn test_extract_section_synopsis() {
        let section = extract_section(DISCUSSION, "synopsis").unwrap();
        assert_eq!(
            section,
            "SYNOPSIS:\n\nHigh pressure builds offshore tonight. A warm front\
             approaches Friday with increasing humidity."
        );
    }

    #[test]
    fn test_extract_section_uppercases_request() {
        let lower = extract_section(DISCUSSION, "marine").unwrap();
        let upper = extract_section(DISCUSSION, "MARINE").unwrap();

        assert_eq!(lower, upper);
        assert!(lower.starts_with("MARINE:\n\n"));
    }

    #[test]
    fn test_extract_section_aviation_fixture() {
        let raw = ".AVIATION...Ceilings AOA 5000 ft.&&";
        let section = extract_section(raw, "aviation").unwrap();

        assert_eq!(section, "AVIATION:\n\nCeilings AOA 5000 ft.");
    }

    #[test]
    fn test_extract_section_missing_header() {
        let res = extract_section(DISCUSSION, "hydrology");

        assert!(matches!(res, Err(SectionError::NotFound(ref name)) if name == "HYDROLOGY"));
    }

    #[test]
    fn test_extract_section_missing_terminator() {
        let raw = ".SYNOPSIS...A front stalls over the region.\n\n$$";
        let res = extract_section(raw, "synopsis");

        assert!(matches!(res, Err(SectionError::NotFound(_))));
    }

    #[test]
    fn test_extract_section_first_match_wins() {
        let raw = ".MARINE...first issuance&&\n.MARINE...second issuance&&";
        let section = extract_section(raw, "marine").unwrap();

        assert_eq!(section, "MARINE:\n\nfirst issuance");
    }

    #[test]
    fn test_extract_section_metacharacters_do_not_panic() {
        let res = extract_section(DISCUSSION, "synopsis (updated)");

        assert!(matches!(res, Err(SectionError::NotFound(_))));
    }

    #[test]
    fn test_extract_section_name_with_spaces() {
        let section = extract_section(DISCUSSION, "near term /through tonight/").unwrap();

        assert!(section.starts_with("NEAR TERM /THROUGH TONIGHT/:\n\n"));
        assert!(section.contains("Mostly clear skies"));
    }

    #[test]
    fn test_normalize_joins_wrapped_lines() {
        assert_eq!(normalize("line one\nline two"), "line oneline two");
    }

    #[test]
    fn test_normalize_keeps_paragraph_breaks() {
        assert_eq!(normalize("first paragraph.\n\nsecond paragraph."), "first paragraph.\n\nsecond paragraph.");
    }

    #[test]
    fn test_normalize_joins_consecutive_wrapped_lines() {
        assert_eq!(normalize("one\ntwo\nthree"), "onetwothree");
    }

    #[test]
    fn test_normalize_deletes_space_runs() {
        assert_eq!(normalize("a  b c"), "ab c");
        assert_eq!(normalize("  a  \n b  "), "ab");
    }

    #[test]
    fn test_normalize_strips_tabs_and_carriage_returns() {
        assert_eq!(normalize("a\tb\rc"), "abc");
    }

    #[test]
    fn test_normalize_idempotent() {
        let inputs = [
            "  a  \n b  ",
            "line one\nline two\nline three",
            "first.\n\nsecond\twrapped\nline.\r\n",
            "Ceilings AOA 5000 ft.",
        ];

        for input in inputs {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", input);
        }
    }
}
