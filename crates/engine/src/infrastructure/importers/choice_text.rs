//! Free-text choice extraction.
//!
//! Older catalog entries describe their options inline, e.g.
//! `"You bond with an element. Choose: Fire Attunement or Water Attunement"`.
//! These helpers turn that prose into discrete options once, at catalog load,
//! so nothing downstream ever parses descriptions.
//!
//! The heuristic splits on the literal `" or "`. Enumerations such as
//! "cold, fire, lightning, or thunder" inside one option are over-split;
//! catalog authors are expected to avoid that pattern.

use grimoire_domain::NestedOption;

/// Marker introducing the option span
pub const CHOICE_MARKER: &str = "Choose:";

/// Literal separating alternatives in the option span
pub const OPTION_DELIMITER: &str = " or ";

/// Phrases that end the option span, checked in this order.
///
/// The first phrase found wins even if a later one occurs earlier in the text.
pub const ENDING_PHRASES: [&str; 4] = [
    "to gain proficiency in",
    ". After",
    ". Once",
    ". Master",
];

/// Why an option span could not be split cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ambiguity {
    /// Nothing usable followed the marker
    NoOptions,
    /// Splitting produced a single option; the whole remainder was kept as it
    SingleOption,
}

/// Nested options pulled out of a choice description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedChoices {
    /// Description to keep on the parent choice
    pub description: String,
    pub options: Vec<NestedOption>,
    pub ambiguity: Option<Ambiguity>,
}

/// One inline option of a legacy feature description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineOption {
    /// Display name: the text before the first `(`
    pub name: String,
    /// The option's full text
    pub text: String,
}

/// Inline options pulled out of a feature description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineChoices {
    /// Text before the marker
    pub prefix: String,
    pub options: Vec<InlineOption>,
    pub ambiguity: Option<Ambiguity>,
}

/// Whether a description carries an inline option span.
pub fn has_choice_marker(description: &str) -> bool {
    description.contains(CHOICE_MARKER)
}

/// Split a description at the first marker into (trimmed prefix, raw span).
fn split_at_marker(description: &str) -> Option<(&str, &str)> {
    let idx = description.find(CHOICE_MARKER)?;
    let prefix = description[..idx].trim();
    let span = &description[idx + CHOICE_MARKER.len()..];
    Some((prefix, span))
}

/// Cut the span at the first ending phrase, in declaration order.
fn split_at_ending(span: &str) -> (&str, &str) {
    ENDING_PHRASES
        .iter()
        .find_map(|phrase| span.find(phrase))
        .map(|pos| span.split_at(pos))
        .unwrap_or((span, ""))
}

fn strip_sentence_period(name: &str) -> &str {
    name.strip_suffix('.').map(str::trim_end).unwrap_or(name)
}

fn append_suffix(text: &str, suffix: &str) -> String {
    if suffix.is_empty() {
        text.to_string()
    } else if suffix.starts_with(|c: char| c.is_ascii_punctuation()) {
        format!("{}{}", text, suffix)
    } else {
        format!("{} {}", text, suffix)
    }
}

/// Split an option span on [`OPTION_DELIMITER`], trimming and dropping blanks.
fn split_options(span: &str) -> Vec<&str> {
    span.split(OPTION_DELIMITER)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Extract nested options from a choice description.
///
/// Without a marker the description is returned unchanged with no options.
/// Option names stop at the first `(`. Each option's description is `"{prefix} {segment}{suffix}"`, where the
/// suffix is the text from the matched ending phrase onward.
pub fn extract_nested_choices(description: &str) -> ExtractedChoices {
    let Some((prefix, span)) = split_at_marker(description) else {
        return ExtractedChoices {
            description: description.to_string(),
            options: Vec::new(),
            ambiguity: None,
        };
    };

    let (option_span, suffix) = split_at_ending(span);
    let suffix = suffix.trim_end();
    let segments = split_options(option_span);
    let last = segments.len().saturating_sub(1);

    let mut options: Vec<NestedOption> = Vec::with_capacity(segments.len());
    for (i, segment) in segments.iter().copied().enumerate() {
        let name = if i == last {
            display_name(segment)
        } else {
            paren_head(segment).to_string()
        };
        if name.is_empty() || options.iter().any(|o| o.name == name) {
            continue;
        }
        let text = format!("{} {}", prefix, segment);
        options.push(NestedOption::new(
            name,
            append_suffix(text.trim(), suffix),
        ));
    }

    let ambiguity = match options.len() {
        0 => Some(Ambiguity::NoOptions),
        1 => Some(Ambiguity::SingleOption),
        _ => None,
    };

    if ambiguity.is_some() {
        // Keep the whole remainder as the only option
        options.clear();
        let remainder = option_span.trim();
        let name = display_name(remainder);
        if !name.is_empty() {
            let text = format!("{} {}", prefix, remainder);
            options.push(NestedOption::new(name, append_suffix(text.trim(), suffix)));
        }
    }

    let description = if prefix.is_empty() {
        description.trim().to_string()
    } else {
        prefix.to_string()
    };

    ExtractedChoices {
        description,
        options,
        ambiguity,
    }
}

/// Split the inline options of a legacy feature description.
///
/// Returns `None` when the description has no marker.
pub fn split_choice_options(description: &str) -> Option<InlineChoices> {
    let (prefix, span) = split_at_marker(description)?;

    let mut options: Vec<InlineOption> = Vec::new();
    for segment in split_options(span) {
        let name = display_name(segment);
        if options.iter().any(|o| o.name == name) {
            continue;
        }
        options.push(InlineOption {
            name,
            text: segment.to_string(),
        });
    }

    let ambiguity = match options.len() {
        0 => Some(Ambiguity::NoOptions),
        1 => Some(Ambiguity::SingleOption),
        _ => None,
    };

    if ambiguity == Some(Ambiguity::SingleOption) {
        let remainder = span.trim();
        options = vec![InlineOption {
            name: display_name(remainder),
            text: remainder.to_string(),
        }];
    }

    Some(InlineChoices {
        prefix: prefix.to_string(),
        options,
        ambiguity,
    })
}

/// Text before the first `(`, trimmed; falls back to the whole option.
fn paren_head(option: &str) -> &str {
    let head = option.split('(').next().unwrap_or(option).trim();
    if head.is_empty() {
        option.trim()
    } else {
        head
    }
}

/// [`paren_head`] with a trailing sentence period removed.
fn display_name(option: &str) -> String {
    let head = strip_sentence_period(paren_head(option));
    if head.is_empty() {
        strip_sentence_period(option.trim()).to_string()
    } else {
        head.to_string()
    }
}
