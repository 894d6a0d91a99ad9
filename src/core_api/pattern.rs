//! Pattern utilities for member filter queries.
//!
//! The filter box treats its text as a set of literal terms: every regex metacharacter is
//! escaped and each run of whitespace becomes a `|`, so `"foo bar"` matches either term.

/// Escape the characters the filter box treats as literals.
///
/// Covers `- [ ] { } ( ) * + ? . , \ ^ $ | #`; a typed `|` is literal too, since alternation
/// only ever comes from whitespace.
pub fn escape_query_metachars(query: &str) -> String {
	let mut escaped = String::with_capacity(query.len() * 2);
	for ch in query.chars() {
		match ch {
			'-' | '[' | ']' | '{' | '}' | '(' | ')' | '*' | '+' | '?' | '.' | ',' | '\\' | '^'
			| '$' | '|' | '#' => {
				escaped.push('\\');
				escaped.push(ch);
			}
			_ => escaped.push(ch),
		}
	}
	escaped
}

/// Normalize raw filter text into an alternation pattern.
///
/// Trims, lower-cases, escapes metacharacters and joins the whitespace-separated terms with
/// `|`. Returns an empty string for blank input.
pub fn query_to_pattern(raw: &str) -> String {
	let lowered = raw.trim().to_lowercase();
	escape_query_metachars(&lowered)
		.split_whitespace()
		.collect::<Vec<_>>()
		.join("|")
}

/// Split raw filter text into lower-cased literal terms.
pub fn query_terms(raw: &str) -> Vec<String> {
	raw.trim()
		.to_lowercase()
		.split_whitespace()
		.map(str::to_string)
		.collect()
}
