//! Text normalization for search, lookup, and label parsing
//!
//! The directory data originates in Spanish-language spreadsheets and is
//! searched accent- and case-insensitively. Everything that compares text
//! goes through `fold` (search keys) or `sort_key` (ordering keys) so the
//! two sides of a comparison always normalize identically.

/// Strip the diacritic from a single already-lowercased character.
///
/// Covers the Latin range the source data uses; anything else passes
/// through unchanged.
fn strip_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        _ => c,
    }
}

/// Normalize a string for matching: lowercase, accent-fold, drop everything
/// but ASCII alphanumerics, collapse runs of whitespace to single spaces.
pub fn fold(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut pending_space = false;
    for c in s.chars().flat_map(char::to_lowercase) {
        let c = if c == '\u{00a0}' { ' ' } else { c };
        let c = strip_accent(c);
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if !c.is_ascii_alphanumeric() {
            continue;
        }
        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        out.push(c);
    }
    out
}

/// Normalize a string for ordering: lowercase and accent-fold, keeping all
/// other characters so distinct names stay distinct.
pub fn sort_key(s: &str) -> String {
    s.chars()
        .flat_map(char::to_lowercase)
        .map(strip_accent)
        .collect()
}

/// Placeholder tokens the source spreadsheets use for "no data".
const BLANK_TOKENS: &[&str] = &[
    "N/A", "N\\A", "#N/A", "N/D", "N\\D", "NA", "ND", "-", "--", "SIN DATO", "S/D",
];

/// Whether a cell value carries no information (empty or a known
/// placeholder token).
pub fn is_blankish(s: &str) -> bool {
    let s = s.trim();
    if s.is_empty() {
        return true;
    }
    let upper = s.to_uppercase();
    BLANK_TOKENS.contains(&upper.as_str())
}

/// Trim a token and discard it if blankish.
pub fn clean_token(s: &str) -> Option<String> {
    let s = s.trim();
    if is_blankish(s) {
        None
    } else {
        Some(s.to_string())
    }
}

/// Normalize an email address; `None` when the value is absent, a
/// placeholder, or not shaped like an address.
pub fn sanitize_email(s: &str) -> Option<String> {
    let mut email = s.trim().to_lowercase();
    if email.is_empty() || matches!(email.as_str(), "n/a" | "na" | "s/c") {
        return None;
    }

    email.retain(|c| c != ' ' && c != '\r' && c != '\t');
    email = email.replace(',', ".");
    email = email.chars().map(strip_accent).collect();

    if looks_like_email(&email) {
        Some(email)
    } else {
        None
    }
}

fn looks_like_email(s: &str) -> bool {
    if s.matches('@').count() != 1 {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && s.chars().all(|c| !c.is_whitespace())
}

/// Split a `;`-separated multi-value cell into clean tokens.
pub fn split_multi(s: &str) -> Vec<String> {
    if is_blankish(s) {
        return Vec::new();
    }
    s.split(';').filter_map(clean_token).collect()
}

/// Split a multi-email cell (`;` or newline separated) into sanitized
/// addresses, dropping invalid entries.
pub fn split_emails(s: &str) -> Vec<String> {
    if is_blankish(s) {
        return Vec::new();
    }
    s.split(|c| c == ';' || c == '\n' || c == '\r')
        .filter_map(sanitize_email)
        .collect()
}
