//! SKU normalization applied before recognition.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref OPEN_BRACKETS: Regex = Regex::new(r"[{\[]").unwrap();
    static ref CLOSE_BRACKETS: Regex = Regex::new(r"[}\]]").unwrap();
    static ref REPEATED_SLASHES: Regex = Regex::new(r"/{2,}").unwrap();
    static ref SPACES: Regex = Regex::new(r"\s{2,}").unwrap();

    // Leading noise, stripped repeatedly until nothing changes
    static ref SHORT_PREFIX_BEFORE_COLON: Regex = Regex::new(r"^.{0,7}:").unwrap();
    static ref LEADING_PUNCTUATION: Regex = Regex::new(r"^[\s‘.,_\-–]+").unwrap();
    static ref LEADING_ANGLE_NOTE: Regex = Regex::new(r"^<.*>").unwrap();

    static ref NOISE_SYMBOLS: Regex = Regex::new(r"[~«»“”#*?<>]").unwrap();
    static ref TRAILING_NUMERIC_NOTE: Regex = Regex::new(r":[0-9/\s.,]*$").unwrap();
    static ref TRAILING_BUTTON_NOTE: Regex = Regex::new(r"КНОПКА[0-9\-\s]*$").unwrap();
}

/// Base cleaning of a raw SKU.
///
/// Unifies spaces, brackets and slashes, removes leading notes such as
/// `"12345:"` or `"<promo>"`, replaces noise symbols with spaces and drops
/// trailing numeric notes.
pub fn clean_sku(sku: &str) -> String {
    let mut cleaned = sku.replace('\u{00a0}', " ");
    cleaned = OPEN_BRACKETS.replace_all(&cleaned, "(").into_owned();
    cleaned = CLOSE_BRACKETS.replace_all(&cleaned, ")").into_owned();
    cleaned = cleaned.replace('\\', "/");
    cleaned = REPEATED_SLASHES.replace_all(&cleaned, "/").into_owned();

    loop {
        let mut next = SPACES.replace_all(&cleaned, " ").into_owned();
        next = SHORT_PREFIX_BEFORE_COLON.replace(&next, "").into_owned();
        next = LEADING_PUNCTUATION.replace(&next, "").into_owned();
        next = LEADING_ANGLE_NOTE.replace(&next, "").into_owned();
        if next == cleaned {
            break;
        }
        cleaned = next;
    }

    cleaned = NOISE_SYMBOLS.replace_all(&cleaned, " ").into_owned();
    cleaned = TRAILING_NUMERIC_NOTE.replace(&cleaned, "").into_owned();
    cleaned = TRAILING_BUTTON_NOTE.replace(&cleaned, "").into_owned();
    SPACES.replace_all(&cleaned, " ").into_owned()
}

/// Upper-case and pad with a space on both sides, so rules can match
/// whole words with identifiers like `" ACM "`.
pub fn for_classification(sku: &str) -> String {
    format!(" {} ", sku.to_uppercase())
}
