use chrono::{Datelike, NaiveDate, Weekday};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

pub const MONTHS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Lower-cases and strips diacritics: "José Ñúñez" -> "jose nunez".
pub fn fold(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Alphanumeric runs of `s`, in order.
pub fn words(s: &str) -> Vec<&str> {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect()
}

/// True when the words of `needle` appear contiguously in `haystack`.
/// Both sides are expected to be folded already.
pub fn contains_words(haystack: &str, needle: &str) -> bool {
    let hay = words(haystack);
    let needle = words(needle);
    if needle.is_empty() || needle.len() > hay.len() {
        return false;
    }
    hay.windows(needle.len()).any(|w| w == needle.as_slice())
}

pub fn month_name(month: u32) -> &'static str {
    MONTHS
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("")
}

/// Finds a month named in already-folded text.
pub fn month_in_text(folded: &str) -> Option<u32> {
    words(folded).into_iter().find_map(|w| {
        if w == "setiembre" {
            return Some(9);
        }
        MONTHS
            .iter()
            .position(|m| *m == w)
            .map(|i| i as u32 + 1)
    })
}

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "lunes",
        Weekday::Tue => "martes",
        Weekday::Wed => "miércoles",
        Weekday::Thu => "jueves",
        Weekday::Fri => "viernes",
        Weekday::Sat => "sábado",
        Weekday::Sun => "domingo",
    }
}

/// "viernes 23 de octubre"
pub fn format_date(date: NaiveDate) -> String {
    format!(
        "{} {} de {}",
        weekday_name(date.weekday()),
        date.day(),
        month_name(date.month())
    )
}

pub fn capitalize(s: &str) -> String {
    let mut c = s.chars();
    match c.next() {
        None => String::new(),
        Some(f) => f.to_uppercase().to_string() + c.as_str(),
    }
}

/// Trims surrounding whitespace and punctuation such as "¿", "?", "!" and ".".
pub fn trim_punctuation(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_whitespace() || (c.is_ascii_punctuation() && c != '@') || "¿¡«»“”".contains(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_strips_accents_and_case() {
        assert_eq!(fold("José"), "jose");
        assert_eq!(fold("ÑÚÑEZ"), "nunez");
        assert_eq!(fold("cumpleaños"), "cumpleanos");
        assert_eq!(fold("Cuándo"), fold("cuando"));
    }

    #[test]
    fn test_contains_words_respects_boundaries() {
        assert!(contains_words("leo martinez", "leo"));
        assert!(!contains_words("valeon ruiz", "leo"));
        assert!(!contains_words("leonardo ruiz", "leo"));
        assert!(contains_words("maria jose santana", "jose santana"));
        assert!(!contains_words("maria jose santana", "maria santana"));
    }

    #[test]
    fn test_month_in_text() {
        assert_eq!(month_in_text("cumpleanos de marzo"), Some(3));
        assert_eq!(month_in_text("quien cumple en setiembre"), Some(9));
        assert_eq!(month_in_text("cumpleanos"), None);
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 23).unwrap();
        assert_eq!(format_date(date), "viernes 23 de octubre");
    }

    #[test]
    fn test_trim_punctuation() {
        assert_eq!(trim_punctuation("¿santana?"), "santana");
        assert_eq!(trim_punctuation("  gracia!. "), "gracia");
    }
}
