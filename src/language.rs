//! Language code to display name lookup used for subtitle track titles.

/// Placeholder shown when a language code cannot be resolved
pub const UNKNOWN_LANGUAGE: &str = "Unknown";

/// Resolve a language tag to a capitalized English display name.
///
/// Only the primary subtag is considered, so `zh-CN` and `zh` both resolve
/// to `Chinese`. Never fails: unknown or malformed tags yield [`UNKNOWN_LANGUAGE`].
pub fn display_name(code: &str) -> String {
    lookup(code).unwrap_or(UNKNOWN_LANGUAGE).to_string()
}

/// Resolve a language tag, returning `None` when it is malformed or unknown
pub fn lookup(code: &str) -> Option<&'static str> {
    let mut subtags = code.trim().split(['-', '_']);
    let primary = subtags.next()?;

    let primary_ok = (2..=3).contains(&primary.len()) && primary.chars().all(|c| c.is_ascii_alphabetic());
    let rest_ok = subtags.all(|s| (1..=8).contains(&s.len()) && s.chars().all(|c| c.is_ascii_alphanumeric()));
    if !primary_ok || !rest_ok {
        return None;
    }

    primary_name(&primary.to_ascii_lowercase())
}

fn primary_name(code: &str) -> Option<&'static str> {
    let name = match code {
        "af" => "Afrikaans",
        "am" => "Amharic",
        "ar" => "Arabic",
        "as" => "Assamese",
        "az" => "Azerbaijani",
        "ba" => "Bashkir",
        "be" => "Belarusian",
        "bg" => "Bulgarian",
        "bn" => "Bangla",
        "bo" => "Tibetan",
        "br" => "Breton",
        "bs" => "Bosnian",
        "ca" => "Catalan",
        "cs" => "Czech",
        "cy" => "Welsh",
        "da" => "Danish",
        "de" => "German",
        "el" => "Greek",
        "en" => "English",
        "es" => "Spanish",
        "et" => "Estonian",
        "eu" => "Basque",
        "fa" => "Persian",
        "fi" => "Finnish",
        "fo" => "Faroese",
        "fr" => "French",
        "ga" => "Irish",
        "gl" => "Galician",
        "gu" => "Gujarati",
        "ha" => "Hausa",
        "haw" => "Hawaiian",
        "he" | "iw" => "Hebrew",
        "hi" => "Hindi",
        "hr" => "Croatian",
        "ht" => "Haitian creole",
        "hu" => "Hungarian",
        "hy" => "Armenian",
        "id" | "in" => "Indonesian",
        "is" => "Icelandic",
        "it" => "Italian",
        "ja" => "Japanese",
        "jv" | "jw" => "Javanese",
        "ka" => "Georgian",
        "kk" => "Kazakh",
        "km" => "Khmer",
        "kn" => "Kannada",
        "ko" => "Korean",
        "ky" => "Kyrgyz",
        "la" => "Latin",
        "lb" => "Luxembourgish",
        "ln" => "Lingala",
        "lo" => "Lao",
        "lt" => "Lithuanian",
        "lv" => "Latvian",
        "mg" => "Malagasy",
        "mi" => "Maori",
        "mk" => "Macedonian",
        "ml" => "Malayalam",
        "mn" => "Mongolian",
        "mr" => "Marathi",
        "ms" => "Malay",
        "mt" => "Maltese",
        "my" => "Burmese",
        "nb" => "Norwegian bokmål",
        "ne" => "Nepali",
        "nl" => "Dutch",
        "nn" => "Norwegian nynorsk",
        "no" => "Norwegian",
        "oc" => "Occitan",
        "or" => "Odia",
        "pa" => "Punjabi",
        "pl" => "Polish",
        "ps" => "Pashto",
        "pt" => "Portuguese",
        "ro" => "Romanian",
        "ru" => "Russian",
        "sa" => "Sanskrit",
        "sd" => "Sindhi",
        "si" => "Sinhala",
        "sk" => "Slovak",
        "sl" => "Slovenian",
        "sn" => "Shona",
        "so" => "Somali",
        "sq" => "Albanian",
        "sr" => "Serbian",
        "su" => "Sundanese",
        "sv" => "Swedish",
        "sw" => "Swahili",
        "ta" => "Tamil",
        "te" => "Telugu",
        "tg" => "Tajik",
        "th" => "Thai",
        "tk" => "Turkmen",
        "tl" => "Tagalog",
        "tr" => "Turkish",
        "tt" => "Tatar",
        "uk" => "Ukrainian",
        "ur" => "Urdu",
        "uz" => "Uzbek",
        "vi" => "Vietnamese",
        "yi" => "Yiddish",
        "yo" => "Yoruba",
        "yue" => "Cantonese",
        "zh" => "Chinese",
        "zu" => "Zulu",
        _ => return None,
    };
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(display_name("es"), "Spanish");
        assert_eq!(display_name("en"), "English");
        assert_eq!(display_name("ja"), "Japanese");
        assert_eq!(display_name("yue"), "Cantonese");
    }

    #[test]
    fn test_region_and_case_are_ignored() {
        assert_eq!(display_name("zh-CN"), "Chinese");
        assert_eq!(display_name("pt_BR"), "Portuguese");
        assert_eq!(display_name("DE"), "German");
    }

    #[test]
    fn test_unknown_codes_degrade() {
        assert_eq!(display_name("xx-bogus"), UNKNOWN_LANGUAGE);
        assert_eq!(display_name("unknown"), UNKNOWN_LANGUAGE);
        assert_eq!(display_name(""), UNKNOWN_LANGUAGE);
        assert_eq!(display_name("e1"), UNKNOWN_LANGUAGE);
        assert_eq!(display_name("en--"), UNKNOWN_LANGUAGE);
        assert_eq!(lookup("xx-bogus"), None);
    }
}
