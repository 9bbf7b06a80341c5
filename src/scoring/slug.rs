//! Slug derivation for channel names
//!
//! Streaming sites rarely put the display name in their URLs. They use a
//! machine identifier instead: `ТНТ +2` shows up as `tnt2`, `tnt_2` or
//! `tnt-2`. This module turns a name into those identifier variants.

/// Lower-case Cyrillic to Latin transliteration
fn transliterate_char(c: char) -> Option<&'static str> {
    let latin = match c {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' | 'ё' | 'э' => "e",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' => "y",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "h",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "sch",
        'ъ' | 'ь' => "",
        'ы' => "y",
        'ю' => "yu",
        'я' => "ya",
        // Ukrainian
        'і' => "i",
        'ї' => "yi",
        'є' => "ye",
        'ґ' => "g",
        // Kazakh
        'ә' => "a",
        'ғ' => "g",
        'қ' => "k",
        'ң' => "n",
        'ө' => "o",
        'ұ' | 'ү' => "u",
        'һ' => "h",
        _ => return None,
    };
    Some(latin)
}

/// Lower-case `text` and replace Cyrillic letters with Latin ones
pub fn transliterate(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.to_lowercase().chars() {
        match transliterate_char(c) {
            Some(latin) => out.push_str(latin),
            None => out.push(c),
        }
    }
    out
}

/// Split into alphanumeric tokens, also splitting between letters and digits
///
/// `"tnt +2"` and `"tnt2"` both yield `["tnt", "2"]`.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut current_is_digit = false;

    for c in text.chars() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            continue;
        }
        let is_digit = c.is_numeric();
        if !current.is_empty() && is_digit != current_is_digit {
            tokens.push(std::mem::take(&mut current));
        }
        current_is_digit = is_digit;
        current.push(c);
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Joiners a site may place between slug tokens
const SLUG_JOINERS: &[&str] = &["", "_", "-", "+"];

/// Slug variants for a channel identifier
pub fn slug_variants(identifier: &str) -> Vec<String> {
    let tokens = tokenize(&transliterate(identifier));
    if tokens.is_empty() {
        return Vec::new();
    }

    let mut variants: Vec<String> = Vec::new();
    for joiner in SLUG_JOINERS {
        let variant = tokens.join(joiner);
        if !variants.contains(&variant) {
            variants.push(variant);
        }
    }
    variants
}

/// Core keyword of a channel name: its first alphabetic token
///
/// Returns the native spelling and, when different, the transliterated one.
pub fn core_keywords(name: &str) -> Vec<String> {
    let lower = name.to_lowercase();
    let Some(native) = tokenize(&lower)
        .into_iter()
        .find(|token| token.chars().all(char::is_alphabetic))
    else {
        return Vec::new();
    };

    let latin = transliterate(&native);
    if latin == native {
        vec![native]
    } else {
        vec![native, latin]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transliterate() {
        assert_eq!(transliterate("ТНТ +2"), "tnt +2");
        assert_eq!(transliterate("Звезда"), "zvezda");
        assert_eq!(transliterate("Пятница!"), "pyatnitsa!");
        assert_eq!(transliterate("Match TV"), "match tv");
    }

    #[test]
    fn test_tokenize_splits_letters_and_digits() {
        assert_eq!(tokenize("tnt +2"), vec!["tnt", "2"]);
        assert_eq!(tokenize("tnt2"), vec!["tnt", "2"]);
        assert_eq!(tokenize("ren-tv hd"), vec!["ren", "tv", "hd"]);
        assert!(tokenize(" +-+ ").is_empty());
    }

    #[test]
    fn test_slug_variants() {
        assert_eq!(
            slug_variants("ТНТ +2"),
            vec!["tnt2", "tnt_2", "tnt-2", "tnt+2"]
        );
        assert_eq!(slug_variants("Zvezda"), vec!["zvezda"]);
        assert!(slug_variants("+++").is_empty());
    }

    #[test]
    fn test_core_keywords() {
        assert_eq!(core_keywords("ТНТ +2"), vec!["тнт", "tnt"]);
        assert_eq!(core_keywords("1+1 International"), vec!["international"]);
        assert_eq!(core_keywords("Discovery HD"), vec!["discovery"]);
        assert!(core_keywords("24").is_empty());
    }
}
