use crate::core::homophones::HomophoneMap;
use pinyin::ToPinyin;

/// Toneless pinyin of every Han character, other characters kept as is.
pub fn full_pinyin(text: &str) -> String {
    text.chars()
        .zip(text.to_pinyin())
        .map(|(ch, py)| match py {
            Some(py) => py.plain().to_string(),
            None => ch.to_string(),
        })
        .collect()
}

/// First pinyin letter of every Han character, other characters kept as is.
pub fn pinyin_initials(text: &str) -> String {
    text.chars()
        .zip(text.to_pinyin())
        .map(|(ch, py)| match py {
            Some(py) => py.first_letter().to_string(),
            None => ch.to_string(),
        })
        .collect()
}

/// Expand a keyword into the patterns a search tries, in priority order:
/// the keyword and its case forms, full pinyin, pinyin initials, then every
/// single-character homophone substitution. Duplicates and empty strings are
/// dropped.
pub fn generate_variants(keyword: &str, homophones: &HomophoneMap) -> Vec<String> {
    let mut variants: Vec<String> = Vec::new();
    let mut push = |candidate: String| {
        if !candidate.is_empty() && !variants.contains(&candidate) {
            variants.push(candidate);
        }
    };

    push(keyword.to_string());
    push(keyword.to_lowercase());
    push(keyword.to_uppercase());
    push(full_pinyin(keyword));
    push(pinyin_initials(keyword));

    let chars: Vec<char> = keyword.chars().collect();
    for (idx, ch) in chars.iter().enumerate() {
        for homophone in homophones.get(*ch) {
            let mut replaced: String = chars[..idx].iter().collect();
            replaced.push_str(homophone);
            replaced.extend(chars[idx + 1..].iter());
            push(replaced);
        }
    }

    tracing::debug!("Variants for '{}': {:?}", keyword, variants);
    variants
}
