// permutations.rs - Candidate bucket name generation
// Purpose: Expand keywords and a suffix wordlist into candidate bucket names

use std::collections::HashSet;

/// Join templates applied to every suffix: (prefix-first, separator)
const JOIN_TEMPLATES: &[(bool, &str)] = &[
    (true, "-"),  // {kw}-{sfx}
    (false, "-"), // {sfx}-{kw}
    (true, "_"),  // {kw}_{sfx}
    (false, "_"), // {sfx}_{kw}
    (true, ""),   // {kw}{sfx}
    (false, ""),  // {sfx}{kw}
];

/// Forms derived from the bare keyword
const KEYWORD_TLDS: &[&str] = &["", ".com", ".net", ".org"];

/// Generate the deduplicated candidate list for one keyword.
///
/// Order is suffix-major (all six templates for the first suffix, then the
/// next suffix...), followed by the keyword-only forms. The first occurrence
/// of a name wins.
pub fn generate(keyword: &str, suffixes: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::with_capacity(suffixes.len() * JOIN_TEMPLATES.len() + KEYWORD_TLDS.len());

    let expanded = suffixes.iter().flat_map(|suffix| {
        JOIN_TEMPLATES.iter().map(move |(keyword_first, sep)| {
            if *keyword_first {
                format!("{}{}{}", keyword, sep, suffix)
            } else {
                format!("{}{}{}", suffix, sep, keyword)
            }
        })
    });
    let bare = KEYWORD_TLDS.iter().map(|tld| format!("{}{}", keyword, tld));

    for name in expanded.chain(bare) {
        if seen.insert(name.clone()) {
            names.push(name);
        }
    }

    names
}

/// Generate candidates for every keyword, concatenated in keyword order.
/// Each keyword is deduplicated on its own.
pub fn generate_all(keywords: &[String], suffixes: &[String]) -> Vec<String> {
    keywords
        .iter()
        .flat_map(|keyword| generate(keyword, suffixes))
        .collect()
}
