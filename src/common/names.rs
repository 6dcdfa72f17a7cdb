use deunicode::deunicode;

/// Standardise a country name for use in file names and attribute matching:
/// transliterate to ASCII, then drop spaces, full stops and apostrophes.
///
/// `"Côte d'Ivoire"` becomes `"CotedIvoire"`.
pub fn clean_country_name(name: &str) -> String {
    deunicode(name)
        .chars()
        .filter(|c| !matches!(c, ' ' | '.' | '\''))
        .collect()
}
