//! Country code list (ISO 3166-1)

use isocountry::CountryCode;

/// Everyday names that differ from the ISO 3166-1 short names
const COMMON_NAMES: &[(&str, &str)] = &[
    ("Bolivia", "BO"),
    ("Brunei", "BN"),
    ("Cape Verde", "CV"),
    ("Czech Republic", "CZ"),
    ("Democratic Republic of the Congo", "CD"),
    ("Great Britain", "GB"),
    ("Iran", "IR"),
    ("Ivory Coast", "CI"),
    ("Laos", "LA"),
    ("Macedonia", "MK"),
    ("Micronesia", "FM"),
    ("Moldova", "MD"),
    ("North Korea", "KP"),
    ("Palestine", "PS"),
    ("Russia", "RU"),
    ("South Korea", "KR"),
    ("Swaziland", "SZ"),
    ("Syria", "SY"),
    ("Taiwan", "TW"),
    ("Tanzania", "TZ"),
    ("Turkey", "TR"),
    ("UK", "GB"),
    ("United Kingdom", "GB"),
    ("United States", "US"),
    ("Vatican City", "VA"),
    ("Venezuela", "VE"),
    ("Vietnam", "VN"),
];

/// Code list of countries, matched case-insensitively on any identifier
#[derive(Debug, Clone, Copy)]
pub struct CountryCodeList {
    common_names: &'static [(&'static str, &'static str)],
}

impl CountryCodeList {
    /// The ISO 3166-1 list with everyday-name aliases
    #[must_use]
    pub fn iso3166() -> Self {
        Self {
            common_names: COMMON_NAMES,
        }
    }

    /// Resolve a country from its alpha-2, alpha-3 or numeric code, its
    /// ISO short name, or a common name
    #[must_use]
    pub fn lookup(&self, value: &str) -> Option<CountryCode> {
        let needle = value.trim();
        if needle.is_empty() {
            return None;
        }

        let upper = needle.to_ascii_uppercase();
        let by_code = match upper.len() {
            2 => CountryCode::for_alpha2(&upper).ok(),
            3 if upper.bytes().all(|b| b.is_ascii_digit()) => upper
                .parse::<u32>()
                .ok()
                .and_then(|id| CountryCode::for_id(id).ok()),
            3 => CountryCode::for_alpha3(&upper).ok(),
            _ => None,
        };
        if by_code.is_some() {
            return by_code;
        }

        if let Some(code) = CountryCode::iter().find(|c| c.name().eq_ignore_ascii_case(needle)) {
            return Some(*code);
        }

        self.common_names
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(needle))
            .and_then(|(_, alpha2)| CountryCode::for_alpha2(alpha2).ok())
    }

    /// Check if a value resolves to a country
    #[must_use]
    pub fn is_valid(&self, value: &str) -> bool {
        self.lookup(value).is_some()
    }
}

impl Default for CountryCodeList {
    fn default() -> Self {
        Self::iso3166()
    }
}
