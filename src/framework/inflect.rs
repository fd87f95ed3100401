//! # Key Transformer
//!
//! Maps logical attribute and type names to their wire-format keys.
//! Each [`ResourceSchema`](crate::framework::ResourceSchema) picks one [`KeyCase`];
//! the inflection helpers below cover the common English cases only.

/// Words whose plural equals their singular.
// `-us`/`-as` words whose plural only appends `es`.
const US_PLURALS_ES: &[&str] = &["alias", "bus", "campus", "census", "status", "virus"];
const UNCOUNTABLE: &[&str] = &["equipment", "information", "news", "series", "species", "metadata"];

/// (singular, plural) pairs matched as suffixes.
const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("child", "children"),
    ("mouse", "mice"),
    ("criterion", "criteria"),
];

/// Wire-format naming convention for one resource class.
#[derive(Debug, Clone, Copy, Default)]
pub enum KeyCase {
    /// `serialNumber` → `serial_number`
    #[default]
    Underscore,
    /// `serialNumber` → `serial-number`
    Dasherize,
    /// `serial_number` → `serialNumber`
    LowerCamel,
    /// Keys are sent exactly as written.
    Verbatim,
    /// Any other convention.
    Custom(fn(&str) -> String),
}

impl KeyCase {
    /// Transform one logical name into its wire key.
    pub fn apply(&self, key: &str) -> String {
        match self {
            KeyCase::Underscore => underscore(key),
            KeyCase::Dasherize => dasherize(key),
            KeyCase::LowerCamel => lower_camelize(&underscore(key)),
            KeyCase::Verbatim => key.to_string(),
            KeyCase::Custom(f) => f(key),
        }
    }
}

/// Convert `CamelCase`, `camelCase` or `dashed-words` to `snake_case`.
///
/// Acronyms stay together: `HTTPClient` becomes `http_client`.
pub fn underscore(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut result = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c == '-' || c == ' ' {
            result.push('_');
            continue;
        }
        if c.is_uppercase() {
            if i > 0 {
                let prev = chars[i - 1];
                let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
                if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower) {
                    result.push('_');
                }
            }
            result.extend(c.to_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}

/// `snake_case` with dashes: `LineItem` → `line-item`.
pub fn dasherize(name: &str) -> String {
    underscore(name).replace('_', "-")
}

/// Convert `snake_case` or `dashed-words` to `PascalCase`.
pub fn camelize(name: &str) -> String {
    name.split(['_', '-'])
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// Convert `snake_case` to `camelCase`.
pub fn lower_camelize(name: &str) -> String {
    let camel = camelize(name);
    let mut chars = camel.chars();
    match chars.next() {
        Some(c) => c.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Plural form of the last word in `name`, preserving the prefix.
pub fn pluralize(name: &str) -> String {
    let lower = name.to_lowercase();
    if lower.is_empty() || UNCOUNTABLE.iter().any(|w| lower.ends_with(w)) {
        return name.to_string();
    }
    for (singular, plural) in IRREGULAR {
        if lower.ends_with(singular) {
            return replace_suffix(name, singular.len(), plural);
        }
    }
    if lower.ends_with('y') && !ends_with_vowel_y(&lower) {
        return format!("{}ies", &name[..name.len() - 1]);
    }
    if lower.ends_with("iz") {
        return format!("{name}zes");
    }
    if ["s", "x", "z", "ch", "sh"].iter().any(|s| lower.ends_with(s)) {
        return format!("{name}es");
    }
    format!("{name}s")
}

/// Singular form of the last word in `name`, preserving the prefix.
pub fn singularize(name: &str) -> String {
    let lower = name.to_lowercase();
    if lower.is_empty() || UNCOUNTABLE.iter().any(|w| lower.ends_with(w)) {
        return name.to_string();
    }
    for (singular, plural) in IRREGULAR {
        if lower.ends_with(plural) {
            return replace_suffix(name, plural.len(), singular);
        }
    }
    if lower.ends_with("izzes") {
        return name[..name.len() - 3].to_string();
    }
    if US_PLURALS_ES.iter().any(|stem| lower.ends_with(&format!("{stem}es"))) {
        return name[..name.len() - 2].to_string();
    }
    if lower.len() > 3 && lower.ends_with("ies") {
        return format!("{}y", &name[..name.len() - 3]);
    }
    if ["sses", "shes", "ches", "xes", "zes"].iter().any(|s| lower.ends_with(s)) {
        return name[..name.len() - 2].to_string();
    }
    if lower.ends_with("ss") {
        return name.to_string();
    }
    if lower.ends_with('s') {
        return name[..name.len() - 1].to_string();
    }
    name.to_string()
}

fn ends_with_vowel_y(lower: &str) -> bool {
    ["ay", "ey", "iy", "oy", "uy"].iter().any(|s| lower.ends_with(s))
}

// Keeps the capitalisation of the replaced suffix's first letter.
fn replace_suffix(name: &str, suffix_len: usize, replacement: &str) -> String {
    let split = name.len() - suffix_len;
    let (stem, tail) = name.split_at(split);
    let capitalised = tail.chars().next().is_some_and(char::is_uppercase);
    if capitalised {
        format!("{stem}{}", camelize(replacement))
    } else {
        format!("{stem}{replacement}")
    }
}
