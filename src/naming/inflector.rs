//! Rule-based English inflection and case conversion
//!
//! Pluralization and singularization run an ordered rule table against the end
//! of the word, so compound names in either convention inflect on their last
//! word: `famous_person` -> `famous_people`, `secretLab` -> `secretLabs`.

use once_cell::sync::Lazy;
use regex::Regex;

static CAMELIZE_SEPARATOR_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:-|_|\.|\s)+(.)?").expect("camelize separator pattern"));

static CAMELIZE_LEADING_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(^|/)([A-Z])").expect("camelize leading pattern"));

static DECAMELIZE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z\d])([A-Z])").expect("decamelize pattern"));

/// Ordered by priority: the first matching rule wins.
const PLURAL_RULES: &[(&str, &str)] = &[
    (r"(quiz)$", "${1}zes"),
    (r"^(oxen)$", "${1}"),
    (r"^(ox)$", "${1}en"),
    (r"^(m|l)ice$", "${1}ice"),
    (r"^(m|l)ouse$", "${1}ice"),
    (r"(matr|vert|ind)(?:ix|ex)$", "${1}ices"),
    (r"(x|ch|ss|sh)$", "${1}es"),
    (r"([^aeiouy]|qu)y$", "${1}ies"),
    (r"(hive)$", "${1}s"),
    (r"(?:([^f])fe|([lr])f)$", "${1}${2}ves"),
    (r"sis$", "ses"),
    (r"([ti])a$", "${1}a"),
    (r"([ti])um$", "${1}a"),
    (r"(buffal|tomat)o$", "${1}oes"),
    (r"(bu)s$", "${1}ses"),
    (r"(alias|status)$", "${1}es"),
    (r"(octop|vir)i$", "${1}i"),
    (r"(octop|vir)us$", "${1}i"),
    (r"^(ax|test)is$", "${1}es"),
    (r"s$", "s"),
    (r"$", "s"),
];

const SINGULAR_RULES: &[(&str, &str)] = &[
    (r"(database)s$", "${1}"),
    (r"(quiz)zes$", "${1}"),
    (r"(matr)ices$", "${1}ix"),
    (r"(vert|ind)ices$", "${1}ex"),
    (r"^(ox)en", "${1}"),
    (r"(alias|status)(es)?$", "${1}"),
    (r"(octop|vir)(us|i)$", "${1}us"),
    (r"^(a)x[ie]s$", "${1}xis"),
    (r"(cris|test)(is|es)$", "${1}is"),
    (r"(shoe)s$", "${1}"),
    (r"(o)es$", "${1}"),
    (r"(bus)(es)?$", "${1}"),
    (r"^(m|l)ice$", "${1}ouse"),
    (r"(x|ch|ss|sh)es$", "${1}"),
    (r"(m)ovies$", "${1}ovie"),
    (r"(s)eries$", "${1}eries"),
    (r"([^aeiouy]|qu)ies$", "${1}y"),
    (r"([lr])ves$", "${1}f"),
    (r"(tive)s$", "${1}"),
    (r"(hive)s$", "${1}"),
    (r"([^f])ves$", "${1}fe"),
    (r"(^analy)(sis|ses)$", "${1}sis"),
    (r"((a)naly|(b)a|(d)iagno|(p)arenthe|(p)rogno|(s)ynop|(t)he)(sis|ses)$", "${1}sis"),
    (r"([ti])a$", "${1}um"),
    (r"(n)ews$", "${1}ews"),
    (r"(ss)$", "${1}"),
    (r"s$", ""),
];

/// (singular, plural)
const IRREGULARS: &[(&str, &str)] = &[
    ("person", "people"),
    ("child", "children"),
    ("sex", "sexes"),
    ("move", "moves"),
    ("zombie", "zombies"),
];

const UNCOUNTABLES: &[&str] = &[
    "equipment",
    "information",
    "rice",
    "money",
    "species",
    "series",
    "fish",
    "sheep",
    "jeans",
    "police",
];

struct Rule {
    pattern: Regex,
    replacement: String,
}

impl Rule {
    fn new(pattern: &str, replacement: impl Into<String>) -> Self {
        Rule {
            pattern: Regex::new(&format!("(?i){}", pattern)).expect("inflection rule pattern"),
            replacement: replacement.into(),
        }
    }
}

/// Irregular words become suffix rules that keep the case of their first letter,
/// so `famousPerson` and `famous_person` both pluralize on `person`.
fn irregular_rules(from_singular: bool) -> Vec<Rule> {
    let mut rules = Vec::new();
    for (singular, plural) in IRREGULARS {
        let (head, singular_rest) = singular.split_at(1);
        let plural_rest = &plural[1..];
        let (source_rest, target_rest) = if from_singular {
            (singular_rest, plural_rest)
        } else {
            (plural_rest, singular_rest)
        };
        // Words already in the target form are left alone.
        rules.push(Rule::new(
            &format!("({}){}$", head, target_rest),
            format!("${{1}}{}", target_rest),
        ));
        rules.push(Rule::new(
            &format!("({}){}$", head, source_rest),
            format!("${{1}}{}", target_rest),
        ));
    }
    rules
}

static PLURALS: Lazy<Vec<Rule>> = Lazy::new(|| {
    let mut rules = irregular_rules(true);
    rules.extend(PLURAL_RULES.iter().map(|(p, r)| Rule::new(p, *r)));
    rules
});

static SINGULARS: Lazy<Vec<Rule>> = Lazy::new(|| {
    let mut rules = irregular_rules(false);
    rules.extend(SINGULAR_RULES.iter().map(|(p, r)| Rule::new(p, *r)));
    rules
});

/// The final word of a snake_case or camelCase compound name
fn last_word(word: &str) -> &str {
    let boundary = word
        .char_indices()
        .filter(|(_, c)| *c == '_' || c.is_uppercase())
        .map(|(idx, c)| if c == '_' { idx + 1 } else { idx })
        .last()
        .unwrap_or(0);
    &word[boundary..]
}

fn is_uncountable(word: &str) -> bool {
    let last = last_word(word).to_lowercase();
    UNCOUNTABLES.contains(&last.as_str())
}

fn inflect(word: &str, rules: &[Rule]) -> String {
    if word.trim().is_empty() || is_uncountable(word) {
        return word.to_string();
    }

    rules
        .iter()
        .find(|rule| rule.pattern.is_match(word))
        .map(|rule| rule.pattern.replace(word, rule.replacement.as_str()).into_owned())
        .unwrap_or_else(|| word.to_string())
}

pub fn pluralize(word: &str) -> String {
    inflect(word, &PLURALS)
}

pub fn singularize(word: &str) -> String {
    inflect(word, &SINGULARS)
}

/// `super_villain` -> `superVillain`, `_comments` -> `comments`, `YellowMinion` -> `yellowMinion`
pub fn camelize(word: &str) -> String {
    let joined = CAMELIZE_SEPARATOR_REGEX.replace_all(word, |caps: &regex::Captures<'_>| {
        caps.get(1)
            .map(|c| c.as_str().to_uppercase())
            .unwrap_or_default()
    });

    CAMELIZE_LEADING_REGEX
        .replace_all(&joined, |caps: &regex::Captures<'_>| {
            format!("{}{}", &caps[1], caps[2].to_lowercase())
        })
        .into_owned()
}

/// `famousPerson` -> `famous_person`
pub fn decamelize(word: &str) -> String {
    DECAMELIZE_REGEX
        .replace_all(word, "${1}_${2}")
        .to_lowercase()
}

/// `yellowMinion` -> `YellowMinion`
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camelize() {
        assert_eq!(camelize("super_villain"), "superVillain");
        assert_eq!(camelize("minion_capacity"), "minionCapacity");
        assert_eq!(camelize("_comments"), "comments");
        assert_eq!(camelize("_evil_minions"), "evilMinions");
        assert_eq!(camelize("YellowMinion"), "yellowMinion");
        assert_eq!(camelize("id"), "id");
    }

    #[test]
    fn test_decamelize() {
        assert_eq!(decamelize("famousPerson"), "famous_person");
        assert_eq!(decamelize("YellowMinion"), "yellow_minion");
        assert_eq!(decamelize("secretLab"), "secret_lab");
        assert_eq!(decamelize("already_snake"), "already_snake");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("yellowMinion"), "YellowMinion");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_pluralize_regular_and_compound() {
        assert_eq!(pluralize("comment"), "comments");
        assert_eq!(pluralize("secretLab"), "secretLabs");
        assert_eq!(pluralize("super_villain"), "super_villains");
        assert_eq!(pluralize("company"), "companies");
        assert_eq!(pluralize("box"), "boxes");
        assert_eq!(pluralize("status"), "statuses");
        assert_eq!(pluralize("comments"), "comments");
    }

    #[test]
    fn test_pluralize_irregular_keeps_prefix() {
        assert_eq!(pluralize("person"), "people");
        assert_eq!(pluralize("famous_person"), "famous_people");
        assert_eq!(pluralize("famousPerson"), "famousPeople");
        assert_eq!(pluralize("child"), "children");
        assert_eq!(pluralize("people"), "people");
    }

    #[test]
    fn test_singularize() {
        assert_eq!(singularize("comments"), "comment");
        assert_eq!(singularize("secret_labs"), "secret_lab");
        assert_eq!(singularize("superVillains"), "superVillain");
        assert_eq!(singularize("children"), "child");
        assert_eq!(singularize("famous_people"), "famous_person");
        assert_eq!(singularize("companies"), "company");
        assert_eq!(singularize("addresses"), "address");
        assert_eq!(singularize("yellowMinion"), "yellowMinion");
    }

    #[test]
    fn test_uncountables_are_untouched() {
        assert_eq!(pluralize("sheep"), "sheep");
        assert_eq!(pluralize("goldFish"), "goldFish");
        assert_eq!(singularize("series"), "series");
    }
}
