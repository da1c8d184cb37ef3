//! English singular/plural inflection rules
//!
//! Rules are tried in order and the first match wins: uncountable words,
//! then irregular words, then the regular rules from the most specific to
//! the most general. Every regular rule is compiled three ways (upper-case,
//! as written, case-insensitive) so `USERS`, `users` and `Users` all inflect.

use std::sync::LazyLock;

use regex::Regex;

const PLURAL_RULES: &[(&str, &str)] = &[
    ("([a-z])$", "${1}s"),
    ("s$", "s"),
    ("^(ax|test)is$", "${1}es"),
    ("(octop|vir)us$", "${1}i"),
    ("(octop|vir)i$", "${1}i"),
    ("(alias|status|campus)$", "${1}es"),
    ("(bu)s$", "${1}ses"),
    ("(buffal|tomat)o$", "${1}oes"),
    ("([ti])um$", "${1}a"),
    ("([ti])a$", "${1}a"),
    ("sis$", "ses"),
    ("(?:([^f])fe|([lr])f)$", "${1}${2}ves"),
    ("(hive)$", "${1}s"),
    ("([^aeiouy]|qu)y$", "${1}ies"),
    ("(x|ch|ss|sh)$", "${1}es"),
    ("(matr|vert|ind)(?:ix|ex)$", "${1}ices"),
    ("^(m|l)ouse$", "${1}ice"),
    ("^(m|l)ice$", "${1}ice"),
    ("^(ox)$", "${1}en"),
    ("^(oxen)$", "${1}"),
    ("(quiz)$", "${1}zes"),
    ("(drive)$", "${1}s"),
];

const SINGULAR_RULES: &[(&str, &str)] = &[
    ("s$", ""),
    ("(ss)$", "${1}"),
    ("(n)ews$", "${1}ews"),
    ("([ti])a$", "${1}um"),
    (
        "((a)naly|(b)a|(d)iagno|(p)arenthe|(p)rogno|(s)ynop|(t)he)(sis|ses)$",
        "${1}sis",
    ),
    ("(^analy)(sis|ses)$", "${1}sis"),
    ("([^f])ves$", "${1}fe"),
    ("(hive)s$", "${1}"),
    ("(tive)s$", "${1}"),
    ("([lr])ves$", "${1}f"),
    ("([^aeiouy]|qu)ies$", "${1}y"),
    ("(s)eries$", "${1}eries"),
    ("(m)ovies$", "${1}ovie"),
    ("(c)ookies$", "${1}ookie"),
    ("(x|ch|ss|sh)es$", "${1}"),
    ("^(m|l)ice$", "${1}ouse"),
    ("(bus|campus)(es)?$", "${1}"),
    ("(o)es$", "${1}"),
    ("(shoe)s$", "${1}"),
    ("(cris|test)(is|es)$", "${1}is"),
    ("^(a)x[ie]s$", "${1}xis"),
    ("(octop|vir)(us|i)$", "${1}us"),
    ("(alias|status)(es)?$", "${1}"),
    ("^(ox)en", "${1}"),
    ("(vert|ind)ices$", "${1}ex"),
    ("(matr)ices$", "${1}ix"),
    ("(quiz)zes$", "${1}"),
    ("(database)s$", "${1}"),
];

/// (singular, plural)
const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("man", "men"),
    ("child", "children"),
    ("sex", "sexes"),
    ("move", "moves"),
    ("mombie", "mombies"),
];

const UNCOUNTABLE: &[&str] = &[
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

static PLURALS: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    compile(PLURAL_RULES, IRREGULAR.iter().map(|&(one, many)| (one, many)))
});

static SINGULARS: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    compile(SINGULAR_RULES, IRREGULAR.iter().map(|&(one, many)| (many, one)))
});

fn rule(pattern: &str, replacement: &str) -> Rule {
    Rule {
        pattern: Regex::new(pattern).unwrap(),
        replacement: replacement.to_string(),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn compile<'a>(
    regular: &[(&str, &str)],
    irregular: impl Iterator<Item = (&'a str, &'a str)>,
) -> Vec<Rule> {
    let mut rules = Vec::new();

    for word in UNCOUNTABLE {
        rules.push(rule(&format!("^(?i)({word})$"), "${1}"));
    }

    for (from, to) in irregular {
        rules.push(rule(
            &format!("{}$", from.to_uppercase()),
            &to.to_uppercase(),
        ));
        rules.push(rule(&format!("{}$", capitalize(from)), &capitalize(to)));
        rules.push(rule(&format!("{from}$"), to));
    }

    for (pattern, replacement) in regular.iter().rev() {
        rules.push(rule(&pattern.to_uppercase(), &replacement.to_uppercase()));
        rules.push(rule(pattern, replacement));
        rules.push(rule(&format!("(?i){pattern}"), replacement));
    }

    rules
}

fn apply(rules: &[Rule], word: &str) -> String {
    rules
        .iter()
        .find(|r| r.pattern.is_match(word))
        .map(|r| r.pattern.replace_all(word, r.replacement.as_str()).into_owned())
        .unwrap_or_else(|| word.to_string())
}

pub fn plural(word: &str) -> String {
    apply(&PLURALS, word)
}

pub fn singular(word: &str) -> String {
    apply(&SINGULARS, word)
}
