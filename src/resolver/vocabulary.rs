//! Fixed vocabularies used by the resolver's offline stages.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Most frequent ingredient and dish names with their search terms.
static COMMON_TERMS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("鸡蛋", "eggs"),
        ("西红柿", "tomato"),
        ("土豆", "potato"),
        ("猪肉", "pork"),
        ("牛肉", "beef"),
        ("鸡肉", "chicken"),
        ("鱼肉", "fish"),
        ("米饭", "rice"),
        ("面条", "noodles"),
        ("豆腐", "tofu"),
    ])
});

/// Substring groups tried in order by [`keyword_term()`]. Earlier groups
/// win, so the more specific keywords (牛肉) sit before the generic ones
/// they contain (肉).
const KEYWORD_GROUPS: &[(&[&str], &str)] = &[
    (&["鸡蛋", "炒蛋"], "eggs"),
    (&["土豆"], "potato"),
    (&["鸡肉", "鸡"], "chicken"),
    (&["牛肉"], "beef"),
    (&["猪肉", "肉"], "pork"),
    (&["鱼"], "fish"),
    (&["豆腐"], "tofu"),
    (&["面条", "面"], "noodles"),
    (&["米饭", "饭"], "rice"),
    (&["西红柿", "番茄"], "tomato"),
    (&["青菜", "菜"], "vegetables"),
];

/// Exact lookup in the curated table.
pub(crate) fn common_term(text: &str) -> Option<&'static str> {
    COMMON_TERMS.get(text).copied()
}

/// First keyword group with a member contained in `text`.
pub(crate) fn keyword_term(text: &str) -> Option<&'static str> {
    KEYWORD_GROUPS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| text.contains(k)))
        .map(|(_, term)| *term)
}

/// Whether `text` contains a CJK unified ideograph (U+4E00..=U+9FFF).
pub(crate) fn contains_cjk(text: &str) -> bool {
    text.chars().any(|c| ('\u{4e00}'..='\u{9fff}').contains(&c))
}
