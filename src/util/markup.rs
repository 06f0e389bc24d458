use std::sync::LazyLock;

use regex::Regex;

static CHECKBOX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[-*+]\s+\[.\]\s*").expect("valid regex"));
static WIKI_ALIAS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[[^\]|]*\|([^\]]*)\]\]").expect("valid regex"));
static WIKI_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[([^\]]*)\]\]").expect("valid regex"));
static MD_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!?\[([^\]]*)\]\([^)]*\)").expect("valid regex"));
static EMPHASIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*|__|~~|==|`").expect("valid regex"));
static SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s{2,}").expect("valid regex"));

/// Strip inline markdown from task text so only the readable words remain:
/// a leading checkbox, wiki links (keeping the alias), markdown links
/// (keeping the label), emphasis markers and inline code ticks.
pub fn strip_markup(text: &str) -> String {
    let s = CHECKBOX.replace(text, "");
    let s = WIKI_ALIAS.replace_all(&s, "$1");
    let s = WIKI_LINK.replace_all(&s, "$1");
    let s = MD_LINK.replace_all(&s, "$1");
    let s = EMPHASIS.replace_all(&s, "");
    let s = SPACES.replace_all(&s, " ");
    s.trim().to_string()
}
