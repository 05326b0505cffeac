//! Style directive resolution
//!
//! Directives live inline in the token stream and attach presentation
//! overrides to statement nodes by build-order index:
//!
//! ```text
//! FIGURA_BLOQUE = RECTANGULO | 2
//! COLOR_SI = 255,0,0 | 1
//! DEFAULT = 3
//! ```
//!
//! The resolver is a tolerant, resumable scan over the full token list: a
//! malformed directive is abandoned and scanning continues at the next
//! token, so one bad directive never loses the rest of the table.

use crate::color::{parse_color, Color};
use crate::lexer::{Token, TokenKind};
use serde::Serialize;
use std::collections::HashMap;

/// Font size applied when a LETRA_SIZE value does not parse as a number.
pub const DEFAULT_FONT_SIZE: f32 = 40.0;

/// Which presentation attribute a directive controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StyleAspect {
    Color,
    TextColor,
    Shape,
    Font,
    FontSize,
}

/// Which statement class a directive targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NodeClass {
    Conditional,
    Loop,
    Block,
}

/// The closed set of directive keys: five aspects per node class, plus the
/// DEFAULT marker that resets one node to baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StyleKey {
    ColorTextoSi,
    ColorSi,
    FiguraSi,
    LetraSi,
    LetraSizeSi,
    ColorTextoMientras,
    ColorMientras,
    FiguraMientras,
    LetraMientras,
    LetraSizeMientras,
    ColorTextoBloque,
    ColorBloque,
    FiguraBloque,
    LetraBloque,
    LetraSizeBloque,
    Default,
}

impl StyleKey {
    pub const INDEXED: [StyleKey; 15] = [
        StyleKey::ColorTextoSi,
        StyleKey::ColorSi,
        StyleKey::FiguraSi,
        StyleKey::LetraSi,
        StyleKey::LetraSizeSi,
        StyleKey::ColorTextoMientras,
        StyleKey::ColorMientras,
        StyleKey::FiguraMientras,
        StyleKey::LetraMientras,
        StyleKey::LetraSizeMientras,
        StyleKey::ColorTextoBloque,
        StyleKey::ColorBloque,
        StyleKey::FiguraBloque,
        StyleKey::LetraBloque,
        StyleKey::LetraSizeBloque,
    ];

    /// The source-language spelling of this key.
    pub fn keyword(self) -> &'static str {
        match self {
            StyleKey::ColorTextoSi => "COLOR_TEXTO_SI",
            StyleKey::ColorSi => "COLOR_SI",
            StyleKey::FiguraSi => "FIGURA_SI",
            StyleKey::LetraSi => "LETRA_SI",
            StyleKey::LetraSizeSi => "LETRA_SIZE_SI",
            StyleKey::ColorTextoMientras => "COLOR_TEXTO_MIENTRAS",
            StyleKey::ColorMientras => "COLOR_MIENTRAS",
            StyleKey::FiguraMientras => "FIGURA_MIENTRAS",
            StyleKey::LetraMientras => "LETRA_MIENTRAS",
            StyleKey::LetraSizeMientras => "LETRA_SIZE_MIENTRAS",
            StyleKey::ColorTextoBloque => "COLOR_TEXTO_BLOQUE",
            StyleKey::ColorBloque => "COLOR_BLOQUE",
            StyleKey::FiguraBloque => "FIGURA_BLOQUE",
            StyleKey::LetraBloque => "LETRA_BLOQUE",
            StyleKey::LetraSizeBloque => "LETRA_SIZE_BLOQUE",
            StyleKey::Default => "DEFAULT",
        }
    }

    pub fn from_keyword(word: &str) -> Option<StyleKey> {
        StyleKey::INDEXED
            .iter()
            .copied()
            .find(|key| key.keyword() == word)
    }

    pub fn aspect(self) -> StyleAspect {
        match self {
            StyleKey::ColorSi | StyleKey::ColorMientras | StyleKey::ColorBloque => {
                StyleAspect::Color
            }
            StyleKey::ColorTextoSi | StyleKey::ColorTextoMientras | StyleKey::ColorTextoBloque => {
                StyleAspect::TextColor
            }
            StyleKey::FiguraSi | StyleKey::FiguraMientras | StyleKey::FiguraBloque => {
                StyleAspect::Shape
            }
            StyleKey::LetraSi | StyleKey::LetraMientras | StyleKey::LetraBloque => {
                StyleAspect::Font
            }
            StyleKey::LetraSizeSi | StyleKey::LetraSizeMientras | StyleKey::LetraSizeBloque => {
                StyleAspect::FontSize
            }
            // DEFAULT carries no value of its own; treat it as plain text.
            StyleKey::Default => StyleAspect::Shape,
        }
    }

    pub fn node_class(self) -> Option<NodeClass> {
        match self {
            StyleKey::ColorTextoSi
            | StyleKey::ColorSi
            | StyleKey::FiguraSi
            | StyleKey::LetraSi
            | StyleKey::LetraSizeSi => Some(NodeClass::Conditional),
            StyleKey::ColorTextoMientras
            | StyleKey::ColorMientras
            | StyleKey::FiguraMientras
            | StyleKey::LetraMientras
            | StyleKey::LetraSizeMientras => Some(NodeClass::Loop),
            StyleKey::ColorTextoBloque
            | StyleKey::ColorBloque
            | StyleKey::FiguraBloque
            | StyleKey::LetraBloque
            | StyleKey::LetraSizeBloque => Some(NodeClass::Block),
            StyleKey::Default => None,
        }
    }

    pub fn is_color(self) -> bool {
        matches!(self.aspect(), StyleAspect::Color | StyleAspect::TextColor)
            && self != StyleKey::Default
    }
}

/// A typed directive value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum StyleValue {
    Color(Color),
    Size(f32),
    Text(String),
}

impl std::fmt::Display for StyleValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StyleValue::Color(color) => write!(f, "{}", color),
            StyleValue::Size(size) => write!(f, "{}", size),
            StyleValue::Text(text) => write!(f, "{}", text),
        }
    }
}

/// One (key, node index) style override.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleDirective {
    pub key: StyleKey,
    pub node_index: u32,
    pub value: StyleValue,
}

/// How DEFAULT directives interleave with per-key overrides at the same
/// node index. The resolver only records directives; the renderer consults
/// this mode when applying them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum DefaultMode {
    /// Reset the node to baseline, then apply the per-key overrides.
    #[default]
    ResetBeforeOverrides,
    /// Apply overrides first; a DEFAULT at the same index wipes them.
    ResetAfterOverrides,
}

/// Style table: key -> node index -> directive. At most one directive per
/// (key, index) pair; a later directive overwrites an earlier one.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StyleTable {
    entries: HashMap<StyleKey, HashMap<u32, StyleDirective>>,
    pub default_mode: DefaultMode,
}

impl StyleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, directive: StyleDirective) {
        self.entries
            .entry(directive.key)
            .or_default()
            .insert(directive.node_index, directive);
    }

    pub fn get(&self, key: StyleKey, node_index: u32) -> Option<&StyleDirective> {
        self.entries.get(&key)?.get(&node_index)
    }

    /// All directives recorded for one key, by node index.
    pub fn for_key(&self, key: StyleKey) -> Option<&HashMap<u32, StyleDirective>> {
        self.entries.get(&key)
    }

    /// All directives in the table, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &StyleDirective> {
        self.entries.values().flat_map(HashMap::values)
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Coerce raw directive text into a typed value, keyed by the directive's
/// aspect. Total: color failures fall back to black, size failures to
/// [`DEFAULT_FONT_SIZE`], shape/font values pass through trimmed.
pub fn type_value(key: StyleKey, raw: &str) -> StyleValue {
    match key.aspect() {
        StyleAspect::Color | StyleAspect::TextColor => StyleValue::Color(parse_color(raw)),
        StyleAspect::FontSize => {
            StyleValue::Size(raw.trim().parse().unwrap_or(DEFAULT_FONT_SIZE))
        }
        StyleAspect::Shape | StyleAspect::Font => StyleValue::Text(raw.trim().to_string()),
    }
}

/// Scan the full token list and build the style table.
pub fn resolve(tokens: &[Token]) -> StyleTable {
    let mut table = StyleTable::new();
    let mut i = 0;

    while i < tokens.len() {
        match tokens[i].kind {
            TokenKind::Default => {
                if let Some(index) = parse_default(tokens, i) {
                    table.insert(StyleDirective {
                        key: StyleKey::Default,
                        node_index: index,
                        value: StyleValue::Text(index.to_string()),
                    });
                    i += 3;
                    continue;
                }
            }
            TokenKind::StyleKey(key) => {
                if let Some((directive, next)) = parse_indexed(tokens, i, key) {
                    table.insert(directive);
                    i = next;
                    continue;
                }
            }
            _ => {}
        }
        i += 1;
    }

    table
}

/// `DEFAULT = <entero>`
fn parse_default(tokens: &[Token], start: usize) -> Option<u32> {
    if start + 2 >= tokens.len() {
        return None;
    }
    if tokens[start + 1].kind != TokenKind::Assign {
        return None;
    }
    if tokens[start + 2].kind != TokenKind::Integer {
        return None;
    }
    tokens[start + 2].text().parse().ok()
}

/// `KEY = <value tokens...> | <entero>`. Returns the directive and the
/// position just past the consumed bar + index, or None to abandon.
fn parse_indexed(tokens: &[Token], start: usize, key: StyleKey) -> Option<(StyleDirective, usize)> {
    if start + 4 >= tokens.len() {
        return None;
    }
    if tokens[start + 1].kind != TokenKind::Assign {
        return None;
    }

    let bar = (start + 2..tokens.len()).find(|&j| tokens[j].kind == TokenKind::Bar)?;
    if bar + 1 >= tokens.len() || tokens[bar + 1].kind != TokenKind::Integer {
        return None;
    }
    let node_index: u32 = tokens[bar + 1].text().parse().ok()?;

    // Directive values are compact literals; concatenate without separators
    // so `255 , 0 , 0` and `255,0,0` read the same.
    let raw: String = tokens[start + 2..bar].iter().map(Token::text).collect();
    let raw = raw.trim();
    if raw.is_empty() {
        log::debug!(
            "abandoning {} directive at token {}: empty value",
            key.keyword(),
            start
        );
        return None;
    }

    let directive = StyleDirective {
        key,
        node_index,
        value: type_value(key, raw),
    };
    Some((directive, bar + 2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn tokens_of(source: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(source);
        lexer.tokenize();
        lexer.into_tokens()
    }

    #[test]
    fn test_shape_and_color_directives() {
        let tokens = tokens_of("FIGURA_BLOQUE = RECTANGULO | 2 COLOR_BLOQUE = 255,0,0 | 2");
        let table = resolve(&tokens);

        assert_eq!(
            table.get(StyleKey::FiguraBloque, 2).unwrap().value,
            StyleValue::Text("RECTANGULO".to_string())
        );
        assert_eq!(
            table.get(StyleKey::ColorBloque, 2).unwrap().value,
            StyleValue::Color(crate::color::Color::rgb(255, 0, 0))
        );
    }

    #[test]
    fn test_last_write_wins() {
        let tokens = tokens_of("LETRA_SIZE_SI = 12 | 1 LETRA_SIZE_SI = 30 | 1");
        let table = resolve(&tokens);

        assert_eq!(
            table.get(StyleKey::LetraSizeSi, 1).unwrap().value,
            StyleValue::Size(30.0)
        );
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_size_fallback() {
        let tokens = tokens_of("LETRA_SIZE_MIENTRAS = grande | 4");
        let table = resolve(&tokens);

        assert_eq!(
            table.get(StyleKey::LetraSizeMientras, 4).unwrap().value,
            StyleValue::Size(DEFAULT_FONT_SIZE)
        );
    }

    #[test]
    fn test_default_marker() {
        let tokens = tokens_of("DEFAULT = 3");
        let table = resolve(&tokens);

        let directive = table.get(StyleKey::Default, 3).unwrap();
        assert_eq!(directive.value, StyleValue::Text("3".to_string()));
        assert_eq!(table.default_mode, DefaultMode::ResetBeforeOverrides);
    }

    #[test]
    fn test_missing_bar_abandons_and_resumes() {
        // Last directive has no bar; it is abandoned without touching the
        // directives already resolved.
        let tokens = tokens_of("LETRA_SI = ARIAL | 1 COLOR_SI = rojo");
        let table = resolve(&tokens);

        assert_eq!(
            table.get(StyleKey::LetraSi, 1).unwrap().value,
            StyleValue::Text("ARIAL".to_string())
        );
        assert!(table.get(StyleKey::ColorSi, 1).is_none());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_bar_scan_is_greedy() {
        // The bar search does not stop at the next directive keyword: a
        // directive missing its own bar swallows the following one. Same
        // tolerance the renderer always had; resolution still completes.
        let tokens = tokens_of("COLOR_SI = rojo LETRA_SI = ARIAL | 1");
        let table = resolve(&tokens);

        assert!(table.get(StyleKey::ColorSi, 1).is_some());
        assert!(table.get(StyleKey::LetraSi, 1).is_none());
    }

    #[test]
    fn test_empty_value_abandoned() {
        let tokens = tokens_of("COLOR_SI = | 1");
        let table = resolve(&tokens);
        assert!(table.is_empty());
    }

    #[test]
    fn test_idempotent() {
        let tokens = tokens_of("COLOR_SI = H0000FF | 1 FIGURA_SI = ROMBO | 1 DEFAULT = 2");
        assert_eq!(resolve(&tokens), resolve(&tokens));
    }

    #[test]
    fn test_hex_color_value() {
        let tokens = tokens_of("COLOR_TEXTO_SI = H0000FF | 5");
        let table = resolve(&tokens);

        assert_eq!(
            table.get(StyleKey::ColorTextoSi, 5).unwrap().value,
            StyleValue::Color(crate::color::Color::rgb(0, 0, 255))
        );
    }
}
