/// Pattern parsing for route file tokens
///
/// Pure functional parsing of Remix flat-file names into typed tokens.
/// All functions are **pure**: same input → same output, no side effects.

use crate::error::RouteParseError;

/// Represents the different kinds of dot-delimited tokens in a route file name
///
/// Functional sum type for pattern matching route tokens.
///
/// # Examples
///
/// ```
/// use define_remix_app::route::pattern::{classify_token, TokenKind};
///
/// assert_eq!(classify_token("about").unwrap(), TokenKind::Static("about".into()));
/// assert_eq!(classify_token("$id").unwrap(), TokenKind::Required("id".into()));
/// assert_eq!(classify_token("($lang)").unwrap(), TokenKind::Optional("lang".into()));
/// assert_eq!(classify_token("$").unwrap(), TokenKind::CatchAll);
/// assert_eq!(classify_token("_auth").unwrap(), TokenKind::Pathless("_auth".into()));
/// assert_eq!(classify_token("about_").unwrap(), TokenKind::Escaped("about".into()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Splat segment: `$`
    CatchAll,
    /// Optional parameter: `($lang)`
    Optional(String),
    /// Required parameter: `$id`
    Required(String),
    /// Pathless layout token: `_auth` (carries the full token text)
    Pathless(String),
    /// Index route marker: `_index`
    Index,
    /// Static text that opts out of parent layout nesting: `about_`
    Escaped(String),
    /// Static text segment
    Static(String),
}

impl TokenKind {
    /// Whether the token produces a URL segment
    pub fn is_segment(&self) -> bool {
        !matches!(self, TokenKind::Pathless(_) | TokenKind::Index)
    }
}

/// One character of a token, flagged when it came from a `[...]` escape
type Char = (char, bool);

/// Splits a file stem on `.` while honoring `[...]` escapes (pure function)
///
/// # Examples
///
/// ```
/// use define_remix_app::route::pattern::split_tokens;
///
/// assert_eq!(split_tokens("blog.$slug").unwrap(), vec!["blog", "$slug"]);
/// assert_eq!(split_tokens("sitemap[.]xml").unwrap(), vec!["sitemap[.]xml"]);
/// ```
pub fn split_tokens(stem: &str) -> Result<Vec<String>, RouteParseError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_escape = false;

    for c in stem.chars() {
        match c {
            '[' if !in_escape => {
                in_escape = true;
                current.push(c);
            }
            ']' if in_escape => {
                in_escape = false;
                current.push(c);
            }
            '.' if !in_escape => tokens.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }

    if in_escape {
        return Err(RouteParseError::UnbalancedBracket(stem.to_string()));
    }
    tokens.push(current);

    if tokens.iter().any(|t| t.is_empty()) {
        return Err(RouteParseError::EmptyToken(stem.to_string()));
    }
    Ok(tokens)
}

/// Decodes `[...]` escapes, remembering which characters were escaped
fn decode(token: &str) -> Result<Vec<Char>, RouteParseError> {
    let mut chars = Vec::with_capacity(token.len());
    let mut in_escape = false;

    for c in token.chars() {
        match c {
            '[' if !in_escape => in_escape = true,
            ']' if in_escape => in_escape = false,
            _ => chars.push((c, in_escape)),
        }
    }

    if in_escape {
        return Err(RouteParseError::UnbalancedBracket(token.to_string()));
    }
    Ok(chars)
}

fn text_of(chars: &[Char]) -> String {
    chars.iter().map(|(c, _)| *c).collect()
}

fn is_unescaped(chars: &[Char], index: usize, expected: char) -> bool {
    chars
        .get(index)
        .map_or(false, |&(c, escaped)| c == expected && !escaped)
}

/// Validates a dynamic parameter name
fn param_name(chars: &[Char], token: &str) -> Result<String, RouteParseError> {
    let valid = !chars.is_empty()
        && chars
            .iter()
            .all(|&(c, _)| c.is_alphanumeric() || c == '_' || c == '-');

    if valid {
        Ok(text_of(chars))
    } else {
        Err(RouteParseError::InvalidParamName(token.to_string()))
    }
}

/// Classifies a raw token into a [`TokenKind`] (pure function)
///
/// # Parsing Rules (evaluated in order)
///
/// 1. **Splat**: `$`
/// 2. **Index**: `_index`
/// 3. **Optional param**: `($name)`
/// 4. **Required param**: `$name`
/// 5. **Pathless**: `_name`
/// 6. **Escaped static**: `name_`
/// 7. **Static**: Any other text
///
/// Characters inside `[...]` never trigger a rule, so `[$]price` is the
/// static text `$price`.
pub fn classify_token(token: &str) -> Result<TokenKind, RouteParseError> {
    let chars = decode(token)?;
    let len = chars.len();

    if len == 0 {
        return Err(RouteParseError::EmptyToken(token.to_string()));
    }

    if len == 1 && is_unescaped(&chars, 0, '$') {
        return Ok(TokenKind::CatchAll);
    }

    if token == "_index" {
        return Ok(TokenKind::Index);
    }

    let opens = is_unescaped(&chars, 0, '(');
    let closes = is_unescaped(&chars, len - 1, ')');
    let stray_paren = chars
        .iter()
        .enumerate()
        .any(|(i, &(c, escaped))| {
            !escaped && (c == '(' || c == ')') && !(opens && closes && (i == 0 || i == len - 1))
        });

    if stray_paren || opens != closes {
        return Err(RouteParseError::UnbalancedParenthesis(token.to_string()));
    }

    if opens {
        let inner = &chars[1..len - 1];
        if inner.is_empty() {
            return Err(RouteParseError::EmptyOptional(token.to_string()));
        }
        if !is_unescaped(inner, 0, '$') {
            return Err(RouteParseError::OptionalStatic(token.to_string()));
        }
        if inner.len() == 1 {
            return Err(RouteParseError::OptionalCatchAll(token.to_string()));
        }
        return param_name(&inner[1..], token).map(TokenKind::Optional);
    }

    if is_unescaped(&chars, 0, '$') {
        return param_name(&chars[1..], token).map(TokenKind::Required);
    }

    if is_unescaped(&chars, 0, '_') {
        return Ok(TokenKind::Pathless(token.to_string()));
    }

    if len > 1 && is_unescaped(&chars, len - 1, '_') {
        return Ok(TokenKind::Escaped(text_of(&chars[..len - 1])));
    }

    Ok(TokenKind::Static(text_of(&chars)))
}

/// Escapes characters of user-entered text that would otherwise split a
/// route token (`sitemap.xml` → `sitemap[.]xml`)
///
/// Existing `[...]` groups are kept as typed.
pub fn escape_literal(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    let mut in_escape = false;

    for c in text.chars() {
        match c {
            '[' if !in_escape => {
                in_escape = true;
                escaped.push(c);
            }
            ']' if in_escape => {
                in_escape = false;
                escaped.push(c);
            }
            '.' if !in_escape => escaped.push_str("[.]"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Renders static text as it appears in a readable URI
///
/// Characters that would turn the text into a parameter, a pathless token or
/// an opt-out are bracketed (`$price` → `[$]price`, `snake_` → `snake[_]`).
///
/// # Examples
///
/// ```
/// use define_remix_app::route::pattern::{classify_token, readable_literal, TokenKind};
///
/// assert_eq!(readable_literal("$price"), "[$]price");
/// assert_eq!(readable_literal("sitemap.xml"), "sitemap.xml");
/// assert_eq!(
///     classify_token(&readable_literal("_private")).unwrap(),
///     TokenKind::Static("_private".into())
/// );
/// ```
pub fn readable_literal(text: &str) -> String {
    let last = text.chars().count().saturating_sub(1);
    let mut rendered = String::with_capacity(text.len());

    for (i, c) in text.chars().enumerate() {
        let reserved = match c {
            '(' | ')' => true,
            '$' | '_' => i == 0 || (c == '_' && i == last),
            _ => false,
        };
        if reserved {
            rendered.push('[');
            rendered.push(c);
            rendered.push(']');
        } else {
            rendered.push(c);
        }
    }
    rendered
}
