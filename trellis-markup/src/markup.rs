use pest::Parser;
use pest::iterators::Pair;

use crate::error::{CompileError, CompileResult};

#[derive(pest_derive::Parser)]
#[grammar = "grammar.pest"]
struct MarkupParser;

/// Node names starting with this prefix denote non-element content.
pub const RESERVED_NAME_PREFIX: char = '#';

pub const TEXT_NODE: &str = "#text";
pub const COMMENT_NODE: &str = "#comment";

const BYTE_ORDER_MARK: char = '\u{FEFF}';

#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MarkupNode {
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<MarkupNode>,
    pub is_processing_instruction: bool,
    /// Character data of `#text` / `#comment` nodes, data of processing
    /// instructions.
    pub value: Option<String>,
    pub line: usize,
}

impl MarkupNode {
    pub fn is_element(&self) -> bool {
        !self.is_processing_instruction && !self.name.starts_with(RESERVED_NAME_PREFIX)
    }

    /// Child elements in document order, skipping text, comments and
    /// processing instructions.
    pub fn elements(&self) -> impl Iterator<Item = &MarkupNode> {
        self.children.iter().filter(|c| c.is_element())
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    fn character_data(name: &str, value: String, line: usize) -> Self {
        MarkupNode {
            name: name.to_string(),
            value: Some(value),
            line,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingInstruction {
    pub target: String,
    pub data: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkupDocument {
    pub processing_instructions: Vec<ProcessingInstruction>,
    pub root: MarkupNode,
}

impl MarkupDocument {
    /// Values of `<?using ...?>` instructions, in document order.
    pub fn imports(&self) -> impl Iterator<Item = &str> {
        self.processing_instructions
            .iter()
            .filter(|pi| pi.target.eq_ignore_ascii_case("using"))
            .map(|pi| pi.data.as_str())
    }
}

/// Parse a markup document into its top-level processing instructions and
/// single root element.
pub fn parse_markup(source: &str) -> CompileResult<MarkupDocument> {
    let source = source.strip_prefix(BYTE_ORDER_MARK).unwrap_or(source);
    let mut pairs = MarkupParser::parse(Rule::document, source)?;
    let document = pairs.next().ok_or(CompileError::NoRootElement)?;

    let mut processing_instructions = Vec::new();
    let mut root = None;

    for node in document.into_inner() {
        match node.as_rule() {
            Rule::pi => processing_instructions.push(parse_pi(node)),
            Rule::element => root = Some(parse_element(node)?),
            _ => {}
        }
    }

    let root = root.ok_or(CompileError::NoRootElement)?;
    Ok(MarkupDocument {
        processing_instructions,
        root,
    })
}

fn parse_pi(pi: Pair<Rule>) -> ProcessingInstruction {
    let mut target = String::new();
    let mut data = String::new();
    for part in pi.into_inner() {
        match part.as_rule() {
            Rule::pi_target => target = part.as_str().to_string(),
            Rule::pi_data => data = part.as_str().trim().to_string(),
            _ => {}
        }
    }
    ProcessingInstruction { target, data }
}

fn parse_element(el: Pair<Rule>) -> CompileResult<MarkupNode> {
    let (line, _) = el.line_col();
    let mut node = MarkupNode {
        line,
        ..Default::default()
    };

    for part in el.into_inner() {
        match part.as_rule() {
            Rule::name => node.name = part.as_str().to_string(),
            Rule::attribute => {
                let (attr_line, attr_col) = part.line_col();
                let attr = parse_attr(part)?;
                if node.attribute(&attr.name).is_some() {
                    return Err(CompileError::MalformedMarkup {
                        line: attr_line,
                        column: attr_col,
                        message: format!("duplicate attribute `{}` on <{}>", attr.name, node.name),
                    });
                }
                node.attributes.push(attr);
            }
            Rule::element => node.children.push(parse_element(part)?),
            Rule::text => {
                let (l, _) = part.line_col();
                let raw = part.as_str();
                // whitespace between elements carries no content
                if !raw.trim().is_empty() {
                    let text = decode_entities(raw, &part)?;
                    node.children.push(MarkupNode::character_data(TEXT_NODE, text, l));
                }
            }
            Rule::cdata => {
                let (l, _) = part.line_col();
                let body = part
                    .into_inner()
                    .next()
                    .map(|b| b.as_str().to_string())
                    .unwrap_or_default();
                node.children.push(MarkupNode::character_data(TEXT_NODE, body, l));
            }
            Rule::comment => {
                let (l, _) = part.line_col();
                let body = part
                    .into_inner()
                    .next()
                    .map(|b| b.as_str().to_string())
                    .unwrap_or_default();
                node.children.push(MarkupNode::character_data(COMMENT_NODE, body, l));
            }
            Rule::pi => {
                let (l, _) = part.line_col();
                let pi = parse_pi(part);
                node.children.push(MarkupNode {
                    name: pi.target,
                    value: Some(pi.data),
                    is_processing_instruction: true,
                    line: l,
                    ..Default::default()
                });
            }
            Rule::close_tag => {
                let (l, c) = part.line_col();
                let close = part.into_inner().next().map(|n| n.as_str()).unwrap_or("");
                if close != node.name {
                    return Err(CompileError::MalformedMarkup {
                        line: l,
                        column: c,
                        message: format!(
                            "closing tag </{close}> does not match <{}> opened at line {line}",
                            node.name
                        ),
                    });
                }
            }
            _ => {}
        }
    }
    Ok(node)
}

fn parse_attr(attr: Pair<Rule>) -> CompileResult<Attribute> {
    let mut name = String::new();
    let mut value = String::new();
    for part in attr.into_inner() {
        match part.as_rule() {
            Rule::name => name = part.as_str().to_string(),
            Rule::dq_value | Rule::sq_value => value = decode_entities(part.as_str(), &part)?,
            _ => {}
        }
    }
    Ok(Attribute { name, value })
}

/// Replace the predefined XML entities and numeric character references.
fn decode_entities(raw: &str, at: &Pair<Rule>) -> CompileResult<String> {
    if !raw.contains('&') {
        return Ok(raw.to_string());
    }
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let Some(semi) = after.find(';') else {
            let fragment: String = after.chars().take(8).collect();
            return Err(bad_entity(at, &fragment));
        };
        let entity = &after[..semi];
        let decoded = match entity {
            "lt" => Some('<'),
            "gt" => Some('>'),
            "amp" => Some('&'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
                .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                .or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                .and_then(char::from_u32),
        };
        match decoded {
            Some(ch) => out.push(ch),
            None => return Err(bad_entity(at, entity)),
        }
        rest = &after[semi + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

fn bad_entity(at: &Pair<Rule>, entity: &str) -> CompileError {
    let (line, column) = at.line_col();
    CompileError::MalformedMarkup {
        line,
        column,
        message: format!("unknown entity `&{entity}`"),
    }
}
