//! Classification of element attributes into structural directives and
//! property bindings.

use std::sync::OnceLock;

use log::warn;
use regex::Regex;

use crate::error::{CompileError, CompileResult, Diagnostic};
use crate::markup::MarkupNode;
use crate::options::CompileOptions;

/// Attribute names starting with this prefix are directives, event bindings
/// or dynamic properties.
pub const RESERVED_PREFIX: char = '_';

const IF_ATTR: &str = "_if";
const FOREACH_ATTR: &str = "_foreach";

#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    ConditionalInclude {
        condition: String,
    },
    RepeatOver {
        collection_expr: String,
        item_var: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClassifiedAttr {
    /// `name="text"`: emitted as a string literal.
    Literal { name: String, value: String },
    /// `_name="expr"`: expression emitted verbatim.
    Dynamic { name: String, expr: String },
    /// `_event="statement"`: statement wrapped into an event handler.
    Event { event: String, statement: String },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Classified {
    pub directive: Option<Directive>,
    pub attributes: Vec<ClassifiedAttr>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Split `<item> (of|in) <collection>`. Returns `None` when the value does not
/// match or the item binding is not an identifier.
pub fn parse_foreach(value: &str) -> Option<(String, String)> {
    static FOREACH_PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = FOREACH_PATTERN.get_or_init(|| {
        Regex::new(r"^\s*(\S+)\s+(?:of|in)\s+(.+?)\s*$").expect("foreach pattern is valid")
    });
    let caps = pattern.captures(value)?;
    let item = caps.get(1)?.as_str();
    let collection = caps.get(2)?.as_str();
    syn::parse_str::<syn::Ident>(item).ok()?;
    Some((item.to_string(), collection.to_string()))
}

/// Classify every attribute of `node`. Reserved names compare
/// case-insensitively; the first `_if` / `_foreach` wins.
pub fn classify(node: &MarkupNode, options: &CompileOptions) -> CompileResult<Classified> {
    let mut out = Classified::default();
    let mut condition: Option<String> = None;
    let mut repeat: Option<Directive> = None;
    let mut saw_foreach = false;

    for attr in &node.attributes {
        if attr.name.eq_ignore_ascii_case(IF_ATTR) {
            if condition.is_none() {
                condition = Some(attr.value.trim().to_string());
            }
            continue;
        }
        if attr.name.eq_ignore_ascii_case(FOREACH_ATTR) {
            if saw_foreach {
                continue;
            }
            saw_foreach = true;
            match parse_foreach(&attr.value) {
                Some((item_var, collection_expr)) => {
                    repeat = Some(Directive::RepeatOver {
                        collection_expr,
                        item_var,
                    });
                }
                None if options.strict_directives => {
                    return Err(CompileError::MalformedDirective {
                        element: node.name.clone(),
                        name: attr.name.clone(),
                        value: attr.value.clone(),
                        line: node.line,
                    });
                }
                None => {
                    warn!(
                        "dropping malformed {}=\"{}\" on <{}> at line {}",
                        attr.name, attr.value, node.name, node.line
                    );
                    out.diagnostics.push(Diagnostic {
                        line: node.line,
                        message: format!(
                            "{}=\"{}\" on <{}> is not `<item> of|in <collection>`; directive ignored",
                            attr.name, attr.value, node.name
                        ),
                    });
                }
            }
            continue;
        }

        let classified = match attr.name.strip_prefix(RESERVED_PREFIX) {
            Some(rest) if !rest.is_empty() => match options.event_name(rest) {
                Some(event) => ClassifiedAttr::Event {
                    event: event.to_string(),
                    statement: attr.value.clone(),
                },
                None => ClassifiedAttr::Dynamic {
                    name: rest.to_string(),
                    expr: attr.value.clone(),
                },
            },
            _ => ClassifiedAttr::Literal {
                name: attr.name.clone(),
                value: attr.value.clone(),
            },
        };
        out.attributes.push(classified);
    }

    out.directive = match (condition, repeat) {
        (Some(_), Some(_)) => {
            return Err(CompileError::ConflictingDirectives {
                element: node.name.clone(),
                line: node.line,
            });
        }
        (Some(condition), None) => Some(Directive::ConditionalInclude { condition }),
        (None, repeat) => repeat,
    };
    Ok(out)
}
