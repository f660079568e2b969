use std::fs;
use std::io;
use std::path::Path;

use log::debug;
use quote::ToTokens;

use crate::directive::{ClassifiedAttr, Directive, classify};
use crate::error::{CompileError, CompileResult, Diagnostic};
use crate::markup::{MarkupDocument, MarkupNode, parse_markup};
use crate::options::CompileOptions;

/// Generated source for one host type.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedView {
    /// Name of the private module wrapping the generated impl.
    pub module_name: String,
    pub source: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// Compile a markup document bound to `host` (a Rust type path) into an
/// `impl Rebuild for <host>` wrapped in a private module, ready for
/// `include!` next to the host type.
pub fn compile_markup(
    source: &str,
    host: &str,
    options: &CompileOptions,
) -> CompileResult<GeneratedView> {
    compile_with_origin(source, host, options, None)
}

/// Read and compile a markup file. A missing file is
/// [`CompileError::TemplateNotFound`].
pub fn compile_file(
    path: &Path,
    host: &str,
    options: &CompileOptions,
) -> CompileResult<GeneratedView> {
    let bytes = fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => CompileError::TemplateNotFound {
            path: path.to_path_buf(),
        },
        _ => CompileError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;
    let source = String::from_utf8(bytes).map_err(|e| invalid_utf8(&e))?;
    let origin = path.file_name().and_then(|n| n.to_str());
    compile_with_origin(&source, host, options, origin)
}

/// Undecodable bytes are malformed markup, located at the first bad byte.
fn invalid_utf8(err: &std::string::FromUtf8Error) -> CompileError {
    let valid = &err.as_bytes()[..err.utf8_error().valid_up_to()];
    let prefix = std::str::from_utf8(valid).unwrap_or_default();
    let line = prefix.matches('\n').count() + 1;
    let column = prefix.rsplit('\n').next().map_or(0, |l| l.chars().count()) + 1;
    CompileError::MalformedMarkup {
        line,
        column,
        message: "invalid UTF-8".to_string(),
    }
}

fn compile_with_origin(
    source: &str,
    host: &str,
    options: &CompileOptions,
    origin: Option<&str>,
) -> CompileResult<GeneratedView> {
    let host_path = syn::parse_str::<syn::Path>(host).map_err(|_| CompileError::InvalidHost {
        host: host.to_string(),
    })?;
    let host_ident = host_path
        .segments
        .last()
        .map(|s| s.ident.to_string())
        .ok_or_else(|| CompileError::InvalidHost {
            host: host.to_string(),
        })?;

    let document = parse_markup(source)?;
    let module_name = format!("__trellis_{}", snake_case(&host_ident));

    let mut emitter = Emitter::new(options);
    let body = emitter.emit_document(&document, host, &module_name, origin)?;
    debug!(
        "compiled {} for `{host}`: {} elements, {} bindings",
        origin.unwrap_or("<markup>"),
        emitter.elements,
        emitter.next_binding
    );

    Ok(GeneratedView {
        module_name,
        source: body,
        diagnostics: emitter.diagnostics,
    })
}

/// One emission pass. The binding counter lives here so every template
/// starts again at `__v0`.
struct Emitter<'a> {
    options: &'a CompileOptions,
    out: String,
    next_binding: usize,
    elements: usize,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Emitter<'a> {
    fn new(options: &'a CompileOptions) -> Self {
        Self {
            options,
            out: String::new(),
            next_binding: 0,
            elements: 0,
            diagnostics: Vec::new(),
        }
    }

    fn rt(&self) -> &str {
        &self.options.runtime_path
    }

    fn line(&mut self, depth: usize, text: &str) {
        for _ in 0..depth {
            self.out.push_str("    ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn binding(&mut self) -> String {
        let name = format!("__v{}", self.next_binding);
        self.next_binding += 1;
        name
    }

    fn emit_document(
        &mut self,
        doc: &MarkupDocument,
        host: &str,
        module_name: &str,
        origin: Option<&str>,
    ) -> CompileResult<String> {
        let rt = self.rt().to_string();
        match origin {
            Some(file) => self.line(0, &format!("// @generated by trellis from {file}; do not edit.")),
            None => self.line(0, "// @generated by trellis; do not edit."),
        }
        self.line(0, "#[allow(unused_imports)]");
        self.line(0, &format!("mod {module_name} {{"));
        self.line(1, "use super::*;");
        for import in doc.imports() {
            let import = import.trim().trim_end_matches(';').trim();
            if !import.is_empty() {
                self.line(1, &format!("use {import};"));
            }
        }
        self.out.push('\n');
        self.line(1, &format!("impl {rt}::Rebuild for {host} {{"));
        self.line(
            2,
            "#[allow(unused_mut, unused_parens, unused_braces, unused_variables, redundant_semicolons, clippy::all)]",
        );
        self.line(2, &format!("fn build_virtual_tree(&self) -> {rt}::VNode {{"));
        let root = self.emit_root(&doc.root, 3)?;
        self.line(3, &root);
        self.line(2, "}");
        self.line(1, "}");
        self.line(0, "}");
        Ok(std::mem::take(&mut self.out))
    }

    fn emit_root(&mut self, root: &MarkupNode, depth: usize) -> CompileResult<String> {
        let classified = classify(root, self.options)?;
        self.diagnostics.extend(classified.diagnostics);
        if classified.directive.is_some() {
            self.diagnostics.push(Diagnostic {
                line: root.line,
                message: format!("directive on root element <{}> ignored", root.name),
            });
        }
        self.emit_construct(root, &classified.attributes, depth)
    }

    /// Construct the node bound to a fresh local, set its properties and
    /// recurse into its element children. Returns the local's name.
    fn emit_construct(
        &mut self,
        node: &MarkupNode,
        attributes: &[ClassifiedAttr],
        depth: usize,
    ) -> CompileResult<String> {
        let rt = self.rt().to_string();
        let var = self.binding();
        self.elements += 1;
        self.line(
            depth,
            &format!("let mut {var} = {rt}::VNode::new({});", string_lit(&node.name)),
        );
        for attr in attributes {
            self.emit_attr(&var, attr, depth);
        }
        for child in node.elements() {
            self.emit_child(child, &var, depth)?;
        }
        Ok(var)
    }

    fn emit_child(&mut self, node: &MarkupNode, parent: &str, depth: usize) -> CompileResult<()> {
        let classified = classify(node, self.options)?;
        self.diagnostics.extend(classified.diagnostics);

        match &classified.directive {
            Some(Directive::ConditionalInclude { condition }) => {
                self.line(depth, &format!("if ({condition}) {{"));
            }
            Some(Directive::RepeatOver {
                collection_expr,
                item_var,
            }) => {
                self.line(depth, &format!("for {item_var} in ({collection_expr}) {{"));
            }
            None => self.line(depth, "{"),
        }
        let var = self.emit_construct(node, &classified.attributes, depth + 1)?;
        self.line(depth + 1, &format!("{parent}.push({var});"));
        self.line(depth, "}");
        Ok(())
    }

    fn emit_attr(&mut self, var: &str, attr: &ClassifiedAttr, depth: usize) {
        let rt = self.rt().to_string();
        match attr {
            ClassifiedAttr::Literal { name, value } => {
                self.line(
                    depth,
                    &format!(
                        "{var}.set({}, {rt}::PropValue::from({}));",
                        string_lit(name),
                        string_lit(value)
                    ),
                );
            }
            ClassifiedAttr::Dynamic { name, expr } => {
                self.line(
                    depth,
                    &format!("{var}.set({}, {rt}::PropValue::from({expr}));", string_lit(name)),
                );
            }
            // The handler outlives this call: the statement may use `this`
            // and owned values, never `self` or borrowed loop items.
            ClassifiedAttr::Event { event, statement } => {
                let statement = statement.trim().trim_end_matches(';');
                self.line(
                    depth,
                    &format!(
                        "{var}.set({}, {rt}::PropValue::from({rt}::EventHandler::new({{",
                        string_lit(event)
                    ),
                );
                self.line(depth + 1, "let this = ::std::clone::Clone::clone(self);");
                self.line(depth + 1, "move || {");
                self.line(depth + 2, &format!("{statement};"));
                self.line(depth + 1, "}");
                self.line(depth, "})));");
            }
        }
    }
}

/// Rust string literal for `s`, escaped the way the compiler reads it back.
pub fn string_lit(s: &str) -> String {
    s.to_token_stream().to_string()
}

fn snake_case(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len() + 4);
    let mut prev_lower = false;
    for ch in ident.chars() {
        if ch.is_ascii_uppercase() {
            if prev_lower {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
            prev_lower = false;
        } else {
            out.push(ch);
            prev_lower = ch.is_ascii_lowercase() || ch.is_ascii_digit();
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snake_case_host_names() {
        assert_eq!(snake_case("MainWindow"), "main_window");
        assert_eq!(snake_case("Counter"), "counter");
        assert_eq!(snake_case("HTTPView"), "httpview");
        assert_eq!(snake_case("view2D"), "view2_d");
    }
}
