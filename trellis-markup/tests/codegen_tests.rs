use std::path::PathBuf;

use pretty_assertions::assert_eq;
use trellis_markup::{CompileError, CompileOptions, compile_file, compile_markup};

fn compile(src: &str) -> String {
    compile_markup(src, "MainWindow", &CompileOptions::default())
        .expect("compile")
        .source
}

/// Pull the string literal out of `.set("<name>", ...PropValue::from(<lit>));`.
fn literal_for(source: &str, name: &str) -> String {
    let key = format!(".set(\"{name}\", ::trellis_runtime::PropValue::from(");
    let start = source.find(&key).expect("property emitted") + key.len();
    let end = source[start..].find("));\n").expect("statement end") + start;
    source[start..end].to_string()
}

#[test]
fn literal_attribute_round_trips_through_rust_literal() {
    let rs = compile(r#"<TextBlock Text="a &quot;quoted&quot; value"/>"#);
    let lit = literal_for(&rs, "Text");
    assert_eq!(lit, r#""a \"quoted\" value""#);
    let decoded = syn::parse_str::<syn::LitStr>(&lit).unwrap().value();
    assert_eq!(decoded, "a \"quoted\" value");
}

#[test]
fn control_characters_round_trip() {
    let original = "line one\nline\ttwo \\ end";
    let rs = compile(r#"<TextBlock Text="line one&#10;line&#9;two \ end"/>"#);
    let lit = literal_for(&rs, "Text");
    assert!(!lit.contains('\n'));
    let decoded = syn::parse_str::<syn::LitStr>(&lit).unwrap().value();
    assert_eq!(decoded, original);
}

#[test]
fn conditional_child_is_wrapped_in_if() {
    let rs = compile(
        r#"<StackPanel><TextBlock _if="self.show_more.get()" Text="More"/></StackPanel>"#,
    );
    let expected = [
        "            if (self.show_more.get()) {",
        "                let mut __v1 = ::trellis_runtime::VNode::new(\"TextBlock\");",
        "                __v1.set(\"Text\", ::trellis_runtime::PropValue::from(\"More\"));",
        "                __v0.push(__v1);",
        "            }",
    ]
    .join("\n");
    assert!(rs.contains(&expected), "{rs}");
    assert!(!rs.contains("_if"));
}

#[test]
fn repeat_child_is_wrapped_in_for() {
    let rs = compile(
        r#"<StackPanel><TextBlock _foreach="label of self.labels.iter()" _Text="label"/></StackPanel>"#,
    );
    assert!(rs.contains("            for label in (self.labels.iter()) {\n"), "{rs}");
    assert!(rs.contains("__v1.set(\"Text\", ::trellis_runtime::PropValue::from(label));"));
    assert!(rs.contains("                __v0.push(__v1);\n            }\n"));
}

#[test]
fn repeat_collection_may_hold_a_struct_literal() {
    let rs = compile(
        r#"<StackPanel><TextBlock _foreach="n in Range { start: 0, end: 3 }" _Text="n"/></StackPanel>"#,
    );
    let head = rs
        .lines()
        .map(str::trim)
        .find(|l| l.starts_with("for "))
        .expect("loop emitted");
    assert_eq!(head, "for n in (Range { start: 0, end: 3 }) {");
    let for_loop = format!("{head} }}");
    syn::parse_str::<syn::ExprForLoop>(&for_loop).expect("loop head parses");
}

#[test]
fn leading_byte_order_mark_compiles() {
    let out = compile_markup("\u{FEFF}<Grid><Button/></Grid>", "MainWindow", &CompileOptions::default())
        .unwrap();
    assert!(out.source.contains("::trellis_runtime::VNode::new(\"Button\")"));
}

#[test]
fn nested_children_recurse_before_closing_the_parent() {
    let rs = compile(
        "<Grid><StackPanel><Button/><TextBlock/></StackPanel><Image/></Grid>",
    );
    let order: Vec<&str> = rs
        .lines()
        .map(str::trim)
        .filter(|l| l.contains(".push("))
        .collect();
    assert_eq!(
        order,
        vec!["__v1.push(__v2);", "__v1.push(__v3);", "__v0.push(__v1);", "__v0.push(__v4);"]
    );
}

#[test]
fn binding_counter_restarts_per_template() {
    let options = CompileOptions::default();
    let a = compile_markup("<Grid><Button/></Grid>", "A", &options).unwrap();
    let b = compile_markup("<Grid><Button/></Grid>", "A", &options).unwrap();
    assert_eq!(a, b);
    assert!(a.source.contains("let mut __v1 ="));
    assert!(!a.source.contains("__v2"));
}

#[test]
fn using_instructions_become_use_declarations() {
    let rs = compile("<?using std::fmt::Write;?>\n<?Using crate::model::*?>\n<Grid/>");
    assert!(rs.contains("    use super::*;\n    use std::fmt::Write;\n    use crate::model::*;\n"));
}

#[test]
fn expression_text_is_not_validated() {
    let rs = compile(r#"<TextBlock _Text="this is (not rust"/>"#);
    assert!(rs.contains("::trellis_runtime::PropValue::from(this is (not rust)"));
}

#[test]
fn directive_on_root_is_reported_and_ignored() {
    let out = compile_markup(
        r#"<Grid _if="false"/>"#,
        "MainWindow",
        &CompileOptions::default(),
    )
    .unwrap();
    assert_eq!(out.diagnostics.len(), 1);
    assert!(!out.source.contains("if (false)"));
}

#[test]
fn malformed_repeat_surfaces_as_diagnostic() {
    let out = compile_markup(
        r#"<StackPanel><TextBlock _foreach="oops"/></StackPanel>"#,
        "MainWindow",
        &CompileOptions::default(),
    )
    .unwrap();
    assert_eq!(out.diagnostics.len(), 1);
    assert!(!out.source.lines().any(|l| l.trim_start().starts_with("for ")));
    assert!(out.source.contains("                __v0.push(__v1);\n"));
}

#[test]
fn host_path_is_validated_and_names_the_module() {
    let out = compile_markup("<Grid/>", "crate::views::MainWindow", &CompileOptions::default())
        .unwrap();
    assert_eq!(out.module_name, "__trellis_main_window");
    assert!(out.source.contains("impl ::trellis_runtime::Rebuild for crate::views::MainWindow {"));

    assert!(matches!(
        compile_markup("<Grid/>", "not a type", &CompileOptions::default()),
        Err(CompileError::InvalidHost { .. })
    ));
}

#[test]
fn undecodable_file_is_malformed_markup() {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../target/trellis-markup-tests")
        .join(format!("{}-utf8", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("bad.xml");
    std::fs::write(&path, b"<Grid>\n  <TextBlock Text=\"\xff\xfe\"/>\n</Grid>").unwrap();

    let err = compile_file(&path, "MainWindow", &CompileOptions::default()).unwrap_err();
    match err {
        CompileError::MalformedMarkup { line, column, .. } => assert_eq!((line, column), (2, 20)),
        ref other => panic!("expected malformed markup, got {other:?}"),
    }
    assert!(err.is_skippable());
}

#[test]
fn missing_file_is_template_not_found() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/does-not-exist.xml");
    let err = compile_file(&path, "MainWindow", &CompileOptions::default()).unwrap_err();
    assert!(matches!(err, CompileError::TemplateNotFound { .. }));
    assert!(err.is_skippable());
}
