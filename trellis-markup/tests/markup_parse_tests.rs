use pretty_assertions::assert_eq;
use trellis_markup::{CompileError, parse_markup};

#[test]
fn parses_processing_instructions_and_root() {
    let src = r#"<?xml version="1.0" encoding="utf-8"?>
<?using std::fmt::Write ?>
<?using crate::model::Fruit?>
<!-- main view -->
<StackPanel Orientation="Vertical">
    <TextBlock Text="Hello"/>
    <Button _click="this.roll()">Roll</Button>
</StackPanel>
"#;
    let doc = parse_markup(src).unwrap();
    let imports: Vec<&str> = doc.imports().collect();
    assert_eq!(imports, vec!["std::fmt::Write", "crate::model::Fruit"]);

    let root = &doc.root;
    assert_eq!(root.name, "StackPanel");
    assert_eq!(root.line, 5);
    assert_eq!(root.attribute("Orientation"), Some("Vertical"));
    let names: Vec<&str> = root.elements().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["TextBlock", "Button"]);

    let button = root.elements().nth(1).unwrap();
    assert_eq!(button.children.len(), 1);
    assert_eq!(button.children[0].name, "#text");
    assert!(!button.children[0].is_element());
}

#[test]
fn keeps_attribute_order_and_quote_styles() {
    let doc = parse_markup(r#"<TextBlock b='one "two"' a="x &amp; y" c=''/>"#).unwrap();
    let attrs: Vec<(&str, &str)> = doc
        .root
        .attributes
        .iter()
        .map(|a| (a.name.as_str(), a.value.as_str()))
        .collect();
    assert_eq!(
        attrs,
        vec![("b", "one \"two\""), ("a", "x & y"), ("c", "")]
    );
}

#[test]
fn comments_and_nested_pis_are_not_elements() {
    let doc = parse_markup("<Grid><!-- c --><?note hi?><Button/></Grid>").unwrap();
    assert_eq!(doc.root.children.len(), 3);
    assert_eq!(doc.root.children[0].name, "#comment");
    assert!(doc.root.children[1].is_processing_instruction);
    assert_eq!(doc.root.elements().count(), 1);
    assert!(doc.processing_instructions.is_empty());
}

#[test]
fn empty_document_has_no_root() {
    assert!(matches!(parse_markup(""), Err(CompileError::NoRootElement)));
    assert!(matches!(
        parse_markup("<?using std::rc::Rc?>\n<!-- nothing -->\n"),
        Err(CompileError::NoRootElement)
    ));
}

#[test]
fn mismatched_close_tag_is_malformed() {
    let err = parse_markup("<Grid>\n  <Button></Grid></Button>").unwrap_err();
    match err {
        CompileError::MalformedMarkup { line, message, .. } => {
            assert_eq!(line, 2);
            assert!(message.contains("</Grid>"), "{message}");
        }
        other => panic!("expected malformed markup, got {other:?}"),
    }
}

#[test]
fn unclosed_and_multiple_roots_are_malformed() {
    assert!(matches!(
        parse_markup("<Grid><Button/>"),
        Err(CompileError::MalformedMarkup { .. })
    ));
    assert!(matches!(
        parse_markup("<Grid/><Grid/>"),
        Err(CompileError::MalformedMarkup { .. })
    ));
    assert!(matches!(
        parse_markup("<Grid a=\"1\" a=\"2\"/>"),
        Err(CompileError::MalformedMarkup { .. })
    ));
}

#[test]
fn malformed_errors_are_skippable() {
    let err = parse_markup("<Grid>").unwrap_err();
    assert!(err.is_skippable());
}
