use pretty_assertions::assert_eq;
use trellis_markup::{
    ClassifiedAttr, CompileError, CompileOptions, Directive, MarkupNode, classify, parse_markup,
};

fn root(src: &str) -> MarkupNode {
    parse_markup(src).unwrap().root
}

#[test]
fn classifies_each_attribute_kind() {
    let node = root(
        r#"<Button Content="Go" _IsEnabled="self.ready()" _Click="this.go()" _unknown="1"/>"#,
    );
    let c = classify(&node, &CompileOptions::default()).unwrap();
    assert_eq!(c.directive, None);
    assert_eq!(
        c.attributes,
        vec![
            ClassifiedAttr::Literal {
                name: "Content".into(),
                value: "Go".into()
            },
            ClassifiedAttr::Dynamic {
                name: "IsEnabled".into(),
                expr: "self.ready()".into()
            },
            ClassifiedAttr::Event {
                event: "click".into(),
                statement: "this.go()".into()
            },
            ClassifiedAttr::Dynamic {
                name: "unknown".into(),
                expr: "1".into()
            },
        ]
    );
}

#[test]
fn conditional_directive_is_case_insensitive_and_trimmed() {
    let node = root(r#"<TextBlock _IF="  self.show_more.get() " Text="More"/>"#);
    let c = classify(&node, &CompileOptions::default()).unwrap();
    assert_eq!(
        c.directive,
        Some(Directive::ConditionalInclude {
            condition: "self.show_more.get()".into()
        })
    );
    assert_eq!(c.attributes.len(), 1);
}

#[test]
fn repeat_directive_binds_item_and_collection() {
    let node = root(r#"<TextBlock _foreach="label in self.labels.iter()" _Text="label"/>"#);
    let c = classify(&node, &CompileOptions::default()).unwrap();
    assert_eq!(
        c.directive,
        Some(Directive::RepeatOver {
            collection_expr: "self.labels.iter()".into(),
            item_var: "label".into()
        })
    );
}

#[test]
fn malformed_repeat_is_dropped_with_a_diagnostic() {
    let node = root(r#"<TextBlock _foreach="self.labels" Text="x"/>"#);
    let c = classify(&node, &CompileOptions::default()).unwrap();
    assert_eq!(c.directive, None);
    assert_eq!(c.attributes.len(), 1);
    assert_eq!(c.diagnostics.len(), 1);
    assert!(c.diagnostics[0].message.contains("directive ignored"));
}

#[test]
fn strict_mode_rejects_malformed_repeat() {
    let node = root(r#"<TextBlock _foreach="self.labels"/>"#);
    let options = CompileOptions {
        strict_directives: true,
        ..CompileOptions::default()
    };
    assert!(matches!(
        classify(&node, &options),
        Err(CompileError::MalformedDirective { .. })
    ));
}

#[test]
fn both_directives_on_one_node_are_rejected() {
    let node = root(r#"<TextBlock _if="true" _foreach="x of items"/>"#);
    let err = classify(&node, &CompileOptions::default()).unwrap_err();
    assert!(matches!(err, CompileError::ConflictingDirectives { line: 1, .. }));
    assert!(!err.is_skippable());
}

#[test]
fn configured_events_replace_the_defaults() {
    let node = root(r#"<Slider _click="this.go()" _value_changed="this.moved()"/>"#);
    let options = CompileOptions {
        events: vec!["value_changed".into()],
        ..CompileOptions::default()
    };
    let c = classify(&node, &options).unwrap();
    assert!(matches!(&c.attributes[0], ClassifiedAttr::Dynamic { name, .. } if name == "click"));
    assert!(
        matches!(&c.attributes[1], ClassifiedAttr::Event { event, .. } if event == "value_changed")
    );
}
