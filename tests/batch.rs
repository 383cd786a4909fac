use condlet_rs::batch::{load_request, transform_sources};
use condlet_rs::{CondletError, ConditionalSource};

#[test]
fn test_batch_preserves_order_and_isolates_failures() {
    let sources = vec![
        ConditionalSource::new_if("let a = first()", "{ use(a); }"),
        ConditionalSource::new_if("let {b} = second()", "{ use(b); }"),
        ConditionalSource::new_while("let c = third()", "{ use(c); }"),
    ];

    let results = transform_sources(&sources);

    assert_eq!(results.len(), 3);
    assert!(results[0].as_ref().unwrap().contains("first()"));
    assert!(matches!(results[1], Err(CondletError::InvalidBinding { .. })));
    assert!(results[2].as_ref().unwrap().contains("third()"));
}

#[test]
fn test_batch_of_many_independent_sources() {
    let sources: Vec<_> = (0..64)
        .map(|i| ConditionalSource::new_while(format!("let v{} = read{}()", i, i), "{ sink(); }"))
        .collect();

    let results = transform_sources(&sources);

    for (i, result) in results.iter().enumerate() {
        let code = result.as_ref().unwrap();
        assert!(code.contains(&format!("read{}()", i)));
        assert!(code.contains(&format!("if (!v{}) break;", i)));
    }
}

#[test]
fn test_request_options_reach_the_transformer() {
    let sources = load_request(
        r#"{
            "kind": "while",
            "declaration": "let line = readLine()",
            "consequent": "{ process(line); }",
            "options": { "wrap_loop_in_block": false }
        }"#,
    )
    .unwrap();

    let results = transform_sources(&sources);
    let code = results[0].as_ref().unwrap();
    assert!(code.trim_start().starts_with("while (true)"));
}
