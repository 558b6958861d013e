use serde_json::{json, Value};
use serde_json_path_plus::{Error, FilterMode, JsonPath, QueryOptions};
#[cfg(feature = "trace")]
use test_log::test;

fn bookstore() -> Value {
    json!({
        "store": {
            "book": [
                {"category": "ref", "author": "A", "price": 8.95},
                {"category": "fic", "author": "B", "price": 12.99},
                {"category": "fic", "author": "C", "price": 8.99},
                {"category": "fic", "author": "D", "price": 22.99}
            ],
            "bicycle": {"color": "red", "price": 19.95}
        }
    })
}

fn in_mode(path: &str, value: &Value, mode: FilterMode) -> Vec<Value> {
    JsonPath::parse(path)
        .unwrap()
        .query_with(value, &QueryOptions::default().with_filter_mode(mode))
        .unwrap()
}

#[test]
fn missing_equals_zero_only_in_legacy_mode() {
    let value = bookstore();
    let path = "$.store.book[?(@.flavor == 0)]";
    assert!(in_mode(path, &value, FilterMode::Rfc).is_empty());
    assert_eq!(in_mode(path, &value, FilterMode::JsonPath).len(), 4);
    // only an actual zero compares equal to the missing value
    let path = "$.store.book[?(@.flavor == 1)]";
    assert!(in_mode(path, &value, FilterMode::JsonPath).is_empty());
}

#[test]
fn missing_equals_missing_in_every_mode() {
    let value = bookstore();
    let path = "$.store.book[?(@.flavor == @.aroma)]";
    assert_eq!(in_mode(path, &value, FilterMode::Rfc).len(), 4);
    assert_eq!(in_mode(path, &value, FilterMode::JsonPath).len(), 4);
    let path = "$.store.book[?(@.flavor != @.aroma)]";
    assert!(in_mode(path, &value, FilterMode::Rfc).is_empty());
}

#[test]
fn xpath_mode_tests_the_context_itself() {
    let value = bookstore();
    // the book array has four elements; in XPath mode the filter applies
    // to the array itself rather than expanding over it
    let path = "$.store.book[?(count(@[*]) == 4)]";
    let nodes = in_mode(path, &value, FilterMode::XPath);
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0], value["store"]["book"]);
    assert!(in_mode(path, &value, FilterMode::Rfc).is_empty());
}

#[test]
fn xpath_mode_on_a_scalar_context() {
    let value = bookstore();
    let path = "$.store.book[0].price[?(@ == 8.95)]";
    let nodes = in_mode(path, &value, FilterMode::XPath);
    assert_eq!(nodes, vec![json!(8.95)]);
    // expansion of a scalar selects nothing
    assert!(in_mode(path, &value, FilterMode::Rfc).is_empty());
}

#[test]
fn filters_expand_objects_over_member_values() {
    let value = json!({"things": {"one": {"ok": true}, "two": {"ok": false}, "three": {}}});
    let nodes = JsonPath::parse("$.things[?(@.ok == true)]")
        .unwrap()
        .query(&value)
        .unwrap();
    assert_eq!(nodes.all(), vec![json!({"ok": true})]);
}

#[test]
fn root_scoped_sub_queries() {
    let value = bookstore();
    let nodes = JsonPath::parse("$.store.book[?(@.price < $.store.bicycle.price)]")
        .unwrap()
        .query(&value)
        .unwrap();
    // books cheaper than the bicycle
    assert_eq!(nodes.len(), 3);
}

#[test]
fn logical_operators_and_grouping() {
    let value = bookstore();
    let nodes = JsonPath::parse("$.store.book[?(@.price >= 8.99 && @.price <= 12.99)]")
        .unwrap()
        .query(&value)
        .unwrap();
    assert_eq!(nodes.len(), 2);
    let nodes = JsonPath::parse("$.store.book[?(@.category == 'ref' || @.price > 20)]")
        .unwrap()
        .query(&value)
        .unwrap();
    assert_eq!(nodes.len(), 2);
    let nodes = JsonPath::parse("$.store.book[?(!(@.price < 10))]")
        .unwrap()
        .query(&value)
        .unwrap();
    assert_eq!(nodes.len(), 2);
}

#[test]
fn string_comparisons_use_lexical_order() {
    let value = bookstore();
    let nodes = JsonPath::parse("$.store.book[?(@.author < 'C')]")
        .unwrap()
        .query(&value)
        .unwrap();
    assert_eq!(nodes.len(), 2);
}

#[test]
fn deep_equality_in_comparisons() {
    let value = json!({
        "expected": [1, {"x": 2}],
        "items": [
            {"tags": [1, {"x": 2}]},
            {"tags": [1, {"x": 3}]},
            {"tags": []}
        ]
    });
    let nodes = JsonPath::parse("$.items[?(@.tags == $.expected)]")
        .unwrap()
        .query(&value)
        .unwrap();
    assert_eq!(nodes.all(), vec![json!({"tags": [1, {"x": 2}]})]);
}

fn lengths() -> Value {
    json!([
        {"v": "héllo"},
        {"v": [1, 2, 3]},
        {"v": {"x": 1, "y": 2}},
        {"v": 42},
        {"v": null}
    ])
}

#[test]
fn length_counts_characters_elements_and_keys() {
    let value = lengths();
    let of = |path: &str| JsonPath::parse(path).unwrap().query(&value).unwrap().all();
    assert_eq!(of("$[?(length(@.v) == 5)]"), vec![json!({"v": "héllo"})]);
    assert_eq!(of("$[?(length(@.v) == 3)]"), vec![json!({"v": [1, 2, 3]})]);
    assert_eq!(
        of("$[?(length(@.v) == 2)]"),
        vec![json!({"v": {"x": 1, "y": 2}})]
    );
    // anything without a length, including a missing value, measures zero
    assert_eq!(
        of("$[?(length(@.v) == 0)]"),
        vec![json!({"v": 42}), json!({"v": null})]
    );
}

#[test]
fn count_measures_nodelists() {
    let value = bookstore();
    let nodes = JsonPath::parse("$.store[?(count(@[*]) == 4)]")
        .unwrap()
        .query(&value)
        .unwrap();
    assert_eq!(nodes.exactly_one().unwrap(), &value["store"]["book"]);
}

#[test]
fn value_extracts_single_nodes() {
    let value = json!([
        {"v": [9]},
        {"v": [9, 10]},
        {"v": []}
    ]);
    let nodes = JsonPath::parse("$[?(value(@.v[*]) == 9)]")
        .unwrap()
        .query(&value)
        .unwrap();
    assert_eq!(nodes.all(), vec![json!({"v": [9]})]);
}

#[test]
fn search_matches_substrings_where_match_does_not() {
    let value = bookstore();
    let matched = JsonPath::parse("$.store.book[?(match(@.category, 'fi'))]")
        .unwrap()
        .query(&value)
        .unwrap();
    assert!(matched.is_empty());
    let searched = JsonPath::parse("$.store.book[?(search(@.category, 'fi'))]")
        .unwrap()
        .query(&value)
        .unwrap();
    assert_eq!(searched.len(), 3);
}

#[test]
fn regex_dot_does_not_cross_lines() {
    let value = json!([{"v": "axb"}, {"v": "a\nb"}]);
    let nodes = JsonPath::parse("$[?(match(@.v, 'a.b'))]")
        .unwrap()
        .query(&value)
        .unwrap();
    assert_eq!(nodes.all(), vec![json!({"v": "axb"})]);
}

#[test]
fn invalid_patterns_never_match_and_never_raise() {
    let value = bookstore();
    let nodes = JsonPath::parse("$.store.book[?(match(@.category, '[unclosed'))]")
        .unwrap()
        .query(&value)
        .unwrap();
    assert!(nodes.is_empty());
}

#[test]
fn non_string_regex_operands_never_match() {
    let value = bookstore();
    let nodes = JsonPath::parse("$.store.book[?(search(@.price, 'fic'))]")
        .unwrap()
        .query(&value)
        .unwrap();
    assert!(nodes.is_empty());
}

#[test]
fn filter_expressions_are_compiled_on_first_use() {
    let value = bookstore();
    // parses fine: the filter body is carved out, not compiled
    let path = JsonPath::parse("$.store.book[?(@.price <)]").unwrap();
    // the parse error surfaces when the filter is first evaluated
    let err = path.query(&value).unwrap_err();
    assert!(matches!(err, Error::Parse(_)));
}

#[test]
fn logical_functions_are_not_comparable() {
    let value = bookstore();
    let path = JsonPath::parse("$.store.book[?(match(@.author, 'A') == true)]").unwrap();
    assert!(matches!(path.query(&value), Err(Error::Parse(_))));
}

#[test]
fn value_functions_need_a_comparison() {
    let value = bookstore();
    let path = JsonPath::parse("$.store.book[?(count(@[*]))]").unwrap();
    assert!(matches!(path.query(&value), Err(Error::Parse(_))));
}

#[test]
fn bare_literals_are_not_boolean_tests() {
    let value = bookstore();
    let path = JsonPath::parse("$.store.book[?(true)]").unwrap();
    assert!(matches!(path.query(&value), Err(Error::Parse(_))));
}

#[test]
fn non_singular_queries_are_not_comparable() {
    let value = bookstore();
    let path = JsonPath::parse("$.store.book[?(@[*] == 2)]").unwrap();
    assert!(matches!(path.query(&value), Err(Error::Parse(_))));
}

#[test]
fn eval_errors_inside_filters_respect_the_ignore_flag() {
    let value = json!({"a": [{"b": 1}]});
    // the sub-query carries a script selector; with no evaluator installed
    // it fails per candidate
    let path = JsonPath::parse("$.a[?(@[(0)].b)]").unwrap();
    let err = path.query(&value).unwrap_err();
    assert!(matches!(err, Error::Eval(_)));
    let nodes = path
        .query_with(&value, &QueryOptions::default().ignoring_eval_errors())
        .unwrap();
    assert!(nodes.is_empty());
}

#[test]
fn filters_on_scalars_select_nothing() {
    let value = json!({"n": 42});
    let nodes = JsonPath::parse("$.n[?(@ == 42)]")
        .unwrap()
        .query(&value)
        .unwrap();
    assert!(nodes.is_empty());
}
