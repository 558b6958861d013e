use serde_json::{json, Value};
use serde_json_path_plus::{Error, JsonPath, QueryOptions};
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

#[test]
fn parent_of_first_book_is_the_book_array() {
    let value = bookstore();
    let nodes = JsonPath::parse("$..book[0]^").unwrap().query(&value).unwrap();
    assert_eq!(nodes.exactly_one().unwrap(), &value["store"]["book"]);
}

#[test]
fn double_parent_steps_up_twice() {
    let value = bookstore();
    let nodes = JsonPath::parse("$.store.book[0].author^^")
        .unwrap()
        .query(&value)
        .unwrap();
    assert_eq!(nodes.exactly_one().unwrap(), &value["store"]["book"]);
}

#[test]
fn parent_at_the_root_is_empty() {
    let value = bookstore();
    let nodes = JsonPath::parse("$^").unwrap().query(&value).unwrap();
    assert!(nodes.is_empty());
}

#[test]
fn parents_are_not_deduplicated() {
    let value = bookstore();
    let nodes = JsonPath::parse("$.store.book[*]^")
        .unwrap()
        .query(&value)
        .unwrap();
    assert_eq!(nodes.len(), 4);
    assert!(nodes.iter().all(|n| n == &value["store"]["book"]));
}

#[test]
fn property_name_of_a_keyed_node() {
    let value = bookstore();
    let nodes = JsonPath::parse("$.store~").unwrap().query(&value).unwrap();
    assert_eq!(nodes.all(), vec!["store"]);
}

#[test]
fn property_name_of_an_array_element_is_a_string() {
    let value = bookstore();
    let nodes = JsonPath::parse("$.store.book[1]~")
        .unwrap()
        .query(&value)
        .unwrap();
    assert_eq!(nodes.all(), vec!["1"]);
}

#[test]
fn property_names_of_the_root_object() {
    let value = json!({"a": 1, "b": 2});
    let nodes = JsonPath::parse("$~").unwrap().query(&value).unwrap();
    assert_eq!(nodes.all(), vec!["a", "b"]);
}

#[test]
fn property_names_of_all_store_members() {
    let value = bookstore();
    let nodes = JsonPath::parse("$.store.*~").unwrap().query(&value).unwrap();
    assert_eq!(nodes.all(), vec!["book", "bicycle"]);
}

#[test]
fn property_name_of_a_scalar_root_is_empty() {
    let value = json!(42);
    let nodes = JsonPath::parse("$~").unwrap().query(&value).unwrap();
    assert!(nodes.is_empty());
}

fn typed() -> Value {
    json!({
        "int": 3,
        "float": 3.5,
        "str": "x",
        "flag": true,
        "none": null,
        "arr": [],
        "obj": {}
    })
}

#[test]
fn type_selectors() {
    let value = typed();
    let of = |path: &str| {
        JsonPath::parse(path)
            .unwrap()
            .query(&value)
            .unwrap()
            .all()
    };
    assert_eq!(of("$.*@number()"), vec![json!(3), json!(3.5)]);
    assert_eq!(of("$.*@integer()"), vec![json!(3)]);
    assert_eq!(of("$.*@string()"), vec![json!("x")]);
    assert_eq!(of("$.*@boolean()"), vec![json!(true)]);
    assert_eq!(of("$.*@null()"), vec![json!(null)]);
    assert_eq!(of("$.*@array()"), vec![json!([])]);
    assert_eq!(of("$.*@object()"), vec![json!({})]);
    assert_eq!(
        of("$.*@scalar()"),
        vec![json!(3), json!(3.5), json!("x"), json!(true)]
    );
    assert_eq!(of("$.*@nonscalar()"), vec![json!([]), json!({})]);
}

#[test]
fn other_type_selector_uses_the_configured_predicate() {
    let value = typed();
    let path = JsonPath::parse("$.*@other()").unwrap();
    // no predicate configured: nothing matches
    let nodes = path.query_with(&value, &QueryOptions::default()).unwrap();
    assert!(nodes.is_empty());
    let opts = QueryOptions::default()
        .with_other_type(|v: &Value| v.as_i64().map(|n| n % 2 == 1).unwrap_or(false));
    let nodes = path.query_with(&value, &opts).unwrap();
    assert_eq!(nodes, vec![json!(3)]);
}

#[test]
fn unknown_type_selector_is_an_error_unless_ignored() {
    let value = typed();
    let path = JsonPath::parse("$.*@goofy()").unwrap();
    let err = path.query(&value).unwrap_err();
    assert!(matches!(err, Error::Eval(_)));
    let nodes = path
        .query_with(&value, &QueryOptions::default().ignoring_eval_errors())
        .unwrap();
    assert!(nodes.is_empty());
}

#[test]
fn alternation_concatenates_in_written_order() {
    let value = bookstore();
    let nodes = JsonPath::parse("$.store.bicycle.color | $.store.book[0].author")
        .unwrap()
        .query(&value)
        .unwrap();
    assert_eq!(nodes.all(), vec!["red", "A"]);
}

#[test]
fn property_group_desugars_to_a_union() {
    let value = bookstore();
    let grouped = JsonPath::parse("$.store.(book, bicycle)").unwrap();
    let bracketed = JsonPath::parse("$.store['book','bicycle']").unwrap();
    assert_eq!(grouped, bracketed);
    let nodes = grouped.query(&value).unwrap();
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes.first().unwrap(), &value["store"]["book"]);
}

fn array_length_script(_expr: &str, current: &Value, _root: &Value) -> Result<Value, String> {
    // stand-in for the classic `@.length-1` script
    current
        .as_array()
        .map(|l| json!(l.len().saturating_sub(1)))
        .ok_or_else(|| String::from("not an array"))
}

#[test]
fn script_selector_through_the_host_hook() {
    let value = bookstore();
    let opts = QueryOptions::default().with_script_evaluator(array_length_script);
    let authors = JsonPath::parse("$.store.book[(@.length-1)].author")
        .unwrap()
        .query_with(&value, &opts)
        .unwrap();
    assert_eq!(authors, vec![json!("D")]);
}

#[test]
fn script_without_an_evaluator_is_an_eval_error() {
    let value = bookstore();
    let path = JsonPath::parse("$.store.book[(@.length-1)]").unwrap();
    let err = path.query(&value).unwrap_err();
    assert!(matches!(err, Error::Eval(_)));
    // dropping the offending item leaves an empty result
    let nodes = path
        .query_with(&value, &QueryOptions::default().ignoring_eval_errors())
        .unwrap();
    assert!(nodes.is_empty());
}

#[test]
fn disabled_scripts_fail_before_evaluation() {
    let value = bookstore();
    let path = JsonPath::parse("$.store.book[(@.length-1)]").unwrap();
    let opts = QueryOptions::default()
        .without_script()
        .with_script_evaluator(array_length_script);
    let err = path.query_with(&value, &opts).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn script_errors_respect_the_ignore_flag() {
    let value = bookstore();
    // the script hook fails on the bicycle, which is not an array
    let path = JsonPath::parse("$.store.bicycle[(@.length-1)]").unwrap();
    let opts = QueryOptions::default().with_script_evaluator(array_length_script);
    let err = path.query_with(&value, &opts).unwrap_err();
    assert!(matches!(err, Error::Eval(_)));
    let opts = opts.ignoring_eval_errors();
    let nodes = path.query_with(&value, &opts).unwrap();
    assert!(nodes.is_empty());
}

#[test]
fn parent_chain_is_exposed_on_located_nodes() {
    let value = bookstore();
    let located = JsonPath::parse("$.store.book[0].author")
        .unwrap()
        .query_located(&value)
        .unwrap();
    let node = located.exactly_one().unwrap();
    let ancestors = node.ancestors();
    assert_eq!(ancestors.len(), 4);
    assert_eq!(ancestors[0], &value);
    assert_eq!(ancestors[1], &value["store"]);
    assert_eq!(ancestors[2], &value["store"]["book"]);
    assert_eq!(ancestors[3], &value["store"]["book"][0]);
    assert_eq!(node.parent(), Some(&value["store"]["book"][0]));
    assert!(node.parent_property().is_some_and(|p| *p == "author"));
}
