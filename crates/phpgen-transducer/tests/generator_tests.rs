//! End-to-end generation through the public API: IR text in, PHP text out.

use phpgen_ir::{Frontend, JsonReader, SexpReader, read_one};
use phpgen_transducer::{TransduceError, transduce, transduce_program};

fn php(ir: &str) -> String {
    let sexp = read_one(ir).expect("IR should read");
    let node = transduce(&sexp).expect("IR should transduce");
    node.render().expect("node should render")
}

fn program(frontend: &dyn Frontend, source: &str) -> String {
    let nodes = frontend.read(source).expect("IR should read");
    transduce_program(&nodes)
        .expect("IR should transduce")
        .render()
        .expect("program should render")
}

#[test]
fn test_literals() {
    assert_eq!(php("(nil)"), "NULL");
    assert_eq!(php("(false)"), "FALSE");
    assert_eq!(php("(true)"), "TRUE");
    assert_eq!(php("(lit 42)"), "42");
    assert_eq!(php("(lit 3.1415)"), "3.1415");
    assert_eq!(php("(str \"\")"), "\"\"");
    assert_eq!(php("(str \"Hello, world!\")"), "\"Hello, world!\"");
}

#[test]
fn test_identifiers_and_variables() {
    assert_eq!(php("(lit :foo)"), "foo");
    assert_eq!(php("(gvar :$foo)"), "$GLOBALS['foo']");
    assert_eq!(php("(vcall :foo)"), "$foo");
}

#[test]
fn test_collections() {
    assert_eq!(php("(lit 1..10)"), "range(1, 10)");
    assert_eq!(php("(lit 1...10)"), "range(1, 9)");
    assert_eq!(php("(array (lit 1) (lit 2) (lit 3))"), "array(1, 2, 3)");
    assert_eq!(php("(array)"), "array()");
    assert_eq!(
        php("(hash (str \"a\") (lit 1) (str \"b\") (lit 2))"),
        "array(\"a\" => 1, \"b\" => 2)"
    );
}

#[test]
fn test_anonymous_functions() {
    assert_eq!(php("(iter (fcall :lambda) nil)"), "function() {}");
    assert_eq!(php("(iter (fcall :lambda) (dasgn_curr :x))"), "function($x) {}");
    assert_eq!(
        php("(iter (fcall :lambda) (masgn (array (dasgn_curr :x) (dasgn_curr :y))))"),
        "function($x, $y) {}"
    );
}

#[test]
fn test_named_functions() {
    assert_eq!(php("(defn :foo (scope (block (args) (nil))))"), "function foo() {}");
    assert_eq!(php("(defn :foo (scope (block (args :x) (nil))))"), "function foo($x) {}");
    assert_eq!(
        php("(defn :foo (scope (block (args :x :y) (nil))))"),
        "function foo($x, $y) {}"
    );
}

#[test]
fn test_return_unless() {
    assert_eq!(php("(if (true) nil (return))"), "if (!TRUE) { return; }");
}

#[test]
fn test_foreach_over_hash() {
    assert_eq!(
        php(
            "(for (hash (str \"a\") (lit 1) (str \"b\") (lit 2)) \
             (masgn (array (lasgn :k) (lasgn :v))) \
             (fcall :echo (arglist (lvar :k))))"
        ),
        "foreach (array(\"a\" => 1, \"b\" => 2) as $k => $v) { echo($k); }"
    );
}

#[test]
fn test_pattern_match_is_canonical() {
    let left = php("(match2 (lit /^a/) (lvar :s))");
    let right = php("(match3 (lvar :s) (lit /^a/))");
    assert_eq!(left, right);
    assert_eq!(left, "preg_match(\"/^a/\", $s)");
}

#[test]
fn test_generation_is_repeatable() {
    let source = "(defn :greet (args :name) (scope (block (fcall :printf (arglist (str \"Hi %s\") (lvar :name))))))";
    assert_eq!(php(source), php(source));
}

#[test]
fn test_both_notations_generate_the_same_program() {
    let sexp = "(lasgn :x (lit 1)) (fcall :printf (arglist (str \"%d\") (lvar :x)))";
    let json = r#"[
        ["lasgn", {"symbol": "x"}, ["lit", 1]],
        ["fcall", {"symbol": "printf"}, ["arglist", ["str", "%d"], ["lvar", {"symbol": "x"}]]]
    ]"#;
    let expected = "<?php\n$x = 1;\nprintf(\"%d\", $x);\n";
    assert_eq!(program(&SexpReader, sexp), expected);
    assert_eq!(program(&JsonReader, json), expected);
}

#[test]
fn test_class_program() {
    let source = "(class :Greeter nil (scope (block \
        (defn :initialize (args :name) (scope (block (iasgn :@name (lvar :name))))) \
        (defn :greet (args) (scope (block (return (dstr \"Hello, \" (evstr (ivar :@name)))))))\
    )))";
    assert_eq!(
        program(&SexpReader, source),
        "<?php\nclass Greeter { function initialize($name) { $this->name = $name; } \
         function greet() { return \"Hello, \" . $this->name; } };\n"
    );
}

#[test]
fn test_failures_produce_no_output() {
    let nodes = SexpReader
        .read("(lit 1) (yield (lit 2))")
        .expect("IR should read");
    let err = transduce_program(&nodes).expect_err("yield is unsupported");
    assert!(matches!(
        err,
        TransduceError::UnsupportedConstruct { ref tag, .. } if tag == "yield"
    ));
}
