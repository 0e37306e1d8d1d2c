use phpgen_ir::{Field, Sexp, read_one, read_sexps};
use phpgen_syntax::{BinaryOp, Literal, Node, Operator, SyntaxError};

use crate::error::TransduceError;
use crate::limits::MAX_TRANSDUCE_DEPTH;
use crate::transducer::{transduce, transduce_program};

fn php(ir: &str) -> String {
    let sexp = read_one(ir).expect("IR should read");
    transduce(&sexp)
        .expect("IR should transduce")
        .render()
        .expect("node should render")
}

fn error(ir: &str) -> TransduceError {
    let sexp = read_one(ir).expect("IR should read");
    transduce(&sexp).expect_err("IR should be rejected")
}

fn unsupported(ir: &str) -> (String, String, String) {
    match error(ir) {
        TransduceError::UnsupportedConstruct {
            tag,
            reason,
            location,
            ..
        } => (tag, reason, location),
        other => panic!("expected UnsupportedConstruct, got {other:?}"),
    }
}

// =============================================================================
// Literals
// =============================================================================

#[test]
fn test_keyword_literals() {
    assert_eq!(php("(nil)"), "NULL");
    assert_eq!(php("(false)"), "FALSE");
    assert_eq!(php("(true)"), "TRUE");
    assert_eq!(php("(self)"), "$this");
}

#[test]
fn test_scalar_literals() {
    assert_eq!(php("(lit 42)"), "42");
    assert_eq!(php("(lit 3.1415)"), "3.1415");
    assert_eq!(php("(str \"\")"), "\"\"");
    assert_eq!(php("(str \"Hello, world!\")"), "\"Hello, world!\"");
    assert_eq!(php("(lit :foo)"), "foo");
}

#[test]
fn test_symbol_literal_must_be_a_name() {
    assert_eq!(
        error("(lit :empty?)"),
        TransduceError::Syntax(SyntaxError::InvalidName {
            name: "empty?".to_string()
        })
    );
}

#[test]
fn test_range_literals() {
    assert_eq!(php("(lit 1..10)"), "range(1, 10)");
    assert_eq!(php("(lit 1...10)"), "range(1, 9)");
    assert_eq!(php("(dot2 (lit 1) (lit 10))"), "range(1, 10)");
    assert_eq!(php("(dot3 (lit 1) (lit 10))"), "range(1, 9)");
}

#[test]
fn test_ranges_with_computed_bounds() {
    assert_eq!(php("(dot2 (lvar :a) (lvar :b))"), "range($a, $b)");
    assert_eq!(php("(dot3 (lit 0) (lvar :n))"), "range(0, $n - 1)");
}

#[test]
fn test_array_literals() {
    assert_eq!(php("(array (lit 1) (lit 2) (lit 3))"), "array(1, 2, 3)");
    assert_eq!(php("(array)"), "array()");
    assert_eq!(php("(zarray)"), "array()");
}

#[test]
fn test_hash_literal_preserves_input_order() {
    assert_eq!(
        php("(hash (str \"a\") (lit 1) (str \"b\") (lit 2))"),
        "array(\"a\" => 1, \"b\" => 2)"
    );
    assert_eq!(
        php("(hash (str \"b\") (lit 2) (str \"a\") (lit 1))"),
        "array(\"b\" => 2, \"a\" => 1)"
    );
}

#[test]
fn test_shell_command() {
    assert_eq!(php("(xstr \"ls -l\")"), "`ls -l`");
}

// =============================================================================
// Interpolation
// =============================================================================

#[test]
fn test_interpolation_is_a_right_fold() {
    let sexp = read_one("(dstr \"Hello, \" (evstr (lvar :name)) (str \"!\"))").unwrap();
    let node = transduce(&sexp).unwrap();
    let Node::Operator(Operator::Binary {
        op: BinaryOp::Concat,
        lhs,
        rhs,
    }) = &node
    else {
        panic!("expected concatenation, got {node:?}");
    };
    assert_eq!(**lhs, Node::string("Hello, "));
    assert!(matches!(
        rhs.as_ref(),
        Node::Operator(Operator::Binary {
            op: BinaryOp::Concat,
            ..
        })
    ));
    assert_eq!(node.render().unwrap(), "\"Hello, \" . $name . \"!\"");
}

#[test]
fn test_interpolation_omits_empty_prefix() {
    assert_eq!(php("(dstr \"\" (evstr (lvar :x)) (str \" apples\"))"), "$x . \" apples\"");
    assert_eq!(php("(dstr \"\" (evstr (lvar :x)))"), "$x");
}

#[test]
fn test_interpolation_with_nothing_left_is_empty_string() {
    assert_eq!(php("(dstr \"\")"), "\"\"");
    assert_eq!(php("(evstr)"), "\"\"");
}

// =============================================================================
// Names
// =============================================================================

#[test]
fn test_variables() {
    assert_eq!(php("(gvar :$foo)"), "$GLOBALS['foo']");
    assert_eq!(php("(lvar :foo)"), "$foo");
    assert_eq!(php("(dvar :foo)"), "$foo");
    assert_eq!(php("(vcall :foo)"), "$foo");
    assert_eq!(php("(ivar :@name)"), "$this->name");
    assert_eq!(php("(const :PHP_EOL)"), "PHP_EOL");
}

// =============================================================================
// Calls
// =============================================================================

#[test]
fn test_bare_name_without_receiver_is_a_variable() {
    assert_eq!(php("(call nil :foo (arglist))"), "$foo");
    assert_eq!(php("(call nil :foo)"), "$foo");
    assert_eq!(php("(fcall :foo)"), "$foo");
}

#[test]
fn test_call_without_receiver_with_arguments() {
    assert_eq!(php("(call nil :foo (arglist (lit 1)))"), "foo(1)");
    assert_eq!(
        php("(fcall :printf (arglist (str \"%d\") (lit 42)))"),
        "printf(\"%d\", 42)"
    );
}

#[test]
fn test_binary_operator_calls() {
    assert_eq!(php("(call (lvar :a) :+ (arglist (lit 1)))"), "$a + 1");
    assert_eq!(php("(call (lvar :a) :** (arglist (lit 2)))"), "$a ** 2");
    assert_eq!(php("(call (lvar :a) :=== (arglist (lvar :b)))"), "$a === $b");
    assert_eq!(php("(call (lvar :a) :<=> (arglist (lvar :b)))"), "$a <=> $b");
    assert_eq!(php("(call (lvar :a) :<< (arglist (lit 3)))"), "$a << 3");
}

#[test]
fn test_unary_operator_calls() {
    assert_eq!(php("(call (lvar :a) :-@)"), "-$a");
    assert_eq!(php("(call (lvar :a) :+@ (arglist))"), "+$a");
    assert_eq!(php("(call (lvar :a) :!)"), "!$a");
    assert_eq!(php("(call (lvar :a) :~)"), "~$a");
}

#[test]
fn test_operator_with_wrong_argument_count() {
    let (tag, reason, _) = unsupported("(call (lvar :a) :+ (arglist))");
    assert_eq!(tag, "call");
    assert_eq!(reason, "`+` expects 1 argument, found 0");

    let (_, reason, _) = unsupported("(call (lvar :a) :-@ (arglist (lit 1)))");
    assert_eq!(reason, "`-@` expects 0 arguments, found 1");
}

#[test]
fn test_method_calls() {
    assert_eq!(
        php("(call (lvar :obj) :frob (arglist (lit 1) (lit 2)))"),
        "$obj->frob(1, 2)"
    );
    assert_eq!(php("(call (lvar :obj) :size)"), "$obj->size()");
}

#[test]
fn test_constructor_calls() {
    assert_eq!(php("(call (const :Foo) :new (arglist))"), "new Foo");
    assert_eq!(
        php("(call (const :Foo) :new (arglist (lit 1)))"),
        "new Foo(1)"
    );
}

#[test]
fn test_index_calls() {
    assert_eq!(php("(call (lvar :list) :[] (arglist (lit 0)))"), "$list[0]");
    assert_eq!(
        php("(call (lvar :map) :[] (arglist (str \"key\")))"),
        "$map[\"key\"]"
    );
    assert_eq!(php("(call (lvar :obj) :[] (arglist (lit :name)))"), "$obj->name");
}

#[test]
fn test_index_with_wrong_argument_count() {
    let (tag, reason, location) = unsupported("(call (lvar :m) :[] (arglist (lit 1) (lit 2)))");
    assert_eq!(tag, "call");
    assert_eq!(reason, "`[]` expects 1 argument, found 2");
    assert_eq!(location, "call");
}

#[test]
fn test_index_with_compound_key_fails_at_render() {
    let sexp = read_one("(call (lvar :m) :[] (arglist (array)))").unwrap();
    let node = transduce(&sexp).unwrap();
    assert!(matches!(
        node.render(),
        Err(SyntaxError::MalformedOperand { .. })
    ));
}

#[test]
fn test_assignment_calls() {
    assert_eq!(
        php("(call (lvar :h) :[]= (arglist (str \"k\") (lit 1)))"),
        "$h[\"k\"] = 1"
    );
    assert_eq!(
        php("(attrasgn (lvar :obj) :name= (arglist (lit 1)))"),
        "$obj->name = 1"
    );
    assert_eq!(
        php("(attrasgn (lvar :h) :[]= (arglist (lit 0) (lvar :v)))"),
        "$h[0] = $v"
    );
}

#[test]
fn test_unresolvable_method_name_is_unsupported() {
    let (tag, reason, _) = unsupported("(call (lvar :a) :empty? (arglist))");
    assert_eq!(tag, "call");
    assert_eq!(
        reason,
        "method name `empty?` is neither an identifier nor an operator"
    );
}

#[test]
fn test_unresolvable_name_without_receiver_is_invalid_name() {
    assert_eq!(
        error("(call nil :empty? (arglist))"),
        TransduceError::Syntax(SyntaxError::InvalidName {
            name: "empty?".to_string()
        })
    );
}

// =============================================================================
// Pattern matching
// =============================================================================

#[test]
fn test_match_forms_share_canonical_order() {
    let expected = "preg_match(\"/o/\", $s)";
    assert_eq!(php("(match2 (lit /o/) (lvar :s))"), expected);
    assert_eq!(php("(match3 (lvar :s) (lit /o/))"), expected);
    assert_eq!(php("(call (lvar :s) :=~ (arglist (lit /o/)))"), expected);
    assert_eq!(php("(call (lit /o/) :=~ (arglist (lvar :s)))"), expected);
}

#[test]
fn test_regex_literal_is_the_pattern_in_either_position() {
    let expected = "preg_match(\"/o/\", $s)";
    assert_eq!(php("(match3 (lit /o/) (lvar :s))"), expected);
    assert_eq!(php("(match2 (lvar :s) (lit /o/))"), expected);
    // Neither side a literal: tag order decides.
    assert_eq!(php("(match3 (lvar :s) (lvar :re))"), "preg_match($re, $s)");
    assert_eq!(php("(match2 (lvar :re) (lvar :s))"), "preg_match($re, $s)");
}

#[test]
fn test_negated_match() {
    assert_eq!(
        php("(call (lvar :s) :!~ (arglist (lit /\\d+/i)))"),
        "!preg_match(\"/\\\\d+/i\", $s)"
    );
}

// =============================================================================
// Assignments
// =============================================================================

#[test]
fn test_single_assignments() {
    assert_eq!(php("(lasgn :x (lit 42))"), "$x = 42");
    assert_eq!(php("(dasgn_curr :x (lit 1))"), "$x = 1");
    assert_eq!(php("(lasgn :x)"), "$x");
    assert_eq!(php("(gasgn :$count (lit 0))"), "$GLOBALS['count'] = 0");
    assert_eq!(php("(iasgn :@name (lvar :name))"), "$this->name = $name");
}

#[test]
fn test_constant_declaration() {
    assert_eq!(php("(cdecl :MAX (lit 10))"), "define(\"MAX\", 10)");
}

#[test]
fn test_multiple_assignment() {
    assert_eq!(
        php("(masgn (array (lasgn :a) (lasgn :b)) (array (lit 1) (lit 2)))"),
        "list($a, $b) = array(1, 2)"
    );
    assert_eq!(
        php("(masgn (array (lasgn :a) (lasgn :b)) (to_ary (lvar :pair)))"),
        "list($a, $b) = $pair"
    );
    assert_eq!(
        php("(masgn (array (lasgn :a) (lasgn :b)) (splat (lvar :xs)))"),
        "list($a, $b) = $xs"
    );
}

#[test]
fn test_multiple_assignment_flattens_nested_targets() {
    let sexp = read_one(
        "(masgn (array (lasgn :a) (masgn (array (lasgn :b) (lasgn :c)))) (to_ary (lvar :xs)))",
    )
    .unwrap();
    let node = transduce(&sexp).unwrap();
    let Node::Operator(Operator::Binary {
        op: BinaryOp::Assign,
        lhs,
        ..
    }) = &node
    else {
        panic!("expected assignment, got {node:?}");
    };
    let Node::FunctionCall(list) = lhs.as_ref() else {
        panic!("expected list(), got {lhs:?}");
    };
    assert_eq!(list.arguments.len(), 3);
    assert!(list.arguments.iter().all(|t| matches!(t, Node::Variable(_))));
    assert_eq!(node.render().unwrap(), "list($a, $b, $c) = $xs");
}

#[test]
fn test_multiple_assignment_requires_value() {
    let (tag, reason, _) = unsupported("(masgn (array (lasgn :a) (lasgn :b)))");
    assert_eq!(tag, "masgn");
    assert_eq!(reason, "multiple assignment without a value");
}

// =============================================================================
// Control flow
// =============================================================================

#[test]
fn test_if_forms() {
    assert_eq!(
        php("(if (lvar :c) (lit 1) (lit 2))"),
        "if ($c) { 1; } else { 2; }"
    );
    assert_eq!(php("(if (lvar :c) (lit 1) nil)"), "if ($c) { 1; }");
    assert_eq!(php("(if (lvar :c) nil nil)"), "if ($c) {}");
}

#[test]
fn test_else_only_if_negates_condition() {
    // `return unless true`
    assert_eq!(php("(if (true) nil (return))"), "if (!TRUE) { return; }");
}

#[test]
fn test_if_with_block_branch() {
    assert_eq!(
        php("(if (lvar :c) (block (lasgn :x (lit 1)) (return (lvar :x))) nil)"),
        "if ($c) { $x = 1; return $x; }"
    );
}

#[test]
fn test_while_and_until() {
    assert_eq!(
        php("(while (lvar :go) (call nil :work (arglist (lit 1))) true)"),
        "while ($go) { work(1); }"
    );
    assert_eq!(
        php("(until (lvar :done) (break) true)"),
        "while (!$done) { break; }"
    );
    assert_eq!(php("(while (true) nil true)"), "while (TRUE) {}");
}

#[test]
fn test_for_loops() {
    assert_eq!(
        php("(for (lvar :xs) (lasgn :x) (next))"),
        "foreach ($xs as $x) { continue; }"
    );
    assert_eq!(
        php(
            "(for (hash (str \"a\") (lit 1)) (masgn (array (lasgn :k) (lasgn :v))) (fcall :puts (arglist (lvar :v))))"
        ),
        "foreach (array(\"a\" => 1) as $k => $v) { puts($v); }"
    );
}

#[test]
fn test_for_loop_with_too_many_variables() {
    let (tag, reason, _) =
        unsupported("(for (lvar :xs) (masgn (array (lasgn :a) (lasgn :b) (lasgn :c))) nil)");
    assert_eq!(tag, "for");
    assert_eq!(reason, "foreach takes 1 or 2 loop variables, found 3");
}

#[test]
fn test_returns_and_jumps() {
    assert_eq!(php("(return)"), "return");
    assert_eq!(php("(return (lit 42))"), "return 42");
    assert_eq!(php("(break)"), "break");
    assert_eq!(php("(next)"), "continue");
}

#[test]
fn test_blocks_and_wrappers() {
    assert_eq!(
        php("(block (lasgn :x (lit 1)) (lvar :x))"),
        "{ $x = 1; $x; }"
    );
    assert_eq!(php("(block (block (lit 1)) (lit 2))"), "{ 1; 2; }");
    assert_eq!(php("(scope)"), "{}");
    assert_eq!(php("(begin (lit 1))"), "1");
}

#[test]
fn test_logical_operators() {
    assert_eq!(php("(and (lvar :a) (lvar :b))"), "$a && $b");
    assert_eq!(php("(or (lvar :a) (lvar :b))"), "$a || $b");
    assert_eq!(php("(not (lvar :a))"), "!$a");
}

// =============================================================================
// Iterator blocks
// =============================================================================

#[test]
fn test_lambdas() {
    assert_eq!(php("(iter (fcall :lambda) nil)"), "function() {}");
    assert_eq!(php("(iter (fcall :lambda) 0 (nil))"), "function() {}");
    assert_eq!(
        php("(iter (fcall :lambda) (dasgn_curr :x))"),
        "function($x) {}"
    );
    assert_eq!(
        php("(iter (fcall :lambda) (masgn (array (dasgn_curr :x) (dasgn_curr :y))))"),
        "function($x, $y) {}"
    );
    assert_eq!(
        php("(iter (call (const :Proc) :new (arglist)) (args :x) (return (lvar :x)))"),
        "function($x) { return $x; }"
    );
    assert_eq!(
        php("(iter (call nil :proc (arglist)) nil (lit 1))"),
        "function() { 1; }"
    );
}

#[test]
fn test_each_becomes_foreach() {
    assert_eq!(
        php("(iter (call (lvar :xs) :each) (dasgn_curr :x) (fcall :puts (arglist (dvar :x))))"),
        "foreach ($xs as $x) { puts($x); }"
    );
    assert_eq!(
        php("(iter (call (lvar :h) :each_pair (arglist)) (masgn (array (dasgn_curr :k) (dasgn_curr :v))) nil)"),
        "foreach ($h as $k => $v) {}"
    );
}

#[test]
fn test_loop_becomes_infinite_while() {
    assert_eq!(php("(iter (fcall :loop) nil (break))"), "while (TRUE) { break; }");
}

#[test]
fn test_unknown_iterator_is_unsupported() {
    let (tag, reason, location) = unsupported("(iter (call (lvar :xs) :map) (dasgn_curr :x) nil)");
    assert_eq!(tag, "iter");
    assert_eq!(reason, "block passed to `map` has no PHP equivalent");
    assert_eq!(location, "iter");
}

// =============================================================================
// Definitions
// =============================================================================

#[test]
fn test_named_functions() {
    assert_eq!(php("(defn :foo (scope (block (args) (nil))))"), "function foo() {}");
    assert_eq!(
        php("(defn :foo (scope (block (args :x :y) (nil))))"),
        "function foo($x, $y) {}"
    );
    assert_eq!(
        php("(defn :foo (args :x) (scope (block (return (lvar :x)))))"),
        "function foo($x) { return $x; }"
    );
    assert_eq!(php("(defn :foo (args) (scope (block (nil))))"), "function foo() {}");
    assert_eq!(php("(defn :foo (args) (scope))"), "function foo() {}");
}

#[test]
fn test_function_body_keeps_non_nil_statements() {
    assert_eq!(
        php("(defn :twice (scope (block (args :n) (return (call (lvar :n) :* (arglist (lit 2)))))))"),
        "function twice($n) { return $n * 2; }"
    );
    assert_eq!(
        php("(defn :f (args) (scope (block (nil) (nil))))"),
        "function f() { NULL; NULL; }"
    );
}

#[test]
fn test_splat_parameter_is_unsupported() {
    let (tag, reason, location) = unsupported("(defn :foo (args :*rest) (scope))");
    assert_eq!(tag, "args");
    assert_eq!(reason, "splat and block parameter `*rest` has no PHP equivalent");
    assert_eq!(location, "defn > args");

    let (_, _, location) = unsupported("(defn :foo (scope (block (args :&blk) (nil))))");
    assert_eq!(location, "defn > scope > block > args");
}

#[test]
fn test_classes() {
    assert_eq!(php("(class :Foo nil (scope))"), "class Foo {}");
    assert_eq!(
        php(
            "(class :Foo (const :Bar) (scope (block (defn :a (scope (block (args) (nil)))) (defn :b (args) (scope)))))"
        ),
        "class Foo extends Bar { function a() {} function b() {} }"
    );
}

#[test]
fn test_class_body_rejects_non_methods() {
    let (tag, reason, location) = unsupported("(class :Foo nil (scope (lasgn :x (lit 1))))");
    assert_eq!(tag, "lasgn");
    assert_eq!(reason, "class bodies may only contain method definitions");
    assert_eq!(location, "class > scope > lasgn");
}

#[test]
fn test_modules() {
    assert_eq!(php("(module :Comparable (scope))"), "interface Comparable {}");
    let (tag, _, location) = unsupported("(module :M (scope (defn :a (args) (scope))))");
    assert_eq!(tag, "defn");
    assert_eq!(location, "module > scope > defn");
}

// =============================================================================
// Errors and limits
// =============================================================================

#[test]
fn test_unknown_tag_reports_shape_and_location() {
    let err = error("(defn :foo (scope (block (args) (frobnicate (lit 1)))))");
    assert_eq!(
        err,
        TransduceError::UnsupportedConstruct {
            tag: "frobnicate".to_string(),
            shape: "(frobnicate node(lit))".to_string(),
            reason: "unknown tag".to_string(),
            location: "defn > scope > block > frobnicate".to_string(),
        }
    );
    assert_eq!(
        err.to_string(),
        "unsupported construct `frobnicate` (unknown tag): received (frobnicate node(lit)) at defn > scope > block > frobnicate"
    );
}

#[test]
fn test_wrong_arity_is_unsupported() {
    let (tag, reason, location) = unsupported("(if (lvar :c) (lvar))");
    assert_eq!(tag, "if");
    assert_eq!(reason, "expected 3 fields, found 2");
    assert_eq!(location, "if");
}

fn nested_nots(depth: usize) -> Sexp {
    let mut node = Sexp::leaf("true");
    for _ in 0..depth {
        node = Sexp::new("not", vec![Field::Node(node)]);
    }
    node
}

#[test]
fn test_nesting_limit() {
    // MAX_TRANSDUCE_DEPTH nodes: the outer nots plus the inner `true`.
    let at_limit = nested_nots(MAX_TRANSDUCE_DEPTH - 1);
    let rendered = transduce(&at_limit).unwrap().render().unwrap();
    assert_eq!(rendered.matches('!').count(), MAX_TRANSDUCE_DEPTH - 1);
    assert!(rendered.ends_with("!TRUE"));

    let too_deep = nested_nots(MAX_TRANSDUCE_DEPTH);
    match transduce(&too_deep) {
        Err(TransduceError::NestingTooDeep { limit, location }) => {
            assert_eq!(limit, MAX_TRANSDUCE_DEPTH);
            assert!(location.starts_with("not > not"));
            assert!(location.ends_with("> true"));
        }
        other => panic!("expected NestingTooDeep, got {other:?}"),
    }
}

// =============================================================================
// Programs
// =============================================================================

#[test]
fn test_program_splices_top_level_blocks() {
    let nodes = read_sexps("(block (lasgn :x (lit 1)) (lasgn :y (lit 2))) (fcall :f (arglist (lvar :x)))")
        .unwrap();
    let program = transduce_program(&nodes).unwrap();
    assert_eq!(program.statements.len(), 3);
    assert_eq!(
        program.render().unwrap(),
        "<?php\n$x = 1;\n$y = 2;\nf($x);\n"
    );
}

#[test]
fn test_empty_program() {
    let program = transduce_program(&[]).unwrap();
    assert!(program.is_empty());
    assert_eq!(program.render().unwrap(), "<?php\n");
}

#[test]
fn test_transduction_is_repeatable() {
    let sexp = read_one("(if (true) nil (return))").unwrap();
    let first = transduce(&sexp).unwrap();
    let second = transduce(&sexp).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.render().unwrap(), second.render().unwrap());
}

#[test]
fn test_regex_literal_node() {
    let sexp = read_one("(lit /a.b/m)").unwrap();
    assert_eq!(
        transduce(&sexp).unwrap(),
        Node::Literal(Literal::Regex {
            pattern: "a.b".to_string(),
            flags: "m".to_string(),
        })
    );
}
