//! Front-end seam tests: both readers produce identical IR for the same program.

use phpgen_ir::{Frontend, JsonReader, SexpReader};

const SEXP_SOURCE: &str = r#"
s(:block,
  s(:lasgn, :greeting, s(:str, "Hello")),
  s(:if, s(:lvar, :greeting), s(:return, s(:lit, 1..3)), nil))
"#;

const JSON_SOURCE: &str = r#"
["block",
  ["lasgn", {"symbol": "greeting"}, ["str", "Hello"]],
  ["if", ["lvar", {"symbol": "greeting"}], ["return", ["lit", {"range": [1, 3]}]], null]]
"#;

#[test]
fn test_readers_agree() {
    let from_sexp = SexpReader.read(SEXP_SOURCE).expect("sexp source should read");
    let from_json = JsonReader.read(JSON_SOURCE).expect("json source should read");
    assert_eq!(from_sexp, from_json);
}

#[test]
fn test_frontends_as_trait_objects() {
    let frontends: [(&dyn Frontend, &str); 2] =
        [(&SexpReader, SEXP_SOURCE), (&JsonReader, JSON_SOURCE)];
    for (frontend, source) in frontends {
        let nodes = frontend.read(source).expect("source should read");
        assert_eq!(nodes.len(), 1, "frontend {}", frontend.name());
        assert_eq!(nodes[0].tag, "block");
        assert_eq!(nodes[0].arity(), 2);
    }
}
