//! Parameterized coverage for content-model matching
//!
//! Each case pairs a declared content model with a child encoding and the
//! expected full-match outcome, covering every cardinality and the keyword
//! models.

use dtdcheck::compiler::GrammarTable;
use dtdcheck::parser::DtdParser;
use rstest::rstest;

fn matches(model: &str, subject: &str) -> bool {
    let text = format!("<!ELEMENT root {}>", model);
    let dtd = DtdParser::from_text("cases.dtd", &text).parse(false).unwrap();
    let table = GrammarTable::compile(&dtd).unwrap();
    table.pattern("root").unwrap().matches_exactly(subject)
}

#[rstest(case => [
    ("(item)", "item#", true),
    ("(item)", "", false),
    ("(item)", "item#item#", false),
    ("(item?)", "", true),
    ("(item?)", "item#", true),
    ("(item?)", "item#item#", false),
    ("(item*)", "", true),
    ("(item*)", "item#item#item#", true),
    ("(item+)", "", false),
    ("(item+)", "item#", true),
    ("(item+)", "item#item#", true),
])]
fn single_name_cardinalities(case: (&str, &str, bool)) {
    let (model, subject, expected) = case;
    assert_eq!(matches(model, subject), expected, "{} vs {:?}", model, subject);
}

#[rstest(case => [
    ("(a,b)", "a#b#", true),
    ("(a,b)", "b#a#", false),
    ("(a,b)", "a#", false),
    ("(a|b)", "a#", true),
    ("(a|b)", "b#", true),
    ("(a|b)", "a#b#", false),
    ("((a|b)*,c)", "a#b#a#c#", true),
    ("((a|b)*,c)", "c#", true),
    ("((a|b)*,c)", "c#a#", false),
    ("(head,(p|list)+)", "head#p#list#p#", true),
    ("(head,(p|list)+)", "head#", false),
])]
fn groups_and_nesting(case: (&str, &str, bool)) {
    let (model, subject, expected) = case;
    assert_eq!(matches(model, subject), expected, "{} vs {:?}", model, subject);
}

#[rstest(case => [
    ("EMPTY", "", true),
    ("EMPTY", "a#", false),
    ("ANY", "", true),
    ("ANY", "a#", false),
    ("(#PCDATA)", "#PCDATA", true),
    ("(#PCDATA)", "", false),
    ("(#PCDATA)*", "", false),
    ("(#PCDATA)*", "#PCDATA", true),
    ("(#PCDATA | em)*", "", true),
    ("(#PCDATA | em)*", "#PCDATAem#em#", true),
    ("(#PCDATA | em)*", "em#", true),
    ("(#PCDATA | em)*", "strong#", false),
])]
fn keyword_and_mixed_models(case: (&str, &str, bool)) {
    let (model, subject, expected) = case;
    assert_eq!(matches(model, subject), expected, "{} vs {:?}", model, subject);
}
