//! Property-based tests for compiled content-model patterns
//!
//! Generated element declarations run through the parser and the compiler;
//! conforming and non-conforming child encodings are then checked against
//! the resulting pattern under full-match semantics.

use dtdcheck::compiler::GrammarTable;
use dtdcheck::parser::DtdParser;
use proptest::prelude::*;

/// Generate element names (lowercase, so the `ZZ` sentinel can never match)
fn name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,6}"
}

/// Generate one occurrence suffix
fn suffix_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just(""), Just("?"), Just("*"), Just("+")]
}

/// Generate sequence particles: names paired with suffixes
fn particles_strategy() -> impl Strategy<Value = Vec<(String, &'static str)>> {
    prop::collection::vec((name_strategy(), suffix_strategy()), 1..6)
}

/// Compiles `<!ELEMENT root {model}>` and returns the table
fn table_for(model: &str) -> GrammarTable {
    let text = format!("<!ELEMENT root {}>", model);
    let dtd = DtdParser::from_text("prop.dtd", &text).parse(false).unwrap();
    GrammarTable::compile(&dtd).unwrap()
}

#[cfg(test)]
mod proptest_tests {
    use super::*;

    proptest! {
        #[test]
        fn sequences_accept_a_minimal_conforming_run(particles in particles_strategy()) {
            let model = format!(
                "({})",
                particles
                    .iter()
                    .map(|(name, suffix)| format!("{}{}", name, suffix))
                    .collect::<Vec<_>>()
                    .join(",")
            );
            // one occurrence for required particles, zero for optional ones
            let subject: String = particles
                .iter()
                .filter(|(_, suffix)| matches!(*suffix, "" | "+"))
                .map(|(name, _)| format!("{}#", name))
                .collect();

            let table = table_for(&model);
            let pattern = table.pattern("root").unwrap();
            prop_assert!(pattern.matches_exactly(&subject));
            // appending a name outside the model breaks the full match
            let appended = format!("{}ZZ#", subject);
            prop_assert!(!pattern.matches_exactly(&appended));
        }

        #[test]
        fn choices_accept_each_branch_alone(names in prop::collection::vec(name_strategy(), 2..6)) {
            let model = format!("({})", names.join("|"));
            let table = table_for(&model);
            let pattern = table.pattern("root").unwrap();

            for name in &names {
                let encoded = format!("{}#", name);
                prop_assert!(pattern.matches_exactly(&encoded));
            }
            prop_assert!(!pattern.matches_exactly(""));
            // two picks in a row exceed a single unstarred choice
            let double = format!("{0}#{0}#", names[0]);
            prop_assert!(!pattern.matches_exactly(&double));
        }

        #[test]
        fn starred_choices_accept_any_run(
            names in prop::collection::vec(name_strategy(), 1..4),
            picks in prop::collection::vec(any::<prop::sample::Index>(), 0..8),
        ) {
            let model = format!("({})*", names.join("|"));
            let table = table_for(&model);
            let pattern = table.pattern("root").unwrap();

            let subject: String = picks
                .iter()
                .map(|pick| format!("{}#", names[pick.index(names.len())]))
                .collect();
            prop_assert!(pattern.matches_exactly(&subject));
        }

        #[test]
        fn optional_single_names_accept_at_most_one(name in name_strategy()) {
            let model = format!("({}?)", name);
            let table = table_for(&model);
            let pattern = table.pattern("root").unwrap();

            let one = format!("{}#", name);
            prop_assert!(pattern.matches_exactly(""));
            prop_assert!(pattern.matches_exactly(&one));
            let doubled = format!("{0}{0}", one);
            prop_assert!(!pattern.matches_exactly(&doubled));
        }
    }
}
