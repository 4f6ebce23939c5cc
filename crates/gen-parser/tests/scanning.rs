//! Properties of the tokenizer and block finder over whole inputs.

use gen_parser::{find_gen_blocks, has_gen_blocks, tokenize};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// Fragments that exercise every token class, including unterminated ones.
fn fragment_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("gen".to_string()),
        Just("function".to_string()),
        Just("=>".to_string()),
        Just("<-".to_string()),
        "[{}()\\[\\];,]".prop_map(String::from),
        "[ \t]{1,3}|\r?\n|\r".prop_map(String::from),
        "[a-zA-Z_$][a-zA-Z0-9_$]{0,5}",
        "[0-9]{1,3}(\\.[0-9]+)?(e-?[0-9])?n?|0x[0-9a-f]{1,4}",
        "\"[^\"\\\\\n]{0,6}\"?|'[^'\\\\\n]{0,6}'?",
        "`[a-z ${}']{0,8}`?",
        "//[^\n]{0,8}|/\\*[a-z {}*]{0,8}(\\*/)?",
        "[+\\-*/%<>=!?.&|^~#@\\\\]{1,3}",
    ]
}

/// JavaScript-shaped text built from fragments.
fn source_like_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(fragment_strategy(), 0..40).prop_map(|parts| parts.concat())
}

/// Arbitrary strings alongside JavaScript-shaped ones.
fn input_strategy() -> impl Strategy<Value = String> {
    prop_oneof![any::<String>(), source_like_strategy()]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn test_tokens_reconstruct_input(input in input_strategy()) {
        let rebuilt: String = tokenize(&input).iter().map(|t| t.text).collect();
        prop_assert_eq!(rebuilt, input);
    }

    #[test]
    fn test_token_spans_match_text(input in input_strategy()) {
        let mut next = 0;
        for token in tokenize(&input) {
            prop_assert_eq!(token.start(), next, "gap before {:?}", token);
            prop_assert_eq!(&input[token.start()..token.end()], token.text);
            prop_assert!(!token.text.is_empty());
            next = token.end();
        }
        prop_assert_eq!(next, input.len());
    }

    #[test]
    fn test_block_invariants(input in source_like_strategy()) {
        let mut previous_end = 0;
        for block in find_gen_blocks(&input) {
            // The textual check needs a word boundary and plain whitespace.
            let start = usize::from(block.start);
            let gap = &input[start + 3..usize::from(block.brace_start)];
            let bounded = input[..start]
                .chars()
                .next_back()
                .map_or(true, |c| !(c.is_alphanumeric() || c == '_'));
            if bounded && gap.chars().all(char::is_whitespace) {
                prop_assert!(has_gen_blocks(&input));
            }
            prop_assert!(block.start <= block.brace_start);
            prop_assert!(block.brace_start < block.end);
            prop_assert!(usize::from(block.start) >= previous_end);
            prop_assert_eq!(&input[block.span().range()][..3], "gen");
            prop_assert_eq!(block.content_span().slice(&input), block.content);
            previous_end = usize::from(block.end);
        }
    }
}

#[test]
fn test_unterminated_inputs_reconstruct() {
    for input in [
        "/* unterminated { comment",
        "let s = \"unterminated \\\" string { ",
        "const msg = `hello ${ user.name + `!${'}'}` }`; // } trailing",
        "weird \u{0} \u{7f} ü 日本 🦀 \\ # @",
    ] {
        let rebuilt: String = tokenize(input).iter().map(|t| t.text).collect();
        assert_eq!(rebuilt, input);
    }
}
