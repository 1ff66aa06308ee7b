#[cfg(test)]
mod syntax {
    use tmsh::parsing::{self, ParserConfig, ParsingError};

    /// Helper function to check if parsing produces the expected error type
    fn expect_error(content: &str, expected: ParsingError) {
        match parsing::parse(content) {
            Ok(_) => panic!(
                "Expected parsing to fail, but it succeeded for input: {}",
                content
            ),
            Err(error) => {
                if std::mem::discriminant(&error.problem) != std::mem::discriminant(&expected) {
                    panic!(
                        "Expected error type like {:?} but got: {:?} for input '{}'",
                        expected, error.problem, content
                    );
                }
            }
        }
    }

    #[test]
    fn unterminated_brace() {
        expect_error(
            r#"
ltm node /Common/n1 {
    address 10.1.1.1
            "#
            .trim_ascii(),
            ParsingError::UnterminatedBrace(0),
        );
    }

    #[test]
    fn unterminated_quote_in_body() {
        expect_error(
            r#"
ltm node /Common/n1 {
    description "never closed
}
            "#
            .trim_ascii(),
            ParsingError::UnterminatedQuote(0),
        );
    }

    #[test]
    fn unterminated_quote_in_key_phrase() {
        expect_error("ltm node \"n1 {\n}", ParsingError::UnterminatedQuote(0));
    }

    #[test]
    fn unterminated_bracket() {
        expect_error(
            r#"
ltm node [n1 {
    address 10.1.1.1
}
            "#
            .trim_ascii(),
            ParsingError::UnterminatedBracket(0),
        );
    }

    #[test]
    fn unterminated_index() {
        expect_error("ltm node $n1(x", ParsingError::UnterminatedIndex(0));
    }

    #[test]
    fn incomplete_escape() {
        expect_error("ltm node n1 { } \\", ParsingError::IncompleteEscape(0));
    }

    #[test]
    fn trailing_characters() {
        expect_error(
            r#"
"ltm node"n1 {
    address 10.1.1.1
}
            "#
            .trim_ascii(),
            ParsingError::TrailingCharacters(0),
        );
    }

    #[test]
    fn text_after_a_block() {
        expect_error(
            r#"
ltm pool /Common/web {
    members { /Common/n1:80 } extra
}
            "#
            .trim_ascii(),
            ParsingError::AmbiguousOrMalformedValue(0),
        );
    }

    #[test]
    fn block_where_a_key_goes() {
        expect_error(
            r#"
ltm pool /Common/web {
    { members }
}
            "#
            .trim_ascii(),
            ParsingError::AmbiguousOrMalformedValue(0),
        );
    }

    #[test]
    fn nesting_too_deep() {
        let config = ParserConfig {
            max_nesting: 1,
            ..ParserConfig::default()
        };
        let error = parsing::parse_with("a {\n    b {\n        c d\n    }\n}", &config).unwrap_err();
        assert_eq!(error.problem, ParsingError::NestingTooDeep(10));
        assert_eq!((error.line, error.column), (2, 7));
    }

    #[test]
    fn errors_carry_positions() {
        let content = r#"
ltm pool /Common/web {
    members { /Common/n1:80 } extra
}
        "#
        .trim_ascii();
        let error = parsing::parse(content).unwrap_err();

        assert_eq!(error.line, 2);
        assert_eq!(error.column, 31);
        assert_eq!(
            error.to_string(),
            "2:31: value does not match any known form"
        );
    }

    #[test]
    fn quote_errors_point_at_the_opening_quote() {
        let content = "ltm node n1 {\n    description \"open\n}\n";
        let error = parsing::parse(content).unwrap_err();

        assert_eq!(error.problem, ParsingError::UnterminatedQuote(30));
        assert_eq!((error.line, error.column), (2, 17));
    }
}
