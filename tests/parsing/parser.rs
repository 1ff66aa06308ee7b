#[cfg(test)]
mod verify {
    use std::collections::HashMap;

    use tmsh::language::*;
    use tmsh::parsing::{self, extract_commands, scan, NodeKind, ParserConfig, ParsingError};

    fn trim(s: &str) -> &str {
        s.strip_prefix('\n')
            .unwrap_or(s)
    }

    fn body<'d>(document: &'d Document, key: &str) -> &'d Document {
        document
            .get(key)
            .and_then(Value::as_dict)
            .unwrap_or_else(|| panic!("no dict at {:?}", key))
    }

    #[test]
    fn single_node() {
        let document = parsing::parse("ltm node n1 { address 10.1.1.1 }").unwrap();

        assert_eq!(document.len(), 1);
        let node = body(&document, "ltm node n1");
        assert_eq!(node.get("address"), Some(&Value::Str("10.1.1.1".to_string())));
    }

    #[test]
    fn key_order_is_preserved() {
        let document = parsing::parse(trim(
            r#"
sys ntp { }
ltm pool /Common/b { }
auth user admin { }
ltm pool /Common/a { }
            "#,
        ))
        .unwrap();

        let keys: Vec<&str> = document
            .keys()
            .collect();
        assert_eq!(
            keys,
            vec![
                "sys ntp",
                "ltm pool /Common/b",
                "auth user admin",
                "ltm pool /Common/a"
            ]
        );
    }

    #[test]
    fn missing_closing_brace() {
        let content = "ltm node n1 { address 10.1.1.1";
        let error = parsing::parse(content).unwrap_err();

        assert_eq!(error.problem, ParsingError::UnterminatedBrace(content.len()));
        assert_eq!(error.offset, content.len());
        assert_eq!((error.line, error.column), (1, 31));
    }

    #[test]
    fn list_or_dict() {
        let document = parsing::parse("net vlan v1 { interfaces { 1.1 1.2 } }").unwrap();
        let vlan = body(&document, "net vlan v1");
        assert_eq!(
            vlan.get("interfaces"),
            Some(&Value::List(vec![
                Value::Str("1.1".to_string()),
                Value::Str("1.2".to_string())
            ]))
        );

        let document = parsing::parse(trim(
            r#"
net vlan v1 {
    interfaces {
        1.1 {
            tagged
        }
    }
}
            "#,
        ))
        .unwrap();
        let vlan = body(&document, "net vlan v1");
        let interfaces = body(vlan, "interfaces");
        // a single word on its own line is a one element list
        assert_eq!(
            interfaces.get("1.1"),
            Some(&Value::List(vec![Value::Str("tagged".to_string())]))
        );

        let document = parsing::parse(trim(
            r#"
net vlan v1 {
    interfaces {
        1.1 {
            tag-mode none
            tagged
        }
    }
}
            "#,
        ))
        .unwrap();
        let vlan = body(&document, "net vlan v1");
        let interfaces = body(vlan, "interfaces");
        let interface = body(interfaces, "1.1");
        assert_eq!(interface.get("tag-mode"), Some(&Value::from("none")));
        assert_eq!(interface.get("tagged"), Some(&Value::Eol));
    }

    #[test]
    fn keys_without_values() {
        let document = parsing::parse(trim(
            r#"
ltm virtual vs {
    vlans-disabled
    enabled
    ip-protocol tcp
}
            "#,
        ))
        .unwrap();
        let virtual_server = body(&document, "ltm virtual vs");

        assert_eq!(virtual_server.get("vlans-disabled"), Some(&Value::Eol));
        assert_eq!(virtual_server.get("enabled"), Some(&Value::Eol));
        assert!(!virtual_server
            .get("ip-protocol")
            .unwrap()
            .is_eol());

        let text = document.dumps();
        assert!(text.contains("\n    vlans-disabled\n"));
        assert!(text.contains("\n    enabled\n"));
    }

    #[test]
    fn key_alone_on_one_line() {
        let content = "sys folder f1 { inherited-traffic-group }";
        let document = parsing::parse(content).unwrap();
        let folder = body(&document, "sys folder f1");

        assert_eq!(folder.get("inherited-traffic-group"), Some(&Value::Eol));
        assert_eq!(
            document.dumps(),
            "sys folder f1 {\n    inherited-traffic-group\n}\n"
        );
    }

    #[test]
    fn one_line_rule() {
        let document = parsing::parse("ltm rule r1 { when HTTP_REQUEST { } }").unwrap();
        assert_eq!(
            document.get("ltm rule r1"),
            Some(&Value::Raw("{ when HTTP_REQUEST { } }".to_string()))
        );
    }

    #[test]
    fn scripts_stay_opaque() {
        let content = trim(
            r#"
ltm rule /Common/r1 {
    when HTTP_REQUEST {
        if { [HTTP::uri] eq "/" } { HTTP::redirect "/index.html" }
    }
}
gtm rule /Common/g1 { when DNS_REQUEST { discard } }
            "#,
        );
        let document = parsing::parse(content).unwrap();

        match document.get("ltm rule /Common/r1") {
            Some(Value::Raw(text)) => {
                assert!(text.starts_with("{\n    when HTTP_REQUEST {"));
                assert!(text.ends_with("\n}"));
            }
            other => panic!("expected raw text, got {:?}", other),
        }
        assert_eq!(
            document.get("gtm rule /Common/g1"),
            Some(&Value::Raw("{ when DNS_REQUEST { discard } }".to_string()))
        );

        assert_eq!(document.dumps(), content.trim_end().to_string() + "\n");
    }

    #[test]
    fn opaque_prefixes_can_be_added() {
        let content = "apm policy p1 { weird { stuff } here }";
        assert!(parsing::parse(content).is_err());

        let mut config = ParserConfig::default();
        config
            .blacklist
            .push("apm ".to_string());
        let document = parsing::parse_with(content, &config).unwrap();
        assert_eq!(
            document.get("apm policy p1"),
            Some(&Value::Raw("{ weird { stuff } here }".to_string()))
        );
    }

    #[test]
    fn round_trip() {
        let content = trim(
            r#"
ltm pool /Common/web {
    description "pool for the web tier"
    load-balancing-mode round-robin
    members {
        /Common/n1:80 {
            address 10.1.1.1
            priority-group 0
        }
    }
    monitor min 1 of { /Common/http /Common/tcp }
    ports { 80 443 }
    service-down-action none
}
            "#,
        );

        let first = parsing::parse(content).unwrap();
        let second = parsing::parse(&first.dumps()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.dumps(), content.trim_end().to_string() + "\n");
    }

    #[test]
    fn values_are_typed_only_in_lists() {
        let document = parsing::parse("x y {\n    a 80\n    b { 80 true none 1e3 1.1 }\n}").unwrap();
        let block = body(&document, "x y");

        assert_eq!(block.get("a"), Some(&Value::Str("80".to_string())));
        assert_eq!(
            block.get("b"),
            Some(&Value::List(vec![
                Value::Int(80),
                Value::Bool(true),
                Value::None,
                Value::Float(1000.0),
                Value::Str("1.1".to_string())
            ]))
        );
    }

    #[test]
    fn list_floats_round_trip() {
        let first = parsing::parse("x y {\n    b { .25 1e3 3. -2.5 }\n}\n").unwrap();
        let b = body(&first, "x y").get("b");
        assert_eq!(
            b,
            Some(&Value::List(vec![
                Value::Float(0.25),
                Value::Float(1000.0),
                Value::Float(3.0),
                Value::Float(-2.5)
            ]))
        );

        let text = first.dumps();
        assert_eq!(text, "x y {\n    b { .25 1000. 3. -2.5 }\n}\n");

        let second = parsing::parse(&text).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn globbing_and_matching() {
        let document = parsing::parse(trim(
            r#"
ltm pool /Common/p1 { }
ltm pool /Tenant/p2 { }
ltm node /Common/n1 { }
            "#,
        ))
        .unwrap();

        let pools = document
            .glob("ltm pool *")
            .unwrap();
        assert_eq!(pools.len(), 2);

        let common = document
            .glob("ltm * /Common/*")
            .unwrap();
        assert_eq!(common.len(), 2);

        assert_eq!(
            document
                .glob_keys("ltm pool *")
                .unwrap(),
            vec!["/Common/p1", "/Tenant/p2"]
        );

        let tenant = document
            .matching(r"ltm \w+ /Tenant/")
            .unwrap();
        let keys: Vec<&str> = tenant
            .keys()
            .collect();
        assert_eq!(keys, vec!["ltm pool /Tenant/p2"]);
    }

    #[test]
    fn templating() {
        let document = parsing::parse(trim(
            r#"
ltm node %(name)s {
    address %(address)s
    description "node %(name)s at 100%%"
}
            "#,
        ))
        .unwrap();

        let mut bindings = HashMap::new();
        bindings.insert("name".to_string(), "n1".to_string());
        bindings.insert("address".to_string(), "10.1.1.1".to_string());

        let result = document
            .format(&bindings, DEFAULT_FORMAT_DEPTH)
            .unwrap();
        let node = body(&result, "ltm node n1");
        assert_eq!(node.get("address"), Some(&Value::from("10.1.1.1")));
        assert_eq!(
            node.get("description"),
            Some(&Value::from("node n1 at 100%"))
        );
    }

    #[test]
    fn scanning_finds_command_bodies() {
        let content = "a { b }\nc d\ne { f }; g { h }";
        let script = scan(content).unwrap();

        let commands = script
            .children
            .iter()
            .filter(|node| node.kind == NodeKind::Command)
            .count();
        assert_eq!(commands, 4);

        let records = extract_commands(content, &script);
        let keys: Vec<&str> = records
            .iter()
            .map(|record| record.key_phrase.as_str())
            .collect();
        assert_eq!(keys, vec!["a", "e", "g"]);
        assert_eq!(records[2].body(content), "{ h }");
    }

    #[test]
    fn non_breaking_space_and_vertical_tab() {
        let content = "ltm node n1 {\n    description foo\u{a0}bar\n}\n";
        let document = parsing::parse(content).unwrap();
        let node = body(&document, "ltm node n1");
        assert_eq!(
            node.get("description"),
            Some(&Value::Raw("foo\u{a0}bar".to_string()))
        );
        assert_eq!(document.dumps(), content);

        let content = "ltm node n1 {\n    a b\u{0b}c\n}\n";
        let document = parsing::parse(content).unwrap();
        let node = body(&document, "ltm node n1");
        assert_eq!(node.get("a"), Some(&Value::Raw("b\u{0b}c".to_string())));
        assert_eq!(document.dumps(), content);

        let document = parsing::parse("ltm node n1 {\n    a\u{a0}b\n    \u{0b}c\n}\n").unwrap();
        let node = body(&document, "ltm node n1");
        assert_eq!(node.get("a"), Some(&Value::from("b")));
        assert_eq!(node.get("c"), Some(&Value::Eol));
    }

    #[test]
    fn deeply_nested_substitutions() {
        let depth = 10_000;
        let content = format!("{}{}", "[".repeat(depth), "]".repeat(depth));
        assert!(scan(&content).is_ok());
    }
}
