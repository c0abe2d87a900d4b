use verbline_core::*;

#[derive(Debug, Default, PartialEq)]
struct Install {
    packages: Vec<String>,
    version: Option<String>,
    jobs: u8,
    dry_run: bool,
    offline: bool,
}

#[derive(Debug, Default, PartialEq)]
struct Search {
    query: String,
    limit: usize,
}

#[derive(Debug, PartialEq)]
enum Command {
    Install(Install),
    Search(Search),
}

fn install_verb() -> Verb<Install> {
    Verb::builder("install")
        .alias("i")
        .describe("Install packages")
        .multi_value(
            MultiValueArg::new("packages", text(), |t: &mut Install, v| t.packages = v).required(),
        )
        .option(
            OptionArg::new(None, Some("--version"), "version", text(), |t: &mut Install, v| {
                t.version = Some(v)
            })
            .depends(forbidden_if(ArgKind::Option, "--version", |t: &Install| {
                t.packages.len() > 1
            })),
        )
        .option(
            OptionArg::new(Some("-j"), Some("--jobs"), "jobs", from_str(), |t: &mut Install, v| {
                t.jobs = v
            })
            .default_value(4),
        )
        .switch(SwitchArg::flag(Some("-n"), Some("--dry-run"), "dry run", |t: &mut Install, v| {
            t.dry_run = v
        }))
        .switch(
            SwitchArg::flag(None, Some("--offline"), "offline", |t: &mut Install, v| t.offline = v)
                .depends(forbidden_if(ArgKind::Switch, "--offline", |t: &Install| t.dry_run)),
        )
        .build()
        .unwrap()
}

fn search_verb() -> Verb<Search> {
    Verb::builder("search")
        .value(ValueArg::new("query", text(), |t: &mut Search, v| t.query = v).required())
        .value(ValueArg::new("limit", from_str(), |t: &mut Search, v| t.limit = v).default_value(10))
        .build()
        .unwrap()
}

fn parser_with(settings: ParserSettings) -> Parser<Command> {
    Parser::builder()
        .settings(settings)
        .verb(install_verb(), Command::Install)
        .verb(search_verb(), Command::Search)
        .build()
        .unwrap()
}

fn parser() -> Parser<Command> {
    parser_with(ParserSettings::default())
}

fn codes(failure: &ParseFailure<'_>) -> Vec<ErrorCode> {
    failure.errors().iter().map(|e| e.code).collect()
}

#[test]
fn parse_line_with_quotes_and_defaults() {
    let parsed = parser()
        .parse_line(r#"search "http client" 3"#)
        .unwrap();
    assert_eq!(
        parsed,
        Command::Search(Search {
            query: "http client".to_string(),
            limit: 3,
        })
    );

    let parsed = parser().parse_line("search 'tls'").unwrap();
    assert_eq!(
        parsed,
        Command::Search(Search {
            query: "tls".to_string(),
            limit: 10,
        })
    );
}

#[test]
fn multi_value_collects_tokens_between_named_arguments() {
    let parsed = parser()
        .parse_line("I serde --JOBS 8 tokio -n anyhow")
        .unwrap();
    assert_eq!(
        parsed,
        Command::Install(Install {
            packages: vec!["serde".into(), "tokio".into(), "anyhow".into()],
            version: None,
            jobs: 8,
            dry_run: true,
            offline: false,
        })
    );
}

#[test]
fn help_anywhere_overrides_earlier_errors() {
    let parser = parser();
    let failure = parser
        .parse_line("install --jobs lots --jobs 2 --help")
        .unwrap_err();
    assert!(failure.is_help());
    assert_eq!(failure.errors().len(), 1);
    assert_eq!(failure.verb().map(|v| v.name.as_str()), Some("install"));

    // A help switch in option-value position still counts as help.
    let failure = parser.parse_line("install pkg --version -h").unwrap_err();
    assert!(failure.is_help());
}

#[test]
fn scan_errors_are_reported_in_order() {
    let parser = parser();
    let failure = parser
        .parse_line("install pkg -n -n --jobs x --dry-run")
        .unwrap_err();
    assert_eq!(
        codes(&failure),
        [
            ErrorCode::DuplicateSwitch,
            ErrorCode::OptionConversionFailure,
            ErrorCode::DuplicateSwitch,
        ]
    );
    assert!(failure.errors().iter().all(|e| e.show_to_user));
}

#[test]
fn trailing_option_without_value() {
    let parser = parser();
    let failure = parser.parse_line("install pkg --version").unwrap_err();
    assert_eq!(codes(&failure), [ErrorCode::UnexpectedEndOfArguments]);
}

#[test]
fn extra_positional_and_missing_required() {
    let parser = parser();
    let failure = parser.parse_line("search a 1 b").unwrap_err();
    assert_eq!(codes(&failure), [ErrorCode::TooManyValues]);

    let failure = parser.parse_line("search").unwrap_err();
    assert_eq!(codes(&failure), [ErrorCode::MissingRequiredValue]);

    let failure = parser.parse_line("install -n").unwrap_err();
    assert_eq!(codes(&failure), [ErrorCode::MissingRequiredMultiValue]);
}

#[test]
fn dependencies_run_only_after_a_clean_scan() {
    let parser = parser();
    let failure = parser
        .parse_line("install a b --version 1.0 -n --offline")
        .unwrap_err();
    assert_eq!(
        codes(&failure),
        [
            ErrorCode::OptionMustNotBeProvided,
            ErrorCode::SwitchMustNotBeProvided,
        ]
    );

    let failure = parser
        .parse_line("install a b --version 1.0 --jobs x")
        .unwrap_err();
    assert_eq!(codes(&failure), [ErrorCode::OptionConversionFailure]);
}

#[test]
fn dispatch_errors() {
    let parser = parser();
    assert_eq!(
        codes(&parser.parse_line("").unwrap_err()),
        [ErrorCode::NoVerbFound]
    );
    let failure = parser.parse_line("uninstall pkg").unwrap_err();
    assert_eq!(codes(&failure), [ErrorCode::InvalidVerb]);
    assert!(failure.errors()[0].message.contains("uninstall"));
}

#[test]
fn settings_from_yaml_change_help_and_case() {
    let settings = ParserSettings::from_yaml_str("short_help: \"-?\"\ncase_sensitive: true\n").unwrap();
    assert_eq!(settings.long_help.as_deref(), Some("--help"));
    let parser = parser_with(settings);

    assert!(parser.parse_line("search -?").unwrap_err().is_help());
    assert_eq!(
        codes(&parser.parse_line("SEARCH x").unwrap_err()),
        [ErrorCode::InvalidVerb]
    );
    // `-h` is no longer help, so it lands in the first positional value.
    assert_eq!(
        parser.parse_line("search -h").unwrap(),
        Command::Search(Search {
            query: "-h".to_string(),
            limit: 10,
        })
    );
}

#[test]
fn verbless_program_uses_verb_parse_directly() {
    let settings = ParserSettings::default();
    let tokens: Vec<&str> = tokenize("serde --offline").collect();
    let verb = install_verb();
    verb.check(&settings).unwrap();
    let install = verb.parse(&tokens, &settings).unwrap();
    assert_eq!(install.packages, ["serde"]);
    assert!(install.offline);
    assert_eq!(install.jobs, 4);
}

#[test]
fn schema_errors_surface_at_build_time() {
    let err = Parser::<Command>::builder()
        .verb(install_verb(), Command::Install)
        .verb(
            Verb::<Search>::builder("I").build().unwrap(),
            Command::Search,
        )
        .build()
        .unwrap_err();
    assert_eq!(err, SchemaError::DuplicateVerb("I".to_string()));
}

#[test]
fn errors_serialize_for_front_ends() {
    let parser = parser();
    let failure = parser.parse_line("search").unwrap_err();
    let json = serde_json::to_value(failure.errors()).unwrap();
    assert_eq!(
        json,
        serde_json::json!([{
            "code": "MissingRequiredValue",
            "message": "missing required value 'query'",
            "show_to_user": true
        }])
    );
}

#[test]
fn concurrent_parses_share_one_parser() {
    let parser = parser();
    std::thread::scope(|scope| {
        let handles: Vec<_> = (1..=8u8)
            .map(|jobs| {
                let parser = &parser;
                scope.spawn(move || {
                    let line = format!("install pkg{jobs} --jobs {jobs}");
                    match parser.parse_line(&line) {
                        Ok(Command::Install(install)) => (install.packages, install.jobs),
                        other => panic!("unexpected result: {other:?}"),
                    }
                })
            })
            .collect();
        for (handle, jobs) in handles.into_iter().zip(1..=8u8) {
            let (packages, parsed_jobs) = handle.join().unwrap();
            assert_eq!(packages, [format!("pkg{jobs}")]);
            assert_eq!(parsed_jobs, jobs);
        }
    });
}

#[test]
fn verbless_check_catches_shadowed_and_colliding_names() {
    #[derive(Debug, Default)]
    struct Du {
        human: bool,
    }
    let verb = Verb::<Du>::builder("du")
        .switch(SwitchArg::flag(Some("-h"), Some("--human"), "human", |t: &mut Du, v| {
            t.human = v
        }))
        .build()
        .unwrap();

    let err = verb.check(&ParserSettings::default()).unwrap_err();
    assert!(matches!(err, SchemaError::ArgumentCollidesWithHelp { ref name, .. } if name == "-h"));

    let settings = ParserSettings::from_yaml_str("short_help: null
").unwrap();
    verb.check(&settings).unwrap();
    assert!(verb.parse(&["-h"], &settings).unwrap().human);

    let empty_help = ParserSettings {
        short_help: Some(String::new()),
        ..ParserSettings::default()
    };
    assert_eq!(
        verb.check(&empty_help),
        Err(SchemaError::InvalidHelpSwitch(String::new()))
    );
}
