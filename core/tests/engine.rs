//! End-to-end behavior of the parameter engine across dialects.

use dump_params_core::dialect::{dd, dic, redumper};
use dump_params_core::*;

fn request<'a>(
    media_type: Option<MediaType>,
    system: Option<RedumpSystem>,
    filename: &'a str,
    options: &'a DumpOptions,
) -> DumpRequest<'a> {
    DumpRequest {
        system,
        media_type,
        drive_path: Some("F"),
        filename,
        drive_speed: 8,
        options,
    }
}

/// Generates from defaults, parses the result, and checks the models agree.
fn assert_round_trip(dialect: Dialect, request: &DumpRequest<'_>) {
    let generated = ExecutionContext::from_request(dialect, request);
    let parameters = generated
        .generate_parameters()
        .unwrap_or_else(|| panic!("{dialect}: defaults did not generate"));

    let parsed = ExecutionContext::parse(dialect, &parameters)
        .unwrap_or_else(|err| panic!("{dialect}: {parameters:?} did not parse: {err}"));

    assert_eq!(parsed.base_command(), generated.base_command(), "{parameters}");
    assert_eq!(parsed.set_flags(), generated.set_flags(), "{parameters}");
    for flag in generated.set_flags() {
        assert_eq!(parsed.values(flag), generated.values(flag), "{flag} in {parameters}");
    }
    assert_eq!(parsed.generate_parameters().as_deref(), Some(parameters.as_str()));
}

#[test]
fn test_dic_cd_scenario() {
    let ctx =
        ExecutionContext::from_parameters(Dialect::DiscImageCreator, "cd F test.bin 8 /c2 20");
    assert!(ctx.is_valid());
    assert_eq!(ctx.base_command(), Some("cd"));
    assert_eq!(ctx.string_value(dic::DRIVE), Some("F"));
    assert_eq!(ctx.string_value(dic::FILENAME), Some("test.bin"));
    assert_eq!(ctx.int_value(dic::SPEED), Some(8));
    assert_eq!(ctx.int_value(dic::C2_OPCODE), Some(20));

    let generated = ctx.generate_parameters().unwrap();
    let tokens: Vec<&str> = generated.split_whitespace().collect();
    for expected in ["cd", "F", "test.bin", "/c2", "20"] {
        assert!(tokens.contains(&expected), "{expected} missing from {generated}");
    }
}

#[test]
fn test_empty_input_is_invalid() {
    for dialect in Dialect::ALL {
        for input in ["", "   ", "\t\n"] {
            let ctx = ExecutionContext::from_parameters(dialect, input);
            assert!(!ctx.is_valid(), "{dialect}: {input:?}");
            assert_eq!(ExecutionContext::parse(dialect, input), Err(ParseError::Empty));
        }
    }
}

#[test]
fn test_redumper_keeps_only_first_mode() {
    let ctx =
        ExecutionContext::from_parameters(Dialect::Redumper, "dump refine --drive=E: --speed=8");
    assert_eq!(ctx.base_command(), Some("dump"));
    assert!(ctx.generate_parameters().unwrap().starts_with("dump "));
    assert!(!ctx.generate_parameters().unwrap().contains("refine"));
}

#[test]
fn test_unsupported_flag_rejected() {
    // Catalog flags that the detected command does not allow.
    let cases = [
        (Dialect::DiscImageCreator, "bd F out.iso 4 /c2"),
        (Dialect::Redumper, "info --retries=5"),
        (Dialect::Dd, "--list if=in.img"),
    ];
    for (dialect, input) in cases {
        let ctx = ExecutionContext::from_parameters(dialect, input);
        assert!(!ctx.is_valid(), "{dialect}: {input}");
        assert!(matches!(
            ExecutionContext::parse(dialect, input),
            Err(ParseError::UnsupportedFlag { .. })
        ));
    }
}

#[test]
fn test_multiplier_decoding_through_flags() {
    let cases = [("20k", 20 * 1024), ("8q", 64), ("0x1F", 31), ("20", 20)];
    for (raw, expected) in cases {
        let ctx =
            ExecutionContext::parse(Dialect::Redumper, &format!("disc --retries={raw}")).unwrap();
        assert_eq!(ctx.int_value(redumper::RETRIES), Some(expected), "{raw}");

        let ctx = ExecutionContext::parse(Dialect::Dd, &format!("if=a of=b bs={raw}")).unwrap();
        assert_eq!(ctx.int_value(dd::BLOCK_SIZE), Some(expected), "{raw}");
    }
}

#[test]
fn test_reset_on_failure() {
    let malformed = [
        (Dialect::DiscImageCreator, "bogus"),
        (Dialect::DiscImageCreator, "cd F test.bin 8 /c2 lots"),
        (Dialect::Redumper, "disc --speed"),
        (Dialect::Redumper, "disc --drive=E: --nonsense"),
        (Dialect::Dd, "if=a==b of=c"),
    ];
    for (dialect, input) in malformed {
        let ctx = ExecutionContext::from_parameters(dialect, input);
        assert_eq!(ctx.base_command(), None, "{dialect}: {input}");
        assert!(ctx.set_flags().is_empty(), "{dialect}: {input}");
        assert_eq!(ctx, ExecutionContext::new(dialect));
    }
}

#[test]
fn test_missing_value_policy() {
    // Required value followed by end of input or by another flag.
    for input in ["disc --speed", "disc --speed --verbose"] {
        assert_eq!(
            ExecutionContext::parse(Dialect::Redumper, input),
            Err(ParseError::MissingValue(redumper::SPEED.into()))
        );
    }

    // Optional value: the flag is present with no value.
    let ctx = ExecutionContext::parse(Dialect::DiscImageCreator, "cd F test.bin 8 /c2 /q").unwrap();
    assert_eq!(ctx.flag_state(dic::C2_OPCODE), FlagState::SetTrue);
    assert_eq!(ctx.value(dic::C2_OPCODE), None);
    assert!(ctx.is_set(dic::DISABLE_BEEP));
}

#[test]
fn test_round_trip_from_defaults() {
    let mut paranoid = DumpOptions::default();
    paranoid.dic.paranoid_mode = true;
    paranoid.dic.multi_sector_read = 32;
    paranoid.redumper.verbose = true;
    paranoid.redumper.skeleton = true;
    paranoid.redumper.read_method = RedumperReadMethod::BeCdda;
    paranoid.dd.block_size = 4096;

    for options in [DumpOptions::default(), paranoid] {
        for media in MediaType::ALL {
            for system in [
                None,
                Some(RedumpSystem::IbmPcCompatible),
                Some(RedumpSystem::SonyPlayStation),
                Some(RedumpSystem::MicrosoftXbox),
            ] {
                for filename in [
                    "game.bin",
                    r"C:\My Dumps\game.bin",
                    r"C:\dumps\size=700MB.iso",
                    "/srv/dumps/",
                ] {
                    let req = request(Some(media), system, filename, &options);
                    for dialect in Dialect::ALL {
                        assert_round_trip(dialect, &req);
                    }
                }
            }
        }
    }
}

#[test]
fn test_dumping_and_paths() {
    let ctx = ExecutionContext::from_parameters(Dialect::DiscImageCreator, "eject F");
    assert!(ctx.is_valid());
    assert!(!ctx.is_dumping_command());
    assert_eq!(ctx.input_path().as_deref(), Some("F"));
    assert_eq!(ctx.output_path(), None);
    assert_eq!(ctx.detect_media_type(), None);

    let ctx = ExecutionContext::from_parameters(
        Dialect::Redumper,
        r#"disc --image-path="/srv/dumps" --image-name="game""#,
    );
    assert!(ctx.is_dumping_command());
    assert_eq!(ctx.output_path().as_deref(), Some("/srv/dumps/game"));
}

#[test]
fn test_support_matrix_introspection() {
    let matrix = Dialect::Dd.spec().support_matrix();
    assert_eq!(matrix[0].0, None);
    assert!(matrix[0].1.contains(&dd::INPUT_FILE));
    assert_eq!(matrix[1], (Some(dd::LIST), vec![dd::FILTER]));

    let spec = Dialect::Redumper.spec();
    assert!(spec.is_flag_supported(Some("disc"), redumper::SKELETON));
    assert!(!spec.is_flag_supported(Some("dump"), redumper::SKELETON));
    assert!(!spec.is_flag_supported(Some("nope"), redumper::HELP));
}
