use super::*;
use clap::Parser;

#[test]
fn carriers_parses_without_arguments() {
    let cli = Cli::try_parse_from(["shipkit", "carriers"]).expect("parse");
    assert!(matches!(cli.command, Commands::Carriers));
}

#[test]
fn methods_parses_optional_origin() {
    let cli = Cli::try_parse_from(["shipkit", "methods", "parcel", "--origin", "CA"])
        .expect("parse");
    match cli.command {
        Commands::Methods(MethodsArgs { carrier, origin }) => {
            assert_eq!(carrier, "parcel");
            assert_eq!(origin.as_deref(), Some("CA"));
        }
        _ => panic!("expected methods command"),
    }
}

#[test]
fn serialize_parses_operation_and_documents() {
    let cli = Cli::try_parse_from([
        "shipkit",
        "serialize",
        "freight",
        "load",
        "--shipment",
        "shipment.json",
        "--options",
        "load.toml",
    ])
    .expect("parse");
    match cli.command {
        Commands::Serialize(args) => {
            assert_eq!(args.carrier, "freight");
            assert_eq!(args.operation, OperationArg::Load);
            assert_eq!(args.operation.capability(), Capability::Loads);
            assert_eq!(args.options, PathBuf::from("load.toml"));
            assert!(args.service.is_none());
        }
        _ => panic!("expected serialize command"),
    }
}

#[test]
fn run_requires_a_shipment_document() {
    let parsed = Cli::try_parse_from(["shipkit", "run", "parcel", "rates", "--options", "o.json"]);
    assert!(parsed.is_err(), "missing --shipment must be rejected");
}

#[test]
fn unknown_operation_is_rejected() {
    let parsed = Cli::try_parse_from([
        "shipkit",
        "run",
        "parcel",
        "teleport",
        "--shipment",
        "s.json",
        "--options",
        "o.json",
    ]);
    assert!(parsed.is_err(), "undeclared operation must be rejected");
}
