use minutes_toon::{parse, parse_and_validate, validate, Document, Error, Value};
use rstest::rstest;
use serde_json::json;

const MINUTES: &str = "local: Room A
data_horario: 01/01/2025 - 10:00
convocado_por: Alice
objetivo: Plan launch

participantes[2]{num,nome}:
1,Alice
2,Bob

pontos[1]{item,topico}:
1,Discussed launch readiness

proximos_passos[1]{item,acao,responsavel,data}:
1,Finalize budget,Alice,10/01/2025";

#[rstest]
fn scenario_parses_and_validates() {
    let document = parse(MINUTES).unwrap();

    assert_eq!(document.scalars().count(), 4);
    assert_eq!(document.scalar("data_horario"), Some("01/01/2025 - 10:00"));
    assert_eq!(document.array("participantes").map(|b| b.len()), Some(2));
    assert_eq!(document.array("pontos").map(|b| b.len()), Some(1));
    assert_eq!(document.array("proximos_passos").map(|b| b.len()), Some(1));
    assert_eq!(validate(&document), Ok(()));
}

#[rstest]
fn scenario_json_shape() {
    let document = parse_and_validate(MINUTES).unwrap();
    assert_eq!(
        serde_json::to_value(&document).unwrap(),
        json!({
            "local": "Room A",
            "data_horario": "01/01/2025 - 10:00",
            "convocado_por": "Alice",
            "objetivo": "Plan launch",
            "participantes": [
                {"num": "1", "nome": "Alice"},
                {"num": "2", "nome": "Bob"}
            ],
            "pontos": [
                {"item": "1", "topico": "Discussed launch readiness"}
            ],
            "proximos_passos": [
                {"item": "1", "acao": "Finalize budget", "responsavel": "Alice", "data": "10/01/2025"}
            ]
        })
    );
}

#[rstest]
#[case("{", "}")]
#[case("{{", "}}")]
#[case("{{", "}")]
#[case("{", "}}}")]
fn brace_styles_parse_identically(#[case] open: &str, #[case] close: &str) {
    let restyled = MINUTES
        .replace("{num,nome}", &format!("{open}num,nome{close}"))
        .replace("{item,topico}", &format!("{open}item,topico{close}"))
        .replace(
            "{item,acao,responsavel,data}",
            &format!("{open}item,acao,responsavel,data{close}"),
        );
    assert_eq!(parse(&restyled).unwrap(), parse(MINUTES).unwrap());
}

#[rstest]
fn missing_objetivo_and_empty_pontos_are_reported_together() {
    let input = MINUTES
        .replace("objetivo: Plan launch\n", "")
        .replace(
            "pontos[1]{item,topico}:\n1,Discussed launch readiness",
            "pontos[0]{item,topico}:",
        );
    let document = parse(&input).unwrap();
    assert_eq!(
        validate(&document),
        Err(Error::MissingRequiredFields {
            names: vec!["objetivo".to_string(), "pontos".to_string()]
        })
    );
}

#[rstest]
fn parsing_does_not_validate() {
    let document = parse("local: Room A").unwrap();
    assert_eq!(document.len(), 1);
    assert!(parse_and_validate("local: Room A").is_err());
}

#[rstest]
fn producer_preamble_and_trailer_are_ignored() {
    let wrapped = format!("Sure, here are the minutes\n\n{MINUTES}\n\n---\nEnd of minutes");
    let document = parse_and_validate(&wrapped).unwrap();
    assert_eq!(document, parse(MINUTES).unwrap());
}

#[rstest]
fn duplicate_scalar_keeps_last_value() {
    let document = parse("local: Room A\nobjetivo: Plan\nlocal: Room B").unwrap();
    assert_eq!(document.scalar("local"), Some("Room B"));
    let keys: Vec<_> = document.iter().map(|(key, _)| key).collect();
    assert_eq!(keys, vec!["local", "objetivo"]);
}

#[rstest]
fn windows_line_endings() {
    let crlf = MINUTES.replace('\n', "\r\n");
    assert_eq!(parse(&crlf).unwrap(), parse(MINUTES).unwrap());
}

#[rstest]
fn programmatic_document_matches_parsed_one() {
    let mut participants = minutes_toon::ArrayBlock::new(["num", "nome"]);
    participants.push_numbered(["Alice"]).push_numbered(["Bob"]);
    let mut topics = minutes_toon::ArrayBlock::new(["item", "topico"]);
    topics.push_numbered(["Discussed launch readiness"]);
    let mut steps = minutes_toon::ArrayBlock::new(["item", "acao", "responsavel", "data"]);
    steps.push_numbered(["Finalize budget", "Alice", "10/01/2025"]);

    let built: Document = [
        ("local", Value::scalar("Room A")),
        ("data_horario", Value::scalar("01/01/2025 - 10:00")),
        ("convocado_por", Value::scalar("Alice")),
        ("objetivo", Value::scalar("Plan launch")),
        ("participantes", Value::Array(participants)),
        ("pontos", Value::Array(topics)),
        ("proximos_passos", Value::Array(steps)),
    ]
    .into_iter()
    .collect();

    assert_eq!(built, parse(MINUTES).unwrap());
    assert_eq!(minutes_toon::serialize(&built), MINUTES);
}
