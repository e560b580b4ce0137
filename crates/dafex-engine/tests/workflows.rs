//! End-to-end workflow tests against wiremock, with in-memory history and
//! file-sink ports.

use std::sync::Arc;
use std::time::Duration;

use dafex_client::ServiceClient;
use dafex_core::{Decendio, Fund};
use dafex_engine::{
    EngineError, Extrato12mWorkflow, ExtratoFields, ExtratoWorkflow, InexWorkflow, MemorySink,
    MemoryStore, MonthRangeFields, MunicipioSearch,
};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MIME_XLSX: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

fn client_for(server: &MockServer) -> Arc<ServiceClient> {
    Arc::new(
        ServiceClient::with_base_url(&server.uri(), 30)
            .expect("client construction should not fail"),
    )
}

fn extrato_fields() -> ExtratoFields {
    ExtratoFields {
        tipo: Fund::Fpm,
        decendio: Decendio::Segundo,
        data_inicio: "2026-01-01".to_owned(),
        data_fim: "2026-01-10".to_owned(),
    }
}

fn month_fields() -> MonthRangeFields {
    MonthRangeFields {
        tipo: Fund::Royalties,
        mes_inicio: "2024-09".to_owned(),
        mes_fim: "2025-08".to_owned(),
        municipio: "MANACAPURU / AM".to_owned(),
    }
}

fn zip_response(filename: Option<&str>) -> ResponseTemplate {
    let mut template = ResponseTemplate::new(200)
        .insert_header("content-type", "application/zip")
        .set_body_bytes(b"PK\x03\x04".to_vec());
    if let Some(filename) = filename {
        template = template.insert_header(
            "content-disposition",
            format!(r#"attachment; filename="{filename}""#).as_str(),
        );
    }
    template
}

#[tokio::test]
async fn extrato_success_saves_file_and_records_history() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/extratos/gerar"))
        .and(body_json(serde_json::json!({
            "tipo": "fpm",
            "decendio": "2\u{b0}",
            "data_inicio": "01.01.2026",
            "data_fim": "10.01.2026"
        })))
        .respond_with(zip_response(Some("EXTRATOS_FPM_JANEIRO_2026.zip")))
        .expect(1)
        .mount(&server)
        .await;

    let sink = Arc::new(MemorySink::new());
    let workflow = ExtratoWorkflow::new(
        client_for(&server),
        Arc::new(MemoryStore::new()),
        Arc::clone(&sink) as Arc<dyn dafex_engine::FileSink>,
    );

    let saved = workflow.submit(&extrato_fields()).await.unwrap();
    assert_eq!(saved.nome, "EXTRATOS_FPM_JANEIRO_2026.zip");

    let saves = sink.saved();
    assert_eq!(saves.len(), 1);
    assert_eq!(saves[0].0, "EXTRATOS_FPM_JANEIRO_2026.zip");
    assert_eq!(&saves[0].1[..2], b"PK");

    let lines = workflow.history().lines();
    assert_eq!(lines.len(), 1);
    assert!(
        lines[0].starts_with("FPM | 01.01.2026 até 10.01.2026 | 2\u{b0} | "),
        "unexpected history line: {}",
        lines[0]
    );
}

#[tokio::test]
async fn extrato_without_disposition_falls_back_to_default_name() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/extratos/gerar"))
        .respond_with(zip_response(None))
        .mount(&server)
        .await;

    let workflow = ExtratoWorkflow::new(
        client_for(&server),
        Arc::new(MemoryStore::new()),
        Arc::new(MemorySink::new()),
    );

    let saved = workflow.submit(&extrato_fields()).await.unwrap();
    assert_eq!(saved.nome, "extratos.zip");
}

#[tokio::test]
async fn extrato_missing_dates_block_before_any_network_call() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let workflow = ExtratoWorkflow::new(
        client_for(&server),
        Arc::new(MemoryStore::new()),
        Arc::new(MemorySink::new()),
    );

    let mut fields = extrato_fields();
    fields.data_fim = String::new();
    let result = workflow.submit(&fields).await;

    assert!(
        matches!(result, Err(EngineError::Validation(ref msg)) if msg == "Preencha as datas."),
        "got: {result:?}"
    );
    assert!(workflow.history().lines().is_empty());
}

#[tokio::test]
async fn server_error_envelope_is_surfaced_verbatim() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/extratos/gerar"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(serde_json::json!({ "erro": "periodo invalido" })),
        )
        .mount(&server)
        .await;

    let sink = Arc::new(MemorySink::new());
    let workflow = ExtratoWorkflow::new(
        client_for(&server),
        Arc::new(MemoryStore::new()),
        Arc::clone(&sink) as Arc<dyn dafex_engine::FileSink>,
    );

    let result = workflow.submit(&extrato_fields()).await;
    assert!(
        matches!(result, Err(EngineError::Service(ref msg)) if msg == "periodo invalido"),
        "got: {result:?}"
    );
    assert!(sink.saved().is_empty(), "no file on failure");
    assert!(workflow.history().lines().is_empty(), "no history on failure");
}

#[tokio::test]
async fn workflow_is_usable_again_after_a_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/extratos/gerar"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let workflow = ExtratoWorkflow::new(
        client_for(&server),
        Arc::new(MemoryStore::new()),
        Arc::new(MemorySink::new()),
    );

    let first = workflow.submit(&extrato_fields()).await;
    assert!(matches!(first, Err(EngineError::Service(_))));

    // The busy flag must have been released by the failing attempt.
    let second = workflow.submit(&extrato_fields()).await;
    assert!(
        !matches!(second, Err(EngineError::Busy)),
        "busy flag leaked across attempts: {second:?}"
    );
}

#[tokio::test]
async fn history_keeps_only_the_25_most_recent_generations() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/extratos/gerar"))
        .respond_with(zip_response(None))
        .mount(&server)
        .await;

    let workflow = ExtratoWorkflow::new(
        client_for(&server),
        Arc::new(MemoryStore::new()),
        Arc::new(MemorySink::new()),
    );

    for day in 1..=28 {
        let fields = ExtratoFields {
            tipo: Fund::Fpm,
            decendio: Decendio::Primeiro,
            data_inicio: format!("2026-01-{day:02}"),
            data_fim: format!("2026-01-{day:02}"),
        };
        workflow.submit(&fields).await.unwrap();
    }

    let entries = workflow.history().entries();
    assert_eq!(entries.len(), 25);
    assert_eq!(entries[0].periodo, "28.01.2026 até 28.01.2026");
    assert_eq!(entries[24].periodo, "04.01.2026 até 04.01.2026");
}

#[tokio::test]
async fn extrato_12m_requires_a_confirmed_selection() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let workflow = Extrato12mWorkflow::new(
        client_for(&server),
        Arc::new(MemoryStore::new()),
        Arc::new(MemorySink::new()),
    );

    let result = workflow.submit(&month_fields()).await;
    assert!(
        matches!(result, Err(EngineError::Validation(ref msg)) if msg == "Selecione um município da lista."),
        "got: {result:?}"
    );
}

#[tokio::test]
async fn extrato_12m_submits_selected_municipality_and_records_history() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/extratos-12m/gerar"))
        .and(body_json(serde_json::json!({
            "tipo": "royalties",
            "mes_inicio": "2024-09",
            "mes_fim": "2025-08",
            "codigo": 4636,
            "municipio": "MANACAPURU",
            "uf": "AM"
        })))
        .respond_with(zip_response(Some("EXTRATO_12M_ROYALTIES_MANACAPURU.zip")))
        .expect(1)
        .mount(&server)
        .await;

    let workflow = Extrato12mWorkflow::new(
        client_for(&server),
        Arc::new(MemoryStore::new()),
        Arc::new(MemorySink::new()),
    );
    workflow.selection().set(4636, "AM");

    let saved = workflow.submit(&month_fields()).await.unwrap();
    assert_eq!(saved.nome, "EXTRATO_12M_ROYALTIES_MANACAPURU.zip");

    let lines = workflow.history().lines();
    assert_eq!(lines.len(), 1);
    assert!(
        lines[0].starts_with("ROYALTIES | MANACAPURU (AM) | 2024-09 até 2025-08 | "),
        "unexpected history line: {}",
        lines[0]
    );
}

#[tokio::test]
async fn full_flow_search_select_then_submit() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/municipios"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            serde_json::json!([{ "codigo": 4636, "municipio": "MANACAPURU", "uf": "AM" }]),
        ))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/extratos-12m/gerar"))
        .respond_with(zip_response(None))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let workflow = Extrato12mWorkflow::new(
        Arc::clone(&client),
        Arc::new(MemoryStore::new()),
        Arc::new(MemorySink::new()),
    );
    let search = MunicipioSearch::new(client, workflow.selection(), Duration::from_millis(10));

    search.on_input("manacapuru");
    tokio::time::sleep(Duration::from_millis(50)).await;
    search.settle().await;
    search.select(0).expect("one suggestion expected");

    let fields = MonthRangeFields {
        municipio: search.input(),
        ..month_fields()
    };
    let saved = workflow.submit(&fields).await.unwrap();
    assert_eq!(saved.nome, "extrato.zip");
}

#[tokio::test]
async fn inex_preview_renders_rows_and_arms_download() {
    let server = MockServer::start().await;

    let preview_body = serde_json::json!({
        "municipio": "MANACAPURU - AM",
        "tipo": "royalties",
        "periodo": "2024-09 até 2025-08",
        "resultados": [
            { "mes": "SETEMBRO DE 2024", "valor": 1234.56 },
            { "mes": "OUTUBRO DE 2024", "valor": 7.0 }
        ]
    });
    let expected_payload = serde_json::json!({
        "tipo": "royalties",
        "mes_inicio": "2024-09",
        "mes_fim": "2025-08",
        "codigo": 4636,
        "municipio": "MANACAPURU",
        "uf": "AM"
    });

    Mock::given(method("POST"))
        .and(path("/inex/gerar"))
        .and(body_json(&expected_payload))
        .respond_with(ResponseTemplate::new(200).set_body_json(&preview_body))
        .expect(1)
        .mount(&server)
        .await;
    // The download must replay the exact payload captured at preview time.
    Mock::given(method("POST"))
        .and(path("/inex/baixar"))
        .and(body_json(&expected_payload))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", MIME_XLSX)
                .insert_header(
                    "content-disposition",
                    r#"attachment; filename="INEX_123_2024.xlsx""#,
                )
                .set_body_bytes(vec![0x50, 0x4b]),
        )
        .expect(1)
        .mount(&server)
        .await;

    let sink = Arc::new(MemorySink::new());
    let workflow = InexWorkflow::new(
        client_for(&server),
        Arc::new(MemoryStore::new()),
        Arc::clone(&sink) as Arc<dyn dafex_engine::FileSink>,
    );
    workflow.selection().set(4636, "AM");

    assert!(!workflow.can_download());
    let preview = workflow.preview(&month_fields()).await.unwrap();
    assert_eq!(preview.municipio, "MANACAPURU - AM");
    assert_eq!(preview.rows.len(), 2);
    assert_eq!(preview.rows[0].valor_formatado, "R$ 1.234,56");
    assert_eq!(preview.rows[1].valor_formatado, "R$ 7,00");
    assert!(workflow.can_download());

    // History is recorded at preview success...
    assert_eq!(workflow.history().lines().len(), 1);

    let saved = workflow.download().await.unwrap();
    assert_eq!(saved.nome, "INEX_123_2024.xlsx");
    assert_eq!(sink.saved().len(), 1);

    // ...and the explicit download step records nothing further.
    assert_eq!(workflow.history().lines().len(), 1);
}

#[tokio::test]
async fn inex_preview_substitutes_dashes_for_missing_header_fields() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/inex/gerar"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    let workflow = InexWorkflow::new(
        client_for(&server),
        Arc::new(MemoryStore::new()),
        Arc::new(MemorySink::new()),
    );
    workflow.selection().set(4636, "AM");

    let preview = workflow.preview(&month_fields()).await.unwrap();
    assert_eq!(preview.municipio, "\u{2014}");
    assert_eq!(preview.tipo, "\u{2014}");
    assert!(preview.rows.is_empty());
}

#[tokio::test]
async fn inex_download_without_a_preview_is_refused() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let workflow = InexWorkflow::new(
        client_for(&server),
        Arc::new(MemoryStore::new()),
        Arc::new(MemorySink::new()),
    );

    let result = workflow.download().await;
    assert!(
        matches!(result, Err(EngineError::Validation(ref msg)) if msg == "Gere uma prévia antes de baixar."),
        "got: {result:?}"
    );
}

#[tokio::test]
async fn typing_after_a_preview_disarms_the_download() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/inex/gerar"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/inex/baixar"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let workflow = InexWorkflow::new(
        Arc::clone(&client),
        Arc::new(MemoryStore::new()),
        Arc::new(MemorySink::new()),
    );
    workflow.selection().set(4636, "AM");
    workflow.preview(&month_fields()).await.unwrap();
    assert!(workflow.can_download());

    // Editing the search text clears the selection, which must disarm the
    // captured preview.
    let search = MunicipioSearch::new(client, workflow.selection(), Duration::from_millis(10));
    search.on_input("m");

    assert!(!workflow.can_download());
    let result = workflow.download().await;
    assert!(
        matches!(result, Err(EngineError::Validation(_))),
        "got: {result:?}"
    );
}

#[tokio::test]
async fn inex_download_failure_surfaces_the_envelope_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/inex/gerar"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/inex/baixar"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(serde_json::json!({ "erro": "planilha indisponível" })),
        )
        .mount(&server)
        .await;

    let workflow = InexWorkflow::new(
        client_for(&server),
        Arc::new(MemoryStore::new()),
        Arc::new(MemorySink::new()),
    );
    workflow.selection().set(4636, "AM");
    workflow.preview(&month_fields()).await.unwrap();

    let result = workflow.download().await;
    assert!(
        matches!(result, Err(EngineError::Service(ref msg)) if msg == "planilha indisponível"),
        "got: {result:?}"
    );
}
