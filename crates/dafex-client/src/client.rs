//! The `ServiceClient` and its response classification.

use std::time::Duration;

use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::{Client, Response, Url};
use serde::Serialize;

use crate::disposition::filename_from_disposition;
use crate::error::ClientError;
use crate::types::{
    ErroEnvelope, ExtratoLotePayload, ExtratoMensalPayload, Municipio, PreviaInex, Resposta,
};

const DEFAULT_BASE_URL: &str = "http://localhost:8000/";

const MIME_ZIP: &str = "application/zip";
const MIME_XLSX: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
const MIME_JSON: &str = "application/json";

/// Shown when a 2xx reply declares a content type the contract does not
/// allow for the endpoint.
const UNEXPECTED_RESPONSE: &str = "Resposta inesperada do serviço.";

/// Media type a generation endpoint is expected to answer with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expected {
    Zip,
    Xlsx,
    /// JSON preview, only `inex/gerar`.
    Preview,
}

impl Expected {
    fn mime(self) -> &'static str {
        match self {
            Expected::Zip => MIME_ZIP,
            Expected::Xlsx => MIME_XLSX,
            Expected::Preview => MIME_JSON,
        }
    }
}

/// Client for the extract service.
///
/// Use [`ServiceClient::new`] for the configured production URL or
/// [`ServiceClient::with_base_url`] to point at a mock server in tests.
/// Requests are never retried; every failure is terminal for the attempt.
pub struct ServiceClient {
    client: Client,
    base_url: Url,
}

impl ServiceClient {
    /// Creates a client pointed at the default local service.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64) -> Result<Self, ClientError> {
        Self::with_base_url(DEFAULT_BASE_URL, timeout_secs)
    }

    /// Creates a client with a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ClientError::BaseUrl`] if `base_url` is
    /// not a valid URL.
    pub fn with_base_url(base_url: &str, timeout_secs: u64) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("dafex/0.1 (extract-client)")
            .build()?;

        // Normalise: exactly one trailing slash so joined paths resolve
        // under the base rather than replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| ClientError::BaseUrl(format!("'{base_url}': {e}")))?;

        Ok(Self { client, base_url })
    }

    /// Incremental municipality lookup: `GET municipios?q=<texto>`.
    ///
    /// An empty array from the service means no suggestions.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] on network failure or non-2xx status.
    /// - [`ClientError::Deserialize`] if the body is not a JSON array of
    ///   municipality records.
    pub async fn search_municipios(&self, q: &str) -> Result<Vec<Municipio>, ClientError> {
        let mut url = self.endpoint("municipios")?;
        url.query_pairs_mut().append_pair("q", q);

        let response = self.client.get(url.clone()).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ClientError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }

    /// `POST extratos/gerar`: date-range batch, answers a zip archive.
    ///
    /// # Errors
    ///
    /// [`ClientError::Http`] on network failure; [`ClientError::Deserialize`]
    /// if a declared-JSON body cannot be read.
    pub async fn gerar_extratos(
        &self,
        payload: &ExtratoLotePayload,
    ) -> Result<Resposta, ClientError> {
        self.post_generation(
            "extratos/gerar",
            payload,
            Expected::Zip,
            "Erro ao gerar extratos.",
        )
        .await
    }

    /// `POST extratos-12m/gerar`: month-range extract, answers a zip archive.
    ///
    /// # Errors
    ///
    /// [`ClientError::Http`] on network failure; [`ClientError::Deserialize`]
    /// if a declared-JSON body cannot be read.
    pub async fn gerar_extrato_12m(
        &self,
        payload: &ExtratoMensalPayload,
    ) -> Result<Resposta, ClientError> {
        self.post_generation(
            "extratos-12m/gerar",
            payload,
            Expected::Zip,
            "Erro ao gerar extrato de 12 meses.",
        )
        .await
    }

    /// `POST inex/gerar`: answers the JSON preview, not a file.
    ///
    /// # Errors
    ///
    /// [`ClientError::Http`] on network failure; [`ClientError::Deserialize`]
    /// if a declared-JSON body cannot be parsed as the preview shape.
    pub async fn gerar_previa_inex(
        &self,
        payload: &ExtratoMensalPayload,
    ) -> Result<Resposta, ClientError> {
        self.post_generation(
            "inex/gerar",
            payload,
            Expected::Preview,
            "Erro ao gerar INEX.",
        )
        .await
    }

    /// `POST inex/baixar`: replays a preview payload, answers the xlsx file.
    ///
    /// # Errors
    ///
    /// [`ClientError::Http`] on network failure; [`ClientError::Deserialize`]
    /// if a declared-JSON body cannot be read.
    pub async fn baixar_inex(
        &self,
        payload: &ExtratoMensalPayload,
    ) -> Result<Resposta, ClientError> {
        self.post_generation(
            "inex/baixar",
            payload,
            Expected::Xlsx,
            "Erro ao baixar o arquivo INEX.",
        )
        .await
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::BaseUrl(format!("'{path}': {e}")))
    }

    async fn post_generation<T: Serialize>(
        &self,
        path: &str,
        payload: &T,
        expected: Expected,
        fallback: &str,
    ) -> Result<Resposta, ClientError> {
        let url = self.endpoint(path)?;
        let response = self.client.post(url.clone()).json(payload).send().await?;
        classify(response, expected, fallback, &url).await
    }
}

/// Classifies a generation response into [`Resposta`].
///
/// Order is fixed: status first, then the declared content type. The body is
/// only read after the variant is decided.
async fn classify(
    response: Response,
    expected: Expected,
    fallback: &str,
    url: &Url,
) -> Result<Resposta, ClientError> {
    let status = response.status();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_owned();
    let disposition = response
        .headers()
        .get(CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    if !status.is_success() {
        let body = response.text().await?;
        return Ok(Resposta::Falha(
            parse_erro(&body).unwrap_or_else(|| fallback.to_owned()),
        ));
    }

    if content_type.contains(expected.mime()) {
        if expected == Expected::Preview {
            let body = response.text().await?;
            let previa: PreviaInex =
                serde_json::from_str(&body).map_err(|e| ClientError::Deserialize {
                    context: url.to_string(),
                    source: e,
                })?;
            return Ok(Resposta::Previa(previa));
        }
        let bytes = response.bytes().await?.to_vec();
        let nome = filename_from_disposition(disposition.as_deref());
        return Ok(Resposta::Arquivo { bytes, nome });
    }

    // A 2xx JSON body on a binary endpoint carries the error envelope.
    if content_type.contains(MIME_JSON) {
        let body = response.text().await?;
        return Ok(Resposta::Falha(
            parse_erro(&body).unwrap_or_else(|| fallback.to_owned()),
        ));
    }

    Ok(Resposta::Falha(UNEXPECTED_RESPONSE.to_owned()))
}

fn parse_erro(body: &str) -> Option<String> {
    serde_json::from_str::<ErroEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.erro)
}
