use crate::domain::payment::{ApiError, ApiReply, PaymentIntent, ProcessedPayment};
use crate::domain::ports::TerminalBackend;
use crate::domain::reader::Reader;
use crate::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";

const READERS_PATH: &str = "api/readers";
const PROCESS_PAYMENT_PATH: &str = "api/readers/process-payment";
const SIMULATE_PAYMENT_PATH: &str = "api/readers/simulate-payment";
const CAPTURE_PATH: &str = "api/payments/capture";
const CANCEL_PATH: &str = "api/payments/cancel-payment";

/// Either the `{ "error": { "message": ... } }` body or the success body.
///
/// The error shape is tried first; a `null` error falls through to success.
#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Failure { error: ApiError },
    Success(T),
}

impl<T> From<Envelope<T>> for ApiReply<T> {
    fn from(envelope: Envelope<T>) -> Self {
        match envelope {
            Envelope::Failure { error } => ApiReply::Rejected(error),
            Envelope::Success(body) => ApiReply::Accepted(body),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReadersListResponse {
    readers_list: ReaderPage,
}

#[derive(Deserialize)]
struct ReaderPage {
    data: Vec<Reader>,
}

#[derive(Deserialize)]
struct SimulateResponse {}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptureResponse {
    payment_intent: PaymentIntent,
}

#[derive(Deserialize)]
struct CancelResponse {
    reader: Reader,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProcessPaymentRequest<'a> {
    amount: &'a str,
    reader_id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReaderRequest<'a> {
    reader_id: &'a str,
}

// An unselected reader goes out as `null`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CancelRequest<'a> {
    reader_id: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CaptureRequest<'a> {
    payment_intent_id: &'a str,
}

/// Talks to the demo backend over HTTP with JSON bodies.
///
/// The HTTP status is not inspected: the backend reports business errors in
/// the body, and any body that is neither an error nor the expected success
/// shape is a decoding failure.
#[derive(Debug, Clone)]
pub struct HttpTerminalBackend {
    client: Client,
    base: Url,
}

impl HttpTerminalBackend {
    pub fn new(mut base: Url) -> Result<Self> {
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let client = Client::builder().build()?;
        Ok(Self { client, base })
    }

    pub fn parse(base: &str) -> Result<Self> {
        Self::new(Url::parse(base)?)
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base.join(path)?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<ApiReply<T>> {
        let url = self.endpoint(path)?;
        debug!(%url, "GET");
        let response = self.client.get(url).send().await?;
        decode(response).await
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<ApiReply<T>>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        debug!(%url, "POST");
        let response = self.client.post(url).json(body).send().await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<ApiReply<T>> {
    let status = response.status();
    let body = response.bytes().await?;
    debug!(%status, len = body.len(), "Response received");
    let envelope: Envelope<T> = serde_json::from_slice(&body)?;
    Ok(envelope.into())
}

fn map_reply<T, U>(reply: ApiReply<T>, f: impl FnOnce(T) -> U) -> ApiReply<U> {
    match reply {
        ApiReply::Accepted(body) => ApiReply::Accepted(f(body)),
        ApiReply::Rejected(error) => ApiReply::Rejected(error),
    }
}

#[async_trait]
impl TerminalBackend for HttpTerminalBackend {
    async fn list_readers(&self) -> Result<ApiReply<Vec<Reader>>> {
        let reply: ApiReply<ReadersListResponse> = self.get(READERS_PATH).await?;
        Ok(map_reply(reply, |body| body.readers_list.data))
    }

    async fn process_payment(
        &self,
        amount: &str,
        reader_id: &str,
    ) -> Result<ApiReply<ProcessedPayment>> {
        self.post(
            PROCESS_PAYMENT_PATH,
            &ProcessPaymentRequest { amount, reader_id },
        )
        .await
    }

    async fn simulate_payment(&self, reader_id: &str) -> Result<ApiReply<()>> {
        let reply: ApiReply<SimulateResponse> = self
            .post(SIMULATE_PAYMENT_PATH, &ReaderRequest { reader_id })
            .await?;
        Ok(map_reply(reply, |_| ()))
    }

    async fn capture_payment(&self, payment_intent_id: &str) -> Result<ApiReply<PaymentIntent>> {
        let reply: ApiReply<CaptureResponse> = self
            .post(CAPTURE_PATH, &CaptureRequest { payment_intent_id })
            .await?;
        Ok(map_reply(reply, |body| body.payment_intent))
    }

    async fn cancel_payment(&self, reader_id: Option<&str>) -> Result<ApiReply<Reader>> {
        let reply: ApiReply<CancelResponse> =
            self.post(CANCEL_PATH, &CancelRequest { reader_id }).await?;
        Ok(map_reply(reply, |body| body.reader))
    }
}
