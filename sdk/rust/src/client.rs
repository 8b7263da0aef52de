use std::collections::HashMap;

use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};

/// Successful operation body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Computation {
    pub operation: String,
    /// `None` when the service returned a non-finite result (JSON `null`).
    pub result: Option<f64>,
    pub timestamp: String,
    /// Operand fields, keyed by the name the operation reports them under.
    #[serde(flatten)]
    pub operands: HashMap<String, f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    pub uptime: f64,
    pub timestamp: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service returned {status}: {body}")]
    Api {
        status: StatusCode,
        body: serde_json::Value,
    },
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Http(e) => e.status(),
            ClientError::Api { status, .. } => Some(*status),
        }
    }

    /// The service's JSON error body, if it answered.
    pub fn body(&self) -> Option<&serde_json::Value> {
        match self {
            ClientError::Api { body, .. } => Some(body),
            ClientError::Http(_) => None,
        }
    }
}

pub struct CalculatorClient {
    client: Client,
    base_url: String,
}

impl CalculatorClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn add(&self, num1: f64, num2: f64) -> Result<Computation, ClientError> {
        self.binary("/add", num1, num2).await
    }

    pub async fn subtract(&self, num1: f64, num2: f64) -> Result<Computation, ClientError> {
        self.binary("/subtract", num1, num2).await
    }

    pub async fn multiply(&self, num1: f64, num2: f64) -> Result<Computation, ClientError> {
        self.binary("/multiply", num1, num2).await
    }

    pub async fn divide(&self, num1: f64, num2: f64) -> Result<Computation, ClientError> {
        self.binary("/divide", num1, num2).await
    }

    pub async fn power(&self, base: f64, exponent: f64) -> Result<Computation, ClientError> {
        self.binary("/power", base, exponent).await
    }

    pub async fn modulo(&self, dividend: f64, divisor: f64) -> Result<Computation, ClientError> {
        self.binary("/modulo", dividend, divisor).await
    }

    pub async fn sqrt(&self, num: f64) -> Result<Computation, ClientError> {
        let num = num.to_string();
        let res = self.get("/sqrt", &[("num", num.as_str())]).await?;
        decode(res).await
    }

    pub async fn health(&self) -> Result<Health, ClientError> {
        let res = self.get("/health", &[]).await?;
        decode(res).await
    }

    /// Raw GET with arbitrary query parameters, for inputs the typed methods
    /// cannot express (missing or non-numeric values).
    pub async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Response, reqwest::Error> {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .query(query)
            .send()
            .await
    }

    async fn binary(&self, path: &str, num1: f64, num2: f64) -> Result<Computation, ClientError> {
        let (a, b) = (num1.to_string(), num2.to_string());
        let res = self.get(path, &[("num1", a.as_str()), ("num2", b.as_str())]).await?;
        decode(res).await
    }
}

async fn decode<T: serde::de::DeserializeOwned>(res: Response) -> Result<T, ClientError> {
    let status = res.status();
    if !status.is_success() {
        let body = res.json().await.unwrap_or(serde_json::Value::Null);
        return Err(ClientError::Api { status, body });
    }
    Ok(res.json().await?)
}
