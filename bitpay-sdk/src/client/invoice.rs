//! Invoice endpoints.

use rust_decimal::Decimal;
use serde_json::{Value, json};

use super::BitPayClient;
use crate::config::InvoiceOptions;
use crate::error::ClientError;
use crate::notification;
use crate::objects::invoice::{Invoice, PreparedInvoice, check_provider_error};
use crate::objects::pos_data::PosEnvelope;

impl BitPayClient {
    /// Assemble the request that [`create_invoice`](Self::create_invoice)
    /// would send, without sending it.
    pub fn prepare_invoice(
        &self,
        order_id: impl Into<String>,
        price: Decimal,
        pos_data: impl Into<Value>,
        options: InvoiceOptions,
    ) -> Result<PreparedInvoice, ClientError> {
        PreparedInvoice::new(
            &self.config,
            order_id.into(),
            price,
            pos_data.into(),
            options,
        )
    }

    /// `POST /invoice/` – create an invoice.
    ///
    /// * `order_id` – merchant order reference shown to the buyer.
    /// * `price` – amount in the effective currency.
    /// * `pos_data` – opaque merchant value echoed back on lookups and
    ///   notifications.
    /// * `options` – per-call overrides of the configured defaults.
    ///
    /// Fails before any I/O when the posData envelope is over the length
    /// limit. When logging is enabled the request and the response are
    /// always written to the provider log.
    pub async fn create_invoice(
        &self,
        order_id: impl Into<String>,
        price: Decimal,
        pos_data: impl Into<Value>,
        options: InvoiceOptions,
    ) -> Result<Invoice, ClientError> {
        let prepared = self.prepare_invoice(order_id, price, pos_data, options)?;
        let url = self.config.invoice_url()?;
        let result = self
            .request(url.as_str(), &prepared.api_key, Some(&prepared.request))
            .await;

        self.log_entry("Create Invoice: ").await?;
        self.log_entry(&prepared.request).await?;
        self.log_entry("Response: ").await?;
        match &result {
            Ok(response) => self.log_entry(response).await?,
            Err(ClientError::Decode { raw_body }) => {
                self.log_entry(&json!({ "error": raw_body })).await?
            }
            Err(_) => {}
        }

        let invoice = Invoice::from_value(result?)?;
        tracing::info!(
            order_id = %prepared.request.order_id,
            invoice_id = invoice.id(),
            "bitpay invoice created"
        );
        Ok(invoice)
    }

    /// `GET /invoice/{invoice_id}` – fetch an invoice.
    ///
    /// `api_key` defaults to the configured key. The returned invoice's
    /// `posData` is the merchant's original value. A response without a
    /// well-formed posData envelope is [`ClientError::Malformed`].
    pub async fn get_invoice(
        &self,
        invoice_id: &str,
        api_key: Option<&str>,
    ) -> Result<Invoice, ClientError> {
        let api_key = self.config.resolve_api_key(api_key);
        let url = self.config.invoice_lookup_url(invoice_id)?;

        let mut response = self.request(url.as_str(), api_key, None::<&()>).await?;
        check_provider_error(&response)?;

        let envelope = match response.get("posData") {
            Some(field) => PosEnvelope::from_field(field)?,
            None => {
                return Err(ClientError::Malformed(
                    "invoice has no posData".to_owned(),
                ));
            }
        };
        response["posData"] = envelope.pos_data;

        Invoice::from_value(response)
    }

    /// Verify a notification payload against this client's configuration.
    ///
    /// See [`notification::verify_notification`].
    pub fn verify_notification(
        &self,
        api_key: Option<&str>,
        payload: Option<&str>,
    ) -> Result<Invoice, ClientError> {
        notification::verify_notification(&self.config, api_key, payload)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use super::*;
    use crate::client::test_server;
    use crate::config::{Config, TransactionSpeed};
    use crate::objects::invoice::InvoiceStatus;

    fn price(text: &str) -> Decimal {
        Decimal::from_str(text).unwrap()
    }

    fn form_fields(body: &str) -> Vec<(String, String)> {
        let mut fields: Vec<(String, String)> = url::form_urlencoded::parse(body.as_bytes())
            .into_owned()
            .collect();
        fields.sort();
        fields
    }

    #[tokio::test]
    async fn test_create_invoice_wire_format() {
        let (api_url, requests) = test_server::spawn(
            StatusCode::OK,
            r#"{"id":"Inv1","status":"new","url":"https://bitpay.com/invoice?id=Inv1","price":10,"currency":"USD","posData":"{\"posData\":\"cust-ref-42\"}"}"#,
        )
        .await;
        let config = Config::new("merchant-key")
            .with_api_url(api_url)
            .with_verify_pos(false);
        let client = BitPayClient::new(config).unwrap();

        let invoice = client
            .create_invoice("order123", price("10.00"), "cust-ref-42", InvoiceOptions::default())
            .await
            .unwrap();
        assert_eq!(invoice.id(), Some("Inv1"));
        assert_eq!(invoice.status(), Some(InvoiceStatus::New));

        let recorded = requests.lock().unwrap()[0].clone();
        assert_eq!(recorded.method, Method::POST);
        assert_eq!(recorded.path, "/api/invoice/");
        assert_eq!(
            recorded.header("content-type"),
            Some("application/x-www-form-urlencoded")
        );
        assert_eq!(
            form_fields(&recorded.body),
            vec![
                ("orderID".to_owned(), "order123".to_owned()),
                ("posData".to_owned(), r#"{"posData":"cust-ref-42"}"#.to_owned()),
                ("price".to_owned(), "10.00".to_owned()),
            ]
        );
    }

    #[tokio::test]
    async fn test_create_invoice_sends_only_allowed_fields() {
        let (api_url, requests) = test_server::spawn(StatusCode::OK, r#"{"id":"Inv2"}"#).await;
        let config = Config::new("configured-key")
            .with_api_url(api_url)
            .with_defaults(InvoiceOptions {
                currency: Some("USD".into()),
                transaction_speed: Some(TransactionSpeed::High),
                ..Default::default()
            });
        let client = BitPayClient::new(config).unwrap();

        let options = InvoiceOptions {
            api_key: Some("store-b-key".into()),
            buyer_email: Some("buyer@example.com".into()),
            ..Default::default()
        };
        client
            .create_invoice("o-9", price("3.25"), "ref", options)
            .await
            .unwrap();

        let recorded = requests.lock().unwrap()[0].clone();
        assert_eq!(recorded.header("authorization"), Some("Basic c3RvcmUtYi1rZXk="));
        let keys: Vec<String> = form_fields(&recorded.body).into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec![
                "buyerEmail",
                "currency",
                "orderID",
                "posData",
                "price",
                "transactionSpeed"
            ]
        );
    }

    #[tokio::test]
    async fn test_oversized_pos_data_never_reaches_the_network() {
        let (api_url, requests) = test_server::spawn(StatusCode::OK, "{}").await;
        let client = BitPayClient::new(Config::new("k").with_api_url(api_url)).unwrap();

        let err = client
            .create_invoice("o", price("1"), "p".repeat(80), InvoiceOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        assert!(requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_invoice_logs_request_and_response() {
        let (api_url, _requests) = test_server::spawn(StatusCode::OK, r#"{"id":"Inv3"}"#).await;
        let dir = tempfile::tempdir().unwrap();
        let config = Config::new("k")
            .with_api_url(api_url)
            .with_verify_pos(false)
            .with_logging(Some(dir.path().join("bplog.txt")));
        let client = BitPayClient::new(config).unwrap();

        client
            .create_invoice("o-3", price("2"), "ref", InvoiceOptions::default())
            .await
            .unwrap();

        let log = std::fs::read_to_string(dir.path().join("bplog.txt")).unwrap();
        let entries: Vec<&str> = log
            .lines()
            .map(|line| line.split_once(": ").unwrap().1)
            .collect();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0], r#""Create Invoice: ""#);
        let request: Value = serde_json::from_str(entries[1]).unwrap();
        assert_eq!(request["orderID"], "o-3");
        assert_eq!(entries[2], r#""Response: ""#);
        assert_eq!(entries[3], r#"{"id":"Inv3"}"#);
    }

    #[tokio::test]
    async fn test_create_invoice_surfaces_provider_errors() {
        let (api_url, _requests) = test_server::spawn(
            StatusCode::UNAUTHORIZED,
            r#"{"error":{"type":"unauthorized","message":"invalid api key"}}"#,
        )
        .await;
        let client = BitPayClient::new(Config::new("k").with_api_url(api_url)).unwrap();

        let err = client
            .create_invoice("o", price("1"), "ref", InvoiceOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Provider { ref error } if error["message"] == "invalid api key"));
    }

    #[tokio::test]
    async fn test_get_invoice_unwraps_pos_data() {
        let envelope = PosEnvelope::signed(json!({"cart": 17}), "k").encode().unwrap();
        let reply = json!({"id": "Inv4", "status": "complete", "posData": envelope}).to_string();
        let (api_url, requests) = test_server::spawn(StatusCode::OK, reply).await;
        let client = BitPayClient::new(Config::new("configured").with_api_url(api_url)).unwrap();

        let invoice = client.get_invoice("Inv4", None).await.unwrap();
        assert_eq!(invoice.pos_data(), Some(&json!({"cart": 17})));
        assert_eq!(invoice.status(), Some(InvoiceStatus::Complete));

        let recorded = requests.lock().unwrap()[0].clone();
        assert_eq!(recorded.method, Method::GET);
        assert_eq!(recorded.path, "/api/invoice/Inv4");
        assert_eq!(recorded.header("authorization"), Some("Basic Y29uZmlndXJlZA=="));
    }

    #[tokio::test]
    async fn test_get_invoice_without_pos_data_is_malformed() {
        let (api_url, _requests) = test_server::spawn(StatusCode::OK, r#"{"id":"Inv5"}"#).await;
        let client = BitPayClient::new(Config::new("k").with_api_url(api_url)).unwrap();

        assert!(matches!(
            client.get_invoice("Inv5", Some("other")).await,
            Err(ClientError::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn test_created_invoice_notification_round_trip() {
        let config = Config::new("merchant-key");
        let client = BitPayClient::new(config).unwrap();

        let prepared = client
            .prepare_invoice("o-7", price("9.99"), "cust-ref-7", InvoiceOptions::default())
            .unwrap();
        let payload = json!({
            "id": "Inv7",
            "status": "confirmed",
            "posData": prepared.request.pos_data,
        })
        .to_string();

        let invoice = client.verify_notification(None, Some(&payload)).unwrap();
        assert_eq!(invoice.pos_data(), Some(&json!("cust-ref-7")));
        assert!(matches!(
            client.verify_notification(Some("wrong-key"), Some(&payload)),
            Err(ClientError::Authentication(_))
        ));
    }
}
