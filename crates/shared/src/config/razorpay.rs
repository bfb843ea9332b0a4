use crate::{
    abstract_trait::PaymentGatewayTrait,
    config::RazorpayConfig,
    domain::requests::{GatewayOrder, GatewayOrderRequest},
    errors::ServiceError,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::time::Duration;
use tracing::{error, info};

type HmacSha256 = Hmac<Sha256>;

fn payment_mac(secret: &str, gateway_order_id: &str, gateway_payment_id: &str) -> Option<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(gateway_order_id.as_bytes());
    mac.update(b"|");
    mac.update(gateway_payment_id.as_bytes());
    Some(mac)
}

/// Hex HMAC-SHA256 of `"{order_id}|{payment_id}"`, as the gateway signs a completed checkout.
pub fn sign_payment(secret: &str, gateway_order_id: &str, gateway_payment_id: &str) -> Option<String> {
    payment_mac(secret, gateway_order_id, gateway_payment_id)
        .map(|mac| hex::encode(mac.finalize().into_bytes()))
}

pub fn verify_payment_signature(
    secret: &str,
    gateway_order_id: &str,
    gateway_payment_id: &str,
    signature: &str,
) -> bool {
    let Ok(expected) = hex::decode(signature.trim()) else {
        return false;
    };

    payment_mac(secret, gateway_order_id, gateway_payment_id)
        .is_some_and(|mac| mac.verify_slice(&expected).is_ok())
}

#[derive(Clone)]
pub struct RazorpayClient {
    http: reqwest::Client,
    config: RazorpayConfig,
}

impl RazorpayClient {
    pub fn new(config: RazorpayConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("Failed to build payment gateway HTTP client")?;

        Ok(Self { http, config })
    }
}

#[async_trait]
impl PaymentGatewayTrait for RazorpayClient {
    fn key_id(&self) -> &str {
        &self.config.key_id
    }

    async fn create_order(&self, req: &GatewayOrderRequest) -> Result<GatewayOrder, ServiceError> {
        let url = format!("{}/orders", self.config.base_url);

        info!(
            "💳 Creating gateway order receipt={} amount={} {}",
            req.receipt, req.amount, req.currency
        );

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.config.key_id, Some(&self.config.key_secret))
            .json(req)
            .send()
            .await
            .map_err(|e| {
                error!("❌ Payment gateway unreachable: {e}");
                ServiceError::Gateway(format!("Failed to reach payment gateway: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("❌ Payment gateway rejected order ({status}): {body}");
            return Err(ServiceError::Gateway(format!(
                "Payment gateway returned {status}"
            )));
        }

        response.json::<GatewayOrder>().await.map_err(|e| {
            error!("❌ Unexpected payment gateway response: {e}");
            ServiceError::Gateway(format!("Invalid payment gateway response: {e}"))
        })
    }

    fn verify_signature(
        &self,
        gateway_order_id: &str,
        gateway_payment_id: &str,
        signature: &str,
    ) -> bool {
        verify_payment_signature(
            &self.config.key_secret,
            gateway_order_id,
            gateway_payment_id,
            signature,
        )
    }
}
