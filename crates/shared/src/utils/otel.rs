use crate::utils::{Method, Metrics, Status};
use anyhow::{Context as _, Result};
use opentelemetry::{
    Context, KeyValue, global,
    trace::{Span, SpanKind, TraceContextExt, Tracer},
};
use opentelemetry_otlp::{LogExporter, MetricExporter, SpanExporter, WithExportConfig};
use opentelemetry_sdk::{
    Resource, logs::SdkLoggerProvider, metrics::SdkMeterProvider, trace::SdkTracerProvider,
};
use prometheus_client::registry::Registry;
use std::sync::Arc;
use tokio::{sync::Mutex, time::Instant};
use tracing::{error, info};

pub struct Telemetry {
    service_name: String,
    otel_endpoint: String,
    tracer_provider: Option<SdkTracerProvider>,
    meter_provider: Option<SdkMeterProvider>,
    logger_provider: Option<SdkLoggerProvider>,
}

pub struct TracingContext {
    pub cx: Context,
    pub start_time: Instant,
}

impl Telemetry {
    pub fn new(service_name: impl Into<String>, otel_endpoint: String) -> Self {
        Self {
            service_name: service_name.into(),
            otel_endpoint,
            tracer_provider: None,
            meter_provider: None,
            logger_provider: None,
        }
    }

    fn get_resource(&self) -> Resource {
        Resource::builder()
            .with_service_name(self.service_name.clone())
            .build()
    }

    pub fn init_tracer(&mut self) -> Result<SdkTracerProvider> {
        let exporter = SpanExporter::builder()
            .with_tonic()
            .with_endpoint(self.otel_endpoint.clone())
            .build()
            .context("Failed to create span exporter")?;

        let provider = SdkTracerProvider::builder()
            .with_resource(self.get_resource())
            .with_batch_exporter(exporter)
            .build();

        global::set_tracer_provider(provider.clone());
        self.tracer_provider = Some(provider.clone());

        Ok(provider)
    }

    pub fn init_meter(&mut self) -> Result<SdkMeterProvider> {
        let exporter = MetricExporter::builder()
            .with_tonic()
            .with_endpoint(self.otel_endpoint.clone())
            .build()
            .context("Failed to create metric exporter")?;

        let provider = SdkMeterProvider::builder()
            .with_resource(self.get_resource())
            .with_periodic_exporter(exporter)
            .build();

        global::set_meter_provider(provider.clone());
        self.meter_provider = Some(provider.clone());

        Ok(provider)
    }

    pub fn init_logger(&mut self) -> Result<SdkLoggerProvider> {
        let exporter = LogExporter::builder()
            .with_tonic()
            .with_endpoint(self.otel_endpoint.clone())
            .build()
            .context("Failed to create log exporter")?;

        let provider = SdkLoggerProvider::builder()
            .with_resource(self.get_resource())
            .with_batch_exporter(exporter)
            .build();

        self.logger_provider = Some(provider.clone());

        Ok(provider)
    }

    pub fn shutdown(self) -> Result<()> {
        let mut errors = Vec::new();

        if let Some(provider) = self.tracer_provider
            && let Err(e) = provider.shutdown()
        {
            errors.push(format!("tracer provider: {e}"));
        }
        if let Some(provider) = self.meter_provider
            && let Err(e) = provider.shutdown()
        {
            errors.push(format!("meter provider: {e}"));
        }
        if let Some(provider) = self.logger_provider
            && let Err(e) = provider.shutdown()
        {
            errors.push(format!("logger provider: {e}"));
        }

        if !errors.is_empty() {
            anyhow::bail!("Failed to shutdown providers:\n{}", errors.join("\n"));
        }

        Ok(())
    }
}

/// Span and Prometheus bookkeeping shared by every service operation.
#[derive(Clone)]
pub struct ServiceTracer {
    tracer_name: &'static str,
    metrics: Metrics,
}

impl ServiceTracer {
    pub async fn new(
        tracer_name: &'static str,
        component: &str,
        registry: &Arc<Mutex<Registry>>,
    ) -> Self {
        let metrics = Metrics::new();
        let prefix = tracer_name.replace('-', "_");

        metrics.register(&mut *registry.lock().await, &prefix, component);

        Self {
            tracer_name,
            metrics,
        }
    }

    pub fn start(&self, operation_name: &str, attributes: Vec<KeyValue>) -> TracingContext {
        let start_time = Instant::now();
        let tracer = global::tracer(self.tracer_name);
        let mut span = tracer
            .span_builder(operation_name.to_string())
            .with_kind(SpanKind::Server)
            .with_attributes(attributes)
            .start(&tracer);

        info!("Starting operation: {operation_name}");

        span.add_event(
            "Operation started",
            vec![KeyValue::new("operation", operation_name.to_string())],
        );

        let cx = Context::current_with_span(span);
        TracingContext { cx, start_time }
    }

    pub fn success(&self, tracing_ctx: &TracingContext, method: Method, message: &str) {
        self.complete(tracing_ctx, method, true, message);
    }

    pub fn error(&self, tracing_ctx: &TracingContext, method: Method, message: &str) {
        self.complete(tracing_ctx, method, false, message);
    }

    fn complete(&self, tracing_ctx: &TracingContext, method: Method, is_success: bool, message: &str) {
        let status_str = if is_success { "SUCCESS" } else { "ERROR" };
        let status = if is_success {
            Status::Success
        } else {
            Status::Error
        };
        let elapsed = tracing_ctx.start_time.elapsed().as_secs_f64();

        tracing_ctx.cx.span().add_event(
            "Operation completed",
            vec![
                KeyValue::new("status", status_str),
                KeyValue::new("duration_secs", elapsed.to_string()),
                KeyValue::new("message", message.to_string()),
            ],
        );

        if is_success {
            info!("✅ Operation completed successfully: {message}");
        } else {
            error!("❌ Operation failed: {message}");
        }

        self.metrics.record(method, status, elapsed);

        tracing_ctx.cx.span().end();
    }
}
