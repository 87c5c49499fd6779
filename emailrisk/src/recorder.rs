// Decision recorder: a JSONL append-only sink (the teacher's
// `dispatcher.rs::OpenOptions::append` + `to_jsonl()` discipline) plus
// a best-effort, fire-and-forget forward of block/warn decisions to an
// origin URL, modeled on `ioc_feed.rs::IocFeedPublisher::submit`'s
// per-destination `tokio::spawn` with a bounded deadline.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use hmac::{Hmac, Mac};
use sha2::Sha256;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{error, info, warn};

use crate::config::Configuration;
use crate::otel::Metrics;
use crate::types::DecisionRecord;

type HmacSha256 = Hmac<Sha256>;

const FORWARD_TIMEOUT: Duration = Duration::from_secs(2);

pub struct Recorder {
    sink_path: PathBuf,
    http: reqwest::Client,
    metrics: Arc<Metrics>,
    forward_key: String,
}

impl Recorder {
    pub fn new(sink_path: PathBuf, metrics: Arc<Metrics>, forward_key: String) -> Self {
        Self { sink_path, http: reqwest::Client::new(), metrics, forward_key }
    }

    pub async fn record(self: &Arc<Self>, record: DecisionRecord, config: &Configuration) {
        self.metrics.record_decision(&record.decision);

        if record.decision == "block" {
            warn!(
                email_hash = %record.email_hash,
                reason = ?record.block_reason,
                "blocked signup attempt"
            );
        } else if config.flags.log_all_validations {
            info!(
                email_hash = %record.email_hash,
                decision = %record.decision,
                risk_score = record.risk_score,
                "validation decision"
            );
        }

        if let Err(e) = self.append_jsonl(&record).await {
            error!("decision sink write failed: {e}");
        }

        let origin_url = &config.integration.origin_url;
        if config.flags.enable_origin_headers && !origin_url.is_empty() && record.decision != "allow" {
            let this = Arc::clone(self);
            let url = origin_url.clone();
            let record = record.clone();
            tokio::spawn(async move {
                this.forward(&url, &record).await;
            });
        }
    }

    async fn append_jsonl(&self, record: &DecisionRecord) -> std::io::Result<()> {
        let line = serde_json::to_string(record)?;
        let mut file = OpenOptions::new().create(true).append(true).open(&self.sink_path).await?;
        file.write_all(line.as_bytes()).await?;
        file.write_all(b"\n").await?;
        Ok(())
    }

    async fn forward(&self, url: &str, record: &DecisionRecord) {
        let body = match serde_json::to_vec(record) {
            Ok(b) => b,
            Err(e) => {
                warn!("origin forward serialize failed: {e}");
                return;
            }
        };
        let signature = self.sign(&body);

        let result = tokio::time::timeout(
            FORWARD_TIMEOUT,
            self.http
                .post(url)
                .header("X-Fraud-Decision", record.decision.clone())
                .header("X-Fraud-Score", record.risk_score.to_string())
                .header("X-Fraud-Signature", signature)
                .body(body)
                .send(),
        )
        .await;

        match result {
            Ok(Ok(resp)) if !resp.status().is_success() => {
                warn!("origin forward returned {}", resp.status());
            }
            Ok(Err(e)) => warn!("origin forward request failed: {e}"),
            Err(_) => warn!("origin forward timed out after {:?}", FORWARD_TIMEOUT),
            Ok(Ok(_)) => {}
        }
    }

    fn sign(&self, body: &[u8]) -> String {
        let mut mac = HmacSha256::new_from_slice(self.forward_key.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(body);
        hex::encode(mac.finalize().into_bytes())
    }
}
