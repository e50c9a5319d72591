use crate::core::{Pipeline, RunSummary};
use crate::utils::error::Result;
use crate::utils::monitor::ResourceMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: ResourceMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: ResourceMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<RunSummary> {
        tracing::info!("🚀 Starting {}", self.pipeline.name());
        self.monitor.log_phase("Start");

        let result = self.pipeline.execute().await;

        self.monitor.log_final();
        match &result {
            Ok(summary) => tracing::info!(
                "✅ {} finished: {} processed, {} skipped ({})",
                self.pipeline.name(),
                summary.processed,
                summary.skipped,
                summary.format
            ),
            Err(e) => tracing::error!("❌ {} failed: {}", self.pipeline.name(), e),
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DatasetFormat;
    use crate::utils::error::EtlError;

    struct FixedPipeline {
        fail: bool,
    }

    #[async_trait::async_trait]
    impl Pipeline for FixedPipeline {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn execute(&self) -> Result<RunSummary> {
            if self.fail {
                return Err(EtlError::FileNotFound {
                    path: "nowhere.json".to_string(),
                });
            }
            Ok(RunSummary {
                format: DatasetFormat::Array,
                processed: 4,
                skipped: 0,
                output_path: "out.json".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_engine_returns_pipeline_summary() {
        let engine = EtlEngine::new(FixedPipeline { fail: false });
        let summary = engine.run().await.unwrap();
        assert_eq!(summary.processed, 4);
    }

    #[tokio::test]
    async fn test_engine_propagates_failure() {
        let engine = EtlEngine::new_with_monitoring(FixedPipeline { fail: true }, true);
        assert!(matches!(
            engine.run().await,
            Err(EtlError::FileNotFound { .. })
        ));
    }
}
